//! Prompt-driven image synthesis.
//!
//! Turns a text prompt into a procedural image so the text path can feed the
//! same depth-to-mesh pipeline as a photograph. The prompt is hashed into an
//! RNG seed and rendered as multi-octave value noise, so equal prompts always
//! produce equal images and different prompts produce visibly different
//! relief.
//!
//! # Example
//!
//! ```
//! use relief_image::{Synthesizer, SynthesizerParams};
//!
//! let synthesizer = Synthesizer::new(SynthesizerParams::default()).unwrap();
//! let a = synthesizer.synthesize("a mountain range").unwrap();
//! let b = synthesizer.synthesize("a mountain range").unwrap();
//! assert_eq!(a, b);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{ImageError, ImageResult};

/// Parameters for prompt synthesis.
#[derive(Debug, Clone, Copy)]
pub struct SynthesizerParams {
    /// Output image width in pixels (default: 256).
    pub width: u32,

    /// Output image height in pixels (default: 256).
    pub height: u32,

    /// Lattice cell size in pixels of the coarsest noise octave
    /// (default: 64). Halved per octave, floored at 2.
    pub base_cell: u32,

    /// Number of noise octaves to sum, between 1 and 8 (default: 4).
    pub octaves: u32,
}

impl Default for SynthesizerParams {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            base_cell: 64,
            octaves: 4,
        }
    }
}

impl SynthesizerParams {
    /// Creates new parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output dimensions.
    #[must_use]
    pub const fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the coarsest lattice cell size.
    #[must_use]
    pub const fn with_base_cell(mut self, base_cell: u32) -> Self {
        self.base_cell = base_cell;
        self
    }

    /// Sets the octave count.
    #[must_use]
    pub const fn with_octaves(mut self, octaves: u32) -> Self {
        self.octaves = octaves;
        self
    }

    fn validate(&self) -> ImageResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ImageError::InvalidParameter {
                reason: format!(
                    "output dimensions must be non-zero, got {}x{}",
                    self.width, self.height
                ),
            });
        }
        if self.base_cell < 2 {
            return Err(ImageError::InvalidParameter {
                reason: format!("base cell must be at least 2, got {}", self.base_cell),
            });
        }
        if self.octaves == 0 || self.octaves > 8 {
            return Err(ImageError::InvalidParameter {
                reason: format!("octaves must be between 1 and 8, got {}", self.octaves),
            });
        }
        Ok(())
    }
}

/// Prompt synthesis session.
///
/// Create once with [`Synthesizer::new`] and reuse; the session carries only
/// validated parameters, all prompt-specific state lives on the stack of each
/// [`synthesize`](Synthesizer::synthesize) call.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    params: SynthesizerParams,
}

impl Synthesizer {
    /// Creates a synthesizer session.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidParameter`] if any dimension is zero, the
    /// base cell is below 2, or the octave count is outside 1..=8.
    pub fn new(params: SynthesizerParams) -> ImageResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Renders a prompt as a grayscale noise image.
    ///
    /// Deterministic: the prompt is the only source of randomness, so equal
    /// prompts yield identical images.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidParameter`] if the prompt is empty or
    /// whitespace-only.
    pub fn synthesize(&self, prompt: &str) -> ImageResult<RgbImage> {
        if prompt.trim().is_empty() {
            return Err(ImageError::InvalidParameter {
                reason: "prompt must not be empty".to_string(),
            });
        }

        let seed = prompt_seed(prompt);
        let mut rng = StdRng::seed_from_u64(seed);

        let width = self.params.width;
        let height = self.params.height;
        let mut field = vec![0.0f64; (width as usize) * (height as usize)];
        let mut total_amplitude = 0.0;
        let mut amplitude = 1.0;

        for octave in 0..self.params.octaves {
            let cell = (self.params.base_cell >> octave).max(2);
            accumulate_octave(&mut field, width, height, cell, amplitude, &mut rng);
            total_amplitude += amplitude;
            amplitude *= 0.5;
        }

        let image = RgbImage::from_fn(width, height, |x, y| {
            let v = field[(y as usize) * (width as usize) + (x as usize)] / total_amplitude;
            let level = (v * 255.0).round() as u8;
            Rgb([level, level, level])
        });

        debug!(
            width,
            height,
            seed,
            octaves = self.params.octaves,
            "synthesized image from prompt"
        );
        Ok(image)
    }
}

/// Hashes a prompt into an RNG seed.
///
/// `DefaultHasher::new()` hashes with fixed keys, so a prompt maps to the
/// same seed on every run.
fn prompt_seed(prompt: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    prompt.hash(&mut hasher);
    hasher.finish()
}

/// Adds one octave of value noise to `field`.
///
/// Draws a lattice of random values at `cell`-pixel spacing and interpolates
/// it bilinearly with a smoothstep fade.
fn accumulate_octave(
    field: &mut [f64],
    width: u32,
    height: u32,
    cell: u32,
    amplitude: f64,
    rng: &mut StdRng,
) {
    let lattice_width = (width / cell + 2) as usize;
    let lattice_height = (height / cell + 2) as usize;
    let lattice: Vec<f64> = (0..lattice_width * lattice_height)
        .map(|_| rng.gen::<f64>())
        .collect();

    for y in 0..height {
        let fy = f64::from(y) / f64::from(cell);
        let gy = fy.floor() as usize;
        let ty = fade(fy.fract());

        for x in 0..width {
            let fx = f64::from(x) / f64::from(cell);
            let gx = fx.floor() as usize;
            let tx = fade(fx.fract());

            let v00 = lattice[gy * lattice_width + gx];
            let v10 = lattice[gy * lattice_width + gx + 1];
            let v01 = lattice[(gy + 1) * lattice_width + gx];
            let v11 = lattice[(gy + 1) * lattice_width + gx + 1];

            let top = v00 + (v10 - v00) * tx;
            let bottom = v01 + (v11 - v01) * tx;
            let value = top + (bottom - top) * ty;

            field[(y as usize) * (width as usize) + (x as usize)] += value * amplitude;
        }
    }
}

/// Smoothstep fade, flattens the interpolation at lattice points.
fn fade(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}
