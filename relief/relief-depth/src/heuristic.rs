//! Grayscale, blur, Laplacian and normalization passes.

use image::{GrayImage, RgbaImage};
use relief_types::DepthMap;
use tracing::debug;

use crate::error::{DepthError, DepthResult};

/// Standard luma weights for RGB to grayscale conversion.
const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// Parameters for the depth heuristic.
///
/// The defaults reproduce the classic 5×5 blur with its implied sigma.
///
/// # Example
///
/// ```
/// use relief_depth::DepthParams;
///
/// let params = DepthParams::default();
/// assert_eq!(params.kernel_size, 5);
///
/// let wide = DepthParams::new().with_kernel_size(9).with_sigma(2.0);
/// assert_eq!(wide.kernel_size, 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthParams {
    /// Gaussian kernel size in samples. Must be odd and >= 1.
    pub kernel_size: u32,

    /// Gaussian sigma. When `None`, derived from the kernel size the
    /// standard way: `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
    pub sigma: Option<f64>,
}

impl Default for DepthParams {
    fn default() -> Self {
        Self::new()
    }
}

impl DepthParams {
    /// Create parameters with default values.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            kernel_size: 5,
            sigma: None,
        }
    }

    /// Set the blur kernel size.
    #[inline]
    #[must_use]
    pub const fn with_kernel_size(mut self, size: u32) -> Self {
        self.kernel_size = size;
        self
    }

    /// Set an explicit blur sigma.
    #[inline]
    #[must_use]
    pub const fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = Some(sigma);
        self
    }

    /// The sigma actually used by the blur pass.
    #[must_use]
    pub fn effective_sigma(&self) -> f64 {
        self.sigma
            .unwrap_or_else(|| 0.3f64.mul_add((f64::from(self.kernel_size) - 1.0) * 0.5 - 1.0, 0.8))
    }

    fn validate(&self) -> DepthResult<()> {
        if self.kernel_size == 0 || self.kernel_size % 2 == 0 {
            return Err(DepthError::InvalidKernel {
                size: self.kernel_size,
            });
        }
        let sigma = self.effective_sigma();
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(DepthError::InvalidSigma { sigma });
        }
        Ok(())
    }
}

/// Compute a normalized depth map from an RGBA image.
///
/// Grayscale conversion weights each channel by the standard luma factors
/// and premultiplies by alpha, so fully transparent pixels (removed
/// background) contribute no edge signal.
///
/// # Errors
///
/// Returns [`DepthError::EmptyImage`] for a zero-sized image and
/// [`DepthError::InvalidKernel`] / [`DepthError::InvalidSigma`] for bad
/// parameters.
///
/// # Example
///
/// ```
/// use image::RgbaImage;
/// use relief_depth::{compute_depth, DepthParams};
///
/// let image = RgbaImage::new(16, 16);
/// let depth = compute_depth(&image, &DepthParams::default())?;
/// assert_eq!(depth.dimensions(), (16, 16));
/// # Ok::<(), relief_depth::DepthError>(())
/// ```
pub fn compute_depth(image: &RgbaImage, params: &DepthParams) -> DepthResult<DepthMap> {
    let (width, height) = image.dimensions();
    let luma = image
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            let gray = LUMA_B.mul_add(
                f64::from(b),
                LUMA_R.mul_add(f64::from(r), LUMA_G * f64::from(g)),
            );
            gray * (f64::from(a) / 255.0)
        })
        .collect();
    depth_from_luma(width, height, luma, params)
}

/// Compute a normalized depth map from a grayscale image.
///
/// # Errors
///
/// Same conditions as [`compute_depth`].
pub fn compute_depth_gray(image: &GrayImage, params: &DepthParams) -> DepthResult<DepthMap> {
    let (width, height) = image.dimensions();
    let luma = image.pixels().map(|p| f64::from(p.0[0])).collect();
    depth_from_luma(width, height, luma, params)
}

fn depth_from_luma(
    width: u32,
    height: u32,
    luma: Vec<f64>,
    params: &DepthParams,
) -> DepthResult<DepthMap> {
    params.validate()?;
    if width == 0 || height == 0 {
        return Err(DepthError::EmptyImage { width, height });
    }

    let w = width as usize;
    let h = height as usize;
    let sigma = params.effective_sigma();

    let blurred = gaussian_blur(&luma, w, h, params.kernel_size as usize, sigma);
    let mut response = laplacian(&blurred, w, h);
    normalize_in_place(&mut response);

    debug!(
        width,
        height, sigma, "computed depth map from intensity variation"
    );

    let mut map = DepthMap::new(width, height);
    map.as_mut_slice().copy_from_slice(&response);
    Ok(map)
}

/// Mirror an index into `[0, n)` without repeating the border sample.
///
/// This is the reflect-101 policy: for n = 4 the sequence at the left
/// border reads `-1 -> 1`, `-2 -> 2`, and at the right `4 -> 2`, `5 -> 1`.
fn reflect_101(index: i64, n: i64) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let mut i = index.rem_euclid(period);
    if i >= n {
        i = period - i;
    }
    #[allow(clippy::cast_sign_loss)]
    // rem_euclid and the reflection keep i in [0, n)
    {
        i as usize
    }
}

/// Separable Gaussian blur with reflect-101 borders.
#[allow(clippy::cast_possible_wrap)]
// Wrapping is safe: image dimensions and kernel radii fit in i64
fn gaussian_blur(
    values: &[f64],
    width: usize,
    height: usize,
    kernel_size: usize,
    sigma: f64,
) -> Vec<f64> {
    let kernel = gaussian_kernel(kernel_size, sigma);
    let radius = (kernel_size / 2) as i64;

    // Horizontal pass
    let mut horizontal = vec![0.0; values.len()];
    for y in 0..height {
        let row = &values[y * width..(y + 1) * width];
        for x in 0..width {
            let mut acc = 0.0;
            for (k, &weight) in kernel.iter().enumerate() {
                let sx = reflect_101(x as i64 + k as i64 - radius, width as i64);
                acc = weight.mul_add(row[sx], acc);
            }
            horizontal[y * width + x] = acc;
        }
    }

    // Vertical pass
    let mut blurred = vec![0.0; values.len()];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0;
            for (k, &weight) in kernel.iter().enumerate() {
                let sy = reflect_101(y as i64 + k as i64 - radius, height as i64);
                acc = weight.mul_add(horizontal[sy * width + x], acc);
            }
            blurred[y * width + x] = acc;
        }
    }

    blurred
}

/// Normalized 1D Gaussian kernel.
#[allow(clippy::cast_precision_loss)]
// Precision loss is safe: kernel sizes are tiny
fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f64> {
    let center = (size / 2) as f64;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - center;
            (-d * d / denom).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Discrete 4-neighbor Laplacian with reflect-101 borders.
///
/// Produces the signed second-derivative response; peaks line up with
/// intensity edges in the blurred field.
#[allow(clippy::cast_possible_wrap)]
// Wrapping is safe: image dimensions fit in i64
fn laplacian(values: &[f64], width: usize, height: usize) -> Vec<f64> {
    let mut out = vec![0.0; values.len()];
    let w = width as i64;
    let h = height as i64;

    for y in 0..height {
        for x in 0..width {
            let left = values[y * width + reflect_101(x as i64 - 1, w)];
            let right = values[y * width + reflect_101(x as i64 + 1, w)];
            let up = values[reflect_101(y as i64 - 1, h) * width + x];
            let down = values[reflect_101(y as i64 + 1, h) * width + x];
            let center = values[y * width + x];
            out[y * width + x] = 4.0f64.mul_add(-center, left + right + up + down);
        }
    }

    out
}

/// Normalize samples to `[0, 1]` via `(v - min) / (max - min)`.
///
/// A flat field (max == min) maps to all zeros instead of dividing by zero.
fn normalize_in_place(values: &mut [f64]) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values.iter() {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }

    let range = max - min;
    if !range.is_finite() || range < f64::EPSILON {
        values.fill(0.0);
        return;
    }

    for v in values.iter_mut() {
        *v = (*v - min) / range;
    }
}
