//! Offscreen z-buffer rendering.
//!
//! Draws a mesh with flat Lambert shading under a single white directional
//! light travelling along -Z, onto a white background. The camera is fitted
//! to the mesh bounds, so the whole model is always in frame regardless of
//! its scale.

use std::f64::consts::{FRAC_PI_3, PI};

use image::{Rgb, RgbImage};
use tracing::debug;

use relief_types::{IndexedMesh, MeshBounds, MeshTopology, Triangle};

use crate::context::{RenderContext, ScreenPoint};
use crate::error::{RenderError, RenderResult};

/// Settings for the offscreen renderer.
///
/// The defaults produce an 800x600 frame with a 60 degree vertical field of
/// view, a directional light of intensity 2.0 and a light gray material.
///
/// # Example
///
/// ```
/// use relief_render::RenderParams;
///
/// let params = RenderParams::default().with_dimensions(400, 300);
/// assert_eq!(params.width, 400);
/// ```
#[derive(Debug, Clone)]
pub struct RenderParams {
    /// Output image width in pixels.
    pub width: u32,
    /// Output image height in pixels.
    pub height: u32,
    /// Vertical field of view in radians.
    pub yfov: f64,
    /// Intensity of the directional light.
    pub light_intensity: f64,
    /// Material base color, each channel in [0, 1].
    pub base_color: [f64; 3],
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            yfov: FRAC_PI_3,
            light_intensity: 2.0,
            base_color: [0.8, 0.8, 0.8],
        }
    }
}

impl RenderParams {
    /// Set the output dimensions in pixels.
    #[must_use]
    pub const fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the vertical field of view in radians.
    #[must_use]
    pub const fn with_yfov(mut self, yfov: f64) -> Self {
        self.yfov = yfov;
        self
    }

    /// Set the directional light intensity.
    #[must_use]
    pub const fn with_light_intensity(mut self, intensity: f64) -> Self {
        self.light_intensity = intensity;
        self
    }

    /// Set the material base color.
    #[must_use]
    pub const fn with_base_color(mut self, base_color: [f64; 3]) -> Self {
        self.base_color = base_color;
        self
    }

    /// Validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::InvalidParameter` if any field is out of range.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidParameter {
                reason: "image dimensions must be non-zero".to_string(),
            });
        }
        if !(self.yfov > 0.0 && self.yfov < PI) {
            return Err(RenderError::InvalidParameter {
                reason: "field of view must be inside (0, pi)".to_string(),
            });
        }
        if !self.light_intensity.is_finite() || self.light_intensity < 0.0 {
            return Err(RenderError::InvalidParameter {
                reason: "light intensity must be finite and non-negative".to_string(),
            });
        }
        if self.base_color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(RenderError::InvalidParameter {
                reason: "base color channels must be in [0, 1]".to_string(),
            });
        }
        Ok(())
    }
}

/// Render a mesh to an offscreen frame.
///
/// The camera looks straight down the Z axis at the mesh, pulled back far
/// enough that the whole bounding sphere is in frame. Faces are shaded with
/// a flat, double-sided Lambert term, so slope shows up as brightness.
/// Non-finite faces are skipped.
///
/// # Errors
///
/// - [`RenderError::InvalidParameter`] if the parameters fail validation
/// - [`RenderError::EmptyMesh`] if the mesh has no vertices or no faces
/// - [`RenderError::NonFiniteGeometry`] if the mesh bounds are not finite
///
/// # Example
///
/// ```
/// use relief_render::{render_mesh, RenderParams};
/// use relief_types::unit_cube;
///
/// let frame = render_mesh(&unit_cube(), &RenderParams::default()).unwrap();
/// assert_eq!(frame.dimensions(), (800, 600));
/// ```
pub fn render_mesh(mesh: &IndexedMesh, params: &RenderParams) -> RenderResult<RgbImage> {
    params.validate()?;
    if mesh.is_empty() {
        return Err(RenderError::EmptyMesh);
    }

    let bounds = mesh.bounds();
    let finite = bounds
        .min
        .coords
        .iter()
        .chain(bounds.max.coords.iter())
        .all(|c| c.is_finite());
    if bounds.is_empty() || !finite {
        return Err(RenderError::NonFiniteGeometry);
    }

    let mut ctx = RenderContext::new(&bounds, params);
    let mut drawn = 0usize;
    for triangle in mesh.triangles() {
        if !triangle.is_finite() {
            continue;
        }
        let color = shade(&triangle, params);
        fill_triangle(&mut ctx, &triangle, color);
        drawn += 1;
    }

    debug!(
        faces = mesh.face_count(),
        drawn,
        width = params.width,
        height = params.height,
        "rendered mesh"
    );
    Ok(ctx.into_image())
}

/// Flat Lambert shade for one face.
///
/// The light travels along -Z with the configured intensity, matching a
/// directional light placed above the mesh. Shading is double-sided, so the
/// winding of a face does not black it out.
fn shade(triangle: &Triangle, params: &RenderParams) -> Rgb<u8> {
    let cos_term = triangle.normal().map_or(0.0, |n| n.z.abs());
    let irradiance = params.light_intensity * cos_term / PI;

    let mut channels = [0u8; 3];
    for (out, base) in channels.iter_mut().zip(params.base_color) {
        let value = (base * irradiance).clamp(0.0, 1.0);
        *out = (value * 255.0).round() as u8;
    }
    Rgb(channels)
}

/// Signed twice-area of the triangle (a, b, p) in screen space.
fn edge_at(a: &ScreenPoint, b: &ScreenPoint, x: f64, y: f64) -> f64 {
    (b.x - a.x) * (y - a.y) - (b.y - a.y) * (x - a.x)
}

/// Rasterize one triangle with screen-space interpolated depth.
fn fill_triangle(ctx: &mut RenderContext, triangle: &Triangle, color: Rgb<u8>) {
    let Some(a) = ctx.project(&triangle.v0) else {
        return;
    };
    let Some(b) = ctx.project(&triangle.v1) else {
        return;
    };
    let Some(c) = ctx.project(&triangle.v2) else {
        return;
    };

    // Dividing the edge functions by the signed area makes the inside test
    // winding-independent.
    let area = edge_at(&a, &b, c.x, c.y);
    if area.abs() < f64::EPSILON {
        return;
    }

    let max_x_bound = f64::from(ctx.width() - 1);
    let max_y_bound = f64::from(ctx.height() - 1);
    let min_x = a.x.min(b.x).min(c.x).floor();
    let max_x = a.x.max(b.x).max(c.x).ceil();
    let min_y = a.y.min(b.y).min(c.y).floor();
    let max_y = a.y.max(b.y).max(c.y).ceil();
    if max_x < 0.0 || max_y < 0.0 || min_x > max_x_bound || min_y > max_y_bound {
        return;
    }

    let min_x = min_x.clamp(0.0, max_x_bound) as u32;
    let max_x = max_x.clamp(0.0, max_x_bound) as u32;
    let min_y = min_y.clamp(0.0, max_y_bound) as u32;
    let max_y = max_y.clamp(0.0, max_y_bound) as u32;

    for py in min_y..=max_y {
        for px in min_x..=max_x {
            let x = f64::from(px) + 0.5;
            let y = f64::from(py) + 0.5;

            let w0 = edge_at(&b, &c, x, y) / area;
            let w1 = edge_at(&c, &a, x, y) / area;
            let w2 = edge_at(&a, &b, x, y) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            let depth = w2.mul_add(c.depth, w0.mul_add(a.depth, w1 * b.depth));
            ctx.put(px, py, depth, color);
        }
    }
}
