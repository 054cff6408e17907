//! Scoped state for a single offscreen render.

use image::{Rgb, RgbImage};
use relief_types::{Aabb, Point3};

use crate::render::RenderParams;

/// Head room the fitted camera leaves around the bounding sphere.
const FIT_MARGIN: f64 = 1.15;

/// Lower clamp for the bounding sphere radius, so single-point meshes
/// still get a usable camera distance.
const MIN_RADIUS: f64 = 1e-6;

/// A world point projected to the framebuffer.
pub(crate) struct ScreenPoint {
    /// Horizontal pixel coordinate (fractional).
    pub x: f64,
    /// Vertical pixel coordinate (fractional), growing downward.
    pub y: f64,
    /// Distance from the camera along the view axis.
    pub depth: f64,
}

/// Framebuffer, depth buffer and fitted camera for one render call.
///
/// A context is created per call and consumed when the image is taken out,
/// so geometry from one render can never bleed into the next.
pub(crate) struct RenderContext {
    width: u32,
    height: u32,
    eye: Point3<f64>,
    tan_half_x: f64,
    tan_half_y: f64,
    framebuffer: RgbImage,
    zbuffer: Vec<f64>,
}

impl RenderContext {
    /// Fit a camera to the given bounds and allocate cleared buffers.
    ///
    /// The camera sits on the +Z axis through the bounds center, looking
    /// down along -Z, and is pulled back until the bounding sphere fits
    /// inside the narrower half-angle of the view frustum.
    pub(crate) fn new(bounds: &Aabb, params: &RenderParams) -> Self {
        let center = bounds.center();
        let radius = (bounds.diagonal() * 0.5).max(MIN_RADIUS);

        let tan_half_y = (params.yfov * 0.5).tan();
        let aspect = f64::from(params.width) / f64::from(params.height);
        let tan_half_x = tan_half_y * aspect;

        let limiting = tan_half_x.min(tan_half_y);
        let distance = radius.mul_add(FIT_MARGIN / limiting, radius);
        let eye = Point3::new(center.x, center.y, center.z + distance);

        let framebuffer = RgbImage::from_pixel(params.width, params.height, Rgb([255, 255, 255]));
        let zbuffer = vec![f64::INFINITY; params.width as usize * params.height as usize];

        Self {
            width: params.width,
            height: params.height,
            eye,
            tan_half_x,
            tan_half_y,
            framebuffer,
            zbuffer,
        }
    }

    /// Project a world point to fractional pixel coordinates plus view depth.
    ///
    /// Returns `None` for points at or behind the camera plane.
    pub(crate) fn project(&self, point: &Point3<f64>) -> Option<ScreenPoint> {
        let view = point - self.eye;
        let depth = -view.z;
        if depth <= f64::EPSILON {
            return None;
        }

        let ndc_x = view.x / (depth * self.tan_half_x);
        let ndc_y = view.y / (depth * self.tan_half_y);
        let x = (ndc_x + 1.0) * 0.5 * f64::from(self.width);
        let y = (1.0 - ndc_y) * 0.5 * f64::from(self.height);
        Some(ScreenPoint { x, y, depth })
    }

    /// Depth-test and write one pixel.
    pub(crate) fn put(&mut self, x: u32, y: u32, depth: f64, color: Rgb<u8>) {
        let index = y as usize * self.width as usize + x as usize;
        if depth < self.zbuffer[index] {
            self.zbuffer[index] = depth;
            self.framebuffer.put_pixel(x, y, color);
        }
    }

    pub(crate) const fn width(&self) -> u32 {
        self.width
    }

    pub(crate) const fn height(&self) -> u32 {
        self.height
    }

    /// Take the finished frame out of the context.
    pub(crate) fn into_image(self) -> RgbImage {
        self.framebuffer
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_bounds() -> Aabb {
        Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 0.0))
    }

    #[test]
    fn center_projects_to_image_center() {
        let bounds = unit_bounds();
        let ctx = RenderContext::new(&bounds, &RenderParams::default());

        let projected = ctx.project(&bounds.center()).unwrap();
        assert_relative_eq!(projected.x, 400.0, epsilon = 1e-9);
        assert_relative_eq!(projected.y, 300.0, epsilon = 1e-9);
        assert!(projected.depth > 0.0);
    }

    #[test]
    fn bounds_corners_land_inside_frame() {
        let bounds = unit_bounds();
        let ctx = RenderContext::new(&bounds, &RenderParams::default());

        for corner in [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
        ] {
            let projected = ctx.project(&corner).unwrap();
            assert!(projected.x >= 0.0 && projected.x <= 800.0);
            assert!(projected.y >= 0.0 && projected.y <= 600.0);
        }
    }

    #[test]
    fn points_behind_camera_are_rejected() {
        let bounds = unit_bounds();
        let ctx = RenderContext::new(&bounds, &RenderParams::default());

        // The eye sits above the bounds on +Z; anything further is behind
        let behind = Point3::new(1.0, 1.0, 1000.0);
        assert!(ctx.project(&behind).is_none());
    }

    #[test]
    fn higher_points_are_closer_to_the_camera() {
        let bounds = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 4.0, 1.0));
        let ctx = RenderContext::new(&bounds, &RenderParams::default());

        let low = ctx.project(&Point3::new(2.0, 2.0, 0.0)).unwrap();
        let high = ctx.project(&Point3::new(2.0, 2.0, 1.0)).unwrap();
        assert!(high.depth < low.depth);
    }

    #[test]
    fn depth_test_keeps_the_nearer_write() {
        let bounds = unit_bounds();
        let mut ctx = RenderContext::new(&bounds, &RenderParams::default());

        ctx.put(10, 10, 5.0, Rgb([10, 10, 10]));
        ctx.put(10, 10, 9.0, Rgb([200, 200, 200]));
        ctx.put(10, 10, 2.0, Rgb([90, 90, 90]));

        let img = ctx.into_image();
        assert_eq!(img.get_pixel(10, 10), &Rgb([90, 90, 90]));
    }

    #[test]
    fn buffers_start_cleared() {
        let bounds = unit_bounds();
        let ctx = RenderContext::new(&bounds, &RenderParams::default());

        let img = ctx.into_image();
        assert_eq!(img.dimensions(), (800, 600));
        assert!(img.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn degenerate_bounds_still_give_finite_camera() {
        let bounds = Aabb::new(Point3::new(1.0, 1.0, 1.0), Point3::new(1.0, 1.0, 1.0));
        let ctx = RenderContext::new(&bounds, &RenderParams::default());

        let projected = ctx.project(&Point3::new(1.0, 1.0, 1.0)).unwrap();
        assert!(projected.x.is_finite());
        assert!(projected.depth > 0.0);
    }
}
