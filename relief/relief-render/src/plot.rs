//! Wireframe-and-scatter plot of a mesh.
//!
//! Produces the kind of diagnostic figure a plotting library would: the
//! mesh seen from a fixed oblique view, faces filled with translucent gray,
//! vertices marked as blue dots, a gray bounding box for orientation and a
//! title across the top. The projection is orthographic, so the plot
//! preserves relative proportions at any mesh scale.

use image::{Rgb, RgbImage};
use tracing::debug;

use relief_types::{Aabb, IndexedMesh, MeshBounds, MeshTopology, Point3, Vector3};

use crate::error::{RenderError, RenderResult};
use crate::font;

/// View direction, matching a plotting library's default 3D view.
const AZIMUTH_DEG: f64 = -60.0;
const ELEVATION_DEG: f64 = 30.0;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const FACE_GRAY: Rgb<u8> = Rgb([128, 128, 128]);
const VERTEX_BLUE: Rgb<u8> = Rgb([0, 0, 255]);
const BOX_GRAY: Rgb<u8> = Rgb([150, 150, 150]);
const TEXT_BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Settings for the mesh plot.
///
/// The defaults produce a 1000x1000 figure titled "3D Model Visualization"
/// with faces at 30% opacity.
#[derive(Debug, Clone)]
pub struct PlotParams {
    /// Output image width in pixels.
    pub width: u32,
    /// Output image height in pixels.
    pub height: u32,
    /// Face fill opacity in [0, 1].
    pub face_alpha: f64,
    /// Title drawn across the top of the figure.
    pub title: String,
}

impl Default for PlotParams {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            face_alpha: 0.3,
            title: "3D Model Visualization".to_string(),
        }
    }
}

impl PlotParams {
    /// Set the output dimensions in pixels.
    #[must_use]
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the face fill opacity.
    #[must_use]
    pub fn with_face_alpha(mut self, alpha: f64) -> Self {
        self.face_alpha = alpha;
        self
    }

    /// Set the figure title. An empty title leaves the top band blank.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::InvalidParameter` if any field is out of range.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width < 100 || self.height < 100 {
            return Err(RenderError::InvalidParameter {
                reason: "plot dimensions must be at least 100x100".to_string(),
            });
        }
        if !self.face_alpha.is_finite() || !(0.0..=1.0).contains(&self.face_alpha) {
            return Err(RenderError::InvalidParameter {
                reason: "face opacity must be in [0, 1]".to_string(),
            });
        }
        Ok(())
    }
}

/// Orthographic projection onto the fixed oblique view, fitted so the mesh
/// fills the figure interior with margins for the title and labels.
struct Projection {
    right: Vector3<f64>,
    up: Vector3<f64>,
    view: Vector3<f64>,
    scale: f64,
    u_center: f64,
    v_center: f64,
    screen_center: (f64, f64),
}

impl Projection {
    fn fit(mesh: &IndexedMesh, width: u32, height: u32) -> Self {
        let azimuth = AZIMUTH_DEG.to_radians();
        let elevation = ELEVATION_DEG.to_radians();
        let view = Vector3::new(
            elevation.cos() * azimuth.cos(),
            elevation.cos() * azimuth.sin(),
            elevation.sin(),
        );
        let right = Vector3::new(-azimuth.sin(), azimuth.cos(), 0.0);
        let up = view.cross(&right);

        let mut u_range = (f64::INFINITY, f64::NEG_INFINITY);
        let mut v_range = (f64::INFINITY, f64::NEG_INFINITY);
        for vertex in &mesh.vertices {
            let p = &vertex.position;
            if !p.coords.iter().all(|c| c.is_finite()) {
                continue;
            }
            let u = p.coords.dot(&right);
            let v = p.coords.dot(&up);
            u_range = (u_range.0.min(u), u_range.1.max(u));
            v_range = (v_range.0.min(v), v_range.1.max(v));
        }

        let side = f64::from(width) * 0.1;
        let top = f64::from(height) * 0.125;
        let bottom = f64::from(height) * 0.1;
        let avail_u = f64::from(width) - 2.0 * side;
        let avail_v = f64::from(height) - top - bottom;

        // A mesh that is flat along one screen axis still gets a sensible
        // scale from the other; a fully degenerate one plots at the center.
        let du = u_range.1 - u_range.0;
        let dv = v_range.1 - v_range.0;
        let mut scales = Vec::new();
        if du > 1e-9 {
            scales.push(avail_u / du);
        }
        if dv > 1e-9 {
            scales.push(avail_v / dv);
        }
        let scale = scales.into_iter().fold(f64::INFINITY, f64::min);
        let scale = if scale.is_finite() { scale } else { 1.0 };

        Self {
            right,
            up,
            view,
            scale,
            u_center: (u_range.0 + u_range.1) * 0.5,
            v_center: (v_range.0 + v_range.1) * 0.5,
            screen_center: (f64::from(width) * 0.5, top + avail_v * 0.5),
        }
    }

    /// Screen position of a world point, y growing downward.
    fn screen(&self, p: &Point3<f64>) -> (f64, f64) {
        let u = p.coords.dot(&self.right);
        let v = p.coords.dot(&self.up);
        (
            (u - self.u_center).mul_add(self.scale, self.screen_center.0),
            (self.v_center - v).mul_add(self.scale, self.screen_center.1),
        )
    }

    /// Distance along the view direction. Larger is closer to the viewer.
    fn depth(&self, p: &Point3<f64>) -> f64 {
        p.coords.dot(&self.view)
    }
}

/// Plot a mesh as a scatter-and-surface figure.
///
/// Faces are painted far to near so nearer geometry covers farther
/// geometry even through the translucent fill. Non-finite faces and
/// vertices are skipped.
///
/// # Errors
///
/// - [`RenderError::InvalidParameter`] if the parameters fail validation
/// - [`RenderError::EmptyMesh`] if the mesh has no vertices or no faces
/// - [`RenderError::NonFiniteGeometry`] if the mesh bounds are not finite
pub fn plot_mesh(mesh: &IndexedMesh, params: &PlotParams) -> RenderResult<RgbImage> {
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

    let projection = Projection::fit(mesh, params.width, params.height);
    let mut img = RgbImage::from_pixel(params.width, params.height, BACKGROUND);

    draw_axes_box(&mut img, &bounds, &projection);

    // Painter's algorithm: sort faces by centroid depth, far first.
    let mut ordered: Vec<(f64, [(f64, f64); 3])> = Vec::with_capacity(mesh.face_count());
    for triangle in mesh.triangles() {
        if !triangle.is_finite() {
            continue;
        }
        let depth = (projection.depth(&triangle.v0)
            + projection.depth(&triangle.v1)
            + projection.depth(&triangle.v2))
            / 3.0;
        let corners = [
            projection.screen(&triangle.v0),
            projection.screen(&triangle.v1),
            projection.screen(&triangle.v2),
        ];
        ordered.push((depth, corners));
    }
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0));
    for (_, corners) in &ordered {
        fill_face(&mut img, corners, FACE_GRAY, params.face_alpha);
    }

    for vertex in &mesh.vertices {
        let p = &vertex.position;
        if !p.coords.iter().all(|c| c.is_finite()) {
            continue;
        }
        let (x, y) = projection.screen(p);
        draw_dot(&mut img, x, y, VERTEX_BLUE);
    }

    draw_axis_labels(&mut img, &bounds, &projection, params.width);

    if !params.title.is_empty() {
        let scale = (params.width / 500).clamp(1, 4);
        let text_width = i64::from(font::text_width(&params.title, scale));
        let x = (i64::from(params.width) - text_width) / 2;
        let band = f64::from(params.height) * 0.125;
        let y = ((band - f64::from(7 * scale)) * 0.5) as i64;
        font::draw_text(&mut img, &params.title, x, y, scale, TEXT_BLACK);
    }

    debug!(
        vertices = mesh.vertex_count(),
        faces = ordered.len(),
        width = params.width,
        height = params.height,
        "plotted mesh"
    );
    Ok(img)
}

/// Corner of the bounding box, selecting min or max per axis by bit.
fn box_corner(bounds: &Aabb, index: usize) -> Point3<f64> {
    Point3::new(
        if index & 1 == 0 { bounds.min.x } else { bounds.max.x },
        if index & 2 == 0 { bounds.min.y } else { bounds.max.y },
        if index & 4 == 0 { bounds.min.z } else { bounds.max.z },
    )
}

fn draw_axes_box(img: &mut RgbImage, bounds: &Aabb, projection: &Projection) {
    for corner in 0..8 {
        for bit in [1usize, 2, 4] {
            if corner & bit != 0 {
                continue;
            }
            let from = projection.screen(&box_corner(bounds, corner));
            let to = projection.screen(&box_corner(bounds, corner | bit));
            draw_line(img, from, to, BOX_GRAY);
        }
    }
}

fn draw_axis_labels(img: &mut RgbImage, bounds: &Aabb, projection: &Projection, width: u32) {
    let center = bounds.center();
    let anchors = [
        ("X", Point3::new(center.x, bounds.min.y, bounds.min.z)),
        ("Y", Point3::new(bounds.min.x, center.y, bounds.min.z)),
        ("Z", Point3::new(bounds.min.x, bounds.min.y, center.z)),
    ];
    let center_screen = projection.screen(&center);
    let scale = (width / 500).clamp(1, 4);

    for (label, anchor) in anchors {
        let (ax, ay) = projection.screen(&anchor);
        let (dx, dy) = (ax - center_screen.0, ay - center_screen.1);
        let length = dx.hypot(dy);
        // Push the label outward from the box so it clears the edge lines
        let (ox, oy) = if length > 1e-9 {
            (dx / length * 18.0, dy / length * 18.0)
        } else {
            (0.0, 18.0)
        };
        let half_width = f64::from(font::text_width(label, scale)) * 0.5;
        let half_height = f64::from(7 * scale) * 0.5;
        font::draw_text(
            img,
            label,
            (ax + ox - half_width) as i64,
            (ay + oy - half_height) as i64,
            scale,
            TEXT_BLACK,
        );
    }
}

fn edge_at(a: (f64, f64), b: (f64, f64), x: f64, y: f64) -> f64 {
    (b.0 - a.0) * (y - a.1) - (b.1 - a.1) * (x - a.0)
}

/// Fill a screen-space triangle with an alpha-blended color.
fn fill_face(img: &mut RgbImage, corners: &[(f64, f64); 3], color: Rgb<u8>, alpha: f64) {
    let [a, b, c] = *corners;
    let area = edge_at(a, b, c.0, c.1);
    if area.abs() < f64::EPSILON {
        return;
    }

    let max_x_bound = f64::from(img.width() - 1);
    let max_y_bound = f64::from(img.height() - 1);
    let min_x = a.0.min(b.0).min(c.0).floor();
    let max_x = a.0.max(b.0).max(c.0).ceil();
    let min_y = a.1.min(b.1).min(c.1).floor();
    let max_y = a.1.max(b.1).max(c.1).ceil();
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
            let w0 = edge_at(b, c, x, y) / area;
            let w1 = edge_at(c, a, x, y) / area;
            let w2 = edge_at(a, b, x, y) / area;
            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                blend_pixel(img, px, py, color, alpha);
            }
        }
    }
}

fn blend_pixel(img: &mut RgbImage, x: u32, y: u32, color: Rgb<u8>, alpha: f64) {
    let pixel = img.get_pixel_mut(x, y);
    for (dst, src) in pixel.0.iter_mut().zip(color.0) {
        let blended = f64::from(src).mul_add(alpha, f64::from(*dst) * (1.0 - alpha));
        *dst = blended.round() as u8;
    }
}

fn draw_line(img: &mut RgbImage, from: (f64, f64), to: (f64, f64), color: Rgb<u8>) {
    let (width, height) = (i64::from(img.width()), i64::from(img.height()));
    let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
    let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x0 >= 0 && x0 < width && y0 >= 0 && y0 < height {
            img.put_pixel(x0 as u32, y0 as u32, color);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            x0 += sx;
        }
        if doubled <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Small filled disc marking a vertex.
fn draw_dot(img: &mut RgbImage, x: f64, y: f64, color: Rgb<u8>) {
    let (width, height) = (i64::from(img.width()), i64::from(img.height()));
    let (cx, cy) = (x.round() as i64, y.round() as i64);
    for dy in -2i64..=2 {
        for dx in -2i64..=2 {
            if dx * dx + dy * dy > 4 {
                continue;
            }
            let (px, py) = (cx + dx, cy + dy);
            if px >= 0 && px < width && py >= 0 && py < height {
                img.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use relief_types::{unit_cube, Vertex};

    fn ramp() -> IndexedMesh {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(3.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(3.0, 3.0, 1.5));
        mesh.vertices.push(Vertex::from_coords(0.0, 3.0, 1.5));
        mesh.faces.push([0, 1, 2]);
        mesh.faces.push([0, 2, 3]);
        mesh
    }

    #[test]
    fn produces_requested_dimensions() {
        let img = plot_mesh(&ramp(), &PlotParams::default()).unwrap();
        assert_eq!(img.dimensions(), (1000, 1000));

        let small = PlotParams::default().with_dimensions(400, 300);
        let img = plot_mesh(&ramp(), &small).unwrap();
        assert_eq!(img.dimensions(), (400, 300));
    }

    #[test]
    fn vertices_appear_as_blue_markers() {
        let img = plot_mesh(&ramp(), &PlotParams::default()).unwrap();
        let blue = img.pixels().filter(|p| p.0 == [0, 0, 255]).count();
        // Four vertices, each a disc of more than a dozen pixels
        assert!(blue >= 4 * 13, "blue pixels: {blue}");
    }

    #[test]
    fn faces_tint_the_background() {
        let img = plot_mesh(&ramp(), &PlotParams::default()).unwrap();
        // Gray 128 at 30% over white comes out at 217.
        let tinted = img.pixels().filter(|p| p.0 == [217, 217, 217]).count();
        assert!(tinted > 1000, "tinted pixels: {tinted}");
    }

    #[test]
    fn bounding_box_lines_are_drawn() {
        let img = plot_mesh(&unit_cube(), &PlotParams::default()).unwrap();
        // Box gray, or box gray seen through one or two face fills.
        let boxed = img
            .pixels()
            .filter(|p| {
                let [r, g, b] = p.0;
                r == g && g == b && matches!(r, 150 | 143 | 139)
            })
            .count();
        assert!(boxed > 0);
    }

    #[test]
    fn title_is_drawn_across_the_top() {
        let params = PlotParams::default();
        let img = plot_mesh(&ramp(), &params).unwrap();
        let band_height = params.height / 8;
        let dark = img
            .enumerate_pixels()
            .filter(|(_, y, p)| *y < band_height && p.0 == [0, 0, 0])
            .count();
        assert!(dark > 0);
    }

    #[test]
    fn plotting_is_deterministic() {
        let cube = unit_cube();
        let first = plot_mesh(&cube, &PlotParams::default()).unwrap();
        let second = plot_mesh(&cube, &PlotParams::default()).unwrap();
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn empty_mesh_is_rejected() {
        assert!(matches!(
            plot_mesh(&IndexedMesh::new(), &PlotParams::default()),
            Err(RenderError::EmptyMesh)
        ));
    }

    #[test]
    fn non_finite_bounds_are_rejected() {
        let mut mesh = ramp();
        mesh.vertices[1].position.y = f64::NEG_INFINITY;
        assert!(matches!(
            plot_mesh(&mesh, &PlotParams::default()),
            Err(RenderError::NonFiniteGeometry)
        ));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let mesh = ramp();

        let tiny = PlotParams::default().with_dimensions(50, 50);
        assert!(matches!(
            plot_mesh(&mesh, &tiny),
            Err(RenderError::InvalidParameter { .. })
        ));

        let opaque = PlotParams::default().with_face_alpha(1.5);
        assert!(matches!(
            plot_mesh(&mesh, &opaque),
            Err(RenderError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn flat_mesh_still_plots() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.faces.push([0, 1, 2]);

        let img = plot_mesh(&mesh, &PlotParams::default()).unwrap();
        let blue = img.pixels().filter(|p| p.0 == [0, 0, 255]).count();
        assert!(blue > 0);
    }
}
