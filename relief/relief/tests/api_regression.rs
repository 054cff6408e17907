//! API Regression Tests for the Relief Crate Ecosystem
//!
//! These tests serve as a regression suite to ensure the public API remains
//! stable and consistent across the relief crate ecosystem. They are organized
//! in 5 tiers following the pipeline order:
//!
//! - Tier 1: Foundation (relief-types, basic primitives)
//! - Tier 2: Image stage (relief-image)
//! - Tier 3: Depth and triangulation (relief-depth, relief-mesh)
//! - Tier 4: I/O and previews (relief-io, relief-render)
//! - Tier 5: Pipeline orchestration (relief-pipeline)
//!
//! If any of these tests fail after API changes, it indicates a breaking
//! change that needs a version bump.

// Allow test-specific patterns
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::let_underscore_must_use)]
#![allow(clippy::uninlined_format_args)]

use relief::{prelude::*, types};

// =============================================================================
// TIER 1: Foundation - Basic Types and Primitives
// =============================================================================

mod tier1_foundation {
    use super::*;

    #[test]
    fn vertex_creation_and_access() {
        // Primary constructor
        let v = types::Vertex::from_coords(1.0, 2.0, 3.0);
        assert!((v.position.x - 1.0).abs() < f64::EPSILON);
        assert!((v.position.y - 2.0).abs() < f64::EPSILON);
        assert!((v.position.z - 3.0).abs() < f64::EPSILON);

        // From point
        let point = types::Point3::new(4.0, 5.0, 6.0);
        let v2 = types::Vertex::new(point);
        assert!((v2.position.x - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn indexed_mesh_construction() {
        // Empty mesh
        let mesh = types::IndexedMesh::new();
        assert!(mesh.vertices.is_empty());
        assert!(mesh.faces.is_empty());

        // From parts
        let vertices = vec![
            types::Vertex::from_coords(0.0, 0.0, 0.0),
            types::Vertex::from_coords(1.0, 0.0, 0.0),
            types::Vertex::from_coords(0.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2]];
        let mesh = types::IndexedMesh::from_parts(vertices, faces);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn primitive_unit_cube() {
        let cube = types::unit_cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.face_count(), 12); // 6 faces × 2 triangles
    }

    #[test]
    fn mesh_bounds_calculation() {
        let cube = types::unit_cube();
        let bounds = cube.bounds();

        // Unit cube spans 0,0,0 to 1,1,1
        assert!((bounds.min.x - 0.0).abs() < f64::EPSILON);
        assert!((bounds.max.x - 1.0).abs() < f64::EPSILON);
        assert!((bounds.min.y - 0.0).abs() < f64::EPSILON);
        assert!((bounds.max.y - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mesh_topology_traits() {
        let cube = types::unit_cube();
        // IndexedMesh implements MeshTopology trait
        let count = <types::IndexedMesh as types::MeshTopology>::face_count(&cube);
        assert_eq!(count, 12);
    }

    #[test]
    fn depth_map_accessors() {
        let mut depth = types::DepthMap::new(4, 3);
        assert_eq!(depth.dimensions(), (4, 3));
        assert_eq!(depth.len(), 12);

        depth.set(2, 1, 0.75);
        assert!((depth.value(2, 1) - 0.75).abs() < f64::EPSILON);
        assert_eq!(depth.get(4, 0), None); // Out of bounds

        let (min, max) = depth.min_max().unwrap();
        assert!((min - 0.0).abs() < f64::EPSILON);
        assert!((max - 0.75).abs() < f64::EPSILON);

        // from_raw rejects mismatched lengths
        assert!(types::DepthMap::from_raw(2, 2, vec![0.0; 4]).is_some());
        assert!(types::DepthMap::from_raw(2, 2, vec![0.0; 3]).is_none());
    }
}

// =============================================================================
// TIER 2: Image Stage - Loading, Segmentation, Synthesis
// =============================================================================

mod tier2_image_stage {
    use super::*;

    #[test]
    fn segmenter_params_builder_pattern() {
        use relief::image::SegmenterParams;

        // Default params
        let params = SegmenterParams::default();
        assert!(params.color_tolerance > 0.0);

        // Builder pattern
        let params = SegmenterParams::new()
            .with_color_tolerance(25.0)
            .with_border_margin(2);

        assert!((params.color_tolerance - 25.0).abs() < f64::EPSILON);
        assert_eq!(params.border_margin, 2);
    }

    #[test]
    fn background_removal_produces_alpha() {
        use image::{Rgb, RgbImage};
        use relief::image::{Segmenter, SegmenterParams};

        // White field with a dark block in the middle
        let mut photo = RgbImage::from_pixel(9, 9, Rgb([240, 240, 240]));
        for y in 3..6 {
            for x in 3..6 {
                photo.put_pixel(x, y, Rgb([40, 40, 40]));
            }
        }

        let segmenter = Segmenter::new(SegmenterParams::default()).unwrap();
        let cutout = segmenter.remove_background(&photo).unwrap();

        assert_eq!(cutout.dimensions(), (9, 9));
        assert_eq!(cutout.get_pixel(0, 0)[3], 0); // Background cleared
        assert_eq!(cutout.get_pixel(4, 4)[3], 255); // Subject kept
    }

    #[test]
    fn synthesizer_is_deterministic() {
        use relief::image::{Synthesizer, SynthesizerParams};

        let params = SynthesizerParams::new().with_dimensions(32, 32);
        let synth = Synthesizer::new(params).unwrap();

        let first = synth.synthesize("driftwood").unwrap();
        let second = synth.synthesize("driftwood").unwrap();
        assert_eq!(first.dimensions(), (32, 32));
        assert_eq!(first.as_raw(), second.as_raw());

        // Different prompts diverge
        let other = synth.synthesize("granite").unwrap();
        assert_ne!(first.as_raw(), other.as_raw());
    }

    #[test]
    fn downscale_preserves_aspect_ratio() {
        use image::{Rgb, RgbImage};
        use relief::image::downscale_to_fit;

        let photo = RgbImage::from_pixel(64, 32, Rgb([100, 100, 100]));
        let small = downscale_to_fit(&photo, 16);
        assert_eq!(small.dimensions(), (16, 8));

        // Already small enough stays untouched
        let same = downscale_to_fit(&photo, 128);
        assert_eq!(same.dimensions(), (64, 32));
    }
}

// =============================================================================
// TIER 3: Depth and Triangulation
// =============================================================================

mod tier3_depth_and_mesh {
    use super::*;

    #[test]
    fn depth_params_builder_pattern() {
        use relief::depth::DepthParams;

        // Default params
        let params = DepthParams::default();
        assert!(params.kernel_size >= 3);
        assert!(params.sigma.is_none());
        assert!(params.effective_sigma() > 0.0);

        // Builder pattern
        let params = DepthParams::new().with_kernel_size(7).with_sigma(2.0);
        assert_eq!(params.kernel_size, 7);
        assert!((params.effective_sigma() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn depth_matches_image_dimensions() {
        use image::{Rgba, RgbaImage};
        use relief::depth::{compute_depth, DepthParams};

        let image = RgbaImage::from_pixel(8, 6, Rgba([120, 90, 60, 255]));
        let depth = compute_depth(&image, &DepthParams::default()).unwrap();

        assert_eq!(depth.dimensions(), (8, 6));
        assert!(depth.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn triangulation_covers_the_grid() {
        use relief::mesh::{triangulate_depth, TriangulateParams};

        let depth = types::DepthMap::new(5, 4);
        let mesh = triangulate_depth(&depth, &TriangulateParams::default()).unwrap();

        // One vertex per sample, two triangles per grid cell
        assert_eq!(mesh.vertex_count(), 20);
        assert_eq!(mesh.face_count(), 24);
    }

    #[test]
    fn triangulate_params_builder_pattern() {
        use relief::mesh::TriangulateParams;

        let params = TriangulateParams::new().with_z_scale(5.0);
        assert!((params.z_scale - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cleanup_params_and_summary() {
        use relief::mesh::{CleanupParams, CleanupSummary};

        // Builder pattern
        let params = CleanupParams::new()
            .with_area_threshold(1e-8)
            .with_remove_unreferenced(false);
        assert!((params.area_threshold - 1e-8).abs() < f64::EPSILON);
        assert!(!params.remove_unreferenced);

        // CleanupSummary API
        let summary = CleanupSummary::default();
        assert!(!summary.had_changes());

        // Display trait
        let display = format!("{}", summary);
        assert!(display.contains("verts"));
    }

    #[test]
    fn cleanup_leaves_a_clean_mesh_alone() {
        use relief::mesh::{cleanup_mesh, CleanupParams};

        let mut cube = types::unit_cube();
        let summary = cleanup_mesh(&mut cube, &CleanupParams::default());

        assert!(!summary.had_changes());
        assert_eq!(summary.final_vertices, 8);
        assert_eq!(summary.final_faces, 12);
    }
}

// =============================================================================
// TIER 4: I/O and Previews
// =============================================================================

mod tier4_io_and_previews {
    use super::*;

    #[test]
    fn io_format_detection() {
        // Format detection
        assert_eq!(MeshFormat::from_path("model.stl"), Some(MeshFormat::Stl));
        assert_eq!(MeshFormat::from_path("model.obj"), Some(MeshFormat::Obj));
        assert_eq!(MeshFormat::from_path("model.ply"), None);
        assert_eq!(MeshFormat::from_name("STL"), Some(MeshFormat::Stl));

        // Extensions
        assert_eq!(MeshFormat::Stl.extension(), "stl");
        assert_eq!(MeshFormat::Obj.extension(), "obj");
    }

    #[test]
    fn save_and_load_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let cube = unit_cube();

        for name in ["cube.obj", "cube.stl"] {
            let path = dir.path().join(name);
            save_mesh(&cube, &path).unwrap();

            let restored = load_mesh(&path).unwrap();
            assert_eq!(restored.vertex_count(), cube.vertex_count());
            assert_eq!(restored.face_count(), cube.face_count());
        }
    }

    #[test]
    fn render_params_builder_pattern() {
        use relief::render::RenderParams;

        let params = RenderParams::default()
            .with_dimensions(160, 120)
            .with_light_intensity(1.5);
        assert_eq!(params.width, 160);
        assert_eq!(params.height, 120);
        assert!((params.light_intensity - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn render_produces_requested_image() {
        use relief::render::{render_mesh, RenderParams};

        let cube = unit_cube();
        let params = RenderParams::default().with_dimensions(160, 120);
        let image = render_mesh(&cube, &params).unwrap();
        assert_eq!(image.dimensions(), (160, 120));
    }

    #[test]
    fn plot_params_builder_pattern() {
        use relief::render::PlotParams;

        let params = PlotParams::default()
            .with_dimensions(200, 200)
            .with_face_alpha(0.5)
            .with_title("Cube");
        assert_eq!(params.width, 200);
        assert!((params.face_alpha - 0.5).abs() < f64::EPSILON);
        assert_eq!(params.title, "Cube");
    }

    #[test]
    fn plot_produces_requested_image() {
        use relief::render::{plot_mesh, PlotParams};

        let cube = unit_cube();
        let params = PlotParams::default().with_dimensions(200, 200);
        let image = plot_mesh(&cube, &params).unwrap();
        assert_eq!(image.dimensions(), (200, 200));
    }
}

// =============================================================================
// TIER 5: Pipeline Orchestration
// =============================================================================

mod tier5_pipeline {
    use super::*;
    use std::path::Path;

    #[test]
    fn pipeline_params_defaults() {
        let params = PipelineParams::new("photo.jpg", PipelineMode::Image);
        assert_eq!(params.input, "photo.jpg");
        assert_eq!(params.mode, PipelineMode::Image);
        assert_eq!(params.output_dir, Path::new("output"));
        assert_eq!(params.format, "obj");
        assert_eq!(params.max_size, None);
    }

    #[test]
    fn pipeline_params_builder_pattern() {
        let params = PipelineParams::new("a bowl", PipelineMode::Text)
            .with_output_dir("out")
            .with_format("stl")
            .with_max_size(256);
        assert_eq!(params.output_dir, Path::new("out"));
        assert_eq!(params.format, "stl");
        assert_eq!(params.max_size, Some(256));
    }

    #[test]
    fn end_to_end_image_run() {
        use image::{Rgb, RgbImage};

        let dir = tempfile::tempdir().unwrap();
        let photo_path = dir.path().join("input.png");
        RgbImage::from_pixel(4, 4, Rgb([150, 150, 150]))
            .save(&photo_path)
            .unwrap();

        let params = PipelineParams::new(
            photo_path.to_string_lossy(),
            PipelineMode::Image,
        )
        .with_output_dir(dir.path().join("out"));

        let summary = run_pipeline(&params).unwrap();
        assert!(summary.model_path.exists());
        assert!(summary.render_path.exists());
        assert!(summary.plot_path.exists());
        assert!(summary.vertex_count > 0);
    }

    #[test]
    fn summary_display_lists_artifacts() {
        let summary = run_summary_fixture();
        let display = format!("{}", summary);
        assert!(display.starts_with("Successfully generated"));
        assert!(display.contains("model.obj"));
    }

    fn run_summary_fixture() -> PipelineSummary {
        PipelineSummary {
            output_dir: "out".into(),
            model_path: "out/model.obj".into(),
            render_path: "out/render.png".into(),
            plot_path: "out/plot.png".into(),
            processed_image_path: None,
            vertex_count: 16,
            face_count: 18,
            cleanup: relief::mesh::CleanupSummary::default(),
        }
    }
}

// =============================================================================
// Error Handling Patterns
// =============================================================================

mod error_handling {
    use super::*;

    #[test]
    fn previews_reject_an_empty_mesh() {
        use relief::render::{plot_mesh, render_mesh, PlotParams, RenderParams};

        let empty = IndexedMesh::new();
        assert!(render_mesh(&empty, &RenderParams::default()).is_err());
        assert!(plot_mesh(&empty, &PlotParams::default()).is_err());
    }

    #[test]
    fn save_rejects_unknown_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let result = save_mesh(&unit_cube(), dir.path().join("model.ply"));
        assert!(result.is_err());
    }

    #[test]
    fn depth_rejects_an_empty_image() {
        use image::RgbaImage;
        use relief::depth::{compute_depth, DepthParams};

        let empty = RgbaImage::new(0, 0);
        let result = compute_depth(&empty, &DepthParams::default());
        assert!(result.is_err());
    }

    #[test]
    fn triangulation_needs_enough_samples() {
        use relief::mesh::{triangulate_depth, TriangulateParams};

        let depth = types::DepthMap::new(1, 1);
        let result = triangulate_depth(&depth, &TriangulateParams::default());
        assert!(result.is_err());
    }
}
