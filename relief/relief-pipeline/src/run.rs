//! The pipeline run: one input in, four artifacts out.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbImage};
use tracing::info;

use relief_depth::{compute_depth, DepthParams};
use relief_image::{
    downscale_to_fit, load_image, save_png, Segmenter, SegmenterParams, Synthesizer,
    SynthesizerParams,
};
use relief_io::{save_mesh, MeshFormat};
use relief_mesh::{
    cleanup_mesh, triangulate_depth, CleanupParams, CleanupSummary, TriangulateParams,
};
use relief_render::{plot_mesh, render_mesh, PlotParams, RenderParams};
use relief_types::MeshTopology;

use crate::error::{PipelineError, PipelineResult};

/// How the pipeline input string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    /// The input is a path to a photograph.
    Image,
    /// The input is a free-text prompt.
    Text,
}

/// Settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineParams {
    /// Image path (image mode) or prompt text (text mode).
    pub input: String,
    /// How to interpret the input.
    pub mode: PipelineMode,
    /// Directory receiving every artifact. Created if missing.
    pub output_dir: PathBuf,
    /// Mesh format name, `"obj"` or `"stl"`.
    pub format: String,
    /// Cap on the longer image side before the depth stage.
    ///
    /// Off by default so the mesh grid matches the input dimensions
    /// exactly.
    pub max_size: Option<u32>,
}

impl PipelineParams {
    /// Settings with the default `output` directory and OBJ format.
    pub fn new(input: impl Into<String>, mode: PipelineMode) -> Self {
        Self {
            input: input.into(),
            mode,
            output_dir: PathBuf::from("output"),
            format: "obj".to_string(),
            max_size: None,
        }
    }

    /// Set the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Set the mesh format by name.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Cap the longer image side before the depth stage.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = Some(max_size);
        self
    }
}

/// Artifacts and statistics from a successful run.
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    /// Directory the artifacts were written into.
    pub output_dir: PathBuf,
    /// Exported mesh file.
    pub model_path: PathBuf,
    /// Offscreen render preview.
    pub render_path: PathBuf,
    /// Scatter/surface plot.
    pub plot_path: PathBuf,
    /// Background-removed input preview. Image mode only.
    pub processed_image_path: Option<PathBuf>,
    /// Vertices in the exported mesh.
    pub vertex_count: usize,
    /// Faces in the exported mesh.
    pub face_count: usize,
    /// What the cleanup pass removed.
    pub cleanup: CleanupSummary,
}

impl fmt::Display for PipelineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Successfully generated 3D model and visualizations in {}",
            self.output_dir.display()
        )?;
        writeln!(f, "Model saved as: {}", self.model_path.display())?;
        write!(
            f,
            "Visualizations saved as: {} and {}",
            self.render_path.display(),
            self.plot_path.display()
        )
    }
}

/// Run the full pipeline.
///
/// Stages run in order: input acquisition (photo loading plus background
/// removal, or prompt synthesis), the depth heuristic, triangulation and
/// cleanup, mesh export, then the render and plot previews. The format
/// name is resolved before anything touches the disk, so an unknown
/// format writes nothing at all. A failing stage aborts the run; files
/// written by earlier stages stay on disk.
///
/// # Errors
///
/// Returns the failing stage's [`PipelineError`] variant.
pub fn run_pipeline(params: &PipelineParams) -> PipelineResult<PipelineSummary> {
    let format =
        MeshFormat::from_name(&params.format).ok_or_else(|| PipelineError::UnsupportedFormat {
            format: params.format.clone(),
        })?;

    fs::create_dir_all(&params.output_dir).map_err(|e| export_failed(&params.output_dir, e))?;

    info!(
        mode = ?params.mode,
        output = %params.output_dir.display(),
        format = format.extension(),
        "starting pipeline"
    );

    let (image, processed_image_path) = match params.mode {
        PipelineMode::Image => {
            let photo =
                load_image(&params.input).map_err(|source| PipelineError::ImageLoad { source })?;
            let photo = match params.max_size {
                Some(cap) => downscale_to_fit(&photo, cap),
                None => photo,
            };

            let segmenter = Segmenter::new(SegmenterParams::default())
                .map_err(|source| PipelineError::BackgroundRemoval { source })?;
            let cutout = segmenter
                .remove_background(&photo)
                .map_err(|source| PipelineError::BackgroundRemoval { source })?;

            let path = params.output_dir.join("processed_image.png");
            save_png(&cutout, &path).map_err(|e| export_failed(&path, e))?;
            (cutout, Some(path))
        }
        PipelineMode::Text => {
            let synthesizer = Synthesizer::new(SynthesizerParams::default())
                .map_err(|source| PipelineError::Synthesis { source })?;
            let synthesized = synthesizer
                .synthesize(&params.input)
                .map_err(|source| PipelineError::Synthesis { source })?;
            let synthesized = match params.max_size {
                Some(cap) => downscale_to_fit(&synthesized, cap),
                None => synthesized,
            };
            (DynamicImage::ImageRgb8(synthesized).into_rgba8(), None)
        }
    };

    let depth = compute_depth(&image, &DepthParams::default())
        .map_err(|source| PipelineError::DepthComputation { source })?;

    let mut mesh = triangulate_depth(&depth, &TriangulateParams::default())
        .map_err(|source| PipelineError::MeshConstruction { source })?;
    let cleanup = cleanup_mesh(&mut mesh, &CleanupParams::default());

    let model_path = params
        .output_dir
        .join(format!("model.{}", format.extension()));
    save_mesh(&mesh, &model_path).map_err(|e| export_failed(&model_path, e))?;
    info!(
        path = %model_path.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "mesh exported"
    );

    let render = render_mesh(&mesh, &RenderParams::default())
        .map_err(|source| PipelineError::Visualization { source })?;
    let render_path = params.output_dir.join("render.png");
    save_preview(&render, &render_path)?;

    let plot = plot_mesh(&mesh, &PlotParams::default())
        .map_err(|source| PipelineError::Visualization { source })?;
    let plot_path = params.output_dir.join("plot.png");
    save_preview(&plot, &plot_path)?;

    info!(output = %params.output_dir.display(), "pipeline finished");

    Ok(PipelineSummary {
        output_dir: params.output_dir.clone(),
        model_path,
        render_path,
        plot_path,
        processed_image_path,
        vertex_count: mesh.vertex_count(),
        face_count: mesh.face_count(),
        cleanup,
    })
}

fn save_preview(image: &RgbImage, path: &Path) -> PipelineResult<()> {
    image.save(path).map_err(|e| export_failed(path, e))
}

fn export_failed(
    path: &Path,
    source: impl std::error::Error + Send + Sync + 'static,
) -> PipelineError {
    PipelineError::Export {
        path: path.to_path_buf(),
        source: Box::new(source),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn params_defaults() {
        let params = PipelineParams::new("photo.png", PipelineMode::Image);
        assert_eq!(params.output_dir, PathBuf::from("output"));
        assert_eq!(params.format, "obj");
        assert_eq!(params.max_size, None);
    }

    #[test]
    fn params_builders() {
        let params = PipelineParams::new("a clay pot", PipelineMode::Text)
            .with_output_dir("previews")
            .with_format("stl")
            .with_max_size(128);
        assert_eq!(params.output_dir, PathBuf::from("previews"));
        assert_eq!(params.format, "stl");
        assert_eq!(params.max_size, Some(128));
    }

    #[test]
    fn summary_prints_the_success_lines() {
        let summary = PipelineSummary {
            output_dir: PathBuf::from("output"),
            model_path: PathBuf::from("output/model.obj"),
            render_path: PathBuf::from("output/render.png"),
            plot_path: PathBuf::from("output/plot.png"),
            processed_image_path: None,
            vertex_count: 16,
            face_count: 18,
            cleanup: CleanupSummary::default(),
        };

        let text = summary.to_string();
        assert!(
            text.starts_with("Successfully generated 3D model and visualizations in output\n")
        );
        assert!(text.contains("Model saved as: output/model.obj\n"));
        assert!(text.ends_with("Visualizations saved as: output/render.png and output/plot.png"));
    }

    #[test]
    fn unknown_format_is_rejected_before_any_write() {
        let output = PathBuf::from("relief-pipeline-never-created");
        let params = PipelineParams::new("a clay pot", PipelineMode::Text)
            .with_output_dir(&output)
            .with_format("ply");

        let err = run_pipeline(&params).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::UnsupportedFormat { format } if format == "ply"
        ));
        assert!(!output.exists());
    }
}
