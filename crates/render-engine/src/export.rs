//! Export configuration and job management.
//!
//! Exports do not encode video. The artifact is a single blank canvas at
//! the project size, serialized as PNG bytes under the chosen container's
//! file extension. Size and time estimates follow the per-quality rates.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use cutframe_common::error::{CutframeError, CutframeResult};
use cutframe_project_model::project::Project;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::compositor::{encode_png, frame_times};

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Mp4,
    Webm,
    Mov,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Mp4, ExportFormat::Webm, ExportFormat::Mov];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Mp4 => "mp4",
            ExportFormat::Webm => "webm",
            ExportFormat::Mov => "mov",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Mp4 => "video/mp4",
            ExportFormat::Webm => "video/webm",
            ExportFormat::Mov => "video/quicktime",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mp4" => Ok(ExportFormat::Mp4),
            "webm" => Ok(ExportFormat::Webm),
            "mov" => Ok(ExportFormat::Mov),
            other => Err(format!("Unknown format: {other}. Use: mp4, webm, mov")),
        }
    }
}

/// Output quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportQuality {
    Low,
    #[default]
    Medium,
    High,
}

impl ExportQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportQuality::Low => "low",
            ExportQuality::Medium => "medium",
            ExportQuality::High => "high",
        }
    }

    /// Nominal output resolution.
    pub fn resolution_label(&self) -> &'static str {
        match self {
            ExportQuality::Low => "720p",
            ExportQuality::Medium => "1080p",
            ExportQuality::High => "1080p+",
        }
    }

    pub fn bitrate_mbps(&self) -> u32 {
        match self {
            ExportQuality::Low => 2,
            ExportQuality::Medium => 5,
            ExportQuality::High => 10,
        }
    }

    /// Estimated output megabytes per minute of timeline.
    pub fn megabytes_per_minute(&self) -> f64 {
        match self {
            ExportQuality::Low => 10.0,
            ExportQuality::Medium => 25.0,
            ExportQuality::High => 50.0,
        }
    }

    /// Estimated processing seconds per second of timeline.
    pub fn processing_ratio(&self) -> f64 {
        match self {
            ExportQuality::Low => 0.5,
            ExportQuality::Medium => 1.0,
            ExportQuality::High => 2.0,
        }
    }
}

impl fmt::Display for ExportQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(ExportQuality::Low),
            "medium" => Ok(ExportQuality::Medium),
            "high" => Ok(ExportQuality::High),
            other => Err(format!("Unknown quality: {other}. Use: low, medium, high")),
        }
    }
}

/// Target platform label carried on an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportPreset {
    #[default]
    Web,
    Youtube,
    Instagram,
    Mobile,
    Desktop,
}

impl ExportPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportPreset::Web => "web",
            ExportPreset::Youtube => "youtube",
            ExportPreset::Instagram => "instagram",
            ExportPreset::Mobile => "mobile",
            ExportPreset::Desktop => "desktop",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ExportPreset::Web => "Optimized for web playback",
            ExportPreset::Youtube => "YouTube recommended settings",
            ExportPreset::Instagram => "Instagram video format",
            ExportPreset::Mobile => "Mobile device optimized",
            ExportPreset::Desktop => "Desktop viewing",
        }
    }
}

impl fmt::Display for ExportPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "web" => Ok(ExportPreset::Web),
            "youtube" => Ok(ExportPreset::Youtube),
            "instagram" => Ok(ExportPreset::Instagram),
            "mobile" => Ok(ExportPreset::Mobile),
            "desktop" => Ok(ExportPreset::Desktop),
            other => Err(format!(
                "Unknown preset: {other}. Use: web, youtube, instagram, mobile, desktop"
            )),
        }
    }
}

/// Export settings chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExportSettings {
    pub format: ExportFormat,
    pub quality: ExportQuality,
    pub preset: ExportPreset,
}

/// Size and processing-time estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEstimate {
    /// `round(base_mb_per_min * duration / 60)`.
    pub size_mb: u64,
    /// `round(duration * processing_ratio)`.
    pub processing_secs: u64,
}

/// Estimate output size and processing time for `duration` seconds.
pub fn estimate_export(duration: f64, quality: ExportQuality) -> ExportEstimate {
    let duration = if duration.is_finite() {
        duration.max(0.0)
    } else {
        0.0
    };
    ExportEstimate {
        size_mb: (quality.megabytes_per_minute() * (duration / 60.0)).round() as u64,
        processing_secs: (duration * quality.processing_ratio()).round() as u64,
    }
}

/// Replace characters that cannot appear in a file name.
pub fn sanitize_file_stem(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "untitled".to_string()
    } else {
        cleaned
    }
}

/// An export job ready to be rendered.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Snapshot of the project to export.
    pub project: Project,

    /// Directory the artifact is written to.
    pub output_dir: PathBuf,

    pub settings: ExportSettings,
}

impl ExportJob {
    pub fn new(project: Project, output_dir: impl Into<PathBuf>, settings: ExportSettings) -> Self {
        Self {
            project,
            output_dir: output_dir.into(),
            settings,
        }
    }

    /// `<output_dir>/<project name>.<ext>`.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "{}.{}",
            sanitize_file_stem(&self.project.name),
            self.settings.format.extension()
        ))
    }

    pub fn estimate(&self) -> ExportEstimate {
        estimate_export(self.project.duration, self.settings.quality)
    }

    /// Frames a real encode of the timeline would produce.
    pub fn total_frames(&self) -> u64 {
        frame_times(self.project.duration, self.project.fps).count() as u64
    }
}

/// Progress callback for export rendering.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send + Sync>;

/// Export progress report.
#[derive(Debug, Clone)]
pub struct ExportProgress {
    /// Current progress [0.0, 1.0].
    pub progress: f64,

    /// Frames rendered so far.
    pub frames_rendered: u64,

    /// Total frames to render.
    pub total_frames: u64,

    /// Current stage.
    pub stage: ExportStage,
}

/// Stages of the export process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStage {
    Preparing,
    Rendering,
    Finalizing,
    Complete,
    Failed,
}

/// Result of a finished export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportArtifact {
    pub path: PathBuf,
    pub mime_type: String,
    pub bytes_written: u64,
    pub settings: ExportSettings,
    pub estimate: ExportEstimate,
    pub backend: String,
}

impl ExportArtifact {
    pub fn to_json(&self) -> CutframeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Produces the artifact bytes for an export job.
pub trait RenderBackend: Send {
    /// Render the job to in-memory artifact bytes.
    fn render(&mut self, job: &ExportJob, progress: Option<&ProgressCallback>)
        -> CutframeResult<Vec<u8>>;

    /// Check if this backend is available on the system.
    fn is_available(&self) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}

/// Serializes one blank canvas at the project size.
#[derive(Debug, Default)]
pub struct BlankCanvasBackend;

impl RenderBackend for BlankCanvasBackend {
    fn render(
        &mut self,
        job: &ExportJob,
        progress: Option<&ProgressCallback>,
    ) -> CutframeResult<Vec<u8>> {
        let total_frames = job.total_frames();
        report(progress, 0.1, 0, total_frames, ExportStage::Rendering);

        let canvas = RgbaImage::from_pixel(
            job.project.width,
            job.project.height,
            Rgba([0, 0, 0, 0]),
        );
        let bytes = encode_png(&canvas)?;

        report(
            progress,
            0.9,
            total_frames,
            total_frames,
            ExportStage::Rendering,
        );
        Ok(bytes)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "blank-canvas"
    }
}

fn report(
    progress: Option<&ProgressCallback>,
    fraction: f64,
    frames_rendered: u64,
    total_frames: u64,
    stage: ExportStage,
) {
    if let Some(cb) = progress {
        cb(ExportProgress {
            progress: fraction,
            frames_rendered,
            total_frames,
            stage,
        });
    }
}

/// Export the project with the default backend.
pub async fn export_project(
    job: ExportJob,
    progress: Option<ProgressCallback>,
) -> CutframeResult<ExportArtifact> {
    export_with_backend(job, Box::new(BlankCanvasBackend), progress).await
}

/// Export the project with a specific backend.
pub async fn export_with_backend(
    job: ExportJob,
    mut backend: Box<dyn RenderBackend>,
    progress: Option<ProgressCallback>,
) -> CutframeResult<ExportArtifact> {
    let output_path = job.output_path();
    let total_frames = job.total_frames();
    tracing::info!(
        output = %output_path.display(),
        format = %job.settings.format,
        quality = %job.settings.quality,
        preset = %job.settings.preset,
        "Starting export"
    );

    report(progress.as_ref(), 0.0, 0, total_frames, ExportStage::Preparing);

    let result = run_export(&job, backend.as_mut(), progress.as_ref(), &output_path).await;
    match result {
        Ok(bytes_written) => {
            report(
                progress.as_ref(),
                1.0,
                total_frames,
                total_frames,
                ExportStage::Complete,
            );
            tracing::info!(
                output = %output_path.display(),
                bytes = bytes_written,
                "Export complete"
            );
            Ok(ExportArtifact {
                path: output_path,
                mime_type: job.settings.format.mime_type().to_string(),
                bytes_written,
                settings: job.settings,
                estimate: job.estimate(),
                backend: backend.name().to_string(),
            })
        }
        Err(e) => {
            tracing::error!(error = %e, "Export failed");
            report(progress.as_ref(), 0.0, 0, total_frames, ExportStage::Failed);
            Err(e)
        }
    }
}

async fn run_export(
    job: &ExportJob,
    backend: &mut dyn RenderBackend,
    progress: Option<&ProgressCallback>,
    output_path: &Path,
) -> CutframeResult<u64> {
    if job.project.width == 0 || job.project.height == 0 {
        return Err(CutframeError::export(format!(
            "Canvas {}x{} has no pixels",
            job.project.width, job.project.height
        )));
    }
    if !backend.is_available() {
        return Err(CutframeError::unsupported(format!(
            "Render backend '{}' is not available",
            backend.name()
        )));
    }
    tracing::debug!(backend = backend.name(), "Using render backend");

    tokio::fs::create_dir_all(&job.output_dir).await?;
    let bytes = backend.render(job, progress)?;

    report(
        progress,
        0.95,
        job.total_frames(),
        job.total_frames(),
        ExportStage::Finalizing,
    );
    tokio::fs::write(output_path, &bytes).await?;
    Ok(bytes.len() as u64)
}
