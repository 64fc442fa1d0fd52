//! Media import: classifying files and probing their intrinsic duration.

use std::path::{Path, PathBuf};
use std::process::Command;

use cutframe_project_model::audio::AudioTrack;
use cutframe_project_model::clip::{Clip, MediaKind};

/// Errors raised while importing media.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MediaError {
    #[error("Unsupported media type: {mime}")]
    UnsupportedType { mime: String },

    #[error("Failed to load {path}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },
}

/// A file offered for import.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSource {
    pub path: PathBuf,
    /// Display name; defaults to the file name.
    pub name: String,
    /// MIME type; guessed from the extension when `None`.
    pub mime: Option<String>,
}

impl MediaSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            name,
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Declared or guessed MIME type.
    pub fn resolved_mime(&self) -> Option<String> {
        self.mime
            .clone()
            .or_else(|| guess_mime(&self.path).map(str::to_string))
    }

    /// Media kind from the MIME prefix.
    pub fn kind(&self) -> Result<MediaKind, MediaError> {
        let mime = self.resolved_mime().unwrap_or_default();
        MediaKind::from_mime(&mime).ok_or(MediaError::UnsupportedType {
            mime: if mime.is_empty() {
                "unknown".to_string()
            } else {
                mime
            },
        })
    }
}

/// Guess a MIME type from a file extension.
pub fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "m4a" => "audio/mp4",
        "flac" => "audio/flac",
        "aac" => "audio/aac",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(mime)
}

/// Reads the intrinsic duration of a media file.
pub trait MediaProbe {
    /// Duration in seconds of `source`, already classified as `kind`.
    fn duration(&self, source: &MediaSource, kind: MediaKind) -> Result<f64, MediaError>;
}

/// Probes audio/video with `ffprobe` and images with a header decode.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    /// Duration assigned to still images.
    pub image_clip_secs: f64,
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self {
            image_clip_secs: 5.0,
        }
    }
}

impl FfprobeProbe {
    pub fn new(image_clip_secs: f64) -> Self {
        Self { image_clip_secs }
    }
}

impl MediaProbe for FfprobeProbe {
    fn duration(&self, source: &MediaSource, kind: MediaKind) -> Result<f64, MediaError> {
        let load_failed = |reason: String| MediaError::LoadFailed {
            path: source.path.clone(),
            reason,
        };

        match kind {
            MediaKind::Image => {
                image::image_dimensions(&source.path)
                    .map_err(|e| load_failed(format!("image decode failed: {e}")))?;
                Ok(self.image_clip_secs)
            }
            MediaKind::Video | MediaKind::Audio => {
                let output = Command::new("ffprobe")
                    .args(["-v", "quiet", "-print_format", "json", "-show_format"])
                    .arg(&source.path)
                    .output()
                    .map_err(|e| load_failed(format!("failed to run ffprobe: {e}")))?;

                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    return Err(load_failed(format!("ffprobe failed: {}", stderr.trim())));
                }

                parse_ffprobe_duration(&String::from_utf8_lossy(&output.stdout))
                    .ok_or_else(|| load_failed("no duration in ffprobe output".to_string()))
            }
        }
    }
}

/// Extract `format.duration` from `ffprobe -print_format json` output.
pub fn parse_ffprobe_duration(json: &str) -> Option<f64> {
    let value: serde_json::Value = serde_json::from_str(json).ok()?;
    let duration = &value["format"]["duration"];
    duration
        .as_str()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .or_else(|| duration.as_f64())
}

fn check_duration(source: &MediaSource, duration: f64) -> Result<f64, MediaError> {
    if duration.is_finite() && duration > 0.0 {
        Ok(duration)
    } else {
        Err(MediaError::LoadFailed {
            path: source.path.clone(),
            reason: format!("invalid duration {duration}"),
        })
    }
}

/// Classify and probe `source`, producing an unplaced clip.
pub fn import_media(probe: &dyn MediaProbe, source: &MediaSource) -> Result<Clip, MediaError> {
    let kind = source.kind()?;
    let duration = check_duration(source, probe.duration(source, kind)?)?;
    tracing::info!(
        path = %source.path.display(),
        kind = %kind,
        duration,
        "Imported media"
    );
    Ok(Clip::new(
        source.name.clone(),
        kind,
        source.path.display().to_string(),
        duration,
    ))
}

/// Import an audio file as a standalone audio track.
pub fn import_audio_track(
    probe: &dyn MediaProbe,
    source: &MediaSource,
) -> Result<AudioTrack, MediaError> {
    let kind = source.kind()?;
    if kind != MediaKind::Audio {
        return Err(MediaError::UnsupportedType {
            mime: source.resolved_mime().unwrap_or_default(),
        });
    }
    let duration = check_duration(source, probe.duration(source, kind)?)?;
    Ok(AudioTrack::new(
        source.name.clone(),
        source.path.display().to_string(),
        duration,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe(f64);

    impl MediaProbe for FixedProbe {
        fn duration(&self, _: &MediaSource, _: MediaKind) -> Result<f64, MediaError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_guess_mime_from_extension() {
        assert_eq!(guess_mime(Path::new("a/b/clip.MP4")), Some("video/mp4"));
        assert_eq!(guess_mime(Path::new("song.mp3")), Some("audio/mpeg"));
        assert_eq!(guess_mime(Path::new("logo.jpeg")), Some("image/jpeg"));
        assert_eq!(guess_mime(Path::new("noext")), None);
    }

    #[test]
    fn test_kind_from_declared_mime_wins() {
        let source = MediaSource::from_path("x.bin").with_mime("audio/ogg");
        assert_eq!(source.kind().unwrap(), MediaKind::Audio);
        assert_eq!(source.name, "x.bin");
    }

    #[test]
    fn test_unsupported_type_is_rejected() {
        let source = MediaSource::from_path("notes.txt");
        assert_eq!(
            import_media(&FixedProbe(3.0), &source),
            Err(MediaError::UnsupportedType {
                mime: "text/plain".to_string()
            })
        );
        let unknown = MediaSource::from_path("blob");
        assert!(matches!(
            unknown.kind(),
            Err(MediaError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_bad_duration_is_load_failure() {
        let source = MediaSource::from_path("clip.mp4");
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                import_media(&FixedProbe(bad), &source),
                Err(MediaError::LoadFailed { .. })
            ));
        }
    }

    #[test]
    fn test_import_builds_clip() {
        let source = MediaSource::from_path("/media/intro.webm");
        let clip = import_media(&FixedProbe(12.5), &source).unwrap();
        assert_eq!(clip.kind, MediaKind::Video);
        assert_eq!(clip.name, "intro.webm");
        assert_eq!(clip.source, "/media/intro.webm");
        assert_eq!(clip.duration, 12.5);
    }

    #[test]
    fn test_import_audio_track_requires_audio() {
        let track =
            import_audio_track(&FixedProbe(30.0), &MediaSource::from_path("bed.wav")).unwrap();
        assert_eq!(track.duration, 30.0);
        assert!(import_audio_track(&FixedProbe(30.0), &MediaSource::from_path("a.png")).is_err());
    }

    #[test]
    fn test_parse_ffprobe_duration() {
        let json = r#"{"format": {"filename": "a.mp4", "duration": "12.345000"}}"#;
        assert_eq!(parse_ffprobe_duration(json), Some(12.345));
        assert_eq!(parse_ffprobe_duration(r#"{"format": {}}"#), None);
        assert_eq!(parse_ffprobe_duration("not json"), None);
    }

    #[test]
    fn test_image_probe_rejects_undecodable_file() {
        let path = std::env::temp_dir().join(format!("cutframe_bad_{}.png", std::process::id()));
        std::fs::write(&path, b"definitely not a png").unwrap();
        let probe = FfprobeProbe::default();
        let source = MediaSource::from_path(&path);
        assert!(matches!(
            import_media(&probe, &source),
            Err(MediaError::LoadFailed { .. })
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_image_probe_uses_fixed_duration() {
        let path = std::env::temp_dir().join(format!("cutframe_ok_{}.png", std::process::id()));
        image::RgbaImage::new(4, 4).save(&path).unwrap();
        let probe = FfprobeProbe::new(5.0);
        let clip = import_media(&probe, &MediaSource::from_path(&path)).unwrap();
        assert_eq!(clip.kind, MediaKind::Image);
        assert_eq!(clip.duration, 5.0);
        std::fs::remove_file(&path).ok();
    }
}
