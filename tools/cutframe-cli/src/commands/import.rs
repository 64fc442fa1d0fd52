//! Import a media file into a project.

use std::path::PathBuf;

use cutframe_common::config::AppConfig;
use cutframe_editor::{FfprobeProbe, MediaSource};

pub fn run(
    config: &AppConfig,
    id: &str,
    file: PathBuf,
    track: usize,
    start: Option<f64>,
    mime: Option<String>,
    audio_track: bool,
) -> anyhow::Result<()> {
    let mut session = super::open_session(config, id)?;
    let probe = FfprobeProbe::new(config.editor.image_clip_secs);

    let mut source = MediaSource::from_path(&file);
    if let Some(mime) = mime {
        source = source.with_mime(mime);
    }

    println!("Importing {}", file.display());
    if audio_track {
        let track_id = session.import_audio(&probe, &source)?;
        println!("  Audio track: {track_id}");
    } else {
        let clip_id = match start {
            Some(start) => session.import(&probe, &source, track, start)?,
            None => session.import_at_end(&probe, &source, track)?,
        };
        if let Some(clip) = session.project().clip(&clip_id) {
            println!("  Clip: {clip_id}");
            println!("  Kind: {}", clip.kind);
            println!("  Duration: {:.2}s", clip.duration);
            println!("  Placed at {:.2}s on track {}", clip.start_time, clip.track);
        }
    }

    let project = super::finish(session)?;
    println!("Project duration: {:.2}s", project.duration);
    Ok(())
}
