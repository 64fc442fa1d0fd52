//! Add a text overlay.

use cutframe_common::config::AppConfig;
use cutframe_project_model::{Color, Edit, Point2D, TextAnimation, TextOverlay};

/// Overlay fields gathered from the command line.
pub struct TextArgs {
    pub text: String,
    pub start: f64,
    pub duration: f64,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: String,
    pub background: String,
    pub animation: String,
}

pub fn run(config: &AppConfig, id: &str, args: TextArgs) -> anyhow::Result<()> {
    if !(args.duration.is_finite() && args.duration > 0.0) {
        return Err(anyhow::anyhow!("Duration must be positive"));
    }
    let color: Color = args.color.parse()?;
    let background_color: Color = args.background.parse()?;
    let animation: TextAnimation = args
        .animation
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let overlay = TextOverlay {
        font_size: args.size,
        color,
        background_color,
        position: Point2D::new(args.x, args.y),
        duration: args.duration,
        animation,
        ..TextOverlay::new(args.text, args.start.max(0.0))
    };
    let overlay_id = overlay.id.clone();

    let mut session = super::open_session(config, id)?;
    session.apply(Edit::AddTextOverlay { overlay })?;
    super::finish(session)?;

    println!("Added text overlay {overlay_id}");
    Ok(())
}
