//! Set, remove, or reset clip effects.

use cutframe_common::config::AppConfig;
use cutframe_project_model::{Edit, Effect, EffectKind};

pub fn run(
    config: &AppConfig,
    id: &str,
    clip_id: String,
    kind: Option<String>,
    intensity: Option<f64>,
    remove: bool,
    reset: bool,
) -> anyhow::Result<()> {
    let edit = if reset {
        Edit::ResetColorEffects {
            clip_id: clip_id.clone(),
        }
    } else {
        let kind: EffectKind = kind
            .ok_or_else(|| anyhow::anyhow!("Effect kind required (or pass --reset)"))?
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;
        if remove {
            Edit::RemoveEffect {
                clip_id: clip_id.clone(),
                kind,
            }
        } else {
            let intensity = intensity.unwrap_or_else(|| kind.default_intensity());
            Edit::ApplyEffect {
                clip_id: clip_id.clone(),
                effect: Effect::new(kind, intensity),
            }
        }
    };

    let mut session = super::open_session(config, id)?;
    session.apply(edit)?;
    let project = super::finish(session)?;

    let clip = project
        .clip(&clip_id)
        .ok_or_else(|| anyhow::anyhow!("Clip not found: {clip_id}"))?;
    println!("Effects on '{}':", clip.name);
    if clip.effects.is_empty() {
        println!("  (none)");
    }
    for effect in &clip.effects {
        let state = if effect.is_active() { "" } else { " (neutral)" };
        println!("  {} {:.0}{state}", effect.kind, effect.intensity);
    }
    Ok(())
}
