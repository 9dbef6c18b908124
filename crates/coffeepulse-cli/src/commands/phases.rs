use coffeepulse_core::{Config, Cue, Phase, TransitionKind};
use serde_json::json;

/// Cue played when the phase ends, or on start for `Idle`.
fn closing_cue(phase: Phase) -> Cue {
    match phase {
        Phase::Idle => Cue::Start,
        Phase::Bloom => TransitionKind::BloomComplete.into(),
        Phase::Pour => TransitionKind::PourComplete.into(),
        Phase::Wait => TransitionKind::WaitComplete.into(),
    }
}

fn pattern(cue: Cue) -> String {
    cue.haptic_pattern()
        .iter()
        .map(|ms| ms.to_string())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let brew = Config::load_or_default().brew_config()?;

    if json {
        let phases: Vec<_> = Phase::ALL
            .iter()
            .map(|&phase| {
                let cue = closing_cue(phase);
                json!({
                    "phase": phase,
                    "label": phase.label(),
                    "hint": phase.hint(),
                    "duration": brew.phase_duration(phase),
                    "cue": cue,
                    "tone": cue.tone(),
                    "haptic_pattern": cue.haptic_pattern(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&phases)?);
        return Ok(());
    }

    for phase in Phase::ALL {
        let cue = closing_cue(phase);
        let tone = cue
            .tone()
            .map(|t| format!("{t:?}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<6} {:>4}s  {:<26} tone {:<9} haptic {}",
            phase.label(),
            brew.phase_duration(phase),
            phase.hint(),
            tone,
            pattern(cue)
        );
    }
    Ok(())
}
