use std::sync::Arc;

use clap::Args;
use coffeepulse_core::cues::NoHaptics;
use coffeepulse_core::{
    format_clock, BrewSession, Config, Devices, Event, IntervalScheduler, Phase, TransitionKind,
};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;

use crate::devices::{LoggedWakeLock, TerminalBell};

#[derive(Args)]
pub struct BrewArgs {
    /// Bloom duration in seconds (overrides config)
    #[arg(long)]
    bloom: Option<u32>,
    /// Pour/wait interval in seconds (overrides config)
    #[arg(long)]
    pulse: Option<u32>,
    /// Start muted
    #[arg(long)]
    mute: bool,
    /// Finish after this many pours
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pours: Option<u32>,
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

/// Keys read from stdin while brewing.
enum Command {
    TogglePause,
    Reset,
    ToggleMute,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "p" | "pause" | "resume" => Some(Command::TogglePause),
        "r" | "reset" => Some(Command::Reset),
        "m" | "mute" => Some(Command::ToggleMute),
        "q" | "quit" => Some(Command::Quit),
        _ => None,
    }
}

fn render(event: &Event) -> String {
    match event {
        Event::BrewStarted { state, .. } => format!(
            "{}: {}s. [p]ause [r]eset [m]ute [q]uit",
            state.phase, state.phase_time_remaining
        ),
        Event::BrewStopped { state, .. } => format!(
            "paused in {} with {}s left (total {})",
            state.phase,
            state.phase_time_remaining,
            format_clock(state.total_time)
        ),
        Event::BrewReset { state, .. } => {
            format!("{}: {}s", Phase::Idle.hint(), state.phase_time_remaining)
        }
        Event::Reconfigured { is_muted, .. } => {
            let state = if *is_muted { "muted" } else { "unmuted" };
            state.to_string()
        }
        Event::PhaseTransition { to, .. } => format!("→ {}: {}", to, to.hint()),
        Event::StateSnapshot {
            state,
            label,
            display_time,
            ..
        } => format!(
            "{label:<6} {display_time:>3}s   total {}",
            format_clock(state.total_time)
        ),
    }
}

/// Read stdin on a plain thread so a pending read never holds up runtime
/// shutdown.
fn spawn_input_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

pub async fn run(args: BrewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    if let Some(bloom) = args.bloom {
        config.timer.bloom_duration = bloom;
    }
    if let Some(pulse) = args.pulse {
        config.timer.pulse_interval = pulse;
    }
    if args.mute {
        config.feedback.muted = true;
    }
    let brew = config.brew_config()?;

    let devices = Devices {
        audio: Arc::new(TerminalBell::default()),
        haptics: Arc::new(NoHaptics),
        wake_lock: Arc::new(LoggedWakeLock::default()),
    };
    let session = BrewSession::new(brew, devices, IntervalScheduler::every_second());
    let mut events = session.subscribe();

    let mut input = spawn_input_reader();
    let mut input_open = true;
    let mut pours_done = 0u32;

    session.start().await;

    loop {
        tokio::select! {
            event = events.recv() => {
                let event = match event {
                    Ok(event) => event,
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                };
                if args.json {
                    println!("{}", serde_json::to_string(&event)?);
                } else {
                    println!("{}", render(&event));
                }
                if let Event::PhaseTransition { kind: TransitionKind::PourComplete, .. } = &event {
                    pours_done += 1;
                    if args.pours.is_some_and(|limit| pours_done >= limit) {
                        break;
                    }
                }
            }
            line = input.recv(), if input_open => {
                let Some(line) = line else {
                    input_open = false;
                    continue;
                };
                match parse_command(&line) {
                    Some(Command::TogglePause) => {
                        if session.state().is_active {
                            session.stop().await;
                        } else {
                            session.start().await;
                        }
                    }
                    Some(Command::Reset) => {
                        session.reset().await;
                        pours_done = 0;
                    }
                    Some(Command::ToggleMute) => {
                        session.toggle_mute();
                    }
                    Some(Command::Quit) => break,
                    None => {}
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let total = session.state().total_time;
    session.stop().await;
    if !args.json {
        println!("brewed for {}", format_clock(total));
    }
    Ok(())
}
