mod config;
mod engine;
mod phase;
mod scheduler;

pub use config::BrewConfig;
pub use engine::{BrewEngine, StartKind, TimerState};
pub use phase::{Phase, PhaseInfo};
pub use scheduler::{IntervalScheduler, ManualScheduler, ManualTicks, TickCallback, TickScheduler};
