mod engine;
mod runner;
mod session;

pub use engine::{FocusEngine, FocusMode, SessionPhase, SessionSummary};
pub use runner::{SessionRunner, TICK_PERIOD};
pub use session::FocusSession;
