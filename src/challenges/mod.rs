pub mod clock;
pub mod commands;
pub mod engine;
pub mod error;
pub mod progression;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{ChallengeEngine, ChallengeOverview};
pub use error::ChallengeError;
pub use progression::{RateLimitPolicy, DEFAULT_MAX_PER_BATCH, DEFAULT_WINDOW_HOURS};
