pub mod challenge_progress;
pub mod favorite;
pub mod remedy;

pub use challenge_progress::ChallengeProgress;
pub use favorite::Favorite;
pub use remedy::{day_plans_from_parallel, DayPlan, Remedy, RemedyInput};
