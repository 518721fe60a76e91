mod connection;
pub mod helpers;
mod migrations;
pub mod models;
pub(crate) mod repositories;

pub use connection::Database;
pub use models::{ChallengeProgress, DayPlan, Favorite, Remedy, RemedyInput};
