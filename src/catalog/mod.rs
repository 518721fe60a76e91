//! Remedy catalog and favorites, as seen by callers.
//!
//! The catalog is content the challenge engine never mutates; storage lives
//! in `db::repositories::{remedies, favorites}`.

pub mod commands;
