//! Domain logic for the rollcall check-in bot.
//!
//! This crate has no internal dependencies so it can be used by the API
//! server, the persistence layer, and any future CLI tooling.

pub mod checkin;
pub mod error;
pub mod report;
pub mod signature;
pub mod types;
