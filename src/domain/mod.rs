//! Core domain types and logic.

pub mod config_validation;
pub mod dates;
pub mod direction;
pub mod error;
pub mod evaluation;
pub mod metrics;
pub mod price;
pub mod report;
pub mod rounding;
pub mod simulation;
