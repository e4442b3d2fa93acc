//! Loan eligibility decision engine.
//!
//! The [`eligibility`] module holds the decision pipeline; [`catalog`] provides an in-memory,
//! CSV-seedable stand-in for the loan type and rule repositories the engine reads from.

pub mod catalog;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod telemetry;
