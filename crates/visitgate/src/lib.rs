//! Visitor pass management for a staffed facility.
//!
//! Hosts submit visit applications covering one or more visitors, staff
//! approve or reject them, and a checkpoint verifies the pass code printed on
//! the resulting QR badge. The crate exposes the domain pieces (store,
//! lifecycle rules, verification engine, scan simulator, risk annotation) and
//! an axum router so a thin service binary can serve them.

pub mod config;
pub mod error;
pub mod risk;
pub mod telemetry;
pub mod verification;
pub mod visits;
