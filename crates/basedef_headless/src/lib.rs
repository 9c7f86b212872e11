//! # Basedef Headless
//!
//! Runs scripted game sessions without graphics. Scenarios are RON files
//! describing a generation config and a sequence of player actions;
//! reports are JSON on stdout. Stands in for the UI layer in CI and
//! balance experiments.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod runner;
pub mod scenario;
