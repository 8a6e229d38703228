//! Crate-level test suite.
//!
//! Scenario-style integration tests, paired-run determinism checks, and the
//! shared fixtures they build on. Module-level unit tests live next to the
//! code they cover.

mod helpers;

pub use helpers::*;
