//! Unit-level tests against the public API

pub mod scenario_tests;
