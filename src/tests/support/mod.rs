// Shared test support code for integration tests.
// This module provides common utilities that all test files can use.

pub mod common;
pub mod harness;

pub use common::*;
pub use harness::DashboardServer;
