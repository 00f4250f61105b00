//! Test utilities for integration testing.
//!
//! This module provides:
//! - Test data factories for creating valid signup fixtures
//! - In-memory implementations of the storage, email and rate limit ports
//! - `TestAppStateBuilder` for HTTP-level tests

mod app_state_builder;
mod factories;
mod mocks;

pub use app_state_builder::*;
pub use factories::*;
pub use mocks::*;
