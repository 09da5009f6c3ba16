//! Common test utilities and infrastructure
//!
//! Shared fixtures and builders for the intake test suites.

#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;

pub use fixtures::TestFixtures;
pub use helpers::{ReconcilerBuilder, TestHelpers, TestReconciler};
