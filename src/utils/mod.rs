// Shared utilities for Cadence Workflows

pub mod serde_helpers;
