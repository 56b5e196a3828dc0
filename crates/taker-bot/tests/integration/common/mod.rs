//! Shared fixtures for integration tests.

pub mod mock_venue;
