//! Integration tests for taker-bot.
//!
//! These tests drive the real HTTP client against a local mock venue:
//! - Request signing and authentication headers on the wire
//! - Strategy listing success and failure
//! - Order acceptance and rejection
//! - Bootstrap plus bounded submission rounds end to end

pub mod common;
