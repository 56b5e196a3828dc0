//! Core domain types for the FSPD auto-taker.
//!
//! This crate provides the fundamental types shared across the workspace:
//! - `Strategy`: A tradable venue instrument with its minimum block size
//! - `OrderIntent`: A fully formed order submission, not yet sent
//! - `TradeAction`, `OrderType`: Trading enums in venue wire format

pub mod error;
pub mod order;
pub mod strategy;

pub use error::{CoreError, Result};
pub use order::{OrderIntent, OrderType, TradeAction};
pub use strategy::Strategy;
