//! Paradigm FSPD auto-taker.
//!
//! Wires configuration, the signed venue client and the submission scheduler
//! together:
//! - Strategy discovery at startup (fatal on failure)
//! - One BUY and one SELL market order per strategy, every round
//! - Jittered sleep between rounds, until ctrl-c

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
