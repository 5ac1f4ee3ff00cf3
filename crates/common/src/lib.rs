//! Common utilities and shared types for teamlunch.
//!
//! This crate provides foundational components used across all teamlunch crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Clock**: Injectable time source via [`Clock`]
//!
//! # Example
//!
//! ```no_run
//! use teamlunch_common::{AppResult, Clock, Config, SystemClock};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let now = SystemClock.now();
//!     println!("Winner time {} at {now}", config.schedule.winner_time);
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;

pub use clock::{Clock, FixedClock, SharedClock, SystemClock};
pub use config::Config;
pub use error::{AppError, AppResult};
