//! Simulation engine for the Flock social-network experiments.
//!
//! The [`Platform`] owns all mutable network state: registered agents,
//! the post/placement stream, directed follow links, the action log, and
//! per-step snapshots. One user acts per step, strictly sequentially, so
//! the mutators need no internal locking.
//!
//! # Modules
//!
//! - [`config`] -- Per-run behavioral options
//! - [`error`] -- [`PlatformError`]
//! - [`log`] -- The persisted run-log document
//! - [`post`] -- Canonical posts and placement records
//! - [`sampling`] -- Weighted draw without replacement
//! - [`snapshot`] -- Point-in-time network views
//!
//! The timeline builder and its six selection strategies are internal to
//! the crate, reachable through [`Platform::timeline_for`].

pub mod config;
pub mod error;
pub mod log;
mod platform;
pub mod post;
pub mod sampling;
pub mod snapshot;
mod timeline;

pub use config::PlatformConfig;
pub use error::PlatformError;
pub use log::{ActionRecord, PlacementEntry, RunLog, UserRecord};
pub use platform::{Platform, RepostReceipt, RunContext};
pub use post::{Placement, Post};
pub use snapshot::{NetworkSnapshot, UserSnapshot};
