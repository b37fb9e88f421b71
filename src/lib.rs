//! Loadout and experience rules for a Heroes of the Aturi Cluster campaign
//! squad builder: which upgrades and pilot abilities a pilot owns, which fit
//! the current ship, and what the pilot's XP history adds up to.

pub mod build;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod parallel;
pub mod server;

pub use error::{Error, Result};
