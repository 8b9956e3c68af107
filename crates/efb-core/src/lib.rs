//! Core domain + application logic for the EVE Fitting Bot.
//!
//! This crate is intentionally framework-agnostic. Discord, EVE SSO/CREST and the
//! registration web server live behind ports (traits) implemented in adapter crates.

pub mod bot;
pub mod commands;
pub mod config;
pub mod crypto;
pub mod domain;
pub mod errors;
pub mod eve;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod ports;
pub mod store;
pub mod user;

pub use errors::{Error, Result};
