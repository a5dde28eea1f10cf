//! Episode Planner Library
//!
//! Resolves messy TV episode files against a canonical episode catalog and
//! builds a rename plan with a confidence verdict for every file.

pub mod cli;
pub mod core;
pub mod error;
pub mod generators;
pub mod models;
pub mod preflight;
pub mod services;

pub use error::{Error, Result};
