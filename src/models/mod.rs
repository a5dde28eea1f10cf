//! Data models shared by the engine, the services and the CLI.

pub mod catalog;
pub mod config;
pub mod matching;
pub mod media;
pub mod plan;
