//! Core business logic modules.

pub mod assistant;
pub mod catalog;
pub mod confidence;
pub mod matcher;
pub mod pairing;
pub mod parser;
pub mod planner;
pub mod scanner;
pub mod span;
pub mod splitter;
pub mod text;
