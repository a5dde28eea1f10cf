//! External collaborators: catalog providers, the assistant and ffprobe.

pub mod catalog_file;
pub mod ffprobe;
pub mod ollama;
pub mod provider;
pub mod tmdb;

pub use catalog_file::FileCatalogProvider;
pub use ollama::{OllamaAssistant, OllamaClient, OllamaConfig};
pub use provider::{CatalogProvider, CatalogResolver};
pub use tmdb::{TmdbClient, TmdbConfig};
