pub mod cli;
pub mod config;
pub mod ollama;
pub mod splitter;
pub mod store;

pub use config::Config;
pub use ollama::{ChatClient, OllamaClient};
pub use splitter::ThoughtSplitter;
pub use store::ThreadStore;
