pub mod config;
pub mod guess;
pub mod pipeline;
pub mod types;
