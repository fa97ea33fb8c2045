//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each service,
//! `AppPaths` for cross-platform data directories, TOML persistence via
//! `AppConfig::load` / `AppConfig::save`, and first-run completion through
//! `interactive::complete`.

pub mod interactive;
pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    generate_id, AppConfig, AzureConfig, MandarinConfig, ModelConfig, OpenAiConfig, ReadingFormat,
    Script,
};
