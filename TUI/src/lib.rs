//! Terminal gallery of prompts for a text-generation service.
//!
//! Browse prompts by category, copy one to the clipboard, or open it and
//! send it to the Gemini API to see the generated text.

pub mod action;
pub mod app;
pub mod catalog;
pub mod clipboard;
pub mod config;
pub mod generation;
pub mod keymap;
pub mod markdown;
pub mod terminal;
pub mod ui;
pub mod ui_state;

pub use app::App;
pub use catalog::{PromptCatalog, PromptRecord};
pub use config::Config;
pub use generation::{GenerationClient, GenerationError};
