pub mod catalog;
pub mod config;
pub mod demo_match;
pub mod error;
pub mod events_export;
pub mod loader;
pub mod pipeline;
pub mod render;
pub mod roster;
pub mod state;
pub mod summary;
pub mod svg_export;
pub mod vocabulary;
