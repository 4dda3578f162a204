//! Give & Get ターミナルクライアント

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod prompts;
pub mod render;
pub mod survey;
