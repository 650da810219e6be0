//! Google Gemini `generateContent` client
//!
//! Sends the instruction preamble and a file's content as one user turn
//! and returns the text of the first candidate.

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::GeminiClient;
pub use config::GeminiConfig;
pub use error::GeminiErrorMapper;
pub use models::{Candidate, Content, GeminiRequest, GeminiResponse, Part};
