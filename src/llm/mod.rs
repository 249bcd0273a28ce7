//! LLM transport
//!
//! The client and reply parsing only; prompts live with their callers.

pub mod client;
pub mod parser;

pub use client::LlmClient;
