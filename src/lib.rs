//! Instra - Instagram media relay bot for Telegram
//!
//! Receives Instagram links in chat, asks the user which content type they
//! want via an inline keyboard, resolves direct media URLs through an
//! external resolver service and re-uploads the media into the chat.

/// Telegram bot implementation
pub mod bot;
/// Configuration management
pub mod config;
/// Liveness HTTP endpoint
pub mod health;
/// Generative error-message client (Gemini)
pub mod llm;
/// Media resolver adapter
pub mod resolver;
