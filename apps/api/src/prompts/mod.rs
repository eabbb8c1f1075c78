//! Prompt data: built-in feeds merged with the user's own prompts, plus the
//! favorites and preferences that travel with a user.

pub mod favorites;
pub mod handlers;
pub mod merge;
pub mod preferences;
pub mod repository;
