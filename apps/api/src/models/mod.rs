pub mod notice;
pub mod prompt;
