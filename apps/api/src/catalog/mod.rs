//! The catalog: what a user sees when browsing prompts, and how each
//! interaction (search, filter, sort, paging) changes it.

pub mod engine;
pub mod flash;
pub mod handlers;
pub mod pagination;
pub mod query;
pub mod random;
pub mod registry;
pub mod service;
pub mod session;
