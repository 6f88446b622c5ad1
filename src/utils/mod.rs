//! Utility functions and helpers.

pub mod http;
pub mod rate_limit;
pub mod url;
