//! CLI command implementations

pub mod check;
pub mod common;
pub mod growth;
pub mod output;
pub mod report;
pub mod videos;
