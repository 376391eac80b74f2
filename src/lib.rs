//! Render a Microsoft 365 user directory as markmap outlines
//!
//! The directory is fetched once from Microsoft Graph, then grouped four ways
//! (manager chain, department, job title, office location) and written as one
//! markdown document per grouping.

pub mod cmd;
pub mod config;
pub mod error;
pub mod graph;
pub mod report;
