//! Integration tests for end-to-end functionality
//!
//! Tests for:
//! - Run document bytes through analysis and chart models
//! - Loading runs from a directory through a session
//! - Settings round-trips

pub mod pipeline_tests;
pub mod source_tests;
