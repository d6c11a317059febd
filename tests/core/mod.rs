//! Core module tests for non-parser functionality
//!
//! Tests for:
//! - Travel normalization
//! - Series building and time placement
//! - Dynamic sag filter
//! - Histogram binning
//! - Chart models (brush, join, animation)
//! - Session selection and fetch bookkeeping

pub mod chart_tests;
pub mod filters_tests;
pub mod histogram_tests;
pub mod normalize_tests;
pub mod series_tests;
