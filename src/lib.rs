//! Travelog - a suspension telemetry viewer written in Rust
//!
//! This library turns raw suspension travel recordings into normalized
//! travel lines, dynamic sag baselines and travel histograms, and provides
//! the graphical interface that plots them for one run or two runs side by
//! side.
//!
//! ## Module Structure
//!
//! - [`parsers`] - Run document and logger capture parsing
//! - [`normalize`] - Raw reading to travel percentage
//! - [`series`] - Time-stamped series from raw readings
//! - [`analysis`] - Dynamic sag filter and travel histogram
//! - [`chart`] - Focus + context and histogram chart models
//! - [`source`] - Run listing and fetching (directory or backend)
//! - [`session`] - Selected runs and their data
//! - [`settings`] - User settings persistence
//! - [`state`] - Constants, palettes and shared UI types
//! - [`app`] - Main application state and eframe::App implementation
//! - [`ui`] - User interface components

pub mod analysis;
pub mod app;
pub mod chart;
pub mod normalize;
pub mod parsers;
pub mod series;
pub mod session;
pub mod settings;
pub mod source;
pub mod state;
pub mod ui;
