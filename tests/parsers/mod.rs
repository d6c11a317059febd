//! Parser integration tests
//!
//! - `run_json_tests` - run documents: layouts, lenient values, bad input
//! - `capture_tests` - logger capture files and their conversion

pub mod run_json_tests;
