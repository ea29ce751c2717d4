//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `cli_flags`: Command-line flag loading tests
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Credential and derived-setting resolution tests
//! - `validation`: Base URL validation tests

mod cli_flags;
mod field_resolution;
mod helpers;
