//! Integration tests for archive runs and export
//!
//! These tests use wiremock to stand in for the blogging platform and its image
//! hosts, and tempfile directories for the archive.

mod archive_tests;
mod common;
mod export_tests;
mod listing_tests;
