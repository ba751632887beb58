//! Integration tests for Paste-Trawler
//!
//! These tests drive full runs through the public API, using scripted
//! fetchers for timing-sensitive scenarios and wiremock for real HTTP.

mod cli_tests;
mod discovery_tests;
mod fetch_tests;
mod output_tests;
mod support;
