//! Integration tests for fsig-app.
//!
//! These tests drive the real HTTP components against a local server:
//! - Feed page fetch, filtering and report rendering
//! - License verification round trips and failure modes

pub mod common;
