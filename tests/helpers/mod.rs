//! Test helpers module
//!
//! Recording messenger, test data and a ready-made workflow context for the
//! integration suite, plus a Postgres helper for repository tests.

#![allow(dead_code)]

pub mod log_capture;

pub use closing_repository::*;
pub use log_capture::*;
pub use messenger_mock::*;
pub use database_helper::*;
pub use test_context::*;
pub use test_data::*;
