//! Integration tests module
//!
//! Organized by the flow under test

pub mod comments_test;
pub mod creation_test;
pub mod profile_test;
