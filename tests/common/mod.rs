//! Shared test infrastructure for upsconf.
//!
//! Provides fixture pages mimicking the administration interfaces of the
//! supported cards, plus small assertion helpers over recorded requests.

// Allow dead code since not all test files use all fixtures.
#![allow(dead_code)]

pub mod fixtures;

use upsconf::transport::RecordedRequest;

/// Value of a form field in a recorded POST, panicking with a readable
/// message when absent.
pub fn field<'a>(request: &'a RecordedRequest, name: &str) -> &'a str {
    request
        .field(name)
        .unwrap_or_else(|| panic!("form field {name:?} missing from {}", request.url))
}
