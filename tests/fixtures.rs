//! Runs the validator over the documents in `tests/fixtures`.
//!
//! Everything under `accept/` must validate, and everything under `reject/` must
//! fail with a validation error, not with an I/O or parse error.

use test_generator::test_resources;

use safesvg::{Session, Validator};

fn validator() -> Validator {
    Validator::new().with_session(Session::new_for_test_suite())
}

#[test_resources("tests/fixtures/accept/*.svg")]
fn accept(path: &str) {
    if let Err(e) = validator().validate_path(path) {
        panic!("{} should be accepted: {}", path, e);
    }
}

#[test_resources("tests/fixtures/reject/*.svg")]
fn reject(path: &str) {
    match validator().validate_path(path) {
        Ok(()) => panic!("{} should be rejected", path),
        Err(e) => assert!(e.is_policy_violation(), "{}: {}", path, e),
    }
}
