#![no_main]
use libfuzzer_sys::fuzz_target;

use safesvg::{Session, Validator};

fuzz_target!(|data: &[u8]| {
    let validator = Validator::new().with_session(Session::new_for_test_suite());
    let _ = validator.validate(data);
});
