#![no_main]
use libfuzzer_sys::fuzz_target;

use safesvg::{Session, Validator};

fuzz_target!(|data: &[u8]| {
    let validator = Validator::new().with_session(Session::new_for_test_suite());

    // whatever is accepted must still be accepted once minified
    if validator.validate(data).is_ok() {
        if let Ok(minified) = safesvg::minify::minify(data) {
            assert!(validator.validate(&minified).is_ok());
        }
    }
});
