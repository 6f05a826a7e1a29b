#![no_main]

use libfuzzer_sys::fuzz_target;
use waymark::search::strip_markup;

fuzz_target!(|data: &str| {
    // Stripping must be total and idempotent on arbitrary text
    let once = strip_markup(data);
    let twice = strip_markup(&once);
    assert_eq!(once, twice);
});
