#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);
    let clean = rollout::sanitize(&line);
    assert!(!clean.contains('\u{1b}'));
    assert!(!clean.contains('\r'));
});
