#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use rollout::infrastructure::repositories::{parse_descriptor, DescriptorOverrides};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Descriptor parsing must reject bad input with an error, never a panic
        let _ = parse_descriptor(
            content,
            Path::new(".rollout.fuzz.json"),
            "app",
            &DescriptorOverrides::default(),
        );
    }
});
