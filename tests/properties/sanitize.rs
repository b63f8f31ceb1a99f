//! Property tests for terminal output sanitizing.

use proptest::prelude::*;

use rollout::sanitize;

fn styled_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~]{0,12}",
        Just("\u{1b}[32m".to_string()),
        Just("\u{1b}[0m".to_string()),
        Just("\u{1b}[2K".to_string()),
        Just("\u{1b}[1;33;40m".to_string()),
        Just("\u{1b}]0;title\u{7}".to_string()),
        Just("\r".to_string()),
        Just("\u{9b}31m".to_string()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: sanitized output never contains an escape byte.
    #[test]
    fn property_no_escape_bytes(raw in "(?s).{0,256}") {
        let clean = sanitize(&raw);
        prop_assert!(!clean.contains('\u{1b}'), "sanitized output contains ESC");
        prop_assert!(!clean.contains('\r'));
    }

    /// PROPERTY: styled tool output keeps no control characters except tab.
    #[test]
    fn property_styled_lines_are_clean(parts in proptest::collection::vec(styled_fragment(), 0..16)) {
        let clean = sanitize(&parts.concat());
        prop_assert!(clean.chars().all(|c| !c.is_control() || c == '\t'));
    }

    /// PROPERTY: sanitizing is idempotent.
    #[test]
    fn property_sanitize_idempotent(raw in "(?s).{0,256}") {
        let once = sanitize(&raw);
        prop_assert_eq!(sanitize(&once), once);
    }

    /// PROPERTY: plain printable text passes through unchanged.
    #[test]
    fn property_plain_text_unchanged(raw in "[ -~]{0,128}") {
        prop_assert_eq!(sanitize(&raw), raw);
    }
}
