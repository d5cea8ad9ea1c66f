//! Property tests for the normalization and roundtrip invariants that
//! the archive engine's collision and validation logic both depend on.

use grf_archive::encoding::{self, Encoding};
use proptest::prelude::*;

proptest! {
    /// Normalizing twice is the same as normalizing once: NFC is
    /// idempotent, ASCII lowercasing is idempotent, and slash-folding
    /// output never contains a backslash or a repeated slash for
    /// `normalize` to re-fold.
    #[test]
    fn normalize_is_idempotent(s in ".*") {
        let once = encoding::normalize(&s);
        let twice = encoding::normalize(&once);
        prop_assert_eq!(once, twice);
    }

    /// Any Rust string roundtrips cleanly through strict UTF-8
    /// encode/decode, since `encode` for `Utf8Strict` is just
    /// `as_bytes()` and `s` is already valid UTF-8 by construction.
    #[test]
    fn utf8_strict_roundtrip_always_holds(s in ".*") {
        prop_assert!(encoding::roundtrip_ok(&s, Encoding::Utf8Strict));
    }

    /// Latin-1 encode/decode roundtrips for any string made only of
    /// code points in 0x00..=0xFF, the range `encode` can represent
    /// without truncation.
    #[test]
    fn latin1_roundtrip_holds_within_byte_range(
        s in prop::collection::vec(0u8..=0xffu8, 0..32)
    ) {
        let s: String = s.iter().map(|&b| b as char).collect();
        prop_assert!(encoding::roundtrip_ok(&s, Encoding::Latin1));
    }

    /// A string built from mojibake'd CP949 bytes always classifies as
    /// mojibake and round-trips back to the original through `fix_mojibake`,
    /// for any non-empty Hangul-bearing input that CP949 can represent.
    #[test]
    fn mojibake_fix_recovers_hangul_strings(
        chars in prop::collection::vec(0xAC00u32..=0xD7A3u32, 1..8)
    ) {
        let original: String = chars.into_iter().filter_map(char::from_u32).collect();
        prop_assume!(!original.is_empty());
        let cp949_bytes = encoding::encode(&original, Encoding::Cp949);
        let mojibake: String = cp949_bytes.iter().map(|&b| b as char).collect();
        prop_assert!(encoding::is_mojibake(&mojibake));
        prop_assert_eq!(encoding::fix_mojibake(&mojibake), original);
    }
}
