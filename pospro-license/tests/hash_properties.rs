//! Property-based tests for key hashing.

use pospro_license::{KeyHash, LicenseKey, normalize};
use proptest::prelude::*;

/// Reference implementation on unbounded-width arithmetic, reduced once.
fn reference_hash(s: &str) -> i32 {
    let mut acc: u64 = 0;
    for unit in s.encode_utf16() {
        acc = (acc * 31 + u64::from(unit)) % (1 << 32);
    }
    acc as u32 as i32
}

proptest! {
    /// Hashing the same text twice gives the same value.
    #[test]
    fn deterministic(s in ".{0,64}") {
        prop_assert_eq!(KeyHash::of(&s), KeyHash::of(&s));
    }

    /// Step-wise i32 wrapping agrees with modular arithmetic.
    #[test]
    fn matches_modular_reference(s in "[ -~]{0,200}") {
        prop_assert_eq!(KeyHash::of(&s).value(), reference_hash(&s));
    }

    /// Appending one unit is one multiply-add on the previous hash.
    #[test]
    fn incremental(s in "[A-Z0-9-]{0,40}", c in proptest::char::range('A', 'Z')) {
        let extended = format!("{s}{c}");
        let expected = KeyHash::of(&s).value().wrapping_mul(31).wrapping_add(c as i32);
        prop_assert_eq!(KeyHash::of(&extended).value(), expected);
    }

    /// Parsing hashes the normalized text, so case and padding do not matter.
    #[test]
    fn parse_ignores_case_and_padding(s in "[a-zA-Z0-9-]{1,30}", pad in " {0,3}") {
        let padded = format!("{pad}{s}{pad}");
        let key = LicenseKey::parse(&padded).unwrap();
        prop_assert_eq!(key.hash(), KeyHash::of(&normalize(&s)));
    }
}
