// crates/dockyards-core/tests/quantity.rs
// ============================================================================
// Module: Quantity Property Tests
// Description: Property-based checks for quantity canonicalization.
// Purpose: Ensure canonical forms are stable and value-preserving.
// Dependencies: dockyards-core, proptest
// ============================================================================
//! ## Overview
//! Canonicalization must be idempotent and must never change the parsed value.

#![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

use dockyards_core::Quantity;
use proptest::prelude::*;

fn suffix() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "", "m", "k", "M", "G", "T", "Ki", "Mi", "Gi", "Ti",
    ])
}

proptest! {
    #[test]
    fn canonical_form_is_idempotent(value in 0_u32 .. 1_000_000, suffix in suffix()) {
        let input = format!("{value}{suffix}");
        let parsed = Quantity::parse(&input).unwrap();
        let canonical = parsed.to_canonical_string();
        let reparsed = Quantity::parse(&canonical).unwrap();
        prop_assert_eq!(&reparsed, &parsed);
        prop_assert_eq!(reparsed.to_canonical_string(), canonical);
    }

    #[test]
    fn fractional_inputs_round_up_to_whole_units(whole in 0_u32 .. 10_000, frac in 0_u32 .. 1000) {
        let input = format!("{whole}.{frac:03}");
        let parsed = Quantity::parse(&input).unwrap();
        let expected = i64::from(whole) + i64::from(frac > 0);
        prop_assert_eq!(parsed.whole_units_ceil(), expected);
    }

    #[test]
    fn binary_suffixes_order_above_decimal(value in 1_u32 .. 1_000_000) {
        let decimal = Quantity::parse(&format!("{value}k")).unwrap();
        let binary = Quantity::parse(&format!("{value}Ki")).unwrap();
        prop_assert!(decimal < binary);
    }

    #[test]
    fn arbitrary_strings_never_panic(input in ".{0,24}") {
        let _ = Quantity::parse(&input);
    }
}

#[test]
fn wire_examples_round_trip_byte_identical() {
    for input in ["2", "3M", "4Gi"] {
        assert_eq!(Quantity::parse(input).unwrap().to_canonical_string(), input);
    }
}
