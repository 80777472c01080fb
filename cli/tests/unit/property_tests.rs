//! Property-based tests for the disk threshold and secret format rules.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use kiosk_setup::domain::ValidationError;
use kiosk_setup::domain::preflight::{HostInfo, check_disk};
use kiosk_setup::domain::secret::{Secret, is_valid_secret};

use crate::helpers::GB_KB;

// ============================================================================
// Disk threshold
// ============================================================================

proptest! {
    /// The check passes iff floor(free GB) >= threshold.
    #[test]
    fn prop_disk_check_matches_floored_gb(free_kb in 0u64..64 * GB_KB, required in 0u64..40) {
        let host = HostInfo { free_disk_kb: free_kb, ..HostInfo::default() };
        let floored = free_kb / GB_KB;
        let result = check_disk(&host, required);
        prop_assert_eq!(result.is_ok(), floored >= required);
        if let Err(e) = result {
            prop_assert_eq!(
                e,
                ValidationError::InsufficientDiskSpace { available_gb: floored, required_gb: required }
            );
        }
    }

    /// One KiB short of a whole GB never counts as that GB.
    #[test]
    fn prop_just_below_threshold_fails(required in 1u64..40) {
        let host = HostInfo { free_disk_kb: required * GB_KB - 1, ..HostInfo::default() };
        prop_assert!(check_disk(&host, required).is_err());
    }
}

// ============================================================================
// Secret format
// ============================================================================

proptest! {
    /// Any string of 20+ allowed characters is accepted.
    #[test]
    fn prop_allowed_alphabet_of_20_plus_accepted(s in "[A-Za-z0-9_-]{20,64}") {
        prop_assert!(is_valid_secret(&s));
        prop_assert!(Secret::parse("K", &s).is_ok());
    }

    /// 19 allowed characters are rejected.
    #[test]
    fn prop_19_characters_rejected(s in "[A-Za-z0-9_-]{19}") {
        prop_assert!(!is_valid_secret(&s));
    }

    /// One disallowed character anywhere in a 20-character key is rejected.
    #[test]
    fn prop_single_invalid_character_rejected(
        base in "[A-Za-z0-9_-]{20}",
        pos in 0usize..20,
        bad in "[ !@#$%^&*()+=./:;,?~]",
    ) {
        let mut chars: Vec<char> = base.chars().collect();
        chars[pos] = bad.chars().next().expect("one char");
        let candidate: String = chars.into_iter().collect();
        prop_assert!(!is_valid_secret(&candidate));
    }
}
