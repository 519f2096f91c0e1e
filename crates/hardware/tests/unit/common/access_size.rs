//! # Access Size Tests
//!
//! Verifies the mapping between size classes, byte counts, and value masks.

use cachebus_core::common::AccessSize;
use rstest::rstest;

#[rstest]
#[case(0, AccessSize::Byte, 1, 0xFF)]
#[case(1, AccessSize::Half, 2, 0xFFFF)]
#[case(2, AccessSize::Word, 4, 0xFFFF_FFFF)]
#[case(3, AccessSize::Double, 8, u64::MAX)]
fn class_bytes_and_mask(
    #[case] class: u8,
    #[case] size: AccessSize,
    #[case] bytes: usize,
    #[case] mask: u64,
) {
    assert_eq!(AccessSize::from_class(class), Some(size));
    assert_eq!(AccessSize::from_bytes(bytes), Some(size));
    assert_eq!(size.class(), class);
    assert_eq!(size.bytes(), bytes);
    assert_eq!(size.value_mask(), mask);
    assert_eq!(size.to_string(), class.to_string());
}

#[test]
fn out_of_range_sizes_are_rejected() {
    assert_eq!(AccessSize::from_class(4), None);
    assert_eq!(AccessSize::from_bytes(3), None);
    assert_eq!(AccessSize::from_bytes(16), None);
}
