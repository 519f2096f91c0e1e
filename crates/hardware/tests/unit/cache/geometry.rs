//! # Cache Geometry Tests
//!
//! Verifies construction-time validation and the line segmentation used for
//! accesses that span several lines.

use cachebus_core::cache::CacheGeometry;
use cachebus_core::cache::geometry::Segment;
use cachebus_core::common::{AccessSize, ConfigError};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn derived_fields() {
    let g = CacheGeometry::new(8, 2, 3, 4).unwrap();
    assert_eq!(g.num_sets(), 8);
    assert_eq!(g.line_bytes(), 4);
    assert_eq!(g.tag_bits(), 3);
    assert_eq!(g.ways(), 4);
    assert_eq!(g.line_size(), AccessSize::Word);
    assert_eq!(g.address_mask(), 0xFF);
}

#[test]
fn zero_set_bits_means_one_set() {
    let g = CacheGeometry::new(8, 1, 0, 1).unwrap();
    assert_eq!(g.num_sets(), 1);
    assert_eq!(g.decode(0xFF).set, 0);
}

#[rstest]
#[case::zero_width(0, 0, 0, 1)]
#[case::too_wide(25, 0, 0, 1)]
fn rejects_address_width(
    #[case] width: u32,
    #[case] offset_bits: u32,
    #[case] set_bits: u32,
    #[case] ways: usize,
) {
    assert!(matches!(
        CacheGeometry::new(width, offset_bits, set_bits, ways),
        Err(ConfigError::AddressWidth(w)) if w == width
    ));
}

#[test]
fn rejects_lines_wider_than_a_word() {
    assert!(matches!(
        CacheGeometry::new(8, 4, 0, 1),
        Err(ConfigError::LineTooWide(4))
    ));
}

#[test]
fn rejects_fields_wider_than_address() {
    assert!(matches!(
        CacheGeometry::new(8, 3, 6, 1),
        Err(ConfigError::Geometry {
            offset_bits: 3,
            set_bits: 6,
            address_width: 8
        })
    ));
}

#[test]
fn rejects_zero_ways() {
    assert!(matches!(
        CacheGeometry::new(8, 1, 1, 0),
        Err(ConfigError::NoWays)
    ));
}

#[test]
fn fields_may_fill_the_whole_address() {
    let g = CacheGeometry::new(8, 3, 5, 1).unwrap();
    assert_eq!(g.tag_bits(), 0);
    assert_eq!(g.encode_base(0, 31), 0xF8);
}

#[test]
fn line_base_aligns_down() {
    let g = CacheGeometry::new(8, 2, 1, 1).unwrap();
    assert_eq!(g.line_base(0x1B), 0x18);
    assert_eq!(g.line_base(0x11B), 0x18);
}

#[test]
fn aligned_access_is_one_segment() {
    let g = CacheGeometry::new(8, 2, 1, 1).unwrap();
    assert_eq!(
        g.segments(0x10, 4),
        vec![Segment {
            addr: 0x10,
            shift: 0,
            count: 4
        }]
    );
}

#[test]
fn unaligned_access_splits_at_line_boundaries() {
    let g = CacheGeometry::new(8, 1, 2, 1).unwrap();
    assert_eq!(
        g.segments(0x11, 4),
        vec![
            Segment {
                addr: 0x11,
                shift: 0,
                count: 1
            },
            Segment {
                addr: 0x12,
                shift: 1,
                count: 2
            },
            Segment {
                addr: 0x14,
                shift: 3,
                count: 1
            },
        ]
    );
}

#[test]
fn access_at_top_of_address_space_wraps() {
    let g = CacheGeometry::new(8, 2, 0, 1).unwrap();
    assert_eq!(
        g.segments(0xFE, 4),
        vec![
            Segment {
                addr: 0xFE,
                shift: 0,
                count: 2
            },
            Segment {
                addr: 0x00,
                shift: 2,
                count: 2
            },
        ]
    );
}

#[test]
fn single_byte_lines_give_one_segment_per_byte() {
    let g = CacheGeometry::new(8, 0, 0, 1).unwrap();
    let segments = g.segments(0xFF, 2);
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[1].addr, 0x00);
}
