//! End-to-end scenarios on an 8-bit address space.
//!
//! Each test replays a short request sequence through the packet interface and
//! checks responses, line state, and the exact downstream traffic.

use cachebus_core::common::AccessSize;
use cachebus_core::protocol::{RequestPacket, ResponsePacket, Scope};
use pretty_assertions::assert_eq;

use crate::common::harness::TestContext;

/// 1 way, 1 set, 2-byte lines.
fn direct_mapped() -> TestContext {
    TestContext::new(1, 0, 1)
}

#[test]
fn read_miss_then_hit() {
    let mut ctx = direct_mapped();

    assert_eq!(ctx.read(0x1A, AccessSize::Byte), 0);
    assert_eq!(
        ctx.requests(),
        vec![RequestPacket::Read {
            addr: 0x1A,
            size: AccessSize::Half
        }]
    );
    let line = ctx.line(0x1A).unwrap();
    assert!(line.valid && !line.dirty);
    assert_eq!(line.tag, 0x0D);

    ctx.clear_requests();
    assert_eq!(ctx.read(0x1A, AccessSize::Byte), 0);
    assert!(ctx.requests().is_empty());
    assert_eq!(ctx.cache.stats().hits, 1);
    assert_eq!(ctx.cache.stats().misses, 1);
}

#[test]
fn dirty_eviction_writes_back_before_fetch() {
    let mut ctx = direct_mapped();
    let _ = ctx.read(0x1A, AccessSize::Byte);

    ctx.write(0x1A, AccessSize::Byte, 0x12);
    assert!(ctx.line(0x1A).unwrap().dirty);
    ctx.clear_requests();

    ctx.write(0x08, AccessSize::Byte, 0x34);
    assert_eq!(
        ctx.requests(),
        vec![
            RequestPacket::Write {
                addr: 0x1A,
                size: AccessSize::Half,
                value: 0x12
            },
            RequestPacket::Read {
                addr: 0x08,
                size: AccessSize::Half
            },
        ]
    );
    assert_eq!(ctx.mem_byte(0x1A), 0x12);
    assert!(ctx.line(0x1A).is_none());
    assert_eq!(ctx.line(0x08).unwrap().data, 0x34);
}

#[test]
fn invalidate_then_read_misses_again() {
    let mut ctx = direct_mapped();
    let _ = ctx.read(0x1A, AccessSize::Byte);
    ctx.clear_requests();

    assert_eq!(
        ctx.send(RequestPacket::Inval {
            scope: Scope::Address(0x1A)
        }),
        ResponsePacket::Inval { success: true }
    );
    assert!(ctx.requests().is_empty());

    let _ = ctx.read(0x1A, AccessSize::Byte);
    assert_eq!(ctx.requests().len(), 1);
    assert_eq!(ctx.cache.stats().misses, 2);
}

#[test]
fn masked_line_write_then_clean() {
    let mut ctx = TestContext::new(2, 0, 1);
    ctx.preload(0x10, &[0xDD, 0xCC, 0xBB, 0xAA]);
    let _ = ctx.read(0x10, AccessSize::Word);
    ctx.clear_requests();

    assert_eq!(
        ctx.send(RequestPacket::LineWrite {
            addr: 0x10,
            line_size: 4,
            data: 0xFF,
            write_mask: 0b0001
        }),
        ResponsePacket::LineWrite { success: true }
    );
    assert!(ctx.requests().is_empty());
    let line = ctx.line(0x10).unwrap();
    assert_eq!(line.data, 0xAABB_CCFF);
    assert!(line.dirty);

    assert_eq!(
        ctx.send(RequestPacket::Clean {
            scope: Scope::Address(0x10)
        }),
        ResponsePacket::Clean { success: true }
    );
    assert_eq!(ctx.mem_bytes(0x10, 4), vec![0xFF, 0xCC, 0xBB, 0xAA]);
    assert!(!ctx.line(0x10).unwrap().dirty);
}
