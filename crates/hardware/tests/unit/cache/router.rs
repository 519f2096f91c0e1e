//! Request router tests: every request kind is answered with the response of the
//! same kind, and labels carry the hit/miss outcome.

use cachebus_core::common::{AccessSize, BusError};
use cachebus_core::protocol::{Payload, RequestPacket, ResponsePacket, Scope};
use cachebus_core::soc::BusSlave;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::TestContext;

#[rstest]
#[case::read(RequestPacket::Read { addr: 0x10, size: AccessSize::Byte })]
#[case::write(RequestPacket::Write { addr: 0x10, size: AccessSize::Byte, value: 1 })]
#[case::inval(RequestPacket::Inval { scope: Scope::Global })]
#[case::clean(RequestPacket::Clean { scope: Scope::Address(0x10) })]
#[case::flush(RequestPacket::Flush { scope: Scope::Global })]
#[case::zero(RequestPacket::Zero { addr: 0x10 })]
#[case::prefetch(RequestPacket::Prefetch { addr: 0x10 })]
#[case::line_read(RequestPacket::LineRead { addr: 0x10, line_size: 4 })]
#[case::line_write(RequestPacket::LineWrite { addr: 0x10, line_size: 4, data: 0, write_mask: 0xF })]
fn response_kind_matches_request(#[case] request: RequestPacket) {
    let mut ctx = TestContext::new(2, 1, 2);
    let response = ctx.send(request);
    assert_eq!(response.kind(), request.kind());
}

#[test]
fn reply_keeps_transaction_id() {
    let mut ctx = TestContext::new(1, 0, 1);
    let reply = ctx
        .cache
        .handle(Payload::new(
            42,
            "cpu",
            RequestPacket::Read {
                addr: 0,
                size: AccessSize::Byte,
            },
        ))
        .unwrap();
    assert_eq!(reply.id, 42);
}

#[test]
fn labels_report_hit_and_miss() {
    let mut ctx = TestContext::new(1, 0, 1);
    let read = RequestPacket::Read {
        addr: 0,
        size: AccessSize::Byte,
    };

    let first = ctx.cache.handle(Payload::new(0, "cpu", read)).unwrap();
    assert_eq!(first.label, "L1: read -> 0x0 (miss)");
    let second = ctx.cache.handle(Payload::new(1, "cpu", read)).unwrap();
    assert_eq!(second.label, "L1: read -> 0x0 (hit)");
}

#[test]
fn management_labels() {
    let mut ctx = TestContext::new(1, 0, 1);
    let label = |ctx: &mut TestContext, packet: RequestPacket| {
        ctx.cache
            .handle(Payload::new(0, "cpu", packet))
            .unwrap()
            .label
    };

    assert_eq!(
        label(&mut ctx, RequestPacket::Clean { scope: Scope::Address(0x20) }),
        "L1: clean -> miss (miss)"
    );
    let _ = ctx.read(0x20, AccessSize::Byte);
    assert_eq!(
        label(&mut ctx, RequestPacket::Clean { scope: Scope::Address(0x20) }),
        "L1: clean -> ok (hit)"
    );
    assert_eq!(
        label(&mut ctx, RequestPacket::Inval { scope: Scope::Global }),
        "L1: inval -> ok (global)"
    );
}

#[test]
fn management_miss_is_a_response_not_an_error() {
    let mut ctx = TestContext::new(1, 0, 1);
    for request in [
        RequestPacket::Inval {
            scope: Scope::Address(0x40),
        },
        RequestPacket::Clean {
            scope: Scope::Address(0x40),
        },
        RequestPacket::Flush {
            scope: Scope::Address(0x40),
        },
    ] {
        let response = ctx.send(request);
        assert!(!response.success(), "{request} should miss");
    }
    assert!(ctx.requests().is_empty());
}

#[test]
fn line_read_response_carries_data() {
    let mut ctx = TestContext::new(1, 0, 1);
    ctx.preload(0x10, &[0x34, 0x12]);
    assert_eq!(
        ctx.send(RequestPacket::LineRead {
            addr: 0x11,
            line_size: 2
        }),
        ResponsePacket::LineRead { data: 0x1234 }
    );
}

#[test]
fn errors_pass_through_unchanged() {
    let mut ctx = TestContext::new(1, 0, 1);
    assert_eq!(
        ctx.try_send(RequestPacket::LineWrite {
            addr: 0,
            line_size: 16,
            data: 0,
            write_mask: 0
        }),
        Err(BusError::InvalidLineSize(16))
    );
}

#[test]
fn controller_downcasts_as_cache() {
    let ctx = TestContext::new(1, 0, 1);
    let slave: &dyn BusSlave = &ctx.cache;
    assert_eq!(slave.name(), "L1");
    assert!(slave.as_cache().is_some());
    assert!(slave.as_memory().is_none());
}
