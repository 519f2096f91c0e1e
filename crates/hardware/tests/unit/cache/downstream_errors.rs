//! Downstream failures and protocol mismatches, driven by a scripted slave.

use cachebus_core::cache::policies::LruPolicy;
use cachebus_core::cache::CacheController;
use cachebus_core::common::{AccessSize, BusError};
use cachebus_core::protocol::{PacketKind, RequestPacket, ResponsePacket, Scope};
use cachebus_core::soc::Bus;
use mockall::Sequence;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;

use crate::common::harness::geometry;
use crate::common::mocks::scripted::{MockResponder, ScriptedSlave};

/// Direct-mapped, 2-byte lines, over the scripted responder.
fn cache_over(responder: MockResponder) -> CacheController {
    let downstream = Bus::with_slave(
        "L1 bus",
        Box::new(ScriptedSlave::new("scripted", responder)),
    );
    CacheController::new("L1", geometry(1, 0, 1), Box::new(LruPolicy::new()), downstream)
}

#[test]
fn wrong_reply_kind_to_fetch_is_a_protocol_mismatch() {
    let mut responder = MockResponder::new();
    let _ = responder
        .expect_respond()
        .times(1)
        .returning(|_| Ok(ResponsePacket::Write { success: true }));
    let mut cache = cache_over(responder);

    assert_eq!(
        cache.read(0x10, AccessSize::Byte),
        Err(BusError::ProtocolMismatch {
            expected: PacketKind::Read,
            got: PacketKind::Write
        })
    );
    assert!(cache.resident_line(0x10).is_none());
}

#[test]
fn rejected_writeback_is_reported() {
    let mut responder = MockResponder::new();
    let _ = responder
        .expect_respond()
        .returning(|_| Ok(ResponsePacket::Write { success: false }));
    let mut cache = cache_over(responder);

    cache.zero(0x10).unwrap();
    assert_eq!(
        cache.clean(Scope::Address(0x10)),
        Err(BusError::WritebackRejected { addr: 0x10 })
    );
    assert!(cache.resident_line(0x10).unwrap().dirty);
    assert_eq!(cache.stats().writebacks, 0);
}

#[test]
fn wrong_reply_kind_to_writeback_is_a_protocol_mismatch() {
    let mut responder = MockResponder::new();
    let _ = responder
        .expect_respond()
        .returning(|_| Ok(ResponsePacket::Read { value: 0 }));
    let mut cache = cache_over(responder);

    cache.zero(0x10).unwrap();
    assert_eq!(
        cache.flush(Scope::Global),
        Err(BusError::ProtocolMismatch {
            expected: PacketKind::Write,
            got: PacketKind::Read
        })
    );
    assert!(cache.resident_line(0x10).is_some());
}

#[test]
fn victim_writeback_precedes_fetch() {
    let mut seq = Sequence::new();
    let mut responder = MockResponder::new();
    let _ = responder
        .expect_respond()
        .with(eq(RequestPacket::Write {
            addr: 0x10,
            size: AccessSize::Half,
            value: 0,
        }))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(ResponsePacket::Write { success: true }));
    let _ = responder
        .expect_respond()
        .with(eq(RequestPacket::Read {
            addr: 0x20,
            size: AccessSize::Half,
        }))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(ResponsePacket::Read { value: 0xBEEF }));
    let mut cache = cache_over(responder);

    cache.zero(0x10).unwrap();
    assert_eq!(cache.read(0x21, AccessSize::Byte), Ok(0xBE));
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn fetched_value_is_truncated_to_line() {
    let mut responder = MockResponder::new();
    let _ = responder
        .expect_respond()
        .returning(|_| Ok(ResponsePacket::Read { value: u64::MAX }));
    let mut cache = cache_over(responder);

    assert_eq!(cache.line_read(0x10, 2), Ok(0xFFFF));
}

#[test]
fn downstream_error_propagates_unchanged() {
    let mut responder = MockResponder::new();
    let _ = responder.expect_respond().returning(|request| {
        Err(BusError::Unsupported {
            slave: "scripted".into(),
            kind: request.kind(),
        })
    });
    let mut cache = cache_over(responder);

    assert_eq!(
        cache.prefetch(0x10),
        Err(BusError::Unsupported {
            slave: "scripted".into(),
            kind: PacketKind::Read
        })
    );
}

#[test]
fn unconnected_downstream_bus_reports_no_slave() {
    let mut cache = CacheController::new(
        "L1",
        geometry(1, 0, 1),
        Box::new(LruPolicy::new()),
        Bus::new("L1 bus"),
    );
    assert_eq!(
        cache.read(0x10, AccessSize::Byte),
        Err(BusError::NoSlave {
            bus: "L1 bus".into()
        })
    );

    // Zeroing a line needs no downstream traffic.
    cache.zero(0x10).unwrap();
    assert_eq!(cache.read(0x10, AccessSize::Byte), Ok(0));
}
