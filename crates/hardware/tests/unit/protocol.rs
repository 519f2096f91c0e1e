//! # Protocol Tests
//!
//! Packet kinds, display forms, serialization, and the payload envelope.

use cachebus_core::common::AccessSize;
use cachebus_core::protocol::{PacketKind, Payload, RequestPacket, ResponsePacket, Scope};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case(RequestPacket::Read { addr: 0x1a, size: AccessSize::Byte }, "read 0x1a 0")]
#[case(RequestPacket::Write { addr: 0x1a, size: AccessSize::Half, value: 0x12 }, "write 0x1a 1 0x12")]
#[case(RequestPacket::Inval { scope: Scope::Global }, "inval global")]
#[case(RequestPacket::Clean { scope: Scope::Address(0x8) }, "clean 0x08")]
#[case(RequestPacket::Zero { addr: 0x20 }, "zero 0x20")]
#[case(RequestPacket::LineRead { addr: 0x10, line_size: 4 }, "line_read 0x10 4")]
#[case(
    RequestPacket::LineWrite { addr: 0x10, line_size: 4, data: 0xff, write_mask: 1 },
    "line_write 0x10 4 0xff 0b1"
)]
fn request_display(#[case] packet: RequestPacket, #[case] expected: &str) {
    assert_eq!(packet.to_string(), expected);
}

#[rstest]
#[case(ResponsePacket::Read { value: 0x12 }, "read -> 0x12")]
#[case(ResponsePacket::LineRead { data: 0xaabb }, "line_read -> 0xaabb")]
#[case(ResponsePacket::Flush { success: true }, "flush -> ok")]
#[case(ResponsePacket::Inval { success: false }, "inval -> miss")]
fn response_display(#[case] packet: ResponsePacket, #[case] expected: &str) {
    assert_eq!(packet.to_string(), expected);
}

#[test]
fn request_addresses() {
    assert_eq!(RequestPacket::Prefetch { addr: 3 }.addr(), Some(3));
    assert_eq!(
        RequestPacket::Flush {
            scope: Scope::Address(9)
        }
        .addr(),
        Some(9)
    );
    assert_eq!(
        RequestPacket::Clean {
            scope: Scope::Global
        }
        .addr(),
        None
    );
    assert!(Scope::Global.is_global());
}

#[test]
fn completion_covers_flag_responses_only() {
    assert_eq!(ResponsePacket::completion(PacketKind::Read, true), None);
    assert_eq!(ResponsePacket::completion(PacketKind::LineRead, true), None);
    assert_eq!(
        ResponsePacket::completion(PacketKind::Zero, true),
        Some(ResponsePacket::Zero { success: true })
    );
    for kind in [
        PacketKind::Write,
        PacketKind::Inval,
        PacketKind::Clean,
        PacketKind::Flush,
        PacketKind::Prefetch,
        PacketKind::LineWrite,
    ] {
        let response = ResponsePacket::completion(kind, false).unwrap();
        assert_eq!(response.kind(), kind);
        assert!(!response.success());
    }
}

#[test]
fn packets_serialize_with_kind_tag() {
    let json = serde_json::to_value(RequestPacket::Write {
        addr: 26,
        size: AccessSize::Half,
        value: 18,
    })
    .unwrap();
    assert_eq!(json["kind"], "write");
    assert_eq!(json["addr"], 26);
    assert_eq!(json["size"], 1);
    assert_eq!(
        serde_json::from_value::<RequestPacket>(json).unwrap(),
        RequestPacket::Write {
            addr: 26,
            size: AccessSize::Half,
            value: 18,
        }
    );

    let read: RequestPacket =
        serde_json::from_str(r#"{ "kind": "read", "addr": 26, "size": 3 }"#).unwrap();
    assert_eq!(
        read,
        RequestPacket::Read {
            addr: 26,
            size: AccessSize::Double,
        }
    );
    assert!(
        serde_json::from_str::<RequestPacket>(r#"{ "kind": "read", "addr": 26, "size": 4 }"#)
            .is_err()
    );

    let parsed: ResponsePacket =
        serde_json::from_str(r#"{ "kind": "line_write", "success": true }"#).unwrap();
    assert_eq!(parsed, ResponsePacket::LineWrite { success: true });
}

#[test]
fn reply_keeps_id_and_replaces_label() {
    let request = Payload::new(5, "cpu: read", RequestPacket::Prefetch { addr: 1 });
    let reply = request.reply("L1: prefetch -> ok", ResponsePacket::Prefetch { success: true });
    assert_eq!(reply.id, 5);
    assert_eq!(reply.label, "L1: prefetch -> ok");
    assert_eq!(reply.into_packet(), ResponsePacket::Prefetch { success: true });
}
