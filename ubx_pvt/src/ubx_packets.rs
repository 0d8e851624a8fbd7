pub mod commands;
pub mod packets;

pub use packets::*;

use crate::{
    constants::{UBX_FRAME_OVERHEAD, UBX_SYNC_CHAR_1, UBX_SYNC_CHAR_2},
    error::SizeMismatch,
    parser::{checksum::UbxChecksumCalc, RawFrame},
};
use byteorder::{ByteOrder, LittleEndian};

/// Information about concrete UBX protocol's packet
pub trait UbxPacketMeta {
    const CLASS: u8;
    const ID: u8;
    /// Documented payload length
    const PAYLOAD_LEN: usize;
    const NAME: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Longitude in degrees
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
    /// Height above mean sea level in meters
    pub alt: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity {
    /// m/s over ground
    pub speed: f64,
    /// degrees
    pub heading: f64,
}

/// Little-endian field access at explicit offsets.
///
/// Bytes past the end of the payload read as zero so a short payload still
/// yields a value; bytes past the documented length are never looked at.
#[derive(Clone, Copy)]
pub(crate) struct PayloadReader<'a> {
    payload: &'a [u8],
}

impl<'a> PayloadReader<'a> {
    pub(crate) fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub(crate) fn bytes<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        if let Some(available) = self.payload.get(offset..) {
            let n = available.len().min(N);
            out[..n].copy_from_slice(&available[..n]);
        }
        out
    }

    pub(crate) fn u8(&self, offset: usize) -> u8 {
        self.payload.get(offset).copied().unwrap_or(0)
    }

    pub(crate) fn u16(&self, offset: usize) -> u16 {
        LittleEndian::read_u16(&self.bytes::<2>(offset))
    }

    pub(crate) fn i16(&self, offset: usize) -> i16 {
        LittleEndian::read_i16(&self.bytes::<2>(offset))
    }

    pub(crate) fn u32(&self, offset: usize) -> u32 {
        LittleEndian::read_u32(&self.bytes::<4>(offset))
    }

    pub(crate) fn i32(&self, offset: usize) -> i32 {
        LittleEndian::read_i32(&self.bytes::<4>(offset))
    }
}

/// Writes a complete frame (sync, header, payload, checksum) into `out`.
///
/// `out` must be exactly `payload.len() + 8` bytes long and the payload
/// must fit the 16-bit length field.
pub(crate) fn write_frame(class: u8, msg_id: u8, payload: &[u8], out: &mut [u8]) {
    debug_assert_eq!(out.len(), payload.len() + UBX_FRAME_OVERHEAD);
    let len = u16::try_from(payload.len());
    debug_assert!(len.is_ok(), "payload of {} bytes overflows the length field", payload.len());
    out[0] = UBX_SYNC_CHAR_1;
    out[1] = UBX_SYNC_CHAR_2;
    out[2] = class;
    out[3] = msg_id;
    LittleEndian::write_u16(&mut out[4..6], len.unwrap_or(u16::MAX));
    out[6..6 + payload.len()].copy_from_slice(payload);

    let mut calc = UbxChecksumCalc::new();
    calc.update(&out[2..6 + payload.len()]);
    let (ck_a, ck_b) = calc.result();
    out[6 + payload.len()] = ck_a;
    out[7 + payload.len()] = ck_b;
}

/// Any outbound frame, for messages without a dedicated builder
#[derive(Debug, Clone, Copy)]
pub struct UbxFrame<'a> {
    pub class: u8,
    pub msg_id: u8,
    /// At most `u16::MAX` bytes; the receiver accepts far less
    pub payload: &'a [u8],
}

impl UbxFrame<'_> {
    pub fn into_packet_bytes(self) -> Vec<u8> {
        let mut out = vec![0u8; self.payload.len() + UBX_FRAME_OVERHEAD];
        write_frame(self.class, self.msg_id, self.payload, &mut out);
        out
    }
}

/// Decoded UBX packet
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UbxPacket {
    NavPvt(NavPvt),
    CfgRate(CfgRate),
    CfgMsg(CfgMsg),
    Ack(AckResult),
    /// Valid frame of a type this crate does not decode
    Unknown { class: u8, msg_id: u8, len: usize },
}

impl UbxPacket {
    /// Class and id of the frame itself; for an acknowledgment this is
    /// ACK-ACK or ACK-NAK, not the command it refers to
    pub fn class_and_msg_id(&self) -> (u8, u8) {
        match self {
            UbxPacket::NavPvt(_) => (NavPvt::CLASS, NavPvt::ID),
            UbxPacket::CfgRate(_) => (CfgRate::CLASS, CfgRate::ID),
            UbxPacket::CfgMsg(_) => (CfgMsg::CLASS, CfgMsg::ID),
            UbxPacket::Ack(ack) if ack.acknowledged => (AckAck::CLASS, AckAck::ID),
            UbxPacket::Ack(_) => (AckNak::CLASS, AckNak::ID),
            UbxPacket::Unknown { class, msg_id, .. } => (*class, *msg_id),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UbxPacket::NavPvt(_) => NavPvt::NAME,
            UbxPacket::CfgRate(_) => CfgRate::NAME,
            UbxPacket::CfgMsg(_) => CfgMsg::NAME,
            UbxPacket::Ack(ack) if ack.acknowledged => AckAck::NAME,
            UbxPacket::Ack(_) => AckNak::NAME,
            UbxPacket::Unknown { .. } => "unknown",
        }
    }
}

/// Result of decoding one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub packet: UbxPacket,
    /// Set when a known packet did not have its documented length; the
    /// packet was still decoded from whatever bytes were present.
    pub size_mismatch: Option<SizeMismatch>,
}

impl Decoded {
    fn check<T: UbxPacketMeta>(payload: &[u8], packet: UbxPacket) -> Self {
        let size_mismatch = (payload.len() != T::PAYLOAD_LEN).then_some(SizeMismatch {
            packet: T::NAME,
            expect: T::PAYLOAD_LEN,
            got: payload.len(),
        });
        Self {
            packet,
            size_mismatch,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.size_mismatch.is_none()
    }
}

/// Maps `(class, id)` to its decoder. Each pair has exactly one decoder.
pub fn decode(class: u8, msg_id: u8, payload: &[u8]) -> Decoded {
    match (class, msg_id) {
        (NavPvt::CLASS, NavPvt::ID) => {
            Decoded::check::<NavPvt>(payload, UbxPacket::NavPvt(NavPvt::from_payload(payload)))
        },
        (CfgRate::CLASS, CfgRate::ID) => {
            Decoded::check::<CfgRate>(payload, UbxPacket::CfgRate(CfgRate::from_payload(payload)))
        },
        (CfgMsg::CLASS, CfgMsg::ID) => {
            Decoded::check::<CfgMsg>(payload, UbxPacket::CfgMsg(CfgMsg::from_payload(payload)))
        },
        (AckAck::CLASS, AckAck::ID) => Decoded::check::<AckAck>(
            payload,
            UbxPacket::Ack(AckResult::from_payload(true, payload)),
        ),
        (AckNak::CLASS, AckNak::ID) => Decoded::check::<AckNak>(
            payload,
            UbxPacket::Ack(AckResult::from_payload(false, payload)),
        ),
        _ => Decoded {
            packet: UbxPacket::Unknown {
                class,
                msg_id,
                len: payload.len(),
            },
            size_mismatch: None,
        },
    }
}

/// Decodes a frame whose checksum has already been validated
pub fn decode_frame(frame: &RawFrame) -> Decoded {
    decode(frame.class, frame.msg_id, &frame.payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_zero_fills_past_the_end() {
        let payload = [0x01, 0x02, 0x03];
        let r = PayloadReader::new(&payload);
        assert_eq!(r.u16(0), 0x0201);
        assert_eq!(r.u32(0), 0x0003_0201);
        assert_eq!(r.u32(8), 0);
        assert_eq!(r.u8(3), 0);
        assert_eq!(r.i16(2), 0x0003);
    }

    #[test]
    fn reader_sign_extends() {
        let payload = [0xff, 0xff, 0xff, 0xff];
        let r = PayloadReader::new(&payload);
        assert_eq!(r.i32(0), -1);
        assert_eq!(r.i16(2), -1);
    }

    #[test]
    fn generic_frame_matches_known_poll() {
        let bytes = UbxFrame {
            class: 0x06,
            msg_id: 0x08,
            payload: &[],
        }
        .into_packet_bytes();
        assert_eq!(bytes, [0xb5, 0x62, 0x06, 0x08, 0x00, 0x00, 0x0e, 0x30]);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "overflows the length field")]
    fn oversized_outbound_payload_is_caught() {
        let payload = vec![0u8; 0x1_0000];
        UbxFrame {
            class: 0x06,
            msg_id: 0x08,
            payload: &payload,
        }
        .into_packet_bytes();
    }

    #[test]
    fn unknown_packets_are_not_errors() {
        let decoded = decode(0x0a, 0x04, &[0u8; 40]);
        assert_eq!(
            decoded.packet,
            UbxPacket::Unknown {
                class: 0x0a,
                msg_id: 0x04,
                len: 40
            }
        );
        assert!(decoded.is_well_formed());
        assert_eq!(decoded.packet.class_and_msg_id(), (0x0a, 0x04));
    }

    #[test]
    fn cfg_rate_and_cfg_msg_use_their_own_decoders() {
        let rate = decode(0x06, 0x08, &[0xe8, 0x03, 0x01, 0x00, 0x01, 0x00]);
        assert!(matches!(rate.packet, UbxPacket::CfgRate(_)));
        assert!(rate.is_well_formed());

        // A CFG-RATE sized payload arriving as CFG-MSG is decoded as CFG-MSG and flagged
        let msg = decode(0x06, 0x01, &[0xe8, 0x03, 0x01, 0x00, 0x01, 0x00]);
        assert!(matches!(msg.packet, UbxPacket::CfgMsg(_)));
        assert_eq!(
            msg.size_mismatch,
            Some(SizeMismatch {
                packet: "CFG-MSG",
                expect: 8,
                got: 6
            })
        );
    }

    #[test]
    fn ack_and_nak_share_a_record() {
        let ack = decode(0x05, 0x01, &[0x06, 0x01]);
        let nak = decode(0x05, 0x00, &[0x06, 0x01]);
        assert_eq!(
            ack.packet,
            UbxPacket::Ack(AckResult {
                acknowledged: true,
                class: 0x06,
                msg_id: 0x01
            })
        );
        assert_eq!(
            nak.packet,
            UbxPacket::Ack(AckResult {
                acknowledged: false,
                class: 0x06,
                msg_id: 0x01
            })
        );
        assert_eq!(ack.packet.name(), "ACK-ACK");
        assert_eq!(nak.packet.name(), "ACK-NAK");
        assert_eq!(ack.packet.class_and_msg_id(), (0x05, 0x01));
        assert_eq!(nak.packet.class_and_msg_id(), (0x05, 0x00));
    }

    #[test]
    fn short_ack_is_flagged() {
        let ack = decode(0x05, 0x01, &[0x06]);
        assert!(!ack.is_well_formed());
        assert_eq!(
            ack.packet,
            UbxPacket::Ack(AckResult {
                acknowledged: true,
                class: 0x06,
                msg_id: 0x00
            })
        );
    }
}
