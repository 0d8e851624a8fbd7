pub const UBX_SYNC_CHAR_1: u8 = 0xb5;
pub const UBX_SYNC_CHAR_2: u8 = 0x62;
pub(crate) const UBX_SYNC_SIZE: usize = 2;
pub(crate) const UBX_PAYLOAD_SIZE_LEN: usize = 2;
pub(crate) const UBX_CLASS_LEN: usize = 1;
pub(crate) const UBX_ID_LEN: usize = 1;
pub(crate) const UBX_HEADER_LEN: usize =
    UBX_SYNC_SIZE + UBX_PAYLOAD_SIZE_LEN + UBX_CLASS_LEN + UBX_ID_LEN;
pub(crate) const UBX_CHECKSUM_LEN: usize = 2;

/// Bytes that frame a message but carry no payload: sync, class, id, length and checksum
pub const UBX_FRAME_OVERHEAD: usize = UBX_HEADER_LEN + UBX_CHECKSUM_LEN;

/// Largest payload the receiver family emits; longer length fields are treated as noise
pub const MAX_PAYLOAD_LEN: usize = 1240;

/// Byte clocked out while reading, the link's idle value
pub const IDLE_BYTE: u8 = 0xff;

pub const CLASS_NAV: u8 = 0x01;
pub const CLASS_ACK: u8 = 0x05;
pub const CLASS_CFG: u8 = 0x06;

pub const NAV_PVT_ID: u8 = 0x07;
pub const ACK_NAK_ID: u8 = 0x00;
pub const ACK_ACK_ID: u8 = 0x01;
pub const CFG_PRT_ID: u8 = 0x00;
pub const CFG_MSG_ID: u8 = 0x01;
pub const CFG_RATE_ID: u8 = 0x08;
