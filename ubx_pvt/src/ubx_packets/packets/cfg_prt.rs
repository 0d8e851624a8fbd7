use crate::{
    constants::{CFG_PRT_ID, CLASS_CFG, UBX_FRAME_OVERHEAD},
    ubx_packets::{write_frame, UbxPacketMeta},
};
use bitflags::bitflags;
use byteorder::{ByteOrder, LittleEndian};

/// Port configuration (CFG-PRT), used here only to restrict the SPI port
pub struct CfgPrt;

impl UbxPacketMeta for CfgPrt {
    const CLASS: u8 = CLASS_CFG;
    const ID: u8 = CFG_PRT_ID;
    const PAYLOAD_LEN: usize = 20;
    const NAME: &'static str = "CFG-PRT";
}

bitflags! {
    /// A mask describing which input protocols are active
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct InProtoMask: u16 {
        const UBLOX = 1;
        const NMEA = 2;
        const RTCM = 4;
        const RTCM3 = 0x20;
    }
}

bitflags! {
    /// A mask describing which output protocols are active
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct OutProtoMask: u16 {
        const UBLOX = 1;
        const NMEA = 2;
        const RTCM3 = 0x20;
    }
}

/// SPI `mode` word: clock polarity/phase in bits 1..2, the number of idle
/// `0xFF` bytes that ends a transfer in bits 8..13
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiPortMode(u32);

impl SpiPortMode {
    const SPI_MODE_SHIFT: u32 = 1;
    const SPI_MODE_MASK: u32 = 0b11;
    const FF_COUNT_SHIFT: u32 = 8;
    const FF_COUNT_MASK: u32 = 0x3f;

    pub const fn new(spi_mode: u8, ff_count: u8) -> Self {
        Self(
            ((spi_mode as u32 & Self::SPI_MODE_MASK) << Self::SPI_MODE_SHIFT)
                | ((ff_count as u32 & Self::FF_COUNT_MASK) << Self::FF_COUNT_SHIFT),
        )
    }

    pub const fn spi_mode(self) -> u8 {
        ((self.0 >> Self::SPI_MODE_SHIFT) & Self::SPI_MODE_MASK) as u8
    }

    pub const fn ff_count(self) -> u8 {
        ((self.0 >> Self::FF_COUNT_SHIFT) & Self::FF_COUNT_MASK) as u8
    }

    pub const fn into_raw(self) -> u32 {
        self.0
    }
}

impl Default for SpiPortMode {
    fn default() -> Self {
        Self::new(0, 50)
    }
}

/// Builds CFG-PRT for the SPI port (port id 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgPrtSpiBuilder {
    pub tx_ready: u16,
    pub mode: SpiPortMode,
    pub in_proto_mask: InProtoMask,
    pub out_proto_mask: OutProtoMask,
    pub flags: u16,
}

impl Default for CfgPrtSpiBuilder {
    fn default() -> Self {
        Self::ubx_only()
    }
}

impl CfgPrtSpiBuilder {
    pub const PACKET_LEN: usize = CfgPrt::PAYLOAD_LEN + UBX_FRAME_OVERHEAD;
    pub const SPI_PORT_ID: u8 = 4;

    /// UBX in and out, NMEA and RTCM disabled, SPI mode 0, 50 idle bytes
    pub fn ubx_only() -> Self {
        Self {
            tx_ready: 0,
            mode: SpiPortMode::default(),
            in_proto_mask: InProtoMask::UBLOX,
            out_proto_mask: OutProtoMask::UBLOX,
            flags: 0,
        }
    }

    #[inline]
    pub fn into_packet_bytes(self) -> [u8; Self::PACKET_LEN] {
        let mut payload = [0u8; CfgPrt::PAYLOAD_LEN];
        payload[0] = Self::SPI_PORT_ID;
        LittleEndian::write_u16(&mut payload[2..4], self.tx_ready);
        LittleEndian::write_u32(&mut payload[4..8], self.mode.into_raw());
        LittleEndian::write_u16(&mut payload[12..14], self.in_proto_mask.bits());
        LittleEndian::write_u16(&mut payload[14..16], self.out_proto_mask.bits());
        LittleEndian::write_u16(&mut payload[16..18], self.flags);

        let mut ret = [0u8; Self::PACKET_LEN];
        write_frame(CfgPrt::CLASS, CfgPrt::ID, &payload, &mut ret);
        ret
    }
}
