use crate::{
    constants::{CFG_RATE_ID, CLASS_CFG, UBX_FRAME_OVERHEAD},
    ubx_packets::{write_frame, PayloadReader, UbxPacketMeta},
};
use byteorder::{ByteOrder, LittleEndian};
use std::time::Duration;

/// Alignment to reference time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignmentToReferenceTime {
    Utc,
    Gps,
    /// GLONASS, BeiDou, Galileo or a value newer firmware defines
    Other(u16),
}

impl AlignmentToReferenceTime {
    pub const fn into_raw(self) -> u16 {
        match self {
            AlignmentToReferenceTime::Utc => 0,
            AlignmentToReferenceTime::Gps => 1,
            AlignmentToReferenceTime::Other(raw) => raw,
        }
    }
}

impl From<u16> for AlignmentToReferenceTime {
    fn from(raw: u16) -> Self {
        match raw {
            0 => AlignmentToReferenceTime::Utc,
            1 => AlignmentToReferenceTime::Gps,
            other => AlignmentToReferenceTime::Other(other),
        }
    }
}

/// Navigation/Measurement Rate Settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CfgRate {
    /// Measurement Rate, GPS measurements are taken every `measure_rate_ms` milliseconds
    pub measure_rate_ms: u16,
    /// Navigation Rate, in number of measurement cycles.
    pub nav_rate: u16,
    /// Alignment to reference time
    pub time_ref: AlignmentToReferenceTime,
}

impl Default for CfgRate {
    fn default() -> Self {
        Self {
            measure_rate_ms: 1000,
            nav_rate: 1,
            time_ref: AlignmentToReferenceTime::Gps,
        }
    }
}

impl UbxPacketMeta for CfgRate {
    const CLASS: u8 = CLASS_CFG;
    const ID: u8 = CFG_RATE_ID;
    const PAYLOAD_LEN: usize = 6;
    const NAME: &'static str = "CFG-RATE";
}

impl CfgRate {
    pub fn from_payload(payload: &[u8]) -> Self {
        let r = PayloadReader::new(payload);
        Self {
            measure_rate_ms: r.u16(0),
            nav_rate: r.u16(2),
            time_ref: r.u16(4).into(),
        }
    }

    /// Time between two navigation solutions, `None` if either rate is zero
    pub fn solution_interval(&self) -> Option<Duration> {
        let ms = u64::from(self.measure_rate_ms) * u64::from(self.nav_rate);
        (ms != 0).then(|| Duration::from_millis(ms))
    }
}

/// Builds a CFG-RATE command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgRateBuilder {
    pub measure_rate_ms: u16,
    pub nav_rate: u16,
    pub time_ref: AlignmentToReferenceTime,
}

impl CfgRateBuilder {
    pub const PACKET_LEN: usize = CfgRate::PAYLOAD_LEN + UBX_FRAME_OVERHEAD;

    #[inline]
    pub fn into_packet_bytes(self) -> [u8; Self::PACKET_LEN] {
        let mut payload = [0u8; CfgRate::PAYLOAD_LEN];
        LittleEndian::write_u16(&mut payload[0..2], self.measure_rate_ms);
        LittleEndian::write_u16(&mut payload[2..4], self.nav_rate);
        LittleEndian::write_u16(&mut payload[4..6], self.time_ref.into_raw());

        let mut ret = [0u8; Self::PACKET_LEN];
        write_frame(CfgRate::CLASS, CfgRate::ID, &payload, &mut ret);
        ret
    }
}

impl From<CfgRate> for CfgRateBuilder {
    fn from(rate: CfgRate) -> Self {
        Self {
            measure_rate_ms: rate.measure_rate_ms,
            nav_rate: rate.nav_rate,
            time_ref: rate.time_ref,
        }
    }
}
