pub mod ack;
pub mod cfg_msg;
pub mod cfg_prt;
pub mod cfg_rate;
pub mod nav_pvt;

pub use ack::{AckAck, AckCorrelation, AckNak, AckResult};
pub use cfg_msg::{CfgMsg, CfgMsgAllPortsBuilder, IoPort};
pub use cfg_prt::{CfgPrt, CfgPrtSpiBuilder, InProtoMask, OutProtoMask, SpiPortMode};
pub use cfg_rate::{AlignmentToReferenceTime, CfgRate, CfgRateBuilder};
pub use nav_pvt::{
    CarrierPhaseSolution, GnssFixType, NavPvt, NavPvtFlags, NavPvtFlags2, NavPvtFlags3,
    NavPvtValidFlags,
};

use super::{write_frame, UbxPacketMeta};

/// Poll request: a frame of the polled type with an empty payload
pub struct UbxPacketRequest;

impl UbxPacketRequest {
    pub const PACKET_LEN: usize = 8;

    #[inline]
    pub fn request_for<T: UbxPacketMeta>() -> [u8; Self::PACKET_LEN] {
        let mut ret = [0u8; Self::PACKET_LEN];
        write_frame(T::CLASS, T::ID, &[], &mut ret);
        ret
    }

    /// Asks for the output rate configuration of message `T` (CFG-MSG poll)
    #[inline]
    pub fn request_msg_rate_for<T: UbxPacketMeta>() -> [u8; Self::PACKET_LEN + 2] {
        let mut ret = [0u8; Self::PACKET_LEN + 2];
        write_frame(CfgMsg::CLASS, CfgMsg::ID, &[T::CLASS, T::ID], &mut ret);
        ret
    }
}
