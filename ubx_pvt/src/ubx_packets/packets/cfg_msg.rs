use crate::{
    constants::{CFG_MSG_ID, CLASS_CFG, UBX_FRAME_OVERHEAD},
    ubx_packets::{write_frame, PayloadReader, UbxPacketMeta},
};

/// I/O target of the receiver, in the order CFG-MSG lists them
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IoPort {
    Ddc = 0,
    Uart1 = 1,
    Uart2 = 2,
    Usb = 3,
    Spi = 4,
    Reserved = 5,
}

impl IoPort {
    pub const ALL: [IoPort; 6] = [
        IoPort::Ddc,
        IoPort::Uart1,
        IoPort::Uart2,
        IoPort::Usb,
        IoPort::Spi,
        IoPort::Reserved,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Set Message Rate the current port
///
/// Also the poll response: the receiver answers a poll with the rates of
/// `(msg_class, msg_id)` on all six targets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CfgMsg {
    pub msg_class: u8,
    pub msg_id: u8,
    /// Send rate on I/O Port (6 Ports)
    pub rates: [u8; 6],
}

impl UbxPacketMeta for CfgMsg {
    const CLASS: u8 = CLASS_CFG;
    const ID: u8 = CFG_MSG_ID;
    const PAYLOAD_LEN: usize = 8;
    const NAME: &'static str = "CFG-MSG";
}

impl CfgMsg {
    pub fn from_payload(payload: &[u8]) -> Self {
        let r = PayloadReader::new(payload);
        Self {
            msg_class: r.u8(0),
            msg_id: r.u8(1),
            rates: r.bytes::<6>(2),
        }
    }

    /// Output rate on `port`, in navigation solutions per message; 0 = disabled
    pub fn rate_for(&self, port: IoPort) -> u8 {
        self.rates[port.index()]
    }

    pub fn is_enabled_on(&self, port: IoPort) -> bool {
        self.rate_for(port) != 0
    }

    pub fn is_config_for<T: UbxPacketMeta>(&self) -> bool {
        self.msg_class == T::CLASS && self.msg_id == T::ID
    }
}

/// Builds a CFG-MSG command setting the rate of one message on every port
pub struct CfgMsgAllPortsBuilder {
    pub msg_class: u8,
    pub msg_id: u8,
    pub rates: [u8; 6],
}

impl CfgMsgAllPortsBuilder {
    pub const PACKET_LEN: usize = CfgMsg::PAYLOAD_LEN + UBX_FRAME_OVERHEAD;

    #[inline]
    pub fn set_rate_for<T: UbxPacketMeta>(rates: [u8; 6]) -> Self {
        Self {
            msg_class: T::CLASS,
            msg_id: T::ID,
            rates,
        }
    }

    /// Rate 1 on `port`, disabled everywhere else
    #[inline]
    pub fn enable_only_on<T: UbxPacketMeta>(port: IoPort) -> Self {
        let mut rates = [0u8; 6];
        rates[port.index()] = 1;
        Self::set_rate_for::<T>(rates)
    }

    #[inline]
    pub fn into_packet_bytes(self) -> [u8; Self::PACKET_LEN] {
        let mut payload = [0u8; CfgMsg::PAYLOAD_LEN];
        payload[0] = self.msg_class;
        payload[1] = self.msg_id;
        payload[2..].copy_from_slice(&self.rates);

        let mut ret = [0u8; Self::PACKET_LEN];
        write_frame(CfgMsg::CLASS, CfgMsg::ID, &payload, &mut ret);
        ret
    }
}
