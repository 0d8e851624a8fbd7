use crate::{
    constants::{ACK_ACK_ID, ACK_NAK_ID, CLASS_ACK},
    ubx_packets::{PayloadReader, UbxPacketMeta},
};

/// Message acknowledged
pub struct AckAck;

impl UbxPacketMeta for AckAck {
    const CLASS: u8 = CLASS_ACK;
    const ID: u8 = ACK_ACK_ID;
    const PAYLOAD_LEN: usize = 2;
    const NAME: &'static str = "ACK-ACK";
}

/// Message not-acknowledged
pub struct AckNak;

impl UbxPacketMeta for AckNak {
    const CLASS: u8 = CLASS_ACK;
    const ID: u8 = ACK_NAK_ID;
    const PAYLOAD_LEN: usize = 2;
    const NAME: &'static str = "ACK-NAK";
}

/// ACK-ACK or ACK-NAK, both carry the class and id of the command they answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AckResult {
    /// `true` for ACK-ACK, `false` for ACK-NAK
    pub acknowledged: bool,
    /// Class ID of the acknowledged message
    pub class: u8,
    /// Message ID of the acknowledged message
    pub msg_id: u8,
}

/// How an acknowledgment relates to the command it was awaited for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckCorrelation {
    Match,
    Mismatch,
}

impl AckResult {
    pub fn from_payload(acknowledged: bool, payload: &[u8]) -> Self {
        let r = PayloadReader::new(payload);
        Self {
            acknowledged,
            class: r.u8(0),
            msg_id: r.u8(1),
        }
    }

    pub fn class_and_msg_id(&self) -> (u8, u8) {
        (self.class, self.msg_id)
    }

    /// Does this acknowledgment reference `(class, msg_id)`
    pub fn correlate(&self, class: u8, msg_id: u8) -> AckCorrelation {
        if self.class == class && self.msg_id == msg_id {
            AckCorrelation::Match
        } else {
            AckCorrelation::Mismatch
        }
    }

    pub fn is_ack_for<T: UbxPacketMeta>(&self) -> bool {
        self.correlate(T::CLASS, T::ID) == AckCorrelation::Match
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ubx_packets::{CfgMsg, CfgRate};

    #[test]
    fn ack_for_the_sent_command_matches() {
        let ack = AckResult::from_payload(true, &[0x06, 0x01]);
        assert_eq!(ack.correlate(0x06, 0x01), AckCorrelation::Match);
        assert!(ack.is_ack_for::<CfgMsg>());
    }

    #[test]
    fn ack_for_another_command_is_a_mismatch() {
        let ack = AckResult::from_payload(true, &[0x06, 0x08]);
        assert_eq!(ack.correlate(0x06, 0x01), AckCorrelation::Mismatch);
        assert!(ack.is_ack_for::<CfgRate>());
        assert!(!ack.is_ack_for::<CfgMsg>());
    }

    #[test]
    fn nak_keeps_the_referenced_command() {
        let nak = AckResult::from_payload(false, &[0x06, 0x08, 0xaa]);
        assert!(!nak.acknowledged);
        assert_eq!(nak.class_and_msg_id(), (0x06, 0x08));
    }
}
