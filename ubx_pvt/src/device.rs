//! Command/response exchanges with the receiver.
//!
//! The link is half-duplex in practice: a command is written, then the
//! answer is read before anything else is sent. Periodic output that arrives
//! in between (NAV-PVT once enabled) is skipped.

use crate::{
    error::{Error, Result},
    parser::next_frame,
    transport::Transceiver,
    ubx_packets::{
        commands::{RatePreset, CFG_MSG_NAV_PVT_SPI_ON, CFG_PRT_SPI_UBX_ONLY, POLL_CFG_RATE},
        decode_frame, AckCorrelation, AckResult, CfgMsg, CfgMsgAllPortsBuilder, CfgRate, Decoded,
        IoPort, NavPvt, UbxPacket, UbxPacketMeta, UbxPacketRequest,
    },
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Frames to look at while waiting for an acknowledgment or poll response
    pub ack_max_frames: usize,
    /// Extra attempts for a configuration command that was not acknowledged
    pub command_retries: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            ack_max_frames: 16,
            command_retries: 2,
        }
    }
}

pub struct Device<X> {
    link: X,
    config: DeviceConfig,
}

impl<X: Transceiver> Device<X> {
    pub fn new(link: X, config: DeviceConfig) -> Self {
        Self { link, config }
    }

    pub fn link_mut(&mut self) -> &mut X {
        &mut self.link
    }

    /// Gives the link back, e.g. to hand it to the acquisition loop
    pub fn into_inner(self) -> X {
        self.link
    }

    /// Sends a complete frame and waits for its acknowledgment
    pub fn send_command(&mut self, command: &[u8]) -> Result<AckResult> {
        let (class, msg_id) = command_id(command)?;
        log::trace!("Sending class=0x{:02x} id=0x{:02x}", class, msg_id);
        self.link.send(command)?;
        self.await_ack(class, msg_id)
    }

    /// [`send_command`](Self::send_command), repeated up to `command_retries`
    /// more times while the receiver answers with anything but a matching ACK.
    /// Transport errors are returned at once.
    pub fn send_command_with_retry(&mut self, command: &[u8]) -> Result<AckResult> {
        let mut attempt = 0;
        loop {
            match self.send_command(command) {
                Err(Error::Io(e)) => return Err(Error::Io(e)),
                Err(e) if attempt < self.config.command_retries => {
                    attempt += 1;
                    log::warn!("{}, retrying ({}/{})", e, attempt, self.config.command_retries);
                },
                result => return result,
            }
        }
    }

    /// Reads frames until one acknowledgment arrives and checks it against `(class, msg_id)`
    pub fn await_ack(&mut self, class: u8, msg_id: u8) -> Result<AckResult> {
        let expected = (class, msg_id);
        for _ in 0..self.config.ack_max_frames {
            let decoded = match self.next_decoded()? {
                Some(decoded) => decoded,
                None => continue,
            };
            let ack = match decoded.packet {
                UbxPacket::Ack(ack) => ack,
                other => {
                    log::debug!("Skipping {} while waiting for ack", other.name());
                    continue;
                },
            };
            if let Some(mismatch) = decoded.size_mismatch {
                log::warn!("{}", mismatch);
                return Err(Error::AckMismatch {
                    expected,
                    got: ack.class_and_msg_id(),
                });
            }
            return match (ack.correlate(class, msg_id), ack.acknowledged) {
                (AckCorrelation::Mismatch, _) => Err(Error::AckMismatch {
                    expected,
                    got: ack.class_and_msg_id(),
                }),
                (AckCorrelation::Match, false) => Err(Error::Nack { class, msg_id }),
                (AckCorrelation::Match, true) => Ok(ack),
            };
        }
        Err(Error::UnexpectedPacket {
            waiting_for: expected,
            skipped: self.config.ack_max_frames,
        })
    }

    /// Sends a poll and returns the first frame of type `(class, msg_id)`.
    ///
    /// No acknowledgment is awaited; one that follows the response is left on
    /// the link.
    pub fn poll(&mut self, request: &[u8]) -> Result<Decoded> {
        let (class, msg_id) = command_id(request)?;
        self.link.send(request)?;
        for _ in 0..self.config.ack_max_frames {
            let decoded = match self.next_decoded()? {
                Some(decoded) => decoded,
                None => continue,
            };
            if decoded.packet.class_and_msg_id() == (class, msg_id) {
                if let Some(mismatch) = decoded.size_mismatch {
                    log::warn!("{}", mismatch);
                }
                return Ok(decoded);
            }
            log::debug!("Skipping {} while waiting for poll response", decoded.packet.name());
        }
        Err(Error::UnexpectedPacket {
            waiting_for: (class, msg_id),
            skipped: self.config.ack_max_frames,
        })
    }

    /// Current measurement and navigation rate
    pub fn poll_rate(&mut self) -> Result<CfgRate> {
        match self.poll(&POLL_CFG_RATE)?.packet {
            UbxPacket::CfgRate(rate) => Ok(rate),
            other => Err(unexpected(&other)),
        }
    }

    /// Output rates of message `T` on every port
    pub fn poll_msg_rate<T: UbxPacketMeta>(&mut self) -> Result<CfgMsg> {
        match self.poll(&UbxPacketRequest::request_msg_rate_for::<T>())?.packet {
            UbxPacket::CfgMsg(msg) => Ok(msg),
            other => Err(unexpected(&other)),
        }
    }

    /// Selects `rate` and routes NAV-PVT to `port` only, the port this link
    /// is attached to. On SPI the port is first restricted to UBX.
    ///
    /// Each command is acknowledged before the next is sent.
    pub fn configure(&mut self, rate: RatePreset, port: IoPort) -> Result<()> {
        if port == IoPort::Spi {
            log::info!("Restricting SPI to UBX");
            self.send_command_with_retry(&CFG_PRT_SPI_UBX_ONLY)?;
        }
        log::info!("Setting navigation rate");
        self.send_command_with_retry(rate.command())?;

        log::info!("Enabling NAV-PVT on {:?}", port);
        let enable = match port {
            IoPort::Spi => CFG_MSG_NAV_PVT_SPI_ON,
            port => CfgMsgAllPortsBuilder::enable_only_on::<NavPvt>(port).into_packet_bytes(),
        };
        self.send_command_with_retry(&enable)?;
        Ok(())
    }

    /// Next checksum-valid frame, decoded. Framing and checksum errors are
    /// logged and yield `None`; transport errors are returned.
    fn next_decoded(&mut self) -> Result<Option<Decoded>> {
        match next_frame(&mut self.link, None) {
            Ok(frame) => Ok(Some(decode_frame(&frame))),
            Err(Error::Parser(e)) => {
                log::warn!("Dropping frame: {}", e);
                Ok(None)
            },
            Err(e) => Err(e),
        }
    }
}

fn command_id(command: &[u8]) -> Result<(u8, u8)> {
    match command {
        [_, _, class, msg_id, ..] if command.len() >= crate::constants::UBX_FRAME_OVERHEAD => {
            Ok((*class, *msg_id))
        },
        _ => Err(io::Error::new(io::ErrorKind::InvalidInput, "command is not a UBX frame").into()),
    }
}

fn unexpected(packet: &UbxPacket) -> Error {
    Error::UnexpectedPacket {
        waiting_for: packet.class_and_msg_id(),
        skipped: 0,
    }
}
