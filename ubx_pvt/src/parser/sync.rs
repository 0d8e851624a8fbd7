use super::checksum::UbxChecksumCalc;
use crate::{
    constants::{MAX_PAYLOAD_LEN, UBX_SYNC_CHAR_1, UBX_SYNC_CHAR_2},
    error::{Error, ParserError},
    transport::Transceiver,
};
use std::io;

/// One UBX frame as read from the link, before checksum validation and decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub class: u8,
    pub msg_id: u8,
    pub payload: Vec<u8>,
    pub ck_a: u8,
    pub ck_b: u8,
}

impl RawFrame {
    /// Payload length as carried in the length field.
    ///
    /// Frames read from the link never exceed `MAX_PAYLOAD_LEN`; a hand-built
    /// frame with a longer payload is rejected by [`validate`](Self::validate).
    pub fn len(&self) -> u16 {
        debug_assert!(self.payload.len() <= usize::from(u16::MAX));
        u16::try_from(self.payload.len()).unwrap_or(u16::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Checksum over class, id, length and payload
    pub fn compute_checksum(&self) -> (u8, u8) {
        let mut calc = UbxChecksumCalc::new();
        calc.update(&[self.class, self.msg_id]);
        calc.update(&self.len().to_le_bytes());
        calc.update(&self.payload);
        calc.result()
    }

    pub fn validate(&self) -> Result<(), ParserError> {
        if self.payload.len() > MAX_PAYLOAD_LEN {
            return Err(ParserError::OversizedPayload {
                len: self.payload.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }
        let mut calc = UbxChecksumCalc::new();
        calc.update(&[self.class, self.msg_id]);
        calc.update(&self.len().to_le_bytes());
        calc.update(&self.payload);
        calc.validate_result(self.ck_a, self.ck_b)
    }
}

/// Locates the `0xB5 0x62` frame marker in the incoming byte stream.
///
/// Reading is strictly sequential: after the marker come class, id, the
/// little-endian length, the payload and the two checksum bytes, with no
/// separators.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameSynchronizer {
    window: u16,
}

const MARKER: u16 = u16::from_be_bytes([UBX_SYNC_CHAR_1, UBX_SYNC_CHAR_2]);

impl FrameSynchronizer {
    pub const fn new() -> Self {
        // Any value whose low byte is not the first marker byte
        Self { window: 0xffff }
    }

    /// Shifts one byte into the window, returns `true` once the window holds the marker
    pub fn push(&mut self, byte: u8) -> bool {
        self.window = (self.window << 8) | u16::from(byte);
        self.window == MARKER
    }

    /// Reads until the frame marker has been consumed, returning how many
    /// bytes preceding it were discarded.
    ///
    /// This never gives up: if the link never produces the marker the call
    /// does not return. Callers that need a deadline must put it in the
    /// transport or use [`synchronize_within`](Self::synchronize_within).
    pub fn synchronize<X: Transceiver + ?Sized>(link: &mut X) -> io::Result<usize> {
        let mut sync = Self::new();
        let mut scanned = 0usize;
        loop {
            scanned += 1;
            if sync.push(link.read_byte()?) {
                return Ok(scanned - 2);
            }
        }
    }

    /// Like [`synchronize`](Self::synchronize) but scans at most `limit` bytes
    pub fn synchronize_within<X: Transceiver + ?Sized>(
        link: &mut X,
        limit: usize,
    ) -> Result<usize, Error> {
        let mut sync = Self::new();
        for scanned in 1..=limit {
            if sync.push(link.read_byte()?) {
                return Ok(scanned - 2);
            }
        }
        Err(ParserError::SyncNotFound { scanned: limit }.into())
    }
}

/// Reads the remainder of a frame once the marker has been consumed.
///
/// The checksum is not validated here.
pub fn read_frame<X: Transceiver + ?Sized>(link: &mut X) -> Result<RawFrame, Error> {
    let mut header = [0u8; 4];
    link.read_exact(&mut header)?;
    let [class, msg_id, len_lo, len_hi] = header;
    let len = usize::from(u16::from_le_bytes([len_lo, len_hi]));
    if len > MAX_PAYLOAD_LEN {
        return Err(ParserError::OversizedPayload {
            len,
            max: MAX_PAYLOAD_LEN,
        }
        .into());
    }

    let mut payload = vec![0u8; len];
    link.read_exact(&mut payload)?;

    let mut checksum = [0u8; 2];
    link.read_exact(&mut checksum)?;

    log::trace!(
        "UBX frame: class=0x{:02x} id=0x{:02x} len={}",
        class,
        msg_id,
        len
    );

    Ok(RawFrame {
        class,
        msg_id,
        payload,
        ck_a: checksum[0],
        ck_b: checksum[1],
    })
}

/// Synchronizes, reads one frame and validates its checksum
pub fn next_frame<X: Transceiver + ?Sized>(
    link: &mut X,
    scan_limit: Option<usize>,
) -> Result<RawFrame, Error> {
    let discarded = match scan_limit {
        Some(limit) => FrameSynchronizer::synchronize_within(link, limit)?,
        None => FrameSynchronizer::synchronize(link)?,
    };
    if discarded > 0 {
        log::debug!("Discarded {} bytes before frame marker", discarded);
    }
    let frame = read_frame(link)?;
    frame.validate()?;
    Ok(frame)
}
