use std::{fmt, io};

/// Error that possible during frame synchronization and parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    /// Bounded sync scan gave up before seeing the frame marker
    SyncNotFound { scanned: usize },
    /// Length field larger than any payload the receiver sends
    OversizedPayload { len: usize, max: usize },
    InvalidChecksum { expect: u16, got: u16 },
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserError::SyncNotFound { scanned } => {
                write!(f, "No frame marker within {} scanned bytes", scanned)
            },
            ParserError::OversizedPayload { len, max } => {
                write!(f, "Payload length {} exceeds maximum of {}", len, max)
            },
            ParserError::InvalidChecksum { expect, got } => write!(
                f,
                "Not valid packet's checksum, expect {:x}, got {:x}",
                expect, got
            ),
        }
    }
}

impl std::error::Error for ParserError {}

/// A known packet arrived with a payload length other than the documented one.
///
/// This is a warning: the decoder still produced a best-effort value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeMismatch {
    pub packet: &'static str,
    pub expect: usize,
    pub got: usize,
}

impl fmt::Display for SizeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid packet({}) length, expect {}, got {}",
            self.packet, self.expect, self.got
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeError {
    InvalidDate,
    InvalidTime,
    InvalidNanoseconds,
}

impl fmt::Display for DateTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateTimeError::InvalidDate => f.write_str("invalid date"),
            DateTimeError::InvalidTime => f.write_str("invalid time"),
            DateTimeError::InvalidNanoseconds => f.write_str("invalid nanoseconds"),
        }
    }
}

impl std::error::Error for DateTimeError {}

/// Errors of the command/response path and of the transport
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Parser(ParserError),
    /// The acknowledgment referenced a different command than the one just sent
    AckMismatch {
        expected: (u8, u8),
        got: (u8, u8),
    },
    /// The receiver rejected the command
    Nack { class: u8, msg_id: u8 },
    /// Gave up waiting for an acknowledgment or poll response
    UnexpectedPacket {
        waiting_for: (u8, u8),
        skipped: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "Transport error: {}", e),
            Error::Parser(e) => write!(f, "Parser error: {}", e),
            Error::AckMismatch { expected, got } => write!(
                f,
                "Expecting ack for class=0x{:02x} id=0x{:02x}, got ack for class=0x{:02x} id=0x{:02x}",
                expected.0, expected.1, got.0, got.1
            ),
            Error::Nack { class, msg_id } => {
                write!(f, "Receiver rejected class=0x{:02x} id=0x{:02x}", class, msg_id)
            },
            Error::UnexpectedPacket {
                waiting_for,
                skipped,
            } => write!(
                f,
                "No response for class=0x{:02x} id=0x{:02x} after {} frames",
                waiting_for.0, waiting_for.1, skipped
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Parser(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<ParserError> for Error {
    fn from(e: ParserError) -> Self {
        Self::Parser(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
