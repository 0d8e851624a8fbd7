//! Byte exchange with the receiver.
//!
//! The receiver is reached through a link that clocks bytes in both
//! directions at once (SPI) or through a stream (UART, USB CDC, a captured
//! log file). [`Transceiver`] hides that difference behind a single in-place
//! exchange: the caller fills a buffer with the bytes it wants to send, and
//! after the call the buffer holds what came back.

use crate::constants::IDLE_BYTE;
use std::io::{self, Read, Write};

/// The opaque `transceive(buf) -> buf'` primitive.
///
/// None of the implementations in this crate apply a deadline; a link that
/// never delivers data makes the caller block for as long as the
/// implementation does.
pub trait Transceiver {
    /// Exchanges `buf.len()` bytes with the receiver in place.
    fn transceive(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Clocks out one idle byte and returns the byte received in exchange
    fn read_byte(&mut self) -> io::Result<u8> {
        let mut buf = [IDLE_BYTE];
        self.transceive(&mut buf)?;
        Ok(buf[0])
    }

    /// Fills `buf` with received bytes, clocking out idle bytes
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        buf.fill(IDLE_BYTE);
        self.transceive(buf)
    }

    /// Sends `data`, discarding whatever is clocked in at the same time
    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        let mut buf = data.to_vec();
        self.transceive(&mut buf)
    }
}

impl<T: Transceiver + ?Sized> Transceiver for &mut T {
    fn transceive(&mut self, buf: &mut [u8]) -> io::Result<()> {
        (**self).transceive(buf)
    }
}

impl<T: Transceiver + ?Sized> Transceiver for Box<T> {
    fn transceive(&mut self, buf: &mut [u8]) -> io::Result<()> {
        (**self).transceive(buf)
    }
}

fn is_idle(buf: &[u8]) -> bool {
    buf.iter().all(|&b| b == IDLE_BYTE)
}

/// Adapts a stream port (anything `Read + Write`, e.g. a serial port) to [`Transceiver`].
///
/// A stream link is not clocked: bytes the receiver sends while a command is
/// being written stay queued in the port and are returned by later reads. A
/// buffer made only of idle bytes is therefore treated as a read, anything
/// else as a write after which the buffer is refilled with idle bytes.
pub struct IoTransceiver<T> {
    port: T,
}

impl<T: Read + Write> IoTransceiver<T> {
    pub fn new(port: T) -> Self {
        Self { port }
    }

    pub fn get_ref(&self) -> &T {
        &self.port
    }

    pub fn into_inner(self) -> T {
        self.port
    }
}

impl<T: Read + Write> Transceiver for IoTransceiver<T> {
    fn transceive(&mut self, buf: &mut [u8]) -> io::Result<()> {
        if is_idle(buf) {
            self.port.read_exact(buf)
        } else {
            self.port.write_all(buf)?;
            self.port.flush()?;
            buf.fill(IDLE_BYTE);
            Ok(())
        }
    }
}

/// Replays a recorded byte stream; outbound bytes are dropped.
///
/// Reads past the end of the recording fail with
/// [`io::ErrorKind::UnexpectedEof`], which the acquisition loop treats as
/// the link closing.
pub struct ReplayTransceiver<R> {
    source: R,
    sent: usize,
}

impl<R: Read> ReplayTransceiver<R> {
    pub fn new(source: R) -> Self {
        Self { source, sent: 0 }
    }

    /// Number of non-idle bytes the caller tried to send
    pub fn bytes_sent(&self) -> usize {
        self.sent
    }
}

impl<R: Read> Transceiver for ReplayTransceiver<R> {
    fn transceive(&mut self, buf: &mut [u8]) -> io::Result<()> {
        if is_idle(buf) {
            self.source.read_exact(buf)
        } else {
            self.sent += buf.len();
            buf.fill(IDLE_BYTE);
            Ok(())
        }
    }
}
