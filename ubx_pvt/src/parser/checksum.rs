use crate::error::ParserError;

/// UBX [Fletcher-16 checksum](https://en.wikipedia.org/wiki/Fletcher%27s_checksum) calculator supporting both streaming and single-shot validation
///
/// The checksum covers class, message ID, the two length bytes and the payload,
/// never the sync characters.
#[derive(Default, Debug, Clone, Copy)]
pub struct UbxChecksumCalc {
    ck_a: u8,
    ck_b: u8,
}

impl UbxChecksumCalc {
    pub const fn new() -> Self {
        Self { ck_a: 0, ck_b: 0 }
    }

    /// Update checksum with new bytes
    pub const fn update(&mut self, bytes: &[u8]) {
        let mut i = 0;
        while i < bytes.len() {
            self.update_byte(bytes[i]);
            i += 1;
        }
    }

    /// Update checksum with a single byte
    pub const fn update_byte(&mut self, byte: u8) {
        self.ck_a = self.ck_a.wrapping_add(byte);
        self.ck_b = self.ck_b.wrapping_add(self.ck_a);
    }

    /// Get the current checksum result
    pub const fn result(self) -> (u8, u8) {
        (self.ck_a, self.ck_b)
    }

    /// Validate checksum and return result
    pub const fn validate_result(
        self,
        received_ck_a: u8,
        received_ck_b: u8,
    ) -> Result<(), ParserError> {
        if self.is_valid(received_ck_a, received_ck_b) {
            Ok(())
        } else {
            Err(ParserError::InvalidChecksum {
                expect: u16::from_le_bytes([received_ck_a, received_ck_b]),
                got: u16::from_le_bytes([self.ck_a, self.ck_b]),
            })
        }
    }

    const fn is_valid(&self, received_ck_a: u8, received_ck_b: u8) -> bool {
        self.ck_a == received_ck_a && self.ck_b == received_ck_b
    }
}

/// Single-shot checksum over `bytes`
pub const fn checksum(bytes: &[u8]) -> (u8, u8) {
    let mut calc = UbxChecksumCalc::new();
    calc.update(bytes);
    calc.result()
}

/// Recomputes the checksum over `bytes` and compares it with the received pair
pub const fn verify(bytes: &[u8], ck_a: u8, ck_b: u8) -> bool {
    let mut calc = UbxChecksumCalc::new();
    calc.update(bytes);
    calc.is_valid(ck_a, ck_b)
}

/// Checks a complete frame, sync characters included, against its trailing checksum
pub(crate) const fn is_frame_valid(frame: &[u8]) -> bool {
    if frame.len() < crate::constants::UBX_FRAME_OVERHEAD {
        return false;
    }
    let mut calc = UbxChecksumCalc::new();
    let mut i = crate::constants::UBX_SYNC_SIZE;
    while i < frame.len() - crate::constants::UBX_CHECKSUM_LEN {
        calc.update_byte(frame[i]);
        i += 1;
    }
    calc.is_valid(frame[frame.len() - 2], frame[frame.len() - 1])
}
