//! Fixed configuration and poll commands, byte-exact with length and checksum.
//!
//! Every table is checked at compile time; the tests compare them against the
//! typed builders.

use crate::parser::checksum::is_frame_valid;
use std::time::Duration;

/// CFG-PRT: SPI port, UBX in and out only, 50 idle bytes end a transfer
pub const CFG_PRT_SPI_UBX_ONLY: [u8; 28] = [
    0xb5, 0x62, 0x06, 0x00, 0x14, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x32, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x52, 0x94,
];

/// CFG-MSG: NAV-PVT at rate 1 on SPI, disabled on every other port
pub const CFG_MSG_NAV_PVT_SPI_ON: [u8; 16] = [
    0xb5, 0x62, 0x06, 0x01, 0x08, 0x00, 0x01, 0x07, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x18, 0xde,
];

/// CFG-RATE: measure every 250 ms, one solution per 2 measurements (2 solutions/s)
pub const CFG_RATE_4HZ_NAV_2: [u8; 14] = [
    0xb5, 0x62, 0x06, 0x08, 0x06, 0x00, 0xfa, 0x00, 0x02, 0x00, 0x00, 0x00, 0x10, 0x98,
];

/// CFG-RATE: measure every 500 ms, one solution per 2 measurements (1 solution/s)
pub const CFG_RATE_2HZ_NAV_2: [u8; 14] = [
    0xb5, 0x62, 0x06, 0x08, 0x06, 0x00, 0xf4, 0x01, 0x02, 0x00, 0x00, 0x00, 0x0b, 0x79,
];

/// Poll the current CFG-RATE
pub const POLL_CFG_RATE: [u8; 8] = [0xb5, 0x62, 0x06, 0x08, 0x00, 0x00, 0x0e, 0x30];

/// Poll the CFG-MSG rates of NAV-PVT
pub const POLL_CFG_MSG_NAV_PVT: [u8; 10] =
    [0xb5, 0x62, 0x06, 0x01, 0x02, 0x00, 0x01, 0x07, 0x11, 0x3a];

const _: () = {
    assert!(is_frame_valid(&CFG_PRT_SPI_UBX_ONLY));
    assert!(is_frame_valid(&CFG_MSG_NAV_PVT_SPI_ON));
    assert!(is_frame_valid(&CFG_RATE_4HZ_NAV_2));
    assert!(is_frame_valid(&CFG_RATE_2HZ_NAV_2));
    assert!(is_frame_valid(&POLL_CFG_RATE));
    assert!(is_frame_valid(&POLL_CFG_MSG_NAV_PVT));
};

/// Solution output rate
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RatePreset {
    /// One NAV-PVT per second
    #[default]
    OneHz,
    /// Two NAV-PVT per second
    TwoHz,
}

impl RatePreset {
    /// The CFG-RATE command selecting this rate
    pub fn command(self) -> &'static [u8] {
        match self {
            RatePreset::OneHz => &CFG_RATE_2HZ_NAV_2,
            RatePreset::TwoHz => &CFG_RATE_4HZ_NAV_2,
        }
    }

    pub fn solution_period(self) -> Duration {
        match self {
            RatePreset::OneHz => Duration::from_millis(1000),
            RatePreset::TwoHz => Duration::from_millis(500),
        }
    }

    /// Pause between acquisition cycles, slightly shorter than the solution
    /// period so the next frame is never missed
    pub fn cycle_interval(self) -> Duration {
        self.solution_period() * 9 / 10
    }
}
