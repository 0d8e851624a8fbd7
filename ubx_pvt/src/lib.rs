//! # ubx_pvt
//!
//! Reads UBX navigation solutions (NAV-PVT) from a u-blox receiver and hands
//! them from a single acquisition thread to any number of readers through a
//! two-slot buffer.
//!
//! Constructing Packets
//! ====================
//!
//! The configuration commands this crate sends are available as fixed byte
//! tables in [`commands`], and can be built with the `Builder` types:
//! ```
//! use ubx_pvt::{commands, CfgMsgAllPortsBuilder, IoPort, NavPvt};
//!
//! let packet = CfgMsgAllPortsBuilder::enable_only_on::<NavPvt>(IoPort::Spi).into_packet_bytes();
//! assert_eq!(packet, commands::CFG_MSG_NAV_PVT_SPI_ON);
//! ```
//!
//! Reading Solutions
//! =================
//!
//! ```
//! use std::{io::Cursor, sync::Arc, time::Duration};
//! use ubx_pvt::{AcquisitionConfig, AcquisitionLoop, GnssContext, NavPvt, ReplayTransceiver};
//!
//! let fix = NavPvt { lat: 400_000_000, lon: -1_050_000_000, ..NavPvt::default() };
//! let link = ReplayTransceiver::new(Cursor::new(fix.into_packet_bytes().to_vec()));
//!
//! let ctx = GnssContext::new();
//! let config = AcquisitionConfig { cycle_interval: Duration::ZERO, sync_scan_limit: None };
//! // Runs until the recording ends
//! let stats = AcquisitionLoop::new(link, Arc::clone(&ctx), config).run();
//! assert_eq!(stats.published, 1);
//! assert_eq!(ctx.snapshot().unwrap().value.lat, 400_000_000);
//! ```

pub use crate::{
    acquisition::{
        AcquisitionConfig, AcquisitionHandle, AcquisitionLoop, AcquisitionState,
        AcquisitionStats, CycleOutcome, GnssContext, Shutdown,
    },
    device::{Device, DeviceConfig},
    double_buffer::{DoubleBuffer, Slot, Snapshot},
    error::{DateTimeError, Error, ParserError, Result, SizeMismatch},
    parser::{
        checksum::{checksum, verify, UbxChecksumCalc},
        next_frame, read_frame, FrameSynchronizer, RawFrame,
    },
    transport::{IoTransceiver, ReplayTransceiver, Transceiver},
    ubx_packets::*,
};

pub mod constants;
mod acquisition;
mod device;
mod double_buffer;
mod error;
mod parser;
mod transport;
mod ubx_packets;
