use clap::{Parser, ValueEnum};
use std::{path::PathBuf, time::Duration};
use ubx_pvt::{commands::RatePreset, AcquisitionConfig, DeviceConfig, IoPort};

#[derive(Parser, Debug)]
#[command(author, version, about = "Reads NAV-PVT fixes from a u-blox receiver", long_about = None)]
pub struct Args {
    /// Serial port to open to connect to the receiver
    #[arg(short, long, required_unless_present = "replay")]
    pub port: Option<String>,

    /// Baud rate for the selected port
    #[arg(short = 's', long, default_value_t = 9600)]
    pub baud: u32,

    /// Receiver interface behind the serial port; NAV-PVT is routed there only
    #[arg(short, long, value_enum, default_value_t = CliInterface::Usb)]
    pub interface: CliInterface,

    /// Solutions per second
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub rate: u8,

    /// Leave the receiver configuration untouched
    #[arg(long)]
    pub skip_config: bool,

    /// Give up a marker scan after this many bytes so Ctrl-C is noticed on an idle link
    #[arg(long)]
    pub scan_limit: Option<usize>,

    /// Frames to skip while waiting for an acknowledgment
    #[arg(long, default_value_t = 16)]
    pub ack_max_frames: usize,

    /// Extra attempts for a configuration command that was not acknowledged
    #[arg(long, default_value_t = 2)]
    pub retries: usize,

    /// Read a recorded UBX stream instead of a serial port
    #[arg(long, conflicts_with = "port")]
    pub replay: Option<PathBuf>,

    /// Print fixes as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum CliInterface {
    Uart1,
    Uart2,
    Usb,
    Spi,
}

impl From<CliInterface> for IoPort {
    fn from(other: CliInterface) -> IoPort {
        match other {
            CliInterface::Uart1 => IoPort::Uart1,
            CliInterface::Uart2 => IoPort::Uart2,
            CliInterface::Usb => IoPort::Usb,
            CliInterface::Spi => IoPort::Spi,
        }
    }
}

impl Args {
    pub fn io_port(&self) -> IoPort {
        self.interface.into()
    }

    pub fn rate_preset(&self) -> RatePreset {
        match self.rate {
            2 => RatePreset::TwoHz,
            _ => RatePreset::OneHz,
        }
    }

    pub fn acquisition_config(&self) -> AcquisitionConfig {
        AcquisitionConfig {
            sync_scan_limit: self.scan_limit,
            ..AcquisitionConfig::for_rate(self.rate_preset())
        }
    }

    pub fn device_config(&self) -> DeviceConfig {
        DeviceConfig {
            ack_max_frames: self.ack_max_frames,
            command_retries: self.retries,
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    /// Serial read timeout, so a silent receiver does not block shutdown forever
    pub fn port_timeout(&self) -> Duration {
        self.rate_preset().solution_period() * 2
    }
}
