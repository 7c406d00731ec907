use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use jr3pci_device::{ControlDevice, Jr3Pci, SimulatedDriver};
use jr3pci_ioctl::registers::FILTER_COUNT;
use jr3pci_transport::Jr3PciDevice;
use tracing::info;

use crate::exit::{transport_error, CliError, CliResult};
use crate::output::OutputFormat;

pub mod channels;
pub mod clocked;
pub mod devices;
pub mod forces;
pub mod info;
pub mod read;
pub mod stream;
pub mod version;
pub mod write;

/// A card opened for one command: the real driver or the demo simulator.
pub type Card = Jr3Pci<Box<dyn ControlDevice>>;

/// Which card and channel commands talk to.
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Card index (`\\.\JR3PCI<N>`).
    #[arg(long, env = "JR3PCI_DEVICE", default_value_t = 0, global = true)]
    pub device: u32,

    /// Sensor channel on the card.
    #[arg(long, env = "JR3PCI_CHANNEL", default_value_t = 0, global = true)]
    pub channel: u8,

    /// Use an in-memory card with a demo calibration image instead of the driver.
    #[arg(long, env = "JR3PCI_SIMULATE", global = true)]
    pub simulate: bool,
}

impl Target {
    pub fn open(&self) -> CliResult<Card> {
        if self.simulate {
            info!(device = self.device, "using simulated card");
            return Ok(Jr3Pci::new(Box::new(SimulatedDriver::demo())));
        }

        let device =
            Jr3PciDevice::open(self.device).map_err(|err| transport_error("open failed", err))?;
        Ok(Jr3Pci::new(Box::new(device)))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show version information.
    Version(VersionArgs),
    /// Probe card indices and print their channel bitmaps.
    Devices(DevicesArgs),
    /// Show which channels are populated on the card.
    Channels,
    /// Read register words.
    Read(ReadArgs),
    /// Write one register word.
    Write(WriteArgs),
    /// Read the force/torque block of one filter.
    Forces(ForcesArgs),
    /// Read a filter's sample counter together with its force/torque block.
    Clocked(ClockedArgs),
    /// Print calibration data: copyright, full scales, limits, offsets, counters.
    Info,
    /// Poll clocked samples until interrupted.
    Stream(StreamArgs),
}

pub fn run(command: Command, target: &Target, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Version(args) => version::run(args),
        Command::Devices(args) => devices::run(args, target, format),
        Command::Channels => channels::run(target, format),
        Command::Read(args) => read::run(args, target, format),
        Command::Write(args) => write::run(args, target, format),
        Command::Forces(args) => forces::run(args, target, format),
        Command::Clocked(args) => clocked::run(args, target, format),
        Command::Info => info::run(target, format),
        Command::Stream(args) => stream::run(args, target, format),
    }
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug)]
pub struct DevicesArgs {
    /// Number of card indices to probe, starting at 0.
    #[arg(long, default_value_t = 4)]
    pub max: u32,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// First register offset (decimal or 0x hex).
    pub offset: String,
    /// Number of consecutive words.
    #[arg(long, short = 'n', default_value_t = 1)]
    pub count: u32,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Register offset (decimal or 0x hex).
    pub offset: String,
    /// Word to write (decimal, 0x hex, or negative).
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Args, Debug)]
pub struct ForcesArgs {
    /// Filter block, 0 (unfiltered) to 6.
    #[arg(long, short = 'f', default_value_t = 0)]
    pub filter: u8,
    /// Scale by the active full scale into engineering units.
    #[arg(long)]
    pub scaled: bool,
}

#[derive(Args, Debug)]
pub struct ClockedArgs {
    /// Filter block, 0 (unfiltered) to 6.
    #[arg(long, short = 'f', default_value_t = 1)]
    pub filter: u8,
}

#[derive(Args, Debug)]
pub struct StreamArgs {
    /// Filter block with a sample counter, 1 to 6.
    #[arg(long, short = 'f', default_value_t = 1)]
    pub filter: u8,
    /// Stop after N samples.
    #[arg(long)]
    pub samples: Option<u64>,
    /// Delay between samples (e.g. 100ms, 1s).
    #[arg(long, default_value = "100ms")]
    pub interval: String,
    /// Also record samples as CSV (elapsed_s, count, fx..v2) to this file.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Reject filter blocks the card does not have before touching the driver.
pub fn check_filter(filter: u8) -> CliResult<()> {
    if filter >= FILTER_COUNT {
        return Err(CliError::usage(format!(
            "filter {filter} out of range (0-{})",
            FILTER_COUNT - 1
        )));
    }
    Ok(())
}

pub fn parse_interval(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::usage("interval must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, true)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::usage(format!("invalid interval value: {input}")))?;

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_interval_units() {
        assert_eq!(parse_interval("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_interval("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_interval("40").unwrap(), Duration::from_millis(40));
        assert_eq!(parse_interval("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn parse_interval_invalid() {
        assert!(parse_interval("").is_err());
        assert!(parse_interval("fast").is_err());
        assert!(parse_interval("-1s").is_err());
    }

    #[test]
    fn filters_above_six_are_usage_errors() {
        assert!(check_filter(0).is_ok());
        assert!(check_filter(6).is_ok());
        assert_eq!(check_filter(7).unwrap_err().code, crate::exit::USAGE);
    }

    #[test]
    fn simulated_target_opens_without_driver() {
        let target = Target {
            device: 3,
            channel: 0,
            simulate: true,
        };
        let mut card = target.open().unwrap();
        assert_eq!(card.supported_channels().unwrap(), 0b1);
    }
}
