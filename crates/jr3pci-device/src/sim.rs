//! In-memory stand-in for the JR3 PCI driver.
//!
//! [`SimulatedDriver`] decodes the same parameter blocks the kernel driver
//! does and answers from a register image, so everything above the
//! transport can be exercised without a card.

use std::collections::{HashMap, HashSet};

use bytes::BytesMut;
use jr3pci_ioctl::registers::{
    filter_offset, raw_data_offset, COPYRIGHT, COPYRIGHT_WORDS, COUNT1, COUNTER_COUNT,
    DEFAULT_FULL_SCALE, FULL_SCALE, MAXIMUM_DATA, MAX_FULL_SCALE, MINIMUM_DATA, MIN_FULL_SCALE,
    OFFSETS, SHUNTS, VECT_AXES,
};
use jr3pci_ioctl::{
    ReadWordRequest, ReadWordResponse, Request, Response, Status, SupportedChannelsRequest,
    SupportedChannelsResponse, WriteWordRequest, WriteWordResponse, IOCTL_JR3PCI_READ_WORD,
    IOCTL_JR3PCI_SUPPORTED_CHANNELS, IOCTL_JR3PCI_WRITE_WORD,
};
use jr3pci_transport::{ControlDevice, TransportError};
use tracing::trace;

/// A failure the simulator injects into its answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Complete the request but report this many bytes returned.
    ShortResponse(usize),
    /// Answer read/write requests with this status.
    Status(i32),
    /// Fail the request at the OS level, as if the device was removed.
    Removed,
}

/// A request the simulator received, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggedRequest {
    ReadWord { channel: u8, offset: u32 },
    WriteWord { channel: u8, offset: u32, data: u16 },
    SupportedChannels,
    Unknown { code: u32 },
}

/// Register-image driver stand-in.
#[derive(Debug, Clone, Default)]
pub struct SimulatedDriver {
    supported: u32,
    registers: HashMap<(u8, u32), u16>,
    free_running: HashSet<(u8, u32)>,
    fault: Option<(u64, Fault)>,
    requests: u64,
    logging: bool,
    log: Vec<LoggedRequest>,
}

impl SimulatedDriver {
    /// An empty card reporting `supported` as its channel bitmap.
    ///
    /// Requests are logged; see [`set_logging`](Self::set_logging).
    pub fn new(supported: u32) -> Self {
        Self {
            supported,
            logging: true,
            ..Self::default()
        }
    }

    /// A single-channel card with a plausible calibration image.
    ///
    /// Filter counters tick on every read, so clocked samples advance.
    /// Request logging is off, so long-running sessions stay bounded.
    pub fn demo() -> Self {
        let mut sim = Self::new(0b1);
        sim.set_logging(false);
        let ch = 0;

        let copyright = b"CALIBRATION DATA COPYRIGHT JR3 INC. ";
        let words: Vec<u16> = copyright
            .chunks(2)
            .take(COPYRIGHT_WORDS)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        sim.set_registers(ch, COPYRIGHT, &words);

        sim.set_signed(ch, SHUNTS, &[2148, 2161, 1987, 30990, 31012, 30871]);
        sim.set_signed(ch, DEFAULT_FULL_SCALE, &[100, 100, 200, 50, 50, 50]);
        sim.set_register(ch, VECT_AXES, 0x3f);
        sim.set_signed(ch, MIN_FULL_SCALE, &[50, 50, 100, 25, 25, 25]);
        sim.set_signed(ch, MAX_FULL_SCALE, &[400, 400, 800, 200, 200, 200]);
        sim.set_signed(ch, FULL_SCALE, &[100, 100, 200, 50, 50, 50, 0, 0]);
        sim.set_signed(ch, OFFSETS, &[12, -8, 40, 0, -3, 1]);

        let raw = [1830i16, -920, 16003, 210, -77, 5];
        for (i, value) in raw.iter().enumerate() {
            sim.set_register(ch, raw_data_offset(i as u32 + 1), *value as u16);
        }

        let base = [1640i16, -820, 8192, 120, -60, 8, 0, 0];
        for filter in 0..7u8 {
            let jitter = 7 - i16::from(filter);
            let block: Vec<i16> = base
                .iter()
                .enumerate()
                .map(|(i, v)| if i < 6 { v + jitter } else { *v })
                .collect();
            sim.set_signed(ch, filter_offset(filter), &block);
        }

        sim.set_signed(ch, MINIMUM_DATA, &[-2210, -1403, 7012, -96, -180, -31, 0, 0]);
        sim.set_signed(ch, MAXIMUM_DATA, &[3120, 655, 9874, 310, 42, 57, 0, 0]);

        for i in 0..COUNTER_COUNT as u32 {
            sim.set_register(ch, COUNT1 + i, 0xFF00u16.wrapping_add((i as u16) * 0x1111));
            sim.set_free_running(ch, COUNT1 + i);
        }

        sim
    }

    /// Set one register word.
    pub fn set_register(&mut self, channel: u8, offset: u32, value: u16) {
        self.registers.insert((channel, offset), value);
    }

    /// Set consecutive register words starting at `offset`.
    pub fn set_registers(&mut self, channel: u8, offset: u32, values: &[u16]) {
        for (i, value) in values.iter().enumerate() {
            self.set_register(channel, offset.wrapping_add(i as u32), *value);
        }
    }

    fn set_signed(&mut self, channel: u8, offset: u32, values: &[i16]) {
        let words: Vec<u16> = values.iter().map(|&v| v as u16).collect();
        self.set_registers(channel, offset, &words);
    }

    /// Current value of a register (unset registers read as zero).
    pub fn register(&self, channel: u8, offset: u32) -> u16 {
        self.registers.get(&(channel, offset)).copied().unwrap_or(0)
    }

    /// Make a register increment by one after every read.
    pub fn set_free_running(&mut self, channel: u8, offset: u32) {
        self.free_running.insert((channel, offset));
    }

    /// Change the reported channel bitmap.
    pub fn set_supported_channels(&mut self, bitmap: u32) {
        self.supported = bitmap;
    }

    /// Inject `fault` into every request after the next `requests` succeed.
    pub fn fail_after(&mut self, requests: u64, fault: Fault) {
        self.fault = Some((self.requests + requests, fault));
    }

    /// Stop injecting faults.
    pub fn clear_fault(&mut self) {
        self.fault = None;
    }

    /// Turn request logging on or off. Turning it off also drops the current log.
    pub fn set_logging(&mut self, enabled: bool) {
        self.logging = enabled;
        if !enabled {
            self.log = Vec::new();
        }
    }

    /// Requests received since the last [`clear_log`](Self::clear_log).
    pub fn log(&self) -> &[LoggedRequest] {
        &self.log
    }

    /// Forget logged requests.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    fn record(&mut self, request: LoggedRequest) {
        if self.logging {
            self.log.push(request);
        }
    }

    fn active_fault(&self) -> Option<Fault> {
        match self.fault {
            Some((from, fault)) if self.requests >= from => Some(fault),
            _ => None,
        }
    }

    fn read(&mut self, channel: u8, offset: u32) -> u16 {
        let value = self.register(channel, offset);
        if self.free_running.contains(&(channel, offset)) {
            self.set_register(channel, offset, value.wrapping_add(1));
        }
        value
    }

    fn answer<Resp: Response>(
        response: Resp,
        output: &mut [u8],
        fault: Option<Fault>,
    ) -> jr3pci_transport::Result<usize> {
        let mut buf = BytesMut::with_capacity(Resp::SIZE);
        response.encode(&mut buf);
        if output.len() < buf.len() {
            return Err(invalid("output buffer too small"));
        }
        output[..buf.len()].copy_from_slice(&buf);
        match fault {
            Some(Fault::ShortResponse(n)) => Ok(n),
            _ => Ok(buf.len()),
        }
    }
}

fn invalid(message: &str) -> TransportError {
    TransportError::Control {
        code: 0,
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, message.to_string()),
    }
}

impl ControlDevice for SimulatedDriver {
    fn control(
        &mut self,
        code: u32,
        input: &[u8],
        output: &mut [u8],
    ) -> jr3pci_transport::Result<usize> {
        let fault = self.active_fault();
        self.requests += 1;

        if fault == Some(Fault::Removed) {
            return Err(TransportError::Control {
                code,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotConnected,
                    "simulated device removed",
                ),
            });
        }

        let status = match fault {
            Some(Fault::Status(status)) => Status(status),
            _ => Status::OK,
        };
        // Short-response faults still perform the request; only status faults suppress it.
        let apply = status.is_ok();

        match code {
            IOCTL_JR3PCI_READ_WORD => {
                let req = ReadWordRequest::decode(input)
                    .ok_or_else(|| invalid("bad read-word request"))?;
                self.record(LoggedRequest::ReadWord {
                    channel: req.channel,
                    offset: req.offset,
                });
                let data = if apply {
                    self.read(req.channel, req.offset)
                } else {
                    0
                };
                trace!(channel = req.channel, offset = req.offset, data, "simulated read");
                Self::answer(ReadWordResponse { status, data }, output, fault)
            }
            IOCTL_JR3PCI_WRITE_WORD => {
                let req = WriteWordRequest::decode(input)
                    .ok_or_else(|| invalid("bad write-word request"))?;
                self.record(LoggedRequest::WriteWord {
                    channel: req.channel,
                    offset: req.offset,
                    data: req.data,
                });
                if apply {
                    self.set_register(req.channel, req.offset, req.data);
                }
                trace!(
                    channel = req.channel,
                    offset = req.offset,
                    data = req.data,
                    "simulated write"
                );
                Self::answer(WriteWordResponse { status }, output, fault)
            }
            IOCTL_JR3PCI_SUPPORTED_CHANNELS => {
                SupportedChannelsRequest::decode(input)
                    .ok_or_else(|| invalid("supported-channels takes no input"))?;
                self.record(LoggedRequest::SupportedChannels);
                Self::answer(
                    SupportedChannelsResponse {
                        bitmap: self.supported,
                    },
                    output,
                    fault,
                )
            }
            other => {
                self.record(LoggedRequest::Unknown { code: other });
                Err(invalid("unknown control code"))
            }
        }
    }

    fn describe(&self) -> String {
        "simulated".to_string()
    }
}
