use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use jr3pci_device::{ClockedForceArray, ForceArray, SampleClock};
use serde::Serialize;
use tracing::{debug, info};

use crate::cmd::{parse_interval, StreamArgs, Target};
use crate::exit::{csv_error, device_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct StreamSample {
    elapsed_s: f64,
    #[serde(flatten)]
    sample: ClockedForceArray,
}

impl StreamSample {
    fn fields(&self) -> Vec<String> {
        let forces = self.sample.forces.to_array();
        [self.elapsed_s.to_string(), self.sample.count.to_string()]
            .into_iter()
            .chain(forces.iter().map(i16::to_string))
            .collect()
    }
}

/// CSV recording of a stream, one row per sample.
struct CsvRecorder {
    writer: csv::Writer<File>,
}

impl CsvRecorder {
    fn create(path: &Path) -> CliResult<Self> {
        let mut writer = csv::Writer::from_path(path)
            .map_err(|err| csv_error(&format!("cannot create {}", path.display()), err))?;
        let mut header = vec!["elapsed_s", "count"];
        header.extend(ForceArray::FIELDS);
        writer
            .write_record(header)
            .map_err(|err| csv_error("csv header write failed", err))?;
        info!(path = %path.display(), "recording samples to csv");
        Ok(Self { writer })
    }

    fn record(&mut self, sample: &StreamSample) -> CliResult<()> {
        self.writer
            .write_record(sample.fields())
            .map_err(|err| csv_error("csv row write failed", err))
    }

    fn finish(mut self) -> CliResult<()> {
        self.writer
            .flush()
            .map_err(|err| CliError::new(INTERNAL, format!("csv flush failed: {err}")))
    }
}

pub fn run(args: StreamArgs, target: &Target, format: OutputFormat) -> CliResult<i32> {
    let interval = parse_interval(&args.interval)?;
    let mut clock = SampleClock::new(args.filter)
        .map_err(|err| device_error("stream setup failed", err))?;
    let mut card = target.open()?;
    let mut recorder = match args.output.as_deref() {
        Some(path) => Some(CsvRecorder::create(path)?),
        None => None,
    };

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    if matches!(format, OutputFormat::Table | OutputFormat::Pretty) {
        println!(
            "{:>10} {:>6} {}",
            "elapsed_s",
            "count",
            ForceArray::FIELDS.join(" ")
        );
    }

    let mut taken = 0u64;
    while running.load(Ordering::SeqCst) {
        if args.samples.is_some_and(|limit| taken >= limit) {
            break;
        }

        let sample = card
            .clocked_force_array(target.channel, args.filter)
            .map_err(|err| device_error("sample read failed", err))?;
        let elapsed_s = clock.observe(sample.count);
        let out = StreamSample { elapsed_s, sample };
        print_sample(&out, format);
        if let Some(recorder) = recorder.as_mut() {
            recorder.record(&out)?;
        }
        taken = taken.saturating_add(1);

        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }

    if let Some(recorder) = recorder {
        recorder.finish()?;
    }
    debug!(samples = taken, wraps = clock.wraps(), "stream stopped");
    Ok(SUCCESS)
}

fn print_sample(out: &StreamSample, format: OutputFormat) {
    let values = out.sample.forces.to_array();
    let fields = values
        .iter()
        .map(i16::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("{:>10.4} {:>6} {fields}", out.elapsed_s, out.sample.count);
        }
        OutputFormat::Raw => println!("{} {} {fields}", out.elapsed_s, out.sample.count),
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
