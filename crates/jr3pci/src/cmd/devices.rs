use jr3pci_transport::device_path;
use serde::Serialize;

use crate::cmd::{DevicesArgs, Target};
use crate::exit::{device_error, CliError, CliResult, SUCCESS, UNAVAILABLE};
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Serialize)]
struct DeviceEntry {
    index: u32,
    path: String,
    present: bool,
    bitmap: Option<u32>,
    error: Option<String>,
}

pub fn run(args: DevicesArgs, target: &Target, format: OutputFormat) -> CliResult<i32> {
    let entries: Vec<DeviceEntry> = (0..args.max).map(|index| probe(index, target)).collect();

    match format {
        OutputFormat::Json => print_json(&entries),
        OutputFormat::Table => print_table(
            ["INDEX", "PATH", "CHANNELS", "STATUS"],
            entries.iter().map(|e| {
                vec![
                    e.index.to_string(),
                    e.path.clone(),
                    e.bitmap
                        .map(|b| format!("0x{b:08x}"))
                        .unwrap_or_else(|| "-".to_string()),
                    e.error.clone().unwrap_or_else(|| "ok".to_string()),
                ]
            }),
        ),
        OutputFormat::Pretty => {
            for e in &entries {
                match (&e.bitmap, &e.error) {
                    (Some(bitmap), _) => println!("{}  channels=0x{bitmap:08x}", e.path),
                    (None, Some(err)) => println!("{}  {err}", e.path),
                    (None, None) => println!("{}", e.path),
                }
            }
        }
        OutputFormat::Raw => {
            for e in entries.iter().filter(|e| e.present) {
                println!("{}", e.index);
            }
        }
    }

    if entries.iter().any(|e| e.present) {
        Ok(SUCCESS)
    } else {
        Ok(UNAVAILABLE)
    }
}

fn probe(index: u32, target: &Target) -> DeviceEntry {
    let path = device_path(index);
    // The simulator only populates index 0.
    let result = if target.simulate && index != 0 {
        Err(CliError::new(UNAVAILABLE, "not present"))
    } else {
        let probe_target = Target {
            device: index,
            ..target.clone()
        };
        probe_target.open().and_then(|mut card| {
            card.supported_channels()
                .map_err(|err| device_error("query failed", err))
        })
    };

    match result {
        Ok(bitmap) => DeviceEntry {
            index,
            path,
            present: true,
            bitmap: Some(bitmap),
            error: None,
        },
        Err(err) => DeviceEntry {
            index,
            path,
            present: false,
            bitmap: None,
            error: Some(err.message),
        },
    }
}
