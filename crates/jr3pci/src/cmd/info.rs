use jr3pci_device::{ForceArray, FullScaleLimit, Peaks, SensorSettings};
use jr3pci_ioctl::registers::{AXES, COUNTER_COUNT};
use serde::Serialize;

use crate::cmd::Target;
use crate::exit::{device_error, CliResult, SUCCESS};
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Serialize)]
struct InfoOutput {
    device: u32,
    channel: u8,
    copyright: String,
    settings: SensorSettings,
    shunts: [i16; AXES],
    default_full_scales: [i16; AXES],
    full_scales: ForceArray,
    full_scale_limits: [FullScaleLimit; AXES],
    offsets: [i16; AXES],
    counters: [u16; COUNTER_COUNT],
    peaks: Peaks,
}

pub fn run(target: &Target, format: OutputFormat) -> CliResult<i32> {
    let mut card = target.open()?;
    let channel = target.channel;
    let fail = |what: &str| format!("{what} read failed");

    let out = InfoOutput {
        device: target.device,
        channel,
        copyright: card
            .copyright(channel)
            .map_err(|err| device_error(&fail("copyright"), err))?,
        settings: card
            .sensor_settings(channel)
            .map_err(|err| device_error(&fail("sensor settings"), err))?,
        shunts: card
            .shunts(channel)
            .map_err(|err| device_error(&fail("shunt"), err))?,
        default_full_scales: card
            .default_full_scales(channel)
            .map_err(|err| device_error(&fail("default full scale"), err))?,
        full_scales: card
            .full_scales(channel)
            .map_err(|err| device_error(&fail("full scale"), err))?,
        full_scale_limits: card
            .full_scale_limits(channel)
            .map_err(|err| device_error(&fail("full scale limit"), err))?,
        offsets: card
            .offsets(channel)
            .map_err(|err| device_error(&fail("offset"), err))?,
        counters: card
            .counters(channel)
            .map_err(|err| device_error(&fail("counter"), err))?,
        peaks: card
            .peaks(channel)
            .map_err(|err| device_error(&fail("peak"), err))?,
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            println!("{}", out.copyright);
            let full_scales = out.full_scales.to_array();
            let (peak_min, peak_max) = (out.peaks.min.to_array(), out.peaks.max.to_array());
            print_table(
                [
                    "AXIS",
                    "FULL SCALE",
                    "DEFAULT",
                    "MIN",
                    "MAX",
                    "OFFSET",
                    "SHUNT",
                    "PEAK MIN",
                    "PEAK MAX",
                ],
                (0..AXES).map(|i| {
                    vec![
                        ForceArray::FIELDS[i].to_string(),
                        full_scales[i].to_string(),
                        out.default_full_scales[i].to_string(),
                        out.full_scale_limits[i].min.to_string(),
                        out.full_scale_limits[i].max.to_string(),
                        out.offsets[i].to_string(),
                        out.shunts[i].to_string(),
                        peak_min[i].to_string(),
                        peak_max[i].to_string(),
                    ]
                }),
            );
            print_settings(&out.settings);
            print_table(
                ["FILTER", "COUNTER"],
                out.counters
                    .iter()
                    .enumerate()
                    .map(|(i, c)| vec![(i + 1).to_string(), c.to_string()]),
            );
        }
        OutputFormat::Pretty => {
            println!("Card {} channel {}:", out.device, out.channel);
            println!("  Copyright:   {}", out.copyright);
            print_settings(&out.settings);
            println!("  Shunts:      {:?}", out.shunts);
            println!("  Defaults:    {:?}", out.default_full_scales);
            println!("  Full scales: {:?}", out.full_scales.to_array());
            let limits = out
                .full_scale_limits
                .iter()
                .map(|l| format!("{}..{}", l.min, l.max))
                .collect::<Vec<_>>()
                .join(", ");
            println!("  Limits:      {limits}");
            println!("  Offsets:     {:?}", out.offsets);
            println!("  Counters:    {:?}", out.counters);
            println!("  Peak min:    {:?}", out.peaks.min.to_array());
            println!("  Peak max:    {:?}", out.peaks.max.to_array());
        }
        OutputFormat::Raw => println!("{}", out.copyright),
    }

    Ok(SUCCESS)
}

fn print_settings(settings: &SensorSettings) {
    println!(
        "  Load envelope {}, transform {}, offset set {}, vector axes 0x{:02x}",
        settings.load_envelope, settings.transform, settings.offset_number, settings.vector_axes
    );
}
