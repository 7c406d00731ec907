use jr3pci_device::ChannelMask;
use serde::Serialize;

use crate::cmd::Target;
use crate::exit::{device_error, CliResult, FAILURE, SUCCESS};
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Serialize)]
struct ChannelsOutput {
    device: u32,
    bitmap: u32,
    channels: Vec<u8>,
}

pub fn run(target: &Target, format: OutputFormat) -> CliResult<i32> {
    let mut card = target.open()?;
    let mask = card
        .channel_mask()
        .map_err(|err| device_error("supported channels query failed", err))?;

    let out = ChannelsOutput {
        device: target.device,
        bitmap: mask.bits(),
        channels: mask.iter().collect(),
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => print_table(
            ["CHANNEL", "POPULATED"],
            (0..32u8)
                .filter(|c| *c < 8 || mask.contains(*c))
                .map(|c| {
                    let populated = if mask.contains(c) { "yes" } else { "no" };
                    vec![c.to_string(), populated.to_string()]
                }),
        ),
        OutputFormat::Pretty => {
            println!("Device {}:", out.device);
            println!("  Bitmap:   0x{:08x}", out.bitmap);
            let list = out
                .channels
                .iter()
                .map(u8::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            println!("  Channels: {}", if list.is_empty() { "none" } else { &list });
        }
        OutputFormat::Raw => println!("{}", out.bitmap),
    }

    Ok(exit_code(mask))
}

/// A card that answers but reports no populated channel has no sensor attached.
fn exit_code(mask: ChannelMask) -> i32 {
    if mask.is_empty() {
        FAILURE
    } else {
        SUCCESS
    }
}
