use serde::Serialize;

use crate::cmd::{Target, WriteArgs};
use crate::exit::{device_error, CliError, CliResult, SUCCESS};
use crate::output::{hex, parse_offset, parse_word, print_json, OutputFormat};

#[derive(Serialize)]
struct WriteOutput {
    channel: u8,
    offset: u32,
    value: u16,
    written: bool,
}

pub fn run(args: WriteArgs, target: &Target, format: OutputFormat) -> CliResult<i32> {
    let offset = parse_offset(&args.offset)
        .ok_or_else(|| CliError::usage(format!("invalid offset: {}", args.offset)))?;
    let value = parse_word(&args.value)
        .ok_or_else(|| CliError::usage(format!("invalid word value: {}", args.value)))?;

    let mut card = target.open()?;
    card.write_word(target.channel, offset, value)
        .map_err(|err| device_error(&format!("write at {} failed", hex(offset)), err))?;

    let out = WriteOutput {
        channel: target.channel,
        offset,
        value,
        written: true,
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!(
                "wrote {} to channel {} offset {}",
                hex(out.value),
                out.channel,
                hex(out.offset)
            );
        }
        OutputFormat::Raw => {}
    }

    Ok(SUCCESS)
}
