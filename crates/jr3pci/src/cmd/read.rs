use serde::Serialize;

use crate::cmd::{ReadArgs, Target};
use crate::exit::{device_error, CliError, CliResult, SUCCESS};
use crate::output::{hex, parse_offset, print_json, print_table, OutputFormat};

#[derive(Serialize)]
struct WordOutput {
    offset: u32,
    value: u16,
    signed: i16,
}

pub fn run(args: ReadArgs, target: &Target, format: OutputFormat) -> CliResult<i32> {
    let offset = parse_offset(&args.offset)
        .ok_or_else(|| CliError::usage(format!("invalid offset: {}", args.offset)))?;
    if args.count == 0 {
        return Err(CliError::usage("count must be greater than zero"));
    }

    let mut card = target.open()?;
    let mut words = vec![0u16; args.count as usize];
    card.read_words_into(target.channel, offset, &mut words)
        .map_err(|err| device_error(&format!("read at {} failed", hex(offset)), err))?;

    let out: Vec<WordOutput> = words
        .iter()
        .enumerate()
        .map(|(i, &value)| WordOutput {
            offset: offset.wrapping_add(i as u32),
            value,
            signed: value as i16,
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => print_table(
            ["OFFSET", "HEX", "UNSIGNED", "SIGNED"],
            out.iter().map(|w| {
                vec![
                    hex(w.offset),
                    hex(w.value),
                    w.value.to_string(),
                    w.signed.to_string(),
                ]
            }),
        ),
        OutputFormat::Pretty => {
            for w in &out {
                println!("{}: {} ({})", hex(w.offset), hex(w.value), w.signed);
            }
        }
        OutputFormat::Raw => {
            for w in &out {
                println!("{}", w.value);
            }
        }
    }

    Ok(SUCCESS)
}
