use jr3pci_device::ForceArray;
use serde::Serialize;

use crate::cmd::{check_filter, ForcesArgs, Target};
use crate::exit::{device_error, CliResult, SUCCESS};
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Serialize)]
struct ForcesOutput<T: Serialize> {
    channel: u8,
    filter: u8,
    scaled: bool,
    forces: T,
}

pub fn run(args: ForcesArgs, target: &Target, format: OutputFormat) -> CliResult<i32> {
    check_filter(args.filter)?;
    let mut card = target.open()?;
    let context = format!("filter {} read failed", args.filter);

    if args.scaled {
        let forces = card
            .scaled_forces(target.channel, args.filter)
            .map_err(|err| device_error(&context, err))?;
        let values = forces.to_array().map(|v| format!("{v:.3}"));
        print_forces(
            &ForcesOutput {
                channel: target.channel,
                filter: args.filter,
                scaled: true,
                forces,
            },
            &values,
            format,
        );
    } else {
        let forces = card
            .force_array(target.channel, args.filter)
            .map_err(|err| device_error(&context, err))?;
        let values = forces.to_array().map(|v| v.to_string());
        print_forces(
            &ForcesOutput {
                channel: target.channel,
                filter: args.filter,
                scaled: false,
                forces,
            },
            &values,
            format,
        );
    }

    Ok(SUCCESS)
}

fn print_forces<T: Serialize>(out: &ForcesOutput<T>, values: &[String], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => print_table(ForceArray::FIELDS, [values.to_vec()]),
        OutputFormat::Pretty => {
            let fields = ForceArray::FIELDS
                .iter()
                .zip(values)
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join(" ");
            println!("channel={} filter={} {fields}", out.channel, out.filter);
        }
        OutputFormat::Raw => println!("{}", values.join(" ")),
    }
}
