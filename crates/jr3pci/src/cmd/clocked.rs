use jr3pci_device::ForceArray;

use crate::cmd::{check_filter, ClockedArgs, Target};
use crate::exit::{device_error, CliResult, SUCCESS};
use crate::output::{print_json, print_table, OutputFormat};

pub fn run(args: ClockedArgs, target: &Target, format: OutputFormat) -> CliResult<i32> {
    check_filter(args.filter)?;
    let mut card = target.open()?;
    let sample = card
        .clocked_force_array(target.channel, args.filter)
        .map_err(|err| device_error(&format!("filter {} read failed", args.filter), err))?;

    let values = sample.forces.to_array();
    match format {
        OutputFormat::Json => print_json(&sample),
        OutputFormat::Table => {
            let header = std::iter::once("count").chain(ForceArray::FIELDS);
            let row = std::iter::once(sample.count.to_string())
                .chain(values.iter().map(i16::to_string))
                .collect();
            print_table(header, [row]);
        }
        OutputFormat::Pretty => {
            let fields = ForceArray::FIELDS
                .iter()
                .zip(values)
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join(" ");
            println!("#{} {fields}", sample.count);
        }
        OutputFormat::Raw => {
            let fields = values
                .iter()
                .map(i16::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            println!("{} {fields}", sample.count);
        }
    }

    Ok(SUCCESS)
}
