use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("jr3pci {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: jr3pci");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("library_version: {}", jr3pci_device::LIBRARY_VERSION);
    println!(
        "build_target: {}",
        option_env!("JR3PCI_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "driver_transport: {}",
        if cfg!(windows) {
            "DeviceIoControl"
        } else {
            "unavailable (simulate only)"
        }
    );

    Ok(SUCCESS)
}
