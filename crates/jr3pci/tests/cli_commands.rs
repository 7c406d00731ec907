#![cfg(feature = "cli")]

use std::process::{Command, Output};

fn jr3pci(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jr3pci"))
        .env_remove("JR3PCI_DEVICE")
        .env_remove("JR3PCI_CHANNEL")
        .env_remove("JR3PCI_SIMULATE")
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("jr3pci should run")
}

fn json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("stdout should be json")
}

#[test]
fn version_prints_package_version() {
    let output = jr3pci(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("jr3pci {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn extended_version_reports_library_version() {
    let output = jr3pci(&["version", "--extended"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("library_version: 2"));
}

#[test]
fn simulated_channels_report_channel_zero() {
    let output = jr3pci(&["--simulate", "--format", "json", "channels"]);
    assert!(output.status.success());
    let payload = json(&output);
    assert_eq!(payload["bitmap"], 1);
    assert_eq!(payload["channels"], serde_json::json!([0]));
}

#[test]
fn simulate_can_come_from_environment() {
    let output = Command::new(env!("CARGO_BIN_EXE_jr3pci"))
        .env("JR3PCI_SIMULATE", "true")
        .args(["--format", "raw", "channels"])
        .output()
        .expect("jr3pci should run");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1");
}

#[test]
fn read_accepts_hex_offsets_and_counts() {
    let output = jr3pci(&[
        "--simulate",
        "--format",
        "json",
        "read",
        "0x80",
        "--count",
        "3",
    ]);
    assert!(output.status.success());
    let payload = json(&output);
    let words = payload.as_array().expect("array of words");
    assert_eq!(words.len(), 3);
    assert_eq!(words[0]["offset"], 0x80);
    assert_eq!(words[0]["value"], 100);
    assert_eq!(words[2]["value"], 200);
}

#[test]
fn read_rejects_bad_offset_with_usage_code() {
    let output = jr3pci(&["--simulate", "read", "nope"]);
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid offset"));
}

#[test]
fn write_reports_the_word_written() {
    let output = jr3pci(&["--simulate", "--format", "json", "write", "0x55", "-2"]);
    assert!(output.status.success());
    let payload = json(&output);
    assert_eq!(payload["offset"], 0x55);
    assert_eq!(payload["value"], 0xFFFE);
    assert_eq!(payload["written"], true);
}

#[test]
fn forces_print_signed_fields() {
    let output = jr3pci(&[
        "--simulate",
        "--format",
        "json",
        "forces",
        "--filter",
        "0",
    ]);
    assert!(output.status.success());
    let payload = json(&output);
    assert_eq!(payload["scaled"], false);
    assert_eq!(payload["forces"]["fx"], 1647);
    assert_eq!(payload["forces"]["fy"], -813);
}

#[test]
fn scaled_forces_use_full_scale() {
    let output = jr3pci(&[
        "--simulate",
        "--format",
        "json",
        "forces",
        "--filter",
        "6",
        "--scaled",
    ]);
    assert!(output.status.success());
    let payload = json(&output);
    let fz = payload["forces"]["fz"].as_f64().expect("fz is a number");
    assert!((fz - 8193.0 / 16384.0 * 200.0).abs() < 1e-9);
}

#[test]
fn forces_reject_missing_filter() {
    let output = jr3pci(&["--simulate", "forces", "--filter", "7"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn clocked_sample_carries_counter() {
    let output = jr3pci(&[
        "--simulate",
        "--format",
        "json",
        "clocked",
        "--filter",
        "1",
    ]);
    assert!(output.status.success());
    let payload = json(&output);
    assert_eq!(payload["count"], 0xFF00);
    assert_eq!(payload["fx"], 1646);
}

#[test]
fn info_reports_calibration_image() {
    let output = jr3pci(&["--simulate", "--format", "json", "info"]);
    assert!(output.status.success());
    let payload = json(&output);
    assert_eq!(payload["copyright"], "CALIBRATION DATA COPYRIGHT JR3 INC.");
    assert_eq!(payload["offsets"], serde_json::json!([12, -8, 40, 0, -3, 1]));
    assert_eq!(payload["full_scale_limits"][2]["max"], 800);
}

#[test]
fn info_reports_settings_shunts_and_peaks() {
    let output = jr3pci(&["--simulate", "--format", "json", "info"]);
    assert!(output.status.success());
    let payload = json(&output);
    assert_eq!(payload["settings"]["vector_axes"], 63);
    assert_eq!(payload["shunts"][0], 2148);
    assert_eq!(payload["peaks"]["max"]["fz"], 9874);
}

#[test]
fn stream_stops_after_requested_samples() {
    let output = jr3pci(&[
        "--simulate",
        "--format",
        "json",
        "stream",
        "--filter",
        "1",
        "--samples",
        "3",
        "--interval",
        "0",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let samples: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is json"))
        .collect();
    assert_eq!(samples.len(), 3);
    assert_eq!(samples[0]["elapsed_s"], 0.0);
    assert_eq!(samples[1]["count"], 0xFF01);
    let elapsed = samples[2]["elapsed_s"].as_f64().expect("elapsed is a number");
    assert!((elapsed - 2.0 / 8000.0).abs() < 1e-12);
}

#[test]
fn stream_records_samples_to_csv() {
    let path = std::env::temp_dir().join(format!("jr3pci-stream-{}.csv", std::process::id()));
    let path_arg = path.to_string_lossy().into_owned();
    let output = jr3pci(&[
        "--simulate",
        "stream",
        "--samples",
        "3",
        "--interval",
        "0",
        "--output",
        &path_arg,
    ]);
    assert!(output.status.success());

    let csv = std::fs::read_to_string(&path).expect("csv file should exist");
    let _ = std::fs::remove_file(&path);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "elapsed_s,count,fx,fy,fz,mx,my,mz,v1,v2");
    assert!(lines[1].starts_with("0,65280,1646,"));
    assert!(lines[2].starts_with("0.000125,65281,"));
}

#[test]
fn stream_output_into_missing_directory_is_unavailable() {
    let output = jr3pci(&[
        "--simulate",
        "stream",
        "--samples",
        "1",
        "--output",
        "/nonexistent-jr3pci-dir/forces.csv",
    ]);
    assert_eq!(output.status.code(), Some(69));
}

#[test]
fn stream_rejects_unclocked_filter() {
    let output = jr3pci(&["--simulate", "stream", "--filter", "0", "--samples", "1"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn devices_in_simulate_mode_find_index_zero() {
    let output = jr3pci(&["--simulate", "--format", "json", "devices", "--max", "2"]);
    assert!(output.status.success());
    let payload = json(&output);
    assert_eq!(payload[0]["present"], true);
    assert_eq!(payload[0]["bitmap"], 1);
    assert_eq!(payload[1]["present"], false);
}

#[cfg(not(windows))]
#[test]
fn real_driver_is_unavailable_off_windows() {
    let output = jr3pci(&["channels"]);
    assert_eq!(output.status.code(), Some(69));
    assert!(String::from_utf8_lossy(&output.stderr).contains("open failed"));
}
