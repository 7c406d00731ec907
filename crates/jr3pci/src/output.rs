use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_table<H, R>(header: H, rows: R)
where
    H: IntoIterator,
    H::Item: Into<comfy_table::Cell>,
    R: IntoIterator<Item = Vec<String>>,
{
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    for row in rows {
        table.add_row(row);
    }
    println!("{table}");
}

/// `0x1234` form used for offsets and register words.
pub fn hex(value: impl Into<u32>) -> String {
    format!("0x{:04x}", value.into())
}

/// Parse a decimal or `0x`-prefixed hexadecimal number.
pub fn parse_number(input: &str) -> Option<u64> {
    let input = input.trim();
    match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(digits) => u64::from_str_radix(digits, 16).ok(),
        None => input.parse().ok(),
    }
}

/// Register offset: decimal or hex, must fit in 32 bits.
pub fn parse_offset(input: &str) -> Option<u32> {
    parse_number(input).and_then(|v| u32::try_from(v).ok())
}

/// Register word: decimal, hex, or a negative value stored as two's complement.
pub fn parse_word(input: &str) -> Option<u16> {
    let input = input.trim();
    if input.starts_with('-') {
        return input.parse::<i16>().ok().map(|v| v as u16);
    }
    parse_number(input).and_then(|v| u16::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_accept_decimal_and_hex() {
        assert_eq!(parse_offset("144"), Some(0x90));
        assert_eq!(parse_offset("0x90"), Some(0x90));
        assert_eq!(parse_offset("0XE8"), Some(0xe8));
        assert_eq!(parse_offset("0x100000000"), None);
        assert_eq!(parse_offset("zz"), None);
        assert_eq!(parse_offset("-1"), None);
    }

    #[test]
    fn words_accept_negative_values() {
        assert_eq!(parse_word("0xCAFE"), Some(0xCAFE));
        assert_eq!(parse_word("-5"), Some(0xFFFB));
        assert_eq!(parse_word("65535"), Some(0xFFFF));
        assert_eq!(parse_word("65536"), None);
        assert_eq!(parse_word("-40000"), None);
    }

    #[test]
    fn hex_pads_to_four_digits() {
        assert_eq!(hex(0x9u16), "0x0009");
        assert_eq!(hex(0x8000_2008u32), "0x80002008");
    }
}
