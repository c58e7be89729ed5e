// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::CliError;
use ioctl_numbers::ioc::RangePolicy;
use ioctl_numbers::CommandCode;
use serde::Serialize;

/// Parse an integer in decimal, `0x` hex, `0o` octal or `0b` binary
///
/// Underscores are accepted as digit separators.
///
/// # Examples
/// ```ignore
/// assert_eq!(parse_number("0x6b").unwrap(), 107);
/// assert_eq!(parse_number("1_000").unwrap(), 1000);
/// ```
pub fn parse_number(s: &str) -> Result<u64, CliError> {
    let cleaned: String = s.trim().chars().filter(|&c| c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();

    let (digits, radix) = if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        (oct, 8)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        (bin, 2)
    } else {
        (lower.as_str(), 10)
    };

    if digits.is_empty() {
        return Err(CliError::InvalidArgs(format!("Invalid number: {:?}", s)));
    }

    u64::from_str_radix(digits, radix)
        .map_err(|_| CliError::InvalidArgs(format!("Invalid number: {:?}", s)))
}

/// Parse a type (magic) argument: a single character such as `k` or `'k'`,
/// or a number such as `107` or `0x6b`
///
/// A lone decimal digit is read as a number, not as a character.
pub fn parse_type(s: &str) -> Result<u64, CliError> {
    let trimmed = s.trim();
    let unquoted = trimmed
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .unwrap_or(trimmed);

    let mut chars = unquoted.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if unquoted.len() != trimmed.len() || !c.is_ascii_digit() {
            if !c.is_ascii() {
                return Err(CliError::InvalidArgs(format!(
                    "Type character must be ASCII: {:?}",
                    s
                )));
            }
            return Ok(u64::from(c as u8));
        }
    }

    parse_number(trimmed)
}

/// Narrow a parsed value to `u32`, leaving field ranges to the codec
///
/// Under [`RangePolicy::Wrap`] the high bits are dropped, as the codec would
/// drop them from the field anyway.
pub fn to_u32(value: u64, what: &str, policy: RangePolicy) -> Result<u32, CliError> {
    match (u32::try_from(value), policy) {
        (Ok(value), _) => Ok(value),
        (Err(_), RangePolicy::Wrap) => {
            log::debug!("{} {:#x} truncated to 32 bits", what, value);
            Ok(value as u32)
        }
        (Err(_), RangePolicy::Strict) => Err(CliError::OutOfRange(format!(
            "{} {:#x} does not fit in 32 bits",
            what, value
        ))),
    }
}

/// Serializable view of a request code
#[derive(Debug, Serialize)]
pub struct CodeInfo {
    pub code: String,
    pub value: u32,
    pub direction: &'static str,
    #[serde(rename = "type")]
    pub kind: u8,
    pub nr: u8,
    pub size: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
}

impl CodeInfo {
    pub fn new(code: CommandCode, name: Option<&'static str>) -> Self {
        let fields = code.fields();
        CodeInfo {
            code: code.to_string(),
            value: code.raw(),
            direction: fields.direction.name(),
            kind: fields.kind,
            nr: fields.number,
            size: fields.size,
            name,
        }
    }
}

/// Print a request code as one text line: hex value, fields, table name
pub fn print_code(code: CommandCode, name: Option<&str>) {
    match name {
        Some(name) => println!("{}  {}  {}", code, code.fields(), name),
        None => println!("{}  {}", code, code.fields()),
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json_str = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::General(format!("JSON serialization failed: {}", e)))?;
    println!("{}", json_str);
    Ok(())
}
