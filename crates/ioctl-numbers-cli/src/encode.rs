// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Build a request code from its fields.

use crate::error::CliError;
use crate::table::lookup;
use crate::utils::{parse_number, parse_type, print_code, print_json, to_u32, CodeInfo};
use clap::{Args as ClapArgs, ValueEnum};
use ioctl_numbers::ioc::{Codec, Direction, RangePolicy, SizeSpec};
use ioctl_numbers::layout::{self, Layout};

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Transfer direction, seen from userspace
    #[arg(short, long, value_enum, default_value_t = DirectionArg::None)]
    dir: DirectionArg,

    /// Type (magic) byte, as a character (k) or a number (0x6b)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    kind: String,

    /// Sequence number
    #[arg(short, long)]
    nr: String,

    /// Argument size in bytes
    #[arg(short, long, conflicts_with = "layout")]
    size: Option<String>,

    /// Argument layout as a packed struct format string starting with =, <, > or !, e.g. "=II32s"
    #[arg(short, long)]
    layout: Option<String>,

    /// Truncate out-of-range fields like the kernel macros instead of failing
    #[arg(long)]
    wrap: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectionArg {
    None,
    Read,
    Write,
    ReadWrite,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Direction {
        match arg {
            DirectionArg::None => Direction::None,
            DirectionArg::Read => Direction::Read,
            DirectionArg::Write => Direction::Write,
            DirectionArg::ReadWrite => Direction::Read | Direction::Write,
        }
    }
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing encode command: {:?}", args);

    let policy = if args.wrap {
        RangePolicy::Wrap
    } else {
        RangePolicy::Strict
    };
    let codec = Codec::new(policy);

    let direction = Direction::from(args.dir);
    let kind = to_u32(parse_type(&args.kind)?, "type", policy)?;
    let nr = to_u32(parse_number(&args.nr)?, "number", policy)?;

    let fields = match &args.layout {
        Some(format) => layout::parse_format(format)?,
        None => Vec::new(),
    };
    let size = match (&args.size, &args.layout) {
        (Some(size), _) => {
            let bytes = usize::try_from(parse_number(size)?).map_err(|_| {
                CliError::OutOfRange(format!("size {} does not fit in memory", size))
            })?;
            SizeSpec::Bytes(bytes)
        }
        (None, Some(_)) => SizeSpec::Layout(Layout::new(&fields)),
        (None, None) => SizeSpec::Bytes(0),
    };
    log::debug!("argument size: {:?}", size);

    let code = codec.encode(direction, kind, nr, size)?;
    let name = lookup(code).map(|request| request.name);

    if json {
        print_json(&CodeInfo::new(code, name))?;
    } else {
        print_code(code, name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_arg() {
        assert_eq!(Direction::from(DirectionArg::None), Direction::None);
        assert_eq!(Direction::from(DirectionArg::Read), Direction::Read);
        assert_eq!(Direction::from(DirectionArg::Write), Direction::Write);
        assert_eq!(
            Direction::from(DirectionArg::ReadWrite),
            Direction::ReadWrite
        );
    }
}
