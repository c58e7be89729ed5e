// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Split request codes back into their fields.

use crate::error::CliError;
use crate::table::lookup;
use crate::utils::{parse_number, print_code, print_json, CodeInfo};
use clap::Args as ClapArgs;
use ioctl_numbers::CommandCode;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Request codes to decode, e.g. 0x80016b01
    #[arg(required = true, value_name = "CODE")]
    codes: Vec<String>,
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing decode command: {:?}", args);

    let codes = args
        .codes
        .iter()
        .map(|s| parse_code(s))
        .collect::<Result<Vec<_>, _>>()?;

    if json {
        let infos: Vec<CodeInfo> = codes
            .iter()
            .map(|&code| CodeInfo::new(code, lookup(code).map(|r| r.name)))
            .collect();
        print_json(&infos)?;
    } else {
        for code in codes {
            print_code(code, lookup(code).map(|r| r.name));
        }
    }

    Ok(())
}

fn parse_code(s: &str) -> Result<CommandCode, CliError> {
    let value = parse_number(s)?;
    let raw = u32::try_from(value).map_err(|_| {
        CliError::InvalidArgs(format!("request codes are 32 bits wide: {}", s))
    })?;
    Ok(CommandCode::from_raw(raw))
}
