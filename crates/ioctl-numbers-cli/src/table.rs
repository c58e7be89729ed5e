// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Known request codes, grouped by device class.

use crate::error::CliError;
use crate::utils::{print_json, CodeInfo};
use clap::{Args as ClapArgs, ValueEnum};
use ioctl_numbers::code::NamedRequest;
use ioctl_numbers::spi::{Mode, Spi};
use ioctl_numbers::watchdog::Watchdog;
use ioctl_numbers::CommandCode;
use serde::Serialize;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Device class to list (all classes when omitted)
    #[arg(value_enum)]
    class: Option<DeviceClass>,

    /// Also list SPI_IOC_MESSAGE(N) for N = 1..=COUNT
    #[arg(long, value_name = "COUNT", default_value_t = 1)]
    messages: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Spi,
    Watchdog,
}

impl DeviceClass {
    fn title(&self) -> &'static str {
        match self {
            DeviceClass::Spi => "SPI (spidev)",
            DeviceClass::Watchdog => "Watchdog",
        }
    }

    fn magic(&self) -> u8 {
        match self {
            DeviceClass::Spi => Spi::MAGIC,
            DeviceClass::Watchdog => Watchdog::MAGIC,
        }
    }

    fn requests(&self) -> &'static [NamedRequest] {
        match self {
            DeviceClass::Spi => Spi::REQUESTS,
            DeviceClass::Watchdog => Watchdog::REQUESTS,
        }
    }
}

#[derive(Debug, Serialize)]
struct TableOutput {
    classes: Vec<ClassOutput>,
}

#[derive(Debug, Serialize)]
struct ClassOutput {
    name: &'static str,
    magic: u8,
    requests: Vec<RequestOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    flags: Vec<FlagOutput>,
}

#[derive(Debug, Serialize)]
struct RequestOutput {
    name: String,
    argument: String,
    #[serde(flatten)]
    info: CodeInfo,
}

#[derive(Debug, Serialize)]
struct FlagOutput {
    name: &'static str,
    value: u8,
}

/// Find the table entry for a request code
pub fn lookup(code: CommandCode) -> Option<&'static NamedRequest> {
    Spi::REQUESTS
        .iter()
        .chain(Watchdog::REQUESTS.iter())
        .find(|request| request.code == code)
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing table command: {:?}", args);

    let classes = match args.class {
        Some(class) => vec![class],
        None => vec![DeviceClass::Spi, DeviceClass::Watchdog],
    };

    let output = TableOutput {
        classes: classes
            .iter()
            .map(|class| collect_class(*class, args.messages))
            .collect(),
    };

    if json {
        print_json(&output)?;
    } else {
        print_text_output(&output);
    }

    Ok(())
}

fn collect_class(class: DeviceClass, messages: usize) -> ClassOutput {
    let mut requests: Vec<RequestOutput> = class
        .requests()
        .iter()
        .map(|request| RequestOutput {
            name: request.name.to_string(),
            argument: request.argument.to_string(),
            info: CodeInfo::new(request.code, None),
        })
        .collect();

    let mut flags = Vec::new();

    if class == DeviceClass::Spi {
        for count in 1..=messages {
            let size = Spi::message_size(count);
            if size == 0 {
                log::warn!(
                    "SPI_IOC_MESSAGE({}) does not fit the size field, stopping",
                    count
                );
                break;
            }
            requests.push(RequestOutput {
                name: format!("SPI_IOC_MESSAGE({})", count),
                argument: format!("struct spi_ioc_transfer[{}]", count),
                info: CodeInfo::new(Spi::message(count), None),
            });
        }

        flags = Mode::FLAGS
            .iter()
            .map(|(name, mode)| FlagOutput {
                name: *name,
                value: mode.bits(),
            })
            .chain(
                [
                    ("SPI_MODE_0", Mode::MODE_0),
                    ("SPI_MODE_1", Mode::MODE_1),
                    ("SPI_MODE_2", Mode::MODE_2),
                    ("SPI_MODE_3", Mode::MODE_3),
                ]
                .into_iter()
                .map(|(name, mode)| FlagOutput {
                    name,
                    value: mode.bits(),
                }),
            )
            .collect();
    }

    ClassOutput {
        name: class.title(),
        magic: class.magic(),
        requests,
        flags,
    }
}

fn print_text_output(output: &TableOutput) {
    for (i, class) in output.classes.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} (magic '{}')", class.name, class.magic as char);
        println!("{}", "=".repeat(class.name.len() + 12));

        let width = class
            .requests
            .iter()
            .map(|r| r.name.len())
            .max()
            .unwrap_or(0);
        for request in &class.requests {
            println!(
                "  {:<width$}  {}  {}",
                request.name,
                request.info.code,
                request.argument,
                width = width
            );
        }

        if !class.flags.is_empty() {
            println!();
            println!("Mode flags:");
            for flag in &class.flags {
                println!("  {:<14}  {:#04x}", flag.name, flag.value);
            }
        }
    }
}
