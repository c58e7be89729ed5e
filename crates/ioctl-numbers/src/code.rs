// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Request code value type
//!
//! - [`CommandCode`] - a packed 32-bit request code
//! - [`Fields`] - the four fields of a request code, unpacked
//! - [`CodeField`] - names of the four fields, used in errors
//! - [`NamedRequest`] - a table entry pairing a kernel macro name with its code

use core::{fmt, result::Result};

use crate::ioc::{self, Direction};

/// A packed ioctl request code
///
/// This is the value passed as the `request` argument of `ioctl(2)`.
/// Construct one through the [`ioc`] constructors, [`ioc::Codec`], or from a
/// raw integer with [`CommandCode::from_raw`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct CommandCode(u32);

impl CommandCode {
    pub const fn from_raw(raw: u32) -> Self {
        CommandCode(raw)
    }

    /// The packed 32-bit value
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// All four fields at once
    pub const fn fields(self) -> Fields {
        ioc::decode(self.0)
    }

    pub const fn direction(self) -> Direction {
        self.fields().direction
    }

    /// The type (magic) field
    pub const fn kind(self) -> u8 {
        self.fields().kind
    }

    /// The sequence number field
    pub const fn number(self) -> u8 {
        self.fields().number
    }

    /// The argument size field, in bytes
    pub const fn size(self) -> u16 {
        self.fields().size
    }
}

impl From<u32> for CommandCode {
    fn from(raw: u32) -> CommandCode {
        CommandCode(raw)
    }
}

impl From<CommandCode> for u32 {
    fn from(code: CommandCode) -> Self {
        code.0
    }
}

impl From<CommandCode> for u64 {
    fn from(code: CommandCode) -> Self {
        u64::from(code.0)
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{:#010X}", self.0)
    }
}

impl fmt::Debug for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let fields = self.fields();
        f.debug_tuple("CommandCode")
            .field(&format_args!("{:#010X}", self.0))
            .field(&fields)
            .finish()
    }
}

impl fmt::LowerHex for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

/// The four fields of a request code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fields {
    pub direction: Direction,
    /// Type (magic) byte identifying the driver family
    pub kind: u8,
    /// Sequence number within the driver family
    pub number: u8,
    /// Argument size in bytes
    pub size: u16,
}

impl Fields {
    /// Pack the fields back into a request code
    pub const fn encode(self) -> CommandCode {
        ioc::ioc(
            self.direction,
            self.kind as u32,
            self.number as u32,
            self.size as usize,
        )
    }
}

impl From<CommandCode> for Fields {
    fn from(code: CommandCode) -> Fields {
        code.fields()
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "dir={} type={:#04x}", self.direction, self.kind)?;
        if self.kind.is_ascii_graphic() {
            write!(f, " ('{}')", self.kind as char)?;
        }
        write!(f, " nr={} size={}", self.number, self.size)
    }
}

/// A request code field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeField {
    Direction,
    Type,
    Number,
    Size,
}

impl CodeField {
    pub fn name(&self) -> &'static str {
        match self {
            CodeField::Direction => "direction",
            CodeField::Type => "type",
            CodeField::Number => "number",
            CodeField::Size => "size",
        }
    }
}

impl fmt::Display for CodeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(self.name())
    }
}

/// A device-class table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamedRequest {
    /// Kernel macro name, e.g. `SPI_IOC_RD_MODE`
    pub name: &'static str,
    pub code: CommandCode,
    /// C type of the argument, e.g. `__u8`
    pub argument: &'static str,
}
