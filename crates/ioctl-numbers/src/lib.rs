// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! ioctl-numbers for Rust
//!
//! Bit-exact construction of Linux device-control request codes, the
//! integers built by the kernel's `_IO`, `_IOR`, `_IOW` and `_IOWR` macros and
//! passed as the `request` argument of `ioctl(2)`.
//!
//! A request code packs four fields into 32 bits. On the generic kernel ABI
//! (x86, arm, aarch64, riscv and most others) the layout is:
//!
//! | Bits  | Field     | Width |
//! |-------|-----------|-------|
//! | 31-30 | direction | 2     |
//! | 29-16 | size      | 14    |
//! | 15-8  | type      | 8     |
//! | 7-0   | number    | 8     |
//!
//! The crate performs no I/O. Codes are computed at compile time for the
//! device-class tables and at runtime through [`ioc::Codec`], and are then
//! handed to whatever performs the actual system call.
//!
//! # Quick Start
//!
//! ## Using a Device-Class Table
//!
//! ```
//! use ioctl_numbers::spi::{Mode, Spi};
//!
//! assert_eq!(Spi::RD_MODE.raw(), 0x8001_6B01);
//! assert_eq!(Spi::WR_MODE.raw(), 0x4001_6B01);
//!
//! // Mode flags travel as the argument of SPI_IOC_WR_MODE, not in the code.
//! let mode = Mode::CPOL | Mode::CPHA;
//! assert_eq!(mode, Mode::MODE_3);
//! ```
//!
//! ## Encoding at Runtime
//!
//! ```
//! use ioctl_numbers::ioc::{Codec, Direction};
//! use ioctl_numbers::layout::{self, Layout};
//!
//! let codec = Codec::default();
//! let fields = layout::parse_format("=II32s")?;
//! let code = codec.make_read(u32::from(b'W'), 0, Layout::new(&fields))?;
//! assert_eq!(code.raw(), 0x8028_5700);
//!
//! let decoded = code.fields();
//! assert_eq!(decoded.direction, Direction::Read);
//! assert_eq!(decoded.size, 40);
//! # Ok::<(), ioctl_numbers::Error>(())
//! ```
//!
//! # Range Policy
//!
//! The kernel macros never validate their inputs; an oversized type, number
//! or size silently loses its high bits. The `const fn` constructors in
//! [`ioc`] reproduce that so existing constant tables stay bit-exact.
//! [`ioc::Codec`] defaults to [`ioc::RangePolicy::Strict`] and reports
//! [`Error::InvalidFieldRange`] instead; [`ioc::RangePolicy::Wrap`] restores
//! the truncating behaviour.

#![forbid(unsafe_code)]

use std::{error, fmt};

use code::CodeField;
use layout::LayoutIssue;

/// Error type for request code construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A field value does not fit the bit width reserved for it
    InvalidFieldRange {
        /// The request code field that overflowed
        field: CodeField,
        /// The value that was supplied
        value: u64,
        /// The largest value the field can hold
        max: u32,
    },

    /// A structured layout could not be reduced to a whole number of bytes
    ///
    /// `position` is the index of the offending field, or the byte offset
    /// into the format string when the layout came from
    /// [`layout::parse_format`].
    UnsupportedLayout { position: usize, issue: LayoutIssue },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidFieldRange { field, value, max } => write!(
                f,
                "{} field out of range: {:#x} exceeds {:#x}",
                field, value, max
            ),
            Error::UnsupportedLayout { position, issue } => {
                write!(f, "unsupported layout at position {}: {}", position, issue)
            }
        }
    }
}

impl error::Error for Error {}

/// The code module provides the request code value type and its decoding.
pub mod code;

/// The ioc module provides the bit layout and the request code constructors.
pub mod ioc;

/// The layout module provides packed structured-layout descriptors.
pub mod layout;

/// The spi module provides the spidev request codes and mode flags.
pub mod spi;

/// The watchdog module provides the watchdog request codes.
pub mod watchdog;

pub use code::{CommandCode, Fields};
pub use ioc::{Codec, Direction, RangePolicy, SizeSpec};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidFieldRange {
            field: CodeField::Type,
            value: 0x100,
            max: 0xff,
        };
        assert_eq!(
            format!("{}", err),
            "type field out of range: 0x100 exceeds 0xff"
        );

        let err = Error::UnsupportedLayout {
            position: 2,
            issue: LayoutIssue::FractionalWidth(12),
        };
        assert_eq!(
            format!("{}", err),
            "unsupported layout at position 2: width of 12 bits is not a whole number of bytes"
        );
    }
}
