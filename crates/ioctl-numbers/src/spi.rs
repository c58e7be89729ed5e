// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! SPI userspace (`spidev`) requests
//!
//! Request codes from `<linux/spi/spidev.h>` and the mode flags from
//! `<linux/spi/spi.h>`. The codes are computed at compile time.
//!
//! # Example
//!
//! ```
//! use ioctl_numbers::spi::{Mode, Spi};
//!
//! // Set clock mode 3 through SPI_IOC_WR_MODE
//! let request = Spi::WR_MODE;
//! let argument: u8 = Mode::MODE_3.bits();
//! assert_eq!(request.size() as usize, std::mem::size_of_val(&argument));
//!
//! // One full-duplex transfer
//! assert_eq!(Spi::message(1).size(), 32);
//! ```

use std::{
    fmt,
    mem::size_of,
    ops::{BitOr, BitOrAssign},
};

use crate::code::{CommandCode, NamedRequest};
use crate::ioc::{ior, iow, SIZEBITS};
use crate::layout::{Field, Layout};

/// The spidev device class
///
/// Zero-sized; all request codes are associated constants.
pub struct Spi;

impl Spi {
    /// `SPI_IOC_MAGIC`
    pub const MAGIC: u8 = b'k';

    pub const RD_MODE: CommandCode = ior(Self::MAGIC as u32, 1, size_of::<u8>());
    pub const WR_MODE: CommandCode = iow(Self::MAGIC as u32, 1, size_of::<u8>());

    pub const RD_LSB_FIRST: CommandCode = ior(Self::MAGIC as u32, 2, size_of::<u8>());
    pub const WR_LSB_FIRST: CommandCode = iow(Self::MAGIC as u32, 2, size_of::<u8>());

    pub const RD_BITS_PER_WORD: CommandCode = ior(Self::MAGIC as u32, 3, size_of::<u8>());
    pub const WR_BITS_PER_WORD: CommandCode = iow(Self::MAGIC as u32, 3, size_of::<u8>());

    pub const RD_MAX_SPEED_HZ: CommandCode = ior(Self::MAGIC as u32, 4, size_of::<u32>());
    pub const WR_MAX_SPEED_HZ: CommandCode = iow(Self::MAGIC as u32, 4, size_of::<u32>());

    /// Full 32-bit mode word
    pub const RD_MODE32: CommandCode = ior(Self::MAGIC as u32, 5, size_of::<u32>());
    pub const WR_MODE32: CommandCode = iow(Self::MAGIC as u32, 5, size_of::<u32>());

    /// `struct spi_ioc_transfer`
    pub const TRANSFER_LAYOUT: Layout<'static> = Layout::new(&[
        Field::U64, // tx_buf
        Field::U64, // rx_buf
        Field::U32, // len
        Field::U32, // speed_hz
        Field::U16, // delay_usecs
        Field::U8,  // bits_per_word
        Field::U8,  // cs_change
        Field::U8,  // tx_nbits
        Field::U8,  // rx_nbits
        Field::U8,  // word_delay_usecs
        Field::padding(1),
    ]);

    pub const TRANSFER_SIZE: usize = match Self::TRANSFER_LAYOUT.byte_len() {
        Ok(len) => len,
        Err(_) => panic!("spi_ioc_transfer layout must be byte sized"),
    };

    /// Argument size of a request carrying `count` transfers (`SPI_MSGSIZE`)
    ///
    /// Zero when the array does not fit the size field.
    pub const fn message_size(count: usize) -> usize {
        match count.checked_mul(Self::TRANSFER_SIZE) {
            Some(len) if len < (1 << SIZEBITS) => len,
            _ => 0,
        }
    }

    /// `SPI_IOC_MESSAGE(count)`
    pub const fn message(count: usize) -> CommandCode {
        iow(Self::MAGIC as u32, 0, Self::message_size(count))
    }

    /// Every fixed request of the class, in header order
    pub const REQUESTS: &'static [NamedRequest] = &[
        NamedRequest {
            name: "SPI_IOC_RD_MODE",
            code: Self::RD_MODE,
            argument: "__u8",
        },
        NamedRequest {
            name: "SPI_IOC_WR_MODE",
            code: Self::WR_MODE,
            argument: "__u8",
        },
        NamedRequest {
            name: "SPI_IOC_RD_LSB_FIRST",
            code: Self::RD_LSB_FIRST,
            argument: "__u8",
        },
        NamedRequest {
            name: "SPI_IOC_WR_LSB_FIRST",
            code: Self::WR_LSB_FIRST,
            argument: "__u8",
        },
        NamedRequest {
            name: "SPI_IOC_RD_BITS_PER_WORD",
            code: Self::RD_BITS_PER_WORD,
            argument: "__u8",
        },
        NamedRequest {
            name: "SPI_IOC_WR_BITS_PER_WORD",
            code: Self::WR_BITS_PER_WORD,
            argument: "__u8",
        },
        NamedRequest {
            name: "SPI_IOC_RD_MAX_SPEED_HZ",
            code: Self::RD_MAX_SPEED_HZ,
            argument: "__u32",
        },
        NamedRequest {
            name: "SPI_IOC_WR_MAX_SPEED_HZ",
            code: Self::WR_MAX_SPEED_HZ,
            argument: "__u32",
        },
        NamedRequest {
            name: "SPI_IOC_RD_MODE32",
            code: Self::RD_MODE32,
            argument: "__u32",
        },
        NamedRequest {
            name: "SPI_IOC_WR_MODE32",
            code: Self::WR_MODE32,
            argument: "__u32",
        },
    ];
}

/// SPI mode flags
///
/// Passed as the argument of [`Spi::WR_MODE`]; never part of a request code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mode(u8);

impl Mode {
    /// Clock phase
    pub const CPHA: Mode = Mode(0x01);
    /// Clock polarity
    pub const CPOL: Mode = Mode(0x02);

    /// Original MicroWire
    pub const MODE_0: Mode = Mode(0);
    pub const MODE_1: Mode = Self::CPHA;
    pub const MODE_2: Mode = Self::CPOL;
    pub const MODE_3: Mode = Self::CPOL.union(Self::CPHA);

    /// Chip select active high
    pub const CS_HIGH: Mode = Mode(0x04);
    pub const LSB_FIRST: Mode = Mode(0x08);
    /// SI/SO signals shared
    pub const THREE_WIRE: Mode = Mode(0x10);
    /// Loopback
    pub const LOOP: Mode = Mode(0x20);
    /// One device per bus, no chip select
    pub const NO_CS: Mode = Mode(0x40);
    /// Slave pulls low to pause
    pub const READY: Mode = Mode(0x80);

    /// Named single-bit flags
    pub const FLAGS: &'static [(&'static str, Mode)] = &[
        ("SPI_CPHA", Self::CPHA),
        ("SPI_CPOL", Self::CPOL),
        ("SPI_CS_HIGH", Self::CS_HIGH),
        ("SPI_LSB_FIRST", Self::LSB_FIRST),
        ("SPI_3WIRE", Self::THREE_WIRE),
        ("SPI_LOOP", Self::LOOP),
        ("SPI_NO_CS", Self::NO_CS),
        ("SPI_READY", Self::READY),
    ];

    pub const fn from_bits(bits: u8) -> Self {
        Mode(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn union(self, other: Mode) -> Self {
        Mode(self.0 | other.0)
    }

    pub const fn contains(self, other: Mode) -> bool {
        self.0 & other.0 == other.0
    }

    /// Clock mode 0-3 from CPOL and CPHA
    pub const fn clock_mode(self) -> u8 {
        self.0 & (Self::CPOL.0 | Self::CPHA.0)
    }
}

impl BitOr for Mode {
    type Output = Mode;

    fn bitor(self, rhs: Mode) -> Mode {
        self.union(rhs)
    }
}

impl BitOrAssign for Mode {
    fn bitor_assign(&mut self, rhs: Mode) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::FLAGS
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect();
        if names.is_empty() {
            write!(f, "SPI_MODE_0")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ioc::Direction;

    #[test]
    fn test_read_write_differ_only_in_direction() {
        let rd = Spi::RD_MODE.fields();
        let wr = Spi::WR_MODE.fields();
        assert_eq!(rd.direction, Direction::Read);
        assert_eq!(wr.direction, Direction::Write);
        assert_eq!((rd.kind, rd.number, rd.size), (wr.kind, wr.number, wr.size));
    }

    #[test]
    fn test_speed_differs_in_number_and_size() {
        let mode = Spi::RD_MODE.fields();
        let speed = Spi::RD_MAX_SPEED_HZ.fields();
        assert_eq!(mode.direction, speed.direction);
        assert_eq!(mode.kind, speed.kind);
        assert_eq!((mode.number, mode.size), (1, 1));
        assert_eq!((speed.number, speed.size), (4, 4));
    }

    #[test]
    fn test_transfer_size() {
        assert_eq!(Spi::TRANSFER_SIZE, 32);
        assert_eq!(Spi::message_size(0), 0);
        assert_eq!(Spi::message_size(3), 96);
        assert_eq!(Spi::message_size(usize::MAX), 0);
    }

    #[test]
    fn test_message_overflow_encodes_zero_size() {
        let too_many = (1 << SIZEBITS) / Spi::TRANSFER_SIZE;
        assert_eq!(Spi::message(too_many).size(), 0);
        assert_eq!(
            Spi::message(too_many - 1).size() as usize,
            (too_many - 1) * 32
        );
    }

    #[test]
    fn test_mode_flags() {
        assert_eq!(Mode::MODE_0.bits(), 0);
        assert_eq!(Mode::MODE_1, Mode::CPHA);
        assert_eq!(Mode::MODE_2, Mode::CPOL);
        assert_eq!(Mode::MODE_3, Mode::CPOL | Mode::CPHA);
        assert_eq!(Mode::MODE_3.bits(), 0x03);

        let mut mode = Mode::MODE_2;
        mode |= Mode::CS_HIGH;
        assert!(mode.contains(Mode::CPOL));
        assert!(!mode.contains(Mode::CPHA));
        assert_eq!(mode.clock_mode(), 2);
        assert_eq!(mode.bits(), 0x06);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(format!("{}", Mode::MODE_0), "SPI_MODE_0");
        assert_eq!(format!("{}", Mode::MODE_3), "SPI_CPHA|SPI_CPOL");
        assert_eq!(
            format!("{}", Mode::from_bits(0x18)),
            "SPI_LSB_FIRST|SPI_3WIRE"
        );
    }

    #[test]
    fn test_table_is_complete() {
        assert_eq!(Spi::REQUESTS.len(), 10);
        assert!(Spi::REQUESTS.iter().all(|r| r.code.kind() == Spi::MAGIC));
    }
}
