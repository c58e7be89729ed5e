// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Request code bit layout and constructors
//!
//! All field widths, shifts and direction values live in this module. Most
//! Linux architectures use the `asm-generic` layout (14 size bits, 2 direction
//! bits). mips, powerpc and sparc reserve 13 size bits and 3 direction bits
//! and number the directions differently; those values are selected by
//! `target_arch` so codes computed here always match the host kernel headers.
//!
//! The `const fn` constructors ([`ioc`], [`io`], [`ior`], [`iow`], [`iowr`])
//! mask every field to its width, exactly like the C macros, and are what the
//! device-class tables are built from. [`Codec`] adds structured layouts and a
//! choice of [`RangePolicy`] for codes computed at runtime.

use std::{fmt, ops::BitOr};

use crate::code::{CodeField, CommandCode, Fields};
use crate::layout::Layout;
use crate::Error;

#[cfg(any(
    target_arch = "mips",
    target_arch = "mips64",
    target_arch = "powerpc",
    target_arch = "powerpc64",
    target_arch = "sparc",
    target_arch = "sparc64",
))]
mod arch {
    pub const SIZEBITS: u32 = 13;
    pub const DIRBITS: u32 = 3;

    pub const NONE: u32 = 1;
    pub const READ: u32 = 2;
    pub const WRITE: u32 = 4;
}

#[cfg(not(any(
    target_arch = "mips",
    target_arch = "mips64",
    target_arch = "powerpc",
    target_arch = "powerpc64",
    target_arch = "sparc",
    target_arch = "sparc64",
)))]
mod arch {
    pub const SIZEBITS: u32 = 14;
    pub const DIRBITS: u32 = 2;

    pub const NONE: u32 = 0;
    pub const READ: u32 = 2;
    pub const WRITE: u32 = 1;
}

/// Width of the sequence number field
pub const NRBITS: u32 = 8;
/// Width of the type (magic) field
pub const TYPEBITS: u32 = 8;
/// Width of the argument size field
pub const SIZEBITS: u32 = arch::SIZEBITS;
/// Width of the direction field
pub const DIRBITS: u32 = arch::DIRBITS;

pub const NRMASK: u32 = (1 << NRBITS) - 1;
pub const TYPEMASK: u32 = (1 << TYPEBITS) - 1;
pub const SIZEMASK: u32 = (1 << SIZEBITS) - 1;
pub const DIRMASK: u32 = (1 << DIRBITS) - 1;

pub const NRSHIFT: u32 = 0;
pub const TYPESHIFT: u32 = NRSHIFT + NRBITS;
pub const SIZESHIFT: u32 = TYPESHIFT + TYPEBITS;
pub const DIRSHIFT: u32 = SIZESHIFT + SIZEBITS;

/// Largest argument size, in bytes, the size field can carry
pub const MAX_SIZE: usize = SIZEMASK as usize;

const READ_WRITE: u32 = arch::READ | arch::WRITE;

/// Data transfer direction, seen from userspace
///
/// `Read` means the kernel writes the argument and userspace reads it back;
/// `Write` means userspace supplies the argument. `ReadWrite` is the union of
/// the two bits and has no pattern of its own.
///
/// # Example
///
/// ```
/// use ioctl_numbers::ioc::Direction;
///
/// assert_eq!(Direction::Read | Direction::Write, Direction::ReadWrite);
/// assert_eq!(Direction::None | Direction::Read, Direction::Read);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Direction {
    /// No argument is transferred (`_IO`)
    None = arch::NONE,

    /// Userspace writes the argument (`_IOW`)
    Write = arch::WRITE,

    /// Userspace reads the argument (`_IOR`)
    Read = arch::READ,

    /// Argument is transferred both ways (`_IOWR`)
    ReadWrite = READ_WRITE,
}

impl Direction {
    /// Raw value of the direction field
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Convert from a raw direction field value
    ///
    /// Returns `None` for bit patterns the host ABI does not define.
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            arch::NONE => Some(Direction::None),
            arch::READ => Some(Direction::Read),
            arch::WRITE => Some(Direction::Write),
            READ_WRITE => Some(Direction::ReadWrite),
            _ => None,
        }
    }

    /// Convert from a raw direction field value, keeping only the read and
    /// write bits
    pub const fn from_bits_truncate(bits: u32) -> Self {
        match bits & READ_WRITE {
            READ_WRITE => Direction::ReadWrite,
            arch::READ => Direction::Read,
            arch::WRITE => Direction::Write,
            _ => Direction::None,
        }
    }

    /// Bitwise union of two directions
    pub const fn union(self, other: Direction) -> Self {
        Self::from_bits_truncate(self.bits() | other.bits())
    }

    pub const fn is_read(self) -> bool {
        self.bits() & arch::READ != 0
    }

    pub const fn is_write(self) -> bool {
        self.bits() & arch::WRITE != 0
    }

    /// Name of the matching kernel macro
    pub fn macro_name(&self) -> &'static str {
        match self {
            Direction::None => "_IO",
            Direction::Read => "_IOR",
            Direction::Write => "_IOW",
            Direction::ReadWrite => "_IOWR",
        }
    }

    /// Get human-readable name for this direction
    ///
    /// # Returns
    ///
    /// A static string: "none", "read", "write" or "read-write"
    pub fn name(&self) -> &'static str {
        match self {
            Direction::None => "none",
            Direction::Read => "read",
            Direction::Write => "write",
            Direction::ReadWrite => "read-write",
        }
    }
}

impl BitOr for Direction {
    type Output = Direction;

    fn bitor(self, rhs: Direction) -> Direction {
        self.union(rhs)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Pack four fields into a request code, masking each to its width (`_IOC`)
pub const fn ioc(dir: Direction, ty: u32, nr: u32, size: usize) -> CommandCode {
    let size = (size & MAX_SIZE) as u32;
    CommandCode::from_raw(
        (dir.bits() & DIRMASK) << DIRSHIFT
            | size << SIZESHIFT
            | (ty & TYPEMASK) << TYPESHIFT
            | (nr & NRMASK) << NRSHIFT,
    )
}

/// Request without an argument (`_IO`)
pub const fn io(ty: u32, nr: u32) -> CommandCode {
    ioc(Direction::None, ty, nr, 0)
}

/// Request whose argument the kernel fills in (`_IOR`)
pub const fn ior(ty: u32, nr: u32, size: usize) -> CommandCode {
    ioc(Direction::Read, ty, nr, size)
}

/// Request whose argument userspace supplies (`_IOW`)
pub const fn iow(ty: u32, nr: u32, size: usize) -> CommandCode {
    ioc(Direction::Write, ty, nr, size)
}

/// Request whose argument travels both ways (`_IOWR`)
pub const fn iowr(ty: u32, nr: u32, size: usize) -> CommandCode {
    ioc(Direction::ReadWrite, ty, nr, size)
}

/// Extract the four fields of a raw request code
pub const fn decode(raw: u32) -> Fields {
    Fields {
        direction: Direction::from_bits_truncate((raw >> DIRSHIFT) & DIRMASK),
        kind: ((raw >> TYPESHIFT) & TYPEMASK) as u8,
        number: ((raw >> NRSHIFT) & NRMASK) as u8,
        size: ((raw >> SIZESHIFT) & SIZEMASK) as u16,
    }
}

/// Argument size of a request
///
/// Either a literal byte count or a packed [`Layout`] whose encoded length is
/// used as the size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSpec<'a> {
    Bytes(usize),
    Layout(Layout<'a>),
}

impl SizeSpec<'_> {
    /// Size in bytes
    pub fn byte_len(&self) -> Result<usize, Error> {
        match self {
            SizeSpec::Bytes(len) => Ok(*len),
            SizeSpec::Layout(layout) => layout.byte_len(),
        }
    }
}

impl From<usize> for SizeSpec<'_> {
    fn from(len: usize) -> Self {
        SizeSpec::Bytes(len)
    }
}

impl<'a> From<Layout<'a>> for SizeSpec<'a> {
    fn from(layout: Layout<'a>) -> Self {
        SizeSpec::Layout(layout)
    }
}

impl<'a> From<&Layout<'a>> for SizeSpec<'a> {
    fn from(layout: &Layout<'a>) -> Self {
        SizeSpec::Layout(*layout)
    }
}

/// Handling of field values wider than their bit field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RangePolicy {
    /// Reject the value with [`Error::InvalidFieldRange`]
    #[default]
    Strict,

    /// Keep the low bits, as the kernel macros do
    Wrap,
}

/// Runtime request code encoder
///
/// # Example
///
/// ```
/// use ioctl_numbers::ioc::{Codec, RangePolicy};
///
/// let strict = Codec::default();
/// assert!(strict.make_read(0x1ff, 1, 1usize).is_err());
///
/// let wrap = Codec::new(RangePolicy::Wrap);
/// assert_eq!(wrap.make_read(0x1ff, 1, 1usize)?.kind(), 0xff);
/// # Ok::<(), ioctl_numbers::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Codec {
    policy: RangePolicy,
}

impl Codec {
    pub const STRICT: Codec = Codec::new(RangePolicy::Strict);
    pub const WRAP: Codec = Codec::new(RangePolicy::Wrap);

    pub const fn new(policy: RangePolicy) -> Self {
        Codec { policy }
    }

    pub const fn policy(&self) -> RangePolicy {
        self.policy
    }

    /// Build a request code from its four fields
    ///
    /// Structured layouts are sized first; the size is the packed sum of
    /// their field widths. Under [`RangePolicy::Strict`] a type or number
    /// above 255, or a size above [`MAX_SIZE`], fails. Under
    /// [`RangePolicy::Wrap`] those values are truncated to their low bits.
    pub fn encode<'a>(
        &self,
        dir: Direction,
        ty: u32,
        nr: u32,
        size: impl Into<SizeSpec<'a>>,
    ) -> Result<CommandCode, Error> {
        let size = size.into().byte_len()?;

        self.check(CodeField::Type, ty as u64, TYPEMASK)?;
        self.check(CodeField::Number, nr as u64, NRMASK)?;
        self.check(CodeField::Size, size as u64, SIZEMASK)?;

        let code = ioc(dir, ty, nr, size);
        log::trace!(
            "{}({:#x}, {}, {}) = {}",
            dir.macro_name(),
            ty,
            nr,
            size,
            code
        );
        Ok(code)
    }

    /// Equivalent to `encode(Direction::Read, ..)`
    pub fn make_read<'a>(
        &self,
        ty: u32,
        nr: u32,
        size: impl Into<SizeSpec<'a>>,
    ) -> Result<CommandCode, Error> {
        self.encode(Direction::Read, ty, nr, size)
    }

    /// Equivalent to `encode(Direction::Write, ..)`
    pub fn make_write<'a>(
        &self,
        ty: u32,
        nr: u32,
        size: impl Into<SizeSpec<'a>>,
    ) -> Result<CommandCode, Error> {
        self.encode(Direction::Write, ty, nr, size)
    }

    /// Equivalent to `encode(Direction::ReadWrite, ..)`
    pub fn make_read_write<'a>(
        &self,
        ty: u32,
        nr: u32,
        size: impl Into<SizeSpec<'a>>,
    ) -> Result<CommandCode, Error> {
        self.encode(Direction::ReadWrite, ty, nr, size)
    }

    /// Equivalent to `encode(Direction::None, ty, nr, 0)`
    pub fn make_none(&self, ty: u32, nr: u32) -> Result<CommandCode, Error> {
        self.encode(Direction::None, ty, nr, 0usize)
    }

    fn check(&self, field: CodeField, value: u64, mask: u32) -> Result<(), Error> {
        if value <= u64::from(mask) {
            return Ok(());
        }

        match self.policy {
            RangePolicy::Strict => Err(Error::InvalidFieldRange {
                field,
                value,
                max: mask,
            }),
            RangePolicy::Wrap => {
                log::debug!(
                    "{} field {:#x} truncated to {:#x}",
                    field,
                    value,
                    value & u64::from(mask)
                );
                Ok(())
            }
        }
    }
}
