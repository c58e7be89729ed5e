// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Packed structured-layout descriptors
//!
//! A [`Layout`] describes an ioctl argument as an ordered list of primitive
//! [`Field`]s. Its size is the plain sum of the field widths: there is no
//! padding and no alignment, matching the packed `struct` notation kernel
//! headers are usually transcribed into (`"=II32s"` for `struct
//! watchdog_info`). Layouts are built either statically from `const` field
//! lists or by [`parse_format`] from such a format string.
//!
//! ```
//! use ioctl_numbers::layout::{self, Field, Layout};
//!
//! const TRANSFER: Layout<'static> =
//!     Layout::new(&[Field::U8, Field::U32, Field::bytes(32)]);
//! assert_eq!(TRANSFER.byte_len(), Ok(37));
//!
//! let parsed = layout::parse_format("=BI32s")?;
//! assert_eq!(Layout::new(&parsed).byte_len(), Ok(37));
//! # Ok::<(), ioctl_numbers::Error>(())
//! ```

use std::fmt;

use crate::Error;

/// Byte order of a multi-byte field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    #[default]
    Native,
    Little,
    Big,
}

/// Interpretation of a field's bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signedness {
    Unsigned,
    Signed,
    Float,
    Bool,
    Char,
    /// Opaque bytes, such as a fixed-length string
    Raw,
    /// Bytes that carry no data
    Padding,
}

/// Reason a layout cannot be sized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutIssue {
    /// A numeric field with no bits
    ZeroWidth,
    /// A width, in bits, that is not a multiple of eight
    FractionalWidth(u64),
    /// The total length does not fit in `usize`, or a parsed format
    /// describes more bytes than the size field can carry
    TooLarge,
    /// A format code with no known width
    UnknownCode(char),
    /// Native sizes and alignment, asked for by `@` or by a format string
    /// with no byte-order prefix
    NativeAlignment,
    /// A repeat count with no format code after it
    MissingCode,
}

impl fmt::Display for LayoutIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutIssue::ZeroWidth => write!(f, "numeric field has zero width"),
            LayoutIssue::FractionalWidth(bits) => {
                write!(f, "width of {} bits is not a whole number of bytes", bits)
            }
            LayoutIssue::TooLarge => write!(f, "total length is too large"),
            LayoutIssue::UnknownCode(c) => write!(f, "unknown format code '{}'", c),
            LayoutIssue::NativeAlignment => {
                write!(
                    f,
                    "native alignment ('@' or no prefix) is not supported, layouts are packed"
                )
            }
            LayoutIssue::MissingCode => write!(f, "repeat count without a format code"),
        }
    }
}

/// One primitive field of a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    signedness: Signedness,
    bits: u64,
    order: ByteOrder,
}

impl Field {
    pub const U8: Field = Field::unsigned(8);
    pub const U16: Field = Field::unsigned(16);
    pub const U32: Field = Field::unsigned(32);
    pub const U64: Field = Field::unsigned(64);
    pub const I8: Field = Field::signed(8);
    pub const I16: Field = Field::signed(16);
    pub const I32: Field = Field::signed(32);
    pub const I64: Field = Field::signed(64);

    pub const fn new(signedness: Signedness, bits: u64, order: ByteOrder) -> Self {
        Field {
            signedness,
            bits,
            order,
        }
    }

    pub const fn unsigned(bits: u64) -> Self {
        Field::new(Signedness::Unsigned, bits, ByteOrder::Native)
    }

    pub const fn signed(bits: u64) -> Self {
        Field::new(Signedness::Signed, bits, ByteOrder::Native)
    }

    pub const fn float(bits: u64) -> Self {
        Field::new(Signedness::Float, bits, ByteOrder::Native)
    }

    pub const fn boolean() -> Self {
        Field::new(Signedness::Bool, 8, ByteOrder::Native)
    }

    pub const fn char() -> Self {
        Field::new(Signedness::Char, 8, ByteOrder::Native)
    }

    /// `len` opaque bytes
    pub const fn bytes(len: u32) -> Self {
        Field::new(Signedness::Raw, len as u64 * 8, ByteOrder::Native)
    }

    /// `len` bytes of padding
    pub const fn padding(len: u32) -> Self {
        Field::new(Signedness::Padding, len as u64 * 8, ByteOrder::Native)
    }

    pub const fn with_order(self, order: ByteOrder) -> Self {
        Field { order, ..self }
    }

    pub const fn signedness(&self) -> Signedness {
        self.signedness
    }

    /// Width in bits
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    pub const fn order(&self) -> ByteOrder {
        self.order
    }

    /// Width in bytes
    ///
    /// Raw and padding fields may be empty; numeric fields may not.
    pub const fn byte_len(&self) -> Result<usize, LayoutIssue> {
        if self.bits == 0 {
            return match self.signedness {
                Signedness::Raw | Signedness::Padding => Ok(0),
                _ => Err(LayoutIssue::ZeroWidth),
            };
        }
        if self.bits % 8 != 0 {
            return Err(LayoutIssue::FractionalWidth(self.bits));
        }
        let len = self.bits / 8;
        if len > usize::MAX as u64 {
            return Err(LayoutIssue::TooLarge);
        }
        Ok(len as usize)
    }
}

/// An ordered, packed list of fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layout<'a> {
    fields: &'a [Field],
}

impl<'a> Layout<'a> {
    pub const fn new(fields: &'a [Field]) -> Self {
        Layout { fields }
    }

    pub const fn fields(&self) -> &'a [Field] {
        self.fields
    }

    /// Total encoded length in bytes
    ///
    /// Fails with [`Error::UnsupportedLayout`] naming the index of the first
    /// field that cannot be sized.
    pub const fn byte_len(&self) -> Result<usize, Error> {
        let mut total: usize = 0;
        let mut i = 0;
        while i < self.fields.len() {
            let len = match self.fields[i].byte_len() {
                Ok(len) => len,
                Err(issue) => return Err(Error::UnsupportedLayout { position: i, issue }),
            };
            total = match total.checked_add(len) {
                Some(total) => total,
                None => {
                    return Err(Error::UnsupportedLayout {
                        position: i,
                        issue: LayoutIssue::TooLarge,
                    })
                }
            };
            i += 1;
        }
        Ok(total)
    }
}

/// Parse a packed `struct`-module format string into fields
///
/// The first character selects the byte order: `=` native, `<`
/// little-endian, `>` or `!` big-endian. The `@` prefix, and a non-empty
/// format with no prefix, request native sizes and alignment and are
/// rejected with [`LayoutIssue::NativeAlignment`]. Codes use standard sizes:
///
/// | Code | Field | Bytes |
/// |------|-------|-------|
/// | `x` | padding | 1 |
/// | `c` | char | 1 |
/// | `b` `B` | signed / unsigned | 1 |
/// | `?` | bool | 1 |
/// | `h` `H` | signed / unsigned | 2 |
/// | `i` `I` `l` `L` | signed / unsigned | 4 |
/// | `q` `Q` | signed / unsigned | 8 |
/// | `e` `f` `d` | float | 2 / 4 / 8 |
/// | `s` `p` | raw bytes | count |
///
/// A decimal count before a code repeats it; for `s`, `p` and `x` the count
/// is the byte length of a single field. Whitespace between codes is ignored.
/// A format describing more than [`MAX_SIZE`](crate::ioc::MAX_SIZE) bytes in
/// total fails with [`LayoutIssue::TooLarge`].
pub fn parse_format(format: &str) -> Result<Vec<Field>, Error> {
    let mut chars = format.char_indices().peekable();
    let prefix = chars.peek().copied();
    let order = match prefix {
        Some((_, '=')) => ByteOrder::Native,
        Some((_, '<')) => ByteOrder::Little,
        Some((_, '>')) | Some((_, '!')) => ByteOrder::Big,
        _ if format.trim().is_empty() => return Ok(Vec::new()),
        // '@' or no prefix at all
        _ => {
            return Err(Error::UnsupportedLayout {
                position: 0,
                issue: LayoutIssue::NativeAlignment,
            })
        }
    };
    chars.next();
    parse_codes(chars, order, format)
}

fn parse_codes(
    mut chars: std::iter::Peekable<std::str::CharIndices<'_>>,
    order: ByteOrder,
    format: &str,
) -> Result<Vec<Field>, Error> {
    let mut fields = Vec::new();
    let mut total: u64 = 0;
    let too_large = |position| Error::UnsupportedLayout {
        position,
        issue: LayoutIssue::TooLarge,
    };

    while let Some((pos, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }

        let (count, code_pos, code) = if c.is_ascii_digit() {
            let mut count = u64::from(c as u8 - b'0');
            let mut next = None;
            for (p, d) in chars.by_ref() {
                match d.to_digit(10) {
                    Some(digit) => {
                        count = count.saturating_mul(10).saturating_add(u64::from(digit));
                    }
                    None => {
                        next = Some((p, d));
                        break;
                    }
                }
            }
            match next {
                Some((p, d)) if !d.is_whitespace() => (Some(count), p, d),
                _ => {
                    return Err(Error::UnsupportedLayout {
                        position: pos,
                        issue: LayoutIssue::MissingCode,
                    })
                }
            }
        } else {
            (None, pos, c)
        };

        let field = match code {
            'x' => Field::padding(0),
            'c' => Field::char(),
            'b' => Field::I8,
            'B' => Field::U8,
            '?' => Field::boolean(),
            'h' => Field::I16,
            'H' => Field::U16,
            'i' | 'l' => Field::I32,
            'I' | 'L' => Field::U32,
            'q' => Field::I64,
            'Q' => Field::U64,
            'e' => Field::float(16),
            'f' => Field::float(32),
            'd' => Field::float(64),
            's' | 'p' => Field::bytes(0),
            other => {
                return Err(Error::UnsupportedLayout {
                    position: code_pos,
                    issue: LayoutIssue::UnknownCode(other),
                })
            }
        };
        let field = field.with_order(order);

        let count = count.unwrap_or(1);
        let (repeat, width) = match field.signedness() {
            // the count is the length of one field
            Signedness::Raw | Signedness::Padding => (1, count),
            _ => (count, field.bits() / 8),
        };
        total = repeat
            .checked_mul(width)
            .and_then(|len| total.checked_add(len))
            .filter(|&total| total <= crate::ioc::MAX_SIZE as u64)
            .ok_or_else(|| too_large(pos))?;

        match field.signedness() {
            Signedness::Raw | Signedness::Padding => {
                fields.push(Field::new(field.signedness(), width * 8, order));
            }
            _ => fields.extend(std::iter::repeat(field).take(repeat as usize)),
        }
    }

    log::trace!("parsed format {:?} into {} fields", format, fields.len());
    Ok(fields)
}
