// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies
//
// Request Code Tests
//
// TESTING LAYERS:
//
// Layer 1 (Kernel values):
//   - spidev and watchdog constants against the values produced by the
//     kernel headers on the generic ABI
//
// Layer 2 (Properties):
//   - Determinism and decode/encode round trips over random in-range fields
//   - Field isolation: changing one input changes only its bit field
//
// RUN:
//   cargo test --test request_codes

use ioctl_numbers::ioc::{self, Codec, Direction, RangePolicy};
use ioctl_numbers::layout::{self, Field, Layout};
use ioctl_numbers::spi::{Mode, Spi};
use ioctl_numbers::watchdog::Watchdog;
use ioctl_numbers::{CommandCode, Error};
use rand::{rngs::StdRng, Rng, SeedableRng};

const DIRECTIONS: [Direction; 4] = [
    Direction::None,
    Direction::Read,
    Direction::Write,
    Direction::ReadWrite,
];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(0x6b01)
}

// =============================================================================
// Layer 1: Kernel Values
// =============================================================================

#[cfg(not(any(
    target_arch = "mips",
    target_arch = "mips64",
    target_arch = "powerpc",
    target_arch = "powerpc64",
    target_arch = "sparc",
    target_arch = "sparc64",
)))]
mod kernel_values {
    use super::*;

    #[test]
    fn test_spi_codes() {
        assert_eq!(Spi::MAGIC, 0x6b);
        assert_eq!(Spi::RD_MODE.raw(), 0x8001_6b01);
        assert_eq!(Spi::WR_MODE.raw(), 0x4001_6b01);
        assert_eq!(Spi::RD_LSB_FIRST.raw(), 0x8001_6b02);
        assert_eq!(Spi::WR_LSB_FIRST.raw(), 0x4001_6b02);
        assert_eq!(Spi::RD_BITS_PER_WORD.raw(), 0x8001_6b03);
        assert_eq!(Spi::WR_BITS_PER_WORD.raw(), 0x4001_6b03);
        assert_eq!(Spi::RD_MAX_SPEED_HZ.raw(), 0x8004_6b04);
        assert_eq!(Spi::WR_MAX_SPEED_HZ.raw(), 0x4004_6b04);
        assert_eq!(Spi::RD_MODE32.raw(), 0x8004_6b05);
        assert_eq!(Spi::WR_MODE32.raw(), 0x4004_6b05);
    }

    #[test]
    fn test_spi_message_codes() {
        assert_eq!(Spi::message(1).raw(), 0x4020_6b00);
        assert_eq!(Spi::message(2).raw(), 0x4040_6b00);
        assert_eq!(Spi::message(511).raw(), 0x7fe0_6b00);
        assert_eq!(Spi::message(512).raw(), 0x4000_6b00);
    }

    #[test]
    fn test_watchdog_codes() {
        assert_eq!(Watchdog::GETSUPPORT.raw(), 0x8028_5700);
        assert_eq!(Watchdog::GETSTATUS.raw(), 0x8004_5701);
        assert_eq!(Watchdog::KEEPALIVE.raw(), 0x8004_5705);
        assert_eq!(Watchdog::SETTIMEOUT.raw(), 0xc004_5706);
        assert_eq!(Watchdog::GETTIMELEFT.raw(), 0x8004_570a);
    }

    #[test]
    fn test_encode_read_mode() {
        let code = Codec::default()
            .encode(Direction::Read, 0x6b, 1, 1usize)
            .unwrap();
        assert_eq!(code.raw(), 0x8001_6b01);
        assert_eq!(format!("{}", code), "0x80016B01");
    }

    #[test]
    fn test_recipe_format_strings() {
        let byte = layout::parse_format("=B").unwrap();
        let word = layout::parse_format("=I").unwrap();
        let codec = Codec::default();

        assert_eq!(
            codec.make_read(u32::from(b'k'), 1, Layout::new(&byte)).unwrap(),
            Spi::RD_MODE
        );
        assert_eq!(
            codec
                .make_write(u32::from(b'k'), 4, Layout::new(&word))
                .unwrap(),
            Spi::WR_MAX_SPEED_HZ
        );
    }
}

#[test]
fn test_support_layout_from_format_string() {
    let fields = layout::parse_format("=II32s").unwrap();
    let code = Codec::default()
        .make_read(u32::from(Watchdog::MAGIC), 0, Layout::new(&fields))
        .unwrap();
    assert_eq!(code, Watchdog::GETSUPPORT);
}

#[test]
fn test_spi_mode_constants() {
    assert_eq!(Mode::CPHA.bits(), 0x01);
    assert_eq!(Mode::CPOL.bits(), 0x02);
    assert_eq!(Mode::MODE_0.bits(), 0);
    assert_eq!(Mode::MODE_1.bits(), Mode::CPHA.bits());
    assert_eq!(Mode::MODE_2.bits(), Mode::CPOL.bits());
    assert_eq!(Mode::MODE_3.bits(), Mode::CPOL.bits() | Mode::CPHA.bits());
}

// =============================================================================
// Layer 2: Properties
// =============================================================================

#[test]
fn test_encode_is_deterministic() {
    let codec = Codec::default();
    let mut rng = rng();
    for _ in 0..256 {
        let dir = DIRECTIONS[rng.random_range(0..4)];
        let ty = rng.random_range(0..=ioc::TYPEMASK);
        let nr = rng.random_range(0..=ioc::NRMASK);
        let size = rng.random_range(0..=ioc::MAX_SIZE);
        assert_eq!(
            codec.encode(dir, ty, nr, size),
            codec.encode(dir, ty, nr, size)
        );
    }
}

#[test]
fn test_decode_round_trip() {
    let codec = Codec::default();
    let mut rng = rng();
    for _ in 0..1024 {
        let dir = DIRECTIONS[rng.random_range(0..4)];
        let ty = rng.random_range(0..=ioc::TYPEMASK);
        let nr = rng.random_range(0..=ioc::NRMASK);
        let size = rng.random_range(0..=ioc::MAX_SIZE);

        let code = codec.encode(dir, ty, nr, size).unwrap();
        let fields = ioc::decode(code.raw());
        assert_eq!(fields.direction, dir);
        assert_eq!(u32::from(fields.kind), ty);
        assert_eq!(u32::from(fields.number), nr);
        assert_eq!(usize::from(fields.size), size);
        assert_eq!(fields.encode(), code);
    }
}

#[test]
fn test_direction_field_of_constructors() {
    let codec = Codec::default();
    let field = |code: CommandCode| (code.raw() >> ioc::DIRSHIFT) & ioc::DIRMASK;

    let read = codec.make_read(0x6b, 1, 1usize).unwrap();
    let write = codec.make_write(0x6b, 1, 1usize).unwrap();
    let both = codec.make_read_write(0x6b, 1, 1usize).unwrap();

    assert_eq!(field(read), Direction::Read.bits());
    assert_eq!(field(write), Direction::Write.bits());
    assert_eq!(field(both), Direction::Read.bits() | Direction::Write.bits());
    assert_eq!(field(both), field(read) | field(write));
    // only the direction field differs
    let dir_field = ioc::DIRMASK << ioc::DIRSHIFT;
    assert_eq!(both.raw() & !dir_field, read.raw() & !dir_field);
}

#[test]
fn test_sequence_number_isolated() {
    let codec = Codec::default();
    let mut rng = rng();
    for _ in 0..256 {
        let dir = DIRECTIONS[rng.random_range(0..4)];
        let ty = rng.random_range(0..=ioc::TYPEMASK);
        let size = rng.random_range(0..=ioc::MAX_SIZE);
        let a = rng.random_range(0..=ioc::NRMASK);
        let b = rng.random_range(0..=ioc::NRMASK);

        let x = codec.encode(dir, ty, a, size).unwrap().raw();
        let y = codec.encode(dir, ty, b, size).unwrap().raw();
        let nr_field = ioc::NRMASK << ioc::NRSHIFT;
        assert_eq!((x ^ y) & !nr_field, 0);
    }
}

#[test]
fn test_make_none_ignores_inputs_for_size_and_direction() {
    let codec = Codec::default();
    let mut rng = rng();
    for _ in 0..64 {
        let ty = rng.random_range(0..=ioc::TYPEMASK);
        let nr = rng.random_range(0..=ioc::NRMASK);
        let code = codec.make_none(ty, nr).unwrap();
        assert_eq!(code.size(), 0);
        assert_eq!(code.direction(), Direction::None);
    }
}

#[test]
fn test_policies_disagree_only_out_of_range() {
    init_logging();
    let strict = Codec::new(RangePolicy::Strict);
    let wrap = Codec::new(RangePolicy::Wrap);

    assert_eq!(
        strict.make_read(0x6b, 1, 1usize),
        wrap.make_read(0x6b, 1, 1usize)
    );

    assert!(matches!(
        strict.make_read(0x100 + 0x6b, 1, 1usize),
        Err(Error::InvalidFieldRange { .. })
    ));
    assert_eq!(wrap.make_read(0x100 + 0x6b, 1, 1usize), Ok(Spi::RD_MODE));

    assert!(strict.make_write(0x6b, 0, ioc::MAX_SIZE + 1).is_err());
    assert_eq!(wrap.make_write(0x6b, 0, ioc::MAX_SIZE + 1).unwrap().size(), 0);
}

#[test]
fn test_unsupported_layout() {
    let fields = [Field::U8, Field::unsigned(7)];
    for codec in [Codec::STRICT, Codec::WRAP] {
        assert!(matches!(
            codec.make_read(0x6b, 1, Layout::new(&fields)),
            Err(Error::UnsupportedLayout { position: 1, .. })
        ));
    }
}

#[test]
fn test_concurrent_use() {
    let handles: Vec<_> = (0..4u32)
        .map(|nr| {
            std::thread::spawn(move || {
                Codec::default()
                    .make_read(u32::from(Spi::MAGIC), nr + 1, 1usize)
                    .unwrap()
            })
        })
        .collect();
    let codes: Vec<CommandCode> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(codes[0], Spi::RD_MODE);
    assert_eq!(codes[1], Spi::RD_LSB_FIRST);
    assert_eq!(codes[2], Spi::RD_BITS_PER_WORD);
}
