// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Watchdog device requests from `<linux/watchdog.h>`

use std::{ffi::c_int, mem::size_of};

use crate::code::{CommandCode, NamedRequest};
use crate::ioc::{ior, iowr};
use crate::layout::{Field, Layout};

/// `struct watchdog_info`, filled in by [`Watchdog::GETSUPPORT`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct WatchdogInfo {
    /// [`Options`] bits the driver supports
    pub options: u32,
    pub firmware_version: u32,
    /// NUL-padded board name
    pub identity: [u8; 32],
}

impl WatchdogInfo {
    /// Packed layout, `"=II32s"`
    pub const LAYOUT: Layout<'static> = Layout::new(&[Field::U32, Field::U32, Field::bytes(32)]);

    pub const SIZE: usize = match Self::LAYOUT.byte_len() {
        Ok(len) => len,
        Err(_) => panic!("watchdog_info layout must be byte sized"),
    };

    /// Board name up to the first NUL
    pub fn identity(&self) -> &[u8] {
        let end = self
            .identity
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.identity.len());
        &self.identity[..end]
    }

    pub fn options(&self) -> Options {
        Options(self.options)
    }
}

/// The watchdog device class
pub struct Watchdog;

impl Watchdog {
    /// `WATCHDOG_IOCTL_BASE`
    pub const MAGIC: u8 = b'W';

    pub const GETSUPPORT: CommandCode = ior(Self::MAGIC as u32, 0, WatchdogInfo::SIZE);
    pub const GETSTATUS: CommandCode = ior(Self::MAGIC as u32, 1, size_of::<c_int>());
    pub const GETBOOTSTATUS: CommandCode = ior(Self::MAGIC as u32, 2, size_of::<c_int>());
    pub const GETTEMP: CommandCode = ior(Self::MAGIC as u32, 3, size_of::<c_int>());
    pub const SETOPTIONS: CommandCode = ior(Self::MAGIC as u32, 4, size_of::<c_int>());
    pub const KEEPALIVE: CommandCode = ior(Self::MAGIC as u32, 5, size_of::<c_int>());
    pub const SETTIMEOUT: CommandCode = iowr(Self::MAGIC as u32, 6, size_of::<c_int>());
    pub const GETTIMEOUT: CommandCode = ior(Self::MAGIC as u32, 7, size_of::<c_int>());
    pub const SETPRETIMEOUT: CommandCode = iowr(Self::MAGIC as u32, 8, size_of::<c_int>());
    pub const GETPRETIMEOUT: CommandCode = ior(Self::MAGIC as u32, 9, size_of::<c_int>());
    pub const GETTIMELEFT: CommandCode = ior(Self::MAGIC as u32, 10, size_of::<c_int>());

    pub const REQUESTS: &'static [NamedRequest] = &[
        NamedRequest {
            name: "WDIOC_GETSUPPORT",
            code: Self::GETSUPPORT,
            argument: "struct watchdog_info",
        },
        NamedRequest {
            name: "WDIOC_GETSTATUS",
            code: Self::GETSTATUS,
            argument: "int",
        },
        NamedRequest {
            name: "WDIOC_GETBOOTSTATUS",
            code: Self::GETBOOTSTATUS,
            argument: "int",
        },
        NamedRequest {
            name: "WDIOC_GETTEMP",
            code: Self::GETTEMP,
            argument: "int",
        },
        NamedRequest {
            name: "WDIOC_SETOPTIONS",
            code: Self::SETOPTIONS,
            argument: "int",
        },
        NamedRequest {
            name: "WDIOC_KEEPALIVE",
            code: Self::KEEPALIVE,
            argument: "int",
        },
        NamedRequest {
            name: "WDIOC_SETTIMEOUT",
            code: Self::SETTIMEOUT,
            argument: "int",
        },
        NamedRequest {
            name: "WDIOC_GETTIMEOUT",
            code: Self::GETTIMEOUT,
            argument: "int",
        },
        NamedRequest {
            name: "WDIOC_SETPRETIMEOUT",
            code: Self::SETPRETIMEOUT,
            argument: "int",
        },
        NamedRequest {
            name: "WDIOC_GETPRETIMEOUT",
            code: Self::GETPRETIMEOUT,
            argument: "int",
        },
        NamedRequest {
            name: "WDIOC_GETTIMELEFT",
            code: Self::GETTIMELEFT,
            argument: "int",
        },
    ];
}

/// `WDIOF_*` capability and status bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Options(u32);

impl Options {
    pub const OVERHEAT: Options = Options(0x0001);
    pub const FANFAULT: Options = Options(0x0002);
    pub const EXTERN1: Options = Options(0x0004);
    pub const EXTERN2: Options = Options(0x0008);
    pub const POWERUNDER: Options = Options(0x0010);
    pub const CARDRESET: Options = Options(0x0020);
    pub const POWEROVER: Options = Options(0x0040);
    /// Timeout can be set with [`Watchdog::SETTIMEOUT`]
    pub const SETTIMEOUT: Options = Options(0x0080);
    pub const MAGICCLOSE: Options = Options(0x0100);
    pub const PRETIMEOUT: Options = Options(0x0200);
    pub const ALARMONLY: Options = Options(0x0400);
    pub const KEEPALIVEPING: Options = Options(0x8000);

    pub const fn from_bits(bits: u32) -> Self {
        Options(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Options) -> bool {
        self.0 & other.0 == other.0
    }
}
