// SPDX-License-Identifier: Apache-2.0

//! Register access for the AXI Timer (pg079).

use core::ops::{BitOr, BitOrAssign};

/// One half of the cascaded timer pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubTimer {
    /// Timer 0, the lower 32 bits of the cascaded count.
    Low = 0,
    /// Timer 1, incremented by carries out of `Low` in cascade mode.
    High = 1,
}

impl SubTimer {
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Byte offset of this sub-timer's register bank from the peripheral base.
    pub const fn bank_offset(self) -> usize {
        self.index() * 0x10
    }
}

/// Control/status register (TCSR) value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlStatus(u32);

impl ControlStatus {
    /// MDT: capture mode instead of generate mode.
    pub const CAPTURE_MODE: Self = Self(1 << 0);
    /// UDT: count down instead of up.
    pub const COUNT_DOWN: Self = Self(1 << 1);
    /// GENT: drive the external generate signal.
    pub const EXTERNAL_GENERATE: Self = Self(1 << 2);
    /// CAPT: enable the external capture trigger.
    pub const EXTERNAL_CAPTURE: Self = Self(1 << 3);
    /// ARHT: reload from TLR instead of holding at terminal count.
    pub const AUTO_RELOAD: Self = Self(1 << 4);
    /// LOAD: copy TLR into TCR while set.
    pub const LOAD: Self = Self(1 << 5);
    /// ENIT: enable the interrupt output.
    pub const ENABLE_INTERRUPT: Self = Self(1 << 6);
    /// ENT: enable this sub-timer only.
    pub const ENABLE: Self = Self(1 << 7);
    /// TINT: interrupt status, write 1 to clear.
    pub const INTERRUPT: Self = Self(1 << 8);
    /// PWMA: pulse width modulation mode.
    pub const PWM: Self = Self(1 << 9);
    /// ENALL: enable both sub-timers at once.
    pub const ENABLE_ALL: Self = Self(1 << 10);
    /// CASC: link both sub-timers into one 64-bit counter. Only valid in TCSR0.
    pub const CASCADE: Self = Self(1 << 11);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ControlStatus {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ControlStatus {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Raw access to the registers of one timer peripheral.
///
/// Implementors carry the peripheral base address. Accesses are assumed
/// to always succeed; there is no locking, callers serialize if needed.
pub trait TimerRegisters {
    /// Reads TCSR of `index`.
    fn control_status(&self, index: SubTimer) -> u32;

    /// Writes TCSR of `index`.
    fn set_control_status(&self, index: SubTimer, value: u32);

    /// Reads TLR of `index`.
    fn load(&self, index: SubTimer) -> u32;

    /// Writes TLR of `index`.
    fn set_load(&self, index: SubTimer, value: u32);

    /// Reads the live counter (TCR) of `index`.
    fn counter(&self, index: SubTimer) -> u32;
}

impl<T: TimerRegisters + ?Sized> TimerRegisters for &T {
    fn control_status(&self, index: SubTimer) -> u32 {
        (**self).control_status(index)
    }

    fn set_control_status(&self, index: SubTimer, value: u32) {
        (**self).set_control_status(index, value)
    }

    fn load(&self, index: SubTimer) -> u32 {
        (**self).load(index)
    }

    fn set_load(&self, index: SubTimer, value: u32) {
        (**self).set_load(index, value)
    }

    fn counter(&self, index: SubTimer) -> u32 {
        (**self).counter(index)
    }
}

const TCSR_OFFSET: usize = 0x0;
const TLR_OFFSET: usize = 0x4;
const TCR_OFFSET: usize = 0x8;

/// Memory-mapped AXI Timer instance.
#[derive(Debug)]
pub struct AxiTimer {
    base: usize,
}

impl AxiTimer {
    /// Creates a driver for the AXI Timer mapped at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the address of an AXI Timer register block that stays
    /// mapped for the lifetime of the driver. Nothing stops two drivers from
    /// being created for the same peripheral; the caller must make sure
    /// their accesses don't interfere.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    pub const fn base(&self) -> usize {
        self.base
    }

    #[inline(always)]
    fn register(&self, index: SubTimer, offset: usize) -> *mut u32 {
        (self.base + index.bank_offset() + offset) as *mut u32
    }

    #[inline(always)]
    fn read(&self, index: SubTimer, offset: usize) -> u32 {
        // # Safety
        // The address was vouched for in `new`
        unsafe { core::ptr::read_volatile(self.register(index, offset)) }
    }

    #[inline(always)]
    fn write(&self, index: SubTimer, offset: usize, value: u32) {
        // # Safety
        // The address was vouched for in `new`
        unsafe { core::ptr::write_volatile(self.register(index, offset), value) }
    }
}

impl TimerRegisters for AxiTimer {
    fn control_status(&self, index: SubTimer) -> u32 {
        self.read(index, TCSR_OFFSET)
    }

    fn set_control_status(&self, index: SubTimer, value: u32) {
        self.write(index, TCSR_OFFSET, value)
    }

    fn load(&self, index: SubTimer) -> u32 {
        self.read(index, TLR_OFFSET)
    }

    fn set_load(&self, index: SubTimer, value: u32) {
        self.write(index, TLR_OFFSET, value)
    }

    fn counter(&self, index: SubTimer) -> u32 {
        self.read(index, TCR_OFFSET)
    }
}
