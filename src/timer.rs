// SPDX-License-Identifier: Apache-2.0

use core::fmt;

use crate::delay::Delay;
use crate::registers::{ControlStatus, SubTimer, TimerRegisters};

/// Conversion from raw counter counts to ticks and milliseconds.
///
/// A tick is `raw >> shift`, a millisecond is `tick / divisor`. Together
/// they have to compose to the number of counts the hardware makes per
/// millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scaling {
    shift: u32,
    divisor: u32,
}

impl Scaling {
    /// Creates a scaling from an explicit shift and divisor.
    ///
    /// # Panics
    ///
    /// * If `divisor` is 0
    /// * If `shift` is 64 or more, or `divisor << shift` doesn't fit in u64
    pub const fn new(shift: u32, divisor: u32) -> Self {
        if divisor == 0 {
            panic!("Divisor cannot be 0");
        }
        if shift >= 64 || shift > (divisor as u64).leading_zeros() {
            panic!("Shift too large");
        }
        Scaling { shift, divisor }
    }

    /// Derives the scaling from the frequency the counter runs at.
    ///
    /// The counts per millisecond are split into a power of two, which
    /// becomes the shift, and the remaining odd factor, which becomes the
    /// divisor. Frequencies that aren't a whole number of kHz lose the
    /// remainder.
    ///
    /// # Panics
    ///
    /// * If `clock_hz` is below 1 kHz
    /// * If the odd factor of the counts per millisecond doesn't fit in u32
    ///
    /// # Examples
    ///
    /// ```
    /// # use axi_cascade_timer::Scaling;
    /// // 98.304 MHz = 3 * 2^15 counts per millisecond
    /// let scaling = Scaling::from_clock_hz(98_304_000);
    /// assert_eq!(scaling, Scaling::new(15, 3));
    /// ```
    pub const fn from_clock_hz(clock_hz: u64) -> Self {
        let per_milli = clock_hz / 1000;
        if per_milli == 0 {
            panic!("Clock frequency below 1 kHz");
        }
        let shift = per_milli.trailing_zeros();
        let divisor = per_milli >> shift;
        if divisor > u32::MAX as u64 {
            panic!("Clock frequency too high");
        }
        Self::new(shift, divisor as u32)
    }

    pub const fn shift(self) -> u32 {
        self.shift
    }

    pub const fn divisor(self) -> u32 {
        self.divisor
    }

    /// Raw counts per millisecond.
    pub const fn counts_per_milli(self) -> u64 {
        (self.divisor as u64) << self.shift
    }

    /// Raw counts covering at least `nanos` nanoseconds, saturating at
    /// `u64::MAX`.
    pub const fn counts_for_nanos(self, nanos: u64) -> u64 {
        let wide = nanos as u128 * self.counts_per_milli() as u128;
        let counts = (wide + 999_999) / 1_000_000;
        if counts > u64::MAX as u128 {
            u64::MAX
        } else {
            counts as u64
        }
    }

    /// Rolling 32-bit tick for a raw count.
    pub const fn ticks(self, raw: u64) -> u32 {
        (raw >> self.shift) as u32
    }
}

/// A 64-bit clock on an AXI Timer in cascade mode.
///
/// Sub-timer 0 provides the lower 32 bits of the count and carries into
/// sub-timer 1. The hardware keeps the whole count, so unlike an
/// interrupt-extended timer nothing needs servicing after `initialize`.
pub struct CascadeTimer<R> {
    regs: R,
    scaling: Scaling,
}

impl<R> CascadeTimer<R> {
    /// Creates a timer over `regs`. Nothing is written to the hardware
    /// until [`initialize`](Self::initialize) is called.
    pub const fn new(regs: R, scaling: Scaling) -> Self {
        CascadeTimer { regs, scaling }
    }

    pub const fn scaling(&self) -> Scaling {
        self.scaling
    }

    pub fn registers(&self) -> &R {
        &self.regs
    }
}

impl<R: TimerRegisters> CascadeTimer<R> {
    /// Starts the cascaded counter from zero.
    ///
    /// Must be called once, before any read. Follows the cascade mode
    /// sequence from the AXI Timer product guide, one register write per
    /// step.
    pub fn initialize(&self) {
        let regs = &self.regs;

        // Stop both halves and clear their mode bits
        regs.set_control_status(SubTimer::Low, 0);
        regs.set_control_status(SubTimer::High, 0);

        regs.set_load(SubTimer::Low, 0);
        regs.set_load(SubTimer::High, 0);

        // Cascade and reload mode have to be in place before the enable bit
        // starts the count. All of it goes into TCSR0, sub-timer 1 follows.
        let mut csr = ControlStatus::empty();
        for step in [
            ControlStatus::CASCADE,
            ControlStatus::AUTO_RELOAD,
            ControlStatus::ENABLE_ALL,
        ] {
            csr |= step;
            regs.set_control_status(SubTimer::Low, csr.bits());
        }

        #[cfg(feature = "log")]
        log::debug!("cascade timer started, TCSR0 = {:#010x}", csr.bits());
    }

    /// Returns the raw 64-bit count since `initialize`.
    ///
    /// The halves are read separately. If the high half changed between
    /// its two reads, the low half is read once more so that it matches the
    /// second high value. Exactly one retry: a second carry within the read
    /// window can't happen at any supported counter frequency.
    pub fn read_ticks(&self) -> u64 {
        let high_before = self.regs.counter(SubTimer::High);
        let mut low = self.regs.counter(SubTimer::Low);
        let high = self.regs.counter(SubTimer::High);

        if high_before != high {
            #[cfg(feature = "log")]
            log::trace!("torn read, high {} -> {}", high_before, high);
            low = self.regs.counter(SubTimer::Low);
        }

        ((high as u64) << 32) | low as u64
    }

    /// `read_ticks()` with interrupts masked, for sharing the timer with
    /// interrupt handlers.
    #[cfg(feature = "cortex-m")]
    pub fn read_ticks_free(&self) -> u64 {
        cortex_m::interrupt::free(|_| self.read_ticks())
    }

    /// Rolling 32-bit tick count. Wraps, compare with `wrapping_sub`.
    pub fn tick(&self) -> u32 {
        self.scaling.ticks(self.read_ticks())
    }

    /// Approximate milliseconds, derived from [`tick`](Self::tick).
    ///
    /// Inherits the wrap of the tick counter, so it drops back to 0 at
    /// `u32::MAX / divisor`, well before `u32::MAX` milliseconds.
    /// `wrapping_sub` of two readings is wrong across that point; measure
    /// intervals with [`uptime_millis`](Self::uptime_millis), or in ticks as
    /// `tick().wrapping_sub(start) / scaling().divisor()`.
    pub fn milliseconds(&self) -> u32 {
        self.tick() / self.scaling.divisor
    }

    /// Milliseconds since `initialize`, without the 32-bit wrap.
    pub fn uptime_millis(&self) -> u64 {
        (self.read_ticks() >> self.scaling.shift) / self.scaling.divisor as u64
    }

    /// Blocking delay provider backed by this timer.
    pub fn delay(&self) -> Delay<'_, R> {
        Delay::new(self)
    }

    /// Writes the registers of both sub-timers to `out`.
    pub fn dump<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        let regs = &self.regs;
        writeln!(out, "Timer/Counter registers:")?;
        writeln!(out, "       TMRCTR_1 TMRCTR_0")?;
        writeln!(
            out,
            "  TCSR {:08x} {:08x}",
            regs.control_status(SubTimer::High),
            regs.control_status(SubTimer::Low)
        )?;
        writeln!(
            out,
            "  TLR  {:08x} {:08x}",
            regs.load(SubTimer::High),
            regs.load(SubTimer::Low)
        )?;
        writeln!(
            out,
            "  TCR  {:08x} {:08x}",
            regs.counter(SubTimer::High),
            regs.counter(SubTimer::Low)
        )
    }
}
