// SPDX-License-Identifier: Apache-2.0

use embedded_hal::delay::DelayNs;

use crate::registers::TimerRegisters;
use crate::timer::CascadeTimer;

/// Busy-wait delay on top of a running [`CascadeTimer`].
///
/// Only reads the counter, so any number of these can share one timer.
pub struct Delay<'a, R> {
    timer: &'a CascadeTimer<R>,
}

impl<'a, R: TimerRegisters> Delay<'a, R> {
    pub fn new(timer: &'a CascadeTimer<R>) -> Self {
        Self { timer }
    }

    fn wait_counts(&mut self, counts: u64) {
        let start = self.timer.read_ticks();
        while self.timer.read_ticks().wrapping_sub(start) < counts {
            core::hint::spin_loop();
        }
    }
}

impl<R: TimerRegisters> DelayNs for Delay<'_, R> {
    fn delay_ns(&mut self, ns: u32) {
        let counts = self.timer.scaling().counts_for_nanos(ns as u64);
        self.wait_counts(counts);
    }

    fn delay_ms(&mut self, ms: u32) {
        let counts = (ms as u64).saturating_mul(self.timer.scaling().counts_per_milli());
        self.wait_counts(counts);
    }
}
