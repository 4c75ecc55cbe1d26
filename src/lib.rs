// SPDX-License-Identifier: Apache-2.0
#![cfg_attr(not(test), no_std)]

//! Provides a 64-bit monotonic clock on top of the AXI Timer
//! peripheral, with its two 32-bit sub-timers linked in cascade mode.
//!
//! The counter runs freely once started, there are no interrupts to
//! service. Reads of the two halves are not atomic, so `read_ticks()`
//! double-samples the high half to detect a carry between accesses.
//!
//! Usage:
//! ```no_run
//! use axi_cascade_timer::{AxiTimer, CascadeTimer, Scaling};
//!
//! // AXI Timer mapped at 0x4000_0000, counting at 98.304 MHz
//! static TIMER: CascadeTimer<AxiTimer> = CascadeTimer::new(
//!     unsafe { AxiTimer::new(0x4000_0000) },
//!     Scaling::from_clock_hz(98_304_000),
//! );
//!
//! TIMER.initialize();
//! let start = TIMER.uptime_millis();
//! // ...
//! let elapsed = TIMER.uptime_millis() - start;
//! ```
//!
//! ----------------------------------------------------------------
//!
//! Blocking delays are available through the `embedded-hal` trait:
//!
//! ```ignore
//! use embedded_hal::delay::DelayNs;
//! let mut delay = TIMER.delay();
//! delay.delay_ms(10);
//! ```

mod delay;
pub mod registers;
mod timer;

#[cfg(test)]
mod sim;

pub use delay::Delay;
pub use registers::{AxiTimer, ControlStatus, SubTimer, TimerRegisters};
pub use timer::{CascadeTimer, Scaling};
