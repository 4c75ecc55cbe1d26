#![no_std]

use core::fmt;

use axi_cascade_timer::{CascadeTimer, TimerRegisters};
use rtt_target::{rprint, rprintln};

/// Where a reading was taken
pub enum Context {
    Thread,
    SysTick,
}

impl From<Context> for &'static str {
    fn from(val: Context) -> Self {
        match val {
            Context::Thread => "Thread",
            Context::SysTick => "SysTick",
        }
    }
}

/// Check timer monotonic property and panic if violated
///
/// This function takes a timer reference to avoid global static dependency
pub fn check_timer_monotonic<R: TimerRegisters>(
    timer: &CascadeTimer<R>,
    context: Context,
    last_ticks: &mut u64,
) {
    let name: &'static str = context.into();
    let now = timer.read_ticks();
    if now < *last_ticks {
        let jump = *last_ticks - now;
        if jump & 0xffff_ffff == 0 {
            rprintln!(
                "{}: TORN READ {:#018x} < {:#018x} (high half off by {})",
                name,
                now,
                *last_ticks,
                jump >> 32
            );
        } else {
            rprintln!(
                "{}: monotonic violation {:#018x} < {:#018x} (unknown cause)",
                name,
                now,
                *last_ticks
            );
        }
        dump_registers(timer);
        panic!("Timer monotonic violation: {} < {}", now, *last_ticks);
    }
    *last_ticks = now;
}

/// `fmt::Write` sink on the RTT up channel
pub struct RttSink;

impl fmt::Write for RttSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        rprint!("{}", s);
        Ok(())
    }
}

pub fn dump_registers<R: TimerRegisters>(timer: &CascadeTimer<R>) {
    // RTT writes can't fail
    let _ = timer.dump(&mut RttSink);
}

/// Report active configuration features
pub fn report_configuration() {
    if cfg!(feature = "duration-full") {
        rprintln!("Duration config: Full test (spans several low-half carries)");
    } else {
        rprintln!("Duration config: Short test");
    }
}

/// Calculate test duration based on features (returns seconds)
pub const fn get_test_duration_seconds(full_duration: u64) -> u64 {
    if cfg!(feature = "duration-full") {
        full_duration
    } else {
        5 // Short duration for all platforms
    }
}
