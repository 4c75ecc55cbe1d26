// SPDX-License-Identifier: Apache-2.0
#![no_std]
#![no_main]

use axi_cascade_timer::{AxiTimer, CascadeTimer, Scaling};
use cortex_m_semihosting::{hio, hprintln};

// AXI Timer at 0x4000_0000, counting at 50 MHz
static INSTANCE: CascadeTimer<AxiTimer> = CascadeTimer::new(
    unsafe { AxiTimer::new(0x4000_0000) },
    Scaling::from_clock_hz(50_000_000),
);

#[cortex_m_rt::entry]
fn main() -> ! {
    hprintln!("Initializing ..");
    INSTANCE.initialize();
    let start = INSTANCE.uptime_millis();

    loop {
        // Small no-op busy loop
        for _ in 0..1_000_000 {
            cortex_m::asm::delay(100)
        }
        let elapsed = INSTANCE.uptime_millis() - start;
        hprintln!("Time: {} ms", elapsed);
        if elapsed >= 1000 {
            break;
        }
    }
    hprintln!("Waited for a second");
    if let Ok(mut out) = hio::hstdout() {
        let _ = INSTANCE.dump(&mut out);
    }
    cortex_m_semihosting::debug::exit(cortex_m_semihosting::debug::EXIT_SUCCESS);
    loop {}
}

#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {}
}
