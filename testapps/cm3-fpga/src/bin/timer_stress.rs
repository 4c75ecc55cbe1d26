#![no_main]
#![no_std]

use cm3_fpga as lib;

use axi_cascade_timer::{AxiTimer, CascadeTimer, Scaling};
use core::cell::Cell;
use core::sync::atomic::{AtomicU32, Ordering};
use cortex_m::interrupt::Mutex;
use cortex_m::peripheral::syst::SystClkSource;
use rtt_target::{rprintln, rtt_init_log};
use timer_stress::{
    Context, check_timer_monotonic, dump_registers, get_test_duration_seconds,
    report_configuration,
};

const CORE_FREQUENCY: u32 = 50_000_000;
const FULL_TEST_DURATION_SECS: u64 = 200;
const SYSTICK_HZ: u32 = 20_000;

// AXI Timer address from the FPGA block design, clocked with the core
const AXI_TIMER_BASE: usize = 0x4000_0000;

// Global cascade timer - read from both thread and SysTick context
static TIMER: CascadeTimer<AxiTimer> = CascadeTimer::new(
    unsafe { AxiTimer::new(AXI_TIMER_BASE) },
    Scaling::from_clock_hz(CORE_FREQUENCY as u64),
);
static SYSTICK_COUNTER: AtomicU32 = AtomicU32::new(0);
static SYSTICK_LAST: Mutex<Cell<u64>> = Mutex::new(Cell::new(0));

#[cortex_m_rt::entry]
fn main() -> ! {
    let mut cp = cortex_m::Peripherals::take().expect("Failed to take core peripherals");

    rtt_init_log!(
        log::LevelFilter::Debug,
        rtt_target::ChannelMode::NoBlockTrim,
        1024
    );

    rprintln!("Hello from the Cortex-M3 FPGA with AXI cascade timer!");
    report_configuration();

    TIMER.initialize();
    dump_registers(&TIMER);

    // SysTick only provides interrupt load, the timer under test reads
    // the counter from inside the handler
    cp.SYST.set_clock_source(SystClkSource::Core);
    cp.SYST.set_reload(CORE_FREQUENCY / SYSTICK_HZ - 1);
    cp.SYST.clear_current();
    cp.SYST.enable_interrupt();
    cp.SYST.enable_counter();

    let test_duration_ms = get_test_duration_seconds(FULL_TEST_DURATION_SECS) * 1000;
    let start_ms = TIMER.uptime_millis();
    let mut last_log_ms = start_ms;
    let mut last_ticks = 0u64;
    let mut iteration_count = 0u64;

    log::info!(
        "Starting timer loop at {} ms, running for {} ms",
        start_ms,
        test_duration_ms
    );

    loop {
        check_timer_monotonic(&TIMER, Context::Thread, &mut last_ticks);
        let now_ms = TIMER.uptime_millis();

        // Log status every second
        if now_ms - last_log_ms >= 1000 {
            rprintln!(
                "Elapsed: {}s, ms counter: {}, SysTick reads: {}, iterations: {}",
                (now_ms - start_ms) / 1000,
                TIMER.milliseconds(),
                SYSTICK_COUNTER.load(Ordering::Relaxed),
                iteration_count
            );
            last_log_ms = now_ms;
        }

        // Check for test completion
        if now_ms - start_ms >= test_duration_ms {
            rprintln!("Test completed!");
            rprintln!("Final raw count: {:#018x}", TIMER.read_ticks_free());
            rprintln!(
                "Final stats - SysTick reads: {}, iterations: {}",
                SYSTICK_COUNTER.load(Ordering::Relaxed),
                iteration_count
            );
            dump_registers(&TIMER);
            break;
        }

        iteration_count += 1;
    }

    lib::exit()
}

#[cortex_m_rt::exception]
fn SysTick() {
    cortex_m::interrupt::free(|cs| {
        let last = SYSTICK_LAST.borrow(cs);
        let mut ticks = last.get();
        check_timer_monotonic(&TIMER, Context::SysTick, &mut ticks);
        last.set(ticks);
    });
    SYSTICK_COUNTER.fetch_add(1, Ordering::Relaxed);
}
