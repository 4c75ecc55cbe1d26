// SPDX-License-Identifier: Apache-2.0

//! Simulated AXI Timer for host tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::registers::{SubTimer, TimerRegisters};

/// A register write as seen by the peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Write {
    ControlStatus(SubTimer, u32),
    Load(SubTimer, u32),
}

/// Register file backed by atomics.
///
/// The cascaded count lives in a single `AtomicU64`, so every register
/// read sees one consistent hardware state, while a pair of reads may not.
/// Counter reads can be scripted per sub-timer; scripted values are
/// consumed first, then reads fall through to the live count.
pub struct SimRegisters {
    tcsr: [AtomicU32; 2],
    tlr: [AtomicU32; 2],
    count: AtomicU64,
    advance_per_read: AtomicU64, // added to `count` after every Low read
    scripted: [Mutex<VecDeque<u32>>; 2],
    counter_reads: [AtomicUsize; 2],
    writes: Mutex<Vec<Write>>,
}

impl SimRegisters {
    pub fn new() -> Self {
        Self {
            tcsr: [AtomicU32::new(0), AtomicU32::new(0)],
            tlr: [AtomicU32::new(0), AtomicU32::new(0)],
            count: AtomicU64::new(0),
            advance_per_read: AtomicU64::new(0),
            scripted: [Mutex::new(VecDeque::new()), Mutex::new(VecDeque::new())],
            counter_reads: [AtomicUsize::new(0), AtomicUsize::new(0)],
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Simulated power-on state with junk in every register.
    pub fn with_garbage() -> Self {
        let sim = Self::new();
        for index in [SubTimer::Low, SubTimer::High] {
            sim.tcsr[index.index()].store(0xdead_0ff0, Ordering::SeqCst);
            sim.tlr[index.index()].store(0x1234_5678, Ordering::SeqCst);
        }
        sim
    }

    pub fn set_count(&self, value: u64) {
        self.count.store(value, Ordering::SeqCst);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }

    /// Advances the count like the counting hardware would.
    pub fn advance(&self, by: u64) {
        self.count.fetch_add(by, Ordering::SeqCst);
    }

    pub fn set_advance_per_read(&self, by: u64) {
        self.advance_per_read.store(by, Ordering::SeqCst);
    }

    /// Queues values returned by the next counter reads of `index`.
    pub fn script_counter(&self, index: SubTimer, values: &[u32]) {
        self.scripted[index.index()]
            .lock()
            .unwrap()
            .extend(values.iter().copied());
    }

    pub fn counter_reads(&self, index: SubTimer) -> usize {
        self.counter_reads[index.index()].load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }
}

impl TimerRegisters for SimRegisters {
    fn control_status(&self, index: SubTimer) -> u32 {
        self.tcsr[index.index()].load(Ordering::SeqCst)
    }

    fn set_control_status(&self, index: SubTimer, value: u32) {
        self.writes
            .lock()
            .unwrap()
            .push(Write::ControlStatus(index, value));
        self.tcsr[index.index()].store(value, Ordering::SeqCst);
    }

    fn load(&self, index: SubTimer) -> u32 {
        self.tlr[index.index()].load(Ordering::SeqCst)
    }

    fn set_load(&self, index: SubTimer, value: u32) {
        self.writes.lock().unwrap().push(Write::Load(index, value));
        self.tlr[index.index()].store(value, Ordering::SeqCst);
    }

    fn counter(&self, index: SubTimer) -> u32 {
        self.counter_reads[index.index()].fetch_add(1, Ordering::SeqCst);
        if let Some(value) = self.scripted[index.index()].lock().unwrap().pop_front() {
            return value;
        }
        let count = self.count.load(Ordering::SeqCst);
        match index {
            SubTimer::Low => {
                self.advance(self.advance_per_read.load(Ordering::SeqCst));
                count as u32
            }
            SubTimer::High => (count >> 32) as u32,
        }
    }
}
