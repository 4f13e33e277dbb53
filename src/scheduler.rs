// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Burst scheduling: running the engine in opcode batches, pacing it
//! against wall time, and firing host sync callbacks on cycle cadences.
//!
//! The scheduler is a best-effort pacer, not a cycle-exact clock. A burst
//! executes `outer_burst x inner_burst` instructions; sync callbacks run
//! between inner bursts, and the outer burst count adapts so one whole
//! burst lands near the requested run-time budget.

use std::sync::atomic::Ordering;
use std::sync::mpsc::{SyncSender, TrySendError};
use std::sync::{atomic::AtomicBool, atomic::AtomicU64, Arc};
use std::thread;
use std::time::{Duration, Instant};

use crate::exception::CpuError;
use crate::memory_access::MemoryAccess;
use crate::Mc6809;

/// Minimum outer op count per burst.
const MIN_BURST_COUNT: usize = 10;
/// Maximum outer op count per burst.
const MAX_BURST_COUNT: usize = 10_000;
/// Maximum sleep per throttled burst, to keep the host responsive.
const MAX_DELAY: f64 = 0.01;

/// A host callback fired every time a cycle threshold has elapsed.
pub(crate) struct SyncCallback {
    /// Fire when more than this many cycles passed since the last call.
    callback_cycles: u64,
    /// Cycle count at the last fire.
    last_call_cycles: u64,
    callback: Box<dyn FnMut(u64) + Send>,
}

/// Recomputes the outer burst count so the next burst run lands near
/// `target` seconds. `trigger` is the measured duration of the last burst.
fn calc_new_count(min_value: usize, value: usize, max_value: usize, trigger: f64, target: f64) -> usize {
    if trigger <= 0.0 {
        return (value * 2).clamp(min_value, max_value);
    }
    let new_value = (value as f64 + (value as f64 / trigger) * target) / 2.0;
    (new_value as usize).clamp(min_value, max_value)
}

impl Mc6809 {
    /// Registers a callback fired with the elapsed cycle delta whenever more
    /// than `callback_cycles` CPU cycles have passed since its last call.
    pub fn add_sync_callback(&mut self, callback_cycles: u64, callback: impl FnMut(u64) + Send + 'static) {
        self.sync_callbacks.push(SyncCallback {
            callback_cycles,
            last_call_cycles: 0,
            callback: Box::new(callback),
        });
    }

    /// Calls every sync callback whose cycle threshold has elapsed.
    pub fn call_sync_callbacks(&mut self) {
        let current_cycles = self.cycles;
        for entry in &mut self.sync_callbacks {
            let delta = current_cycles - entry.last_call_cycles;
            if delta > entry.callback_cycles {
                entry.last_call_cycles = current_cycles;
                (entry.callback)(delta);
            }
        }
    }

    /// Runs one complete burst of `outer x inner` instructions, firing sync
    /// callbacks between the inner bursts.
    ///
    /// [Mc6809::stop] takes effect at the next outer-burst iteration; the
    /// instruction in flight always completes.
    pub fn burst_run<M: MemoryAccess>(&mut self, memory: &mut M) -> Result<(), CpuError> {
        for _ in 0..self.outer_burst_op_count {
            if !self.is_running() {
                break;
            }
            for _ in 0..self.inner_burst_op_count {
                self.step(memory)?;
            }
            self.call_sync_callbacks();
        }
        self.shared_cycles.store(self.cycles, Ordering::Relaxed);
        Ok(())
    }

    /// Runs one burst, then adapts the outer burst count toward the
    /// `max_run_time` budget (seconds) for the next call.
    ///
    /// With `target_cycles_per_sec` set, the burst is throttled: the
    /// scheduler measures the achieved cycles/sec and sleeps the difference,
    /// capped at 10 ms per burst.
    pub fn run<M: MemoryAccess>(
        &mut self,
        memory: &mut M,
        max_run_time: f64,
        target_cycles_per_sec: Option<u64>,
    ) -> Result<(), CpuError> {
        let start_time = Instant::now();

        if let Some(target) = target_cycles_per_sec {
            self.delayed_burst_run(memory, target)?;
        } else {
            self.delay = 0.0;
            self.burst_run(memory)?;
        }

        let trigger = start_time.elapsed().as_secs_f64() - self.delay;
        self.outer_burst_op_count = calc_new_count(
            MIN_BURST_COUNT,
            self.outer_burst_op_count,
            MAX_BURST_COUNT,
            trigger,
            max_run_time,
        );
        Ok(())
    }

    /// Runs one burst not faster than the given speed limit.
    fn delayed_burst_run<M: MemoryAccess>(
        &mut self,
        memory: &mut M,
        target_cycles_per_sec: u64,
    ) -> Result<(), CpuError> {
        let old_cycles = self.cycles;
        let start_time = Instant::now();

        self.delay = 0.0;
        self.burst_run(memory)?;

        let is_duration = start_time.elapsed().as_secs_f64();
        let new_cycles = (self.cycles - old_cycles) as f64;
        if is_duration > 0.0 {
            let is_cycles_per_sec = new_cycles / is_duration;
            let should_burst_duration = is_cycles_per_sec / target_cycles_per_sec as f64;
            let target_duration = should_burst_duration * is_duration;
            let delay = target_duration - is_duration;
            if delay > 0.0 {
                self.delay = delay.min(MAX_DELAY);
                thread::sleep(Duration::from_secs_f64(self.delay));
            }
        }

        self.call_sync_callbacks();
        Ok(())
    }

    /// A cloneable view of the cycle counter and the running flag, for
    /// status reporters and control frontends.
    pub fn status(&self) -> CpuStatus {
        CpuStatus {
            cycles: Arc::clone(&self.shared_cycles),
            running: Arc::clone(&self.running),
        }
    }
}

/// Shared, read-only view on the engine published at burst boundaries.
#[derive(Clone)]
pub struct CpuStatus {
    cycles: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
}

impl CpuStatus {
    /// Cycle count as of the last burst boundary.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Asks the scheduler to return at the next outer-burst boundary.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

/// Background reporter pushing the cycle counter to a bounded channel every
/// 500 ms, for a UI thread to consume.
///
/// A full channel drops the update silently. A disconnected receiver stops
/// the reporter and clears the engine's running flag, so the main loop
/// returns at its next burst boundary.
pub struct StatusReporter;

impl StatusReporter {
    pub fn spawn(status: CpuStatus, sender: SyncSender<u64>) -> thread::JoinHandle<()> {
        thread::Builder::new()
            .name("cpu-status".into())
            .spawn(move || {
                while status.is_running() {
                    match sender.try_send(status.cycles()) {
                        Ok(()) | Err(TrySendError::Full(_)) => {}
                        Err(TrySendError::Disconnected(_)) => {
                            status.stop();
                            return;
                        }
                    }
                    thread::sleep(Duration::from_millis(500));
                }
            })
            .expect("failed to spawn the cpu-status thread")
    }
}
