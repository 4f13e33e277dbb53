// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Burst scheduler tests: callback cadences, run-time adaptation and the
//! background status reporter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::sync_channel;
use std::sync::Arc;
use std::time::Duration;

use mc6809::memory_access::{MemoryAccess, Ram};
use mc6809::scheduler::StatusReporter;
use mc6809::{Config, Mc6809};

/// An endless loop at $1000 the scheduler can chew on.
fn looping_cpu() -> (Mc6809, Ram) {
    let mut memory = Ram::new();
    memory.load(0x1000, &[0x7E, 0x10, 0x00]); // JMP $1000
    let mut cpu = Mc6809::new(Config::default());
    cpu.regs.pc = 0x1000;
    (cpu, memory)
}

#[test]
fn burst_run_executes_a_full_burst() {
    let (mut cpu, mut memory) = looping_cpu();
    cpu.burst_run(&mut memory).unwrap();
    // The startup burst is 100 x 100 instructions; JMP extended is 3 cycles.
    assert_eq!(cpu.cycles, 100 * 100 * 3);
    assert_eq!(cpu.regs.pc, 0x1000);
}

#[test]
fn sync_callbacks_fire_on_cycle_cadence() {
    let (mut cpu, mut memory) = looping_cpu();

    let fired = Arc::new(AtomicU64::new(0));
    let seen_delta = Arc::new(AtomicU64::new(0));
    let fired_in_cb = Arc::clone(&fired);
    let delta_in_cb = Arc::clone(&seen_delta);
    cpu.add_sync_callback(1000, move |delta| {
        fired_in_cb.fetch_add(1, Ordering::Relaxed);
        delta_in_cb.store(delta, Ordering::Relaxed);
    });

    cpu.burst_run(&mut memory).unwrap();

    // One inner burst is 100 JMPs = 300 cycles, so the callback fires about
    // every fourth boundary across the 30000-cycle burst.
    let count = fired.load(Ordering::Relaxed);
    assert!((20..=30).contains(&count), "{count}");
    assert!(seen_delta.load(Ordering::Relaxed) > 1000);
}

#[test]
fn callbacks_below_threshold_stay_silent() {
    let (mut cpu, mut memory) = looping_cpu();
    let fired = Arc::new(AtomicU64::new(0));
    let fired_in_cb = Arc::clone(&fired);
    cpu.add_sync_callback(1_000_000, move |_| {
        fired_in_cb.fetch_add(1, Ordering::Relaxed);
    });
    cpu.burst_run(&mut memory).unwrap();
    assert_eq!(fired.load(Ordering::Relaxed), 0);
}

#[test]
fn free_run_adapts_the_burst_count() {
    let (mut cpu, mut memory) = looping_cpu();
    for _ in 0..5 {
        cpu.run(&mut memory, 0.01, None).unwrap();
    }
    let count = cpu.outer_burst_count();
    assert!((10..=10_000).contains(&count), "{count}");
}

#[test]
fn throttled_run_stays_near_the_speed_limit() {
    let (mut cpu, mut memory) = looping_cpu();
    let start = std::time::Instant::now();
    // A tiny budget keeps this test fast; the limiter sleeps at most 10 ms
    // per burst.
    for _ in 0..3 {
        cpu.run(&mut memory, 0.005, Some(100_000)).unwrap();
    }
    assert!(start.elapsed() < Duration::from_secs(2));
    assert!(cpu.cycles > 0);
}

#[test]
fn stop_returns_at_the_outer_burst_boundary() {
    let (mut cpu, mut memory) = looping_cpu();
    cpu.stop();
    cpu.burst_run(&mut memory).unwrap();
    assert_eq!(cpu.cycles, 0);
}

#[test]
fn status_reporter_publishes_cycles() {
    let (mut cpu, mut memory) = looping_cpu();
    cpu.burst_run(&mut memory).unwrap();
    let expected_cycles = cpu.cycles;

    let (sender, receiver) = sync_channel(1);
    let handle = StatusReporter::spawn(cpu.status(), sender);

    let reported = receiver.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(reported, expected_cycles);

    // Dropping the receiver stops the reporter and clears the running flag.
    drop(receiver);
    handle.join().unwrap();
    assert!(!cpu.is_running());
}

#[test]
fn full_channel_drops_updates_silently() {
    let (cpu, _memory) = looping_cpu();
    let (sender, receiver) = sync_channel(1);
    sender.try_send(0xDEAD).unwrap(); // fill the queue up front
    let status = cpu.status();
    let handle = StatusReporter::spawn(status.clone(), sender);

    std::thread::sleep(Duration::from_millis(100));
    assert!(status.is_running(), "a full queue must not kill the reporter");

    status.stop();
    drop(receiver);
    handle.join().unwrap();
}
