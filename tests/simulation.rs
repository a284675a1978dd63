use timers_manager::prelude::*;

use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::thread::sleep;
use std::time::{Duration, Instant};

#[test]
fn test_fire_order_follows_deadlines() -> AnyResult<()> {
    let timers = TimersManager::new()?;
    let (sender, receiver) = channel();

    // Shuffled insertion order; deadline order expected out.
    for millis in [300_u64, 200, 100, 0, 550, 50] {
        let sender = sender.clone();
        timers.insert_timer(
            move || {
                let _ = sender.send(millis);
            },
            Duration::from_millis(millis),
        );
    }

    let mut observed = Vec::new();
    for _ in 0..6 {
        observed.push(receiver.recv_timeout(Duration::from_secs(2))?);
    }

    assert_eq!(observed, vec![0, 50, 100, 200, 300, 550]);

    Ok(())
}

#[test]
fn test_new_minimum_wakes_worker_promptly() -> AnyResult<()> {
    let timers = TimersManager::new()?;
    let (sender, receiver) = channel();

    let far_sender = sender.clone();
    timers.insert_timer(
        move || {
            let _ = far_sender.send("far");
        },
        Duration::from_millis(800),
    );

    // Let the worker settle into its timed wait on the 800ms deadline.
    sleep(Duration::from_millis(50));

    let armed_at = Instant::now();
    timers.insert_timer(
        move || {
            let _ = sender.send("near");
        },
        Duration::from_millis(50),
    );

    // Un-woken, the worker would fire nothing before the 800ms mark.
    assert_eq!(receiver.recv_timeout(Duration::from_secs(2))?, "near");
    assert!(armed_at.elapsed() < Duration::from_millis(400));

    assert_eq!(receiver.recv_timeout(Duration::from_secs(2))?, "far");

    Ok(())
}

#[test]
fn test_zero_duration_fires_without_unbounded_delay() -> AnyResult<()> {
    let timers = TimersManager::new()?;
    let (sender, receiver) = channel();

    timers.insert_timer(
        move || {
            let _ = sender.send(());
        },
        Duration::ZERO,
    );

    receiver.recv_timeout(Duration::from_millis(500))?;

    Ok(())
}

#[test]
fn test_every_timer_fires_exactly_once() -> AnyResult<()> {
    let timers = TimersManager::new()?;
    let fired = Arc::new(AtomicUsize::new(0));

    for millis in [0_u64, 30, 60, 90] {
        let fired = fired.clone();
        timers.insert_timer(
            move || {
                fired.fetch_add(1, Ordering::SeqCst);
            },
            Duration::from_millis(millis),
        );
    }

    sleep(Duration::from_millis(400));
    assert_eq!(fired.load(Ordering::SeqCst), 4);

    // No late double-fires either.
    sleep(Duration::from_millis(200));
    assert_eq!(fired.load(Ordering::SeqCst), 4);

    Ok(())
}

#[test]
fn test_callback_may_insert_more_timers() -> AnyResult<()> {
    let timers = TimersManager::new()?;
    let handle = timers.handle();
    let (sender, receiver) = channel();

    let follow_up_sender = sender.clone();
    timers.insert_timer(
        move || {
            let _ = sender.send("first");
            handle.insert_timer(
                move || {
                    let _ = follow_up_sender.send("second");
                },
                Duration::from_millis(50),
            );
        },
        Duration::from_millis(50),
    );

    assert_eq!(receiver.recv_timeout(Duration::from_secs(2))?, "first");
    assert_eq!(receiver.recv_timeout(Duration::from_secs(2))?, "second");

    Ok(())
}

#[test]
fn test_repeating_routine_keeps_firing() -> AnyResult<()> {
    let mut timers = TimersManager::new()?;
    let beats = Arc::new(AtomicUsize::new(0));

    let beats_in_routine = beats.clone();
    let metronome = repeating_routine(timers.handle(), Duration::from_millis(100), move || {
        beats_in_routine.fetch_add(1, Ordering::SeqCst);
    });
    timers.insert_timer(metronome, Duration::from_millis(100));

    sleep(Duration::from_millis(560));
    timers.stop()?;

    let observed = beats.load(Ordering::SeqCst);
    assert!(
        (3..=7).contains(&observed),
        "expected a steady beat, got {} fires",
        observed
    );

    // Shutdown discarded the pending re-arm.
    sleep(Duration::from_millis(300));
    assert_eq!(beats.load(Ordering::SeqCst), observed);

    Ok(())
}
