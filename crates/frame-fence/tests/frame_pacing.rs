//! Integration tests: a render loop against a simulated GPU thread.

use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use frame_fence::{
    CompletionTimeline, FrameFenceTracker, FrameSlots, HostTimeline, PresentationSurface,
    RoundRobinSurface,
};

const SLOTS: usize = 2;
const FRAMES: usize = 25;

/// Per-slot resources: the frame number last written into the slot.
#[derive(Debug, Default)]
struct SlotContents {
    frame: Option<usize>,
}

/// Work handed to the simulated GPU.
#[derive(Debug, Clone, Copy)]
struct Submission {
    slot: usize,
    value: u64,
    frame: usize,
}

#[test]
fn test_end_to_end_scenario_blocks_until_first_slot_completes() {
    let timeline = HostTimeline::new();
    let gpu = timeline.clone();
    let mut tracker = FrameFenceTracker::<_, SLOTS>::new(timeline, 0).unwrap();
    let mut surface = RoundRobinSurface::<SLOTS>::new(0);

    assert_eq!(tracker.submit_and_advance(0).unwrap(), 1);
    surface.present();
    tracker.submit_and_advance(1).unwrap();
    surface.present();

    let (done_tx, done_rx) = mpsc::channel();
    let producer = thread::spawn(move || {
        let slot = tracker.acquire_next_slot(&surface).unwrap();
        done_tx.send(slot).unwrap();
        tracker
    });

    while gpu.waiter_count() == 0 {
        thread::yield_now();
    }
    assert!(done_rx.try_recv().is_err());
    assert_eq!(gpu.completed_value(), 0);

    gpu.complete(1);
    assert_eq!(done_rx.recv().unwrap(), 0);
    let tracker = producer.join().unwrap();
    assert_eq!(tracker.current_slot(), 0);
}

#[test]
fn test_render_loop_never_rewrites_a_slot_in_flight() {
    let timeline = HostTimeline::new();
    let gpu = timeline.clone();
    let slots = Arc::new(Mutex::new(
        FrameSlots::<SlotContents, SLOTS>::try_new(|_| Ok::<_, ()>(SlotContents::default()))
            .unwrap(),
    ));
    let gpu_slots = Arc::clone(&slots);
    let (work_tx, work_rx) = mpsc::channel::<Submission>();

    // The GPU lags one submission behind: value v completes only once v + 1
    // has been submitted and the producer is blocked waiting for v. Before
    // completing, the slot must still hold the frame that was submitted.
    let consumer = thread::spawn(move || {
        let mut executed = Vec::new();
        let mut pending: Option<Submission> = None;
        let mut finish = |work: Submission| {
            let contents = gpu_slots.lock().unwrap();
            assert_eq!(
                contents.get(work.slot).unwrap().frame,
                Some(work.frame),
                "slot {} rewritten before value {} completed",
                work.slot,
                work.value
            );
            drop(contents);
            executed.push(work.slot);
            gpu.complete(work.value);
        };
        for work in work_rx {
            if let Some(previous) = pending.replace(work) {
                while gpu.waiter_count() == 0 {
                    thread::yield_now();
                }
                finish(previous);
            }
        }
        if let Some(last) = pending {
            finish(last);
        }
        executed
    });

    let mut surface = RoundRobinSurface::<SLOTS>::new(0);
    let mut tracker = FrameFenceTracker::<_, SLOTS>::new(timeline, surface.current_slot()).unwrap();

    let mut history: HashMap<usize, Vec<u64>> = HashMap::new();
    let mut acquired = Vec::new();
    let mut blocked = 0;
    let mut slot = tracker.current_slot();

    for frame in 0..FRAMES {
        let expected = tracker.expected_completion(slot).unwrap();
        assert!(tracker.completed_value() >= expected);
        slots.lock().unwrap().get_mut(slot).unwrap().frame = Some(frame);

        let value = tracker.submit_and_advance(slot).unwrap();
        history.entry(slot).or_default().push(value);
        work_tx.send(Submission { slot, value, frame }).unwrap();
        surface.present();

        let next = surface.current_slot();
        if tracker.completed_value() < tracker.expected_completion(next).unwrap() {
            blocked += 1;
        }
        slot = tracker.acquire_next_slot(&surface).unwrap();
        assert_eq!(slot, next);
        assert!(tracker.completed_value() >= tracker.expected_completion(slot).unwrap());
        acquired.push(slot);
    }
    // Every frame but the first had to wait for the GPU.
    assert_eq!(blocked, FRAMES - 1);

    drop(work_tx);
    tracker.wait_for_idle().unwrap();
    let max_expected = (0..SLOTS)
        .map(|slot| tracker.expected_completion(slot).unwrap())
        .max()
        .unwrap();
    assert!(tracker.completed_value() >= max_expected);
    assert_eq!(tracker.completed_value(), FRAMES as u64);

    let executed = consumer.join().unwrap();
    assert_eq!(executed.len(), FRAMES);

    for values in history.values() {
        assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
    }

    let mut counts = [0usize; SLOTS];
    for (i, slot) in acquired.iter().enumerate() {
        assert_eq!(*slot, (i + 1) % SLOTS);
        counts[*slot] += 1;
    }
    for count in counts {
        assert!(count == FRAMES / SLOTS || count == FRAMES.div_ceil(SLOTS));
    }

    let slots = slots.lock().unwrap();
    assert_eq!(slots.get(0).unwrap().frame, Some(FRAMES - 1 - (FRAMES - 1) % SLOTS));
}

#[test]
fn test_immediate_timeline_never_waits() {
    let timeline = HostTimeline::immediate();
    let mut tracker = FrameFenceTracker::<_, 3>::new(timeline.clone(), 0).unwrap();
    let mut surface = RoundRobinSurface::<3>::new(0);

    for _ in 0..10 {
        let slot = surface.current_slot();
        tracker.submit_and_advance(slot).unwrap();
        surface.present();
        tracker.acquire_next_slot(&surface).unwrap();
    }
    tracker.wait_for_idle().unwrap();
    assert_eq!(timeline.waiter_count(), 0);
    assert_eq!(timeline.completed_value(), 10);
    assert_eq!(surface.presented(), 10);
}
