use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};
use ubx_pvt::{DoubleBuffer, NavPvt, Slot};

/// Every field derived from `n`, so a mix of two publishes is detectable
fn fix(n: u32) -> NavPvt {
    let v = n as i32;
    NavPvt {
        itow: n,
        lat: v,
        lon: v.wrapping_neg(),
        height: v.wrapping_mul(3),
        height_msl: v.wrapping_mul(5),
        vel_north: v.wrapping_mul(7),
        head_vehicle: v.wrapping_mul(11),
        magnetic_declination_accuracy: n as u16,
        ..NavPvt::default()
    }
}

fn is_consistent(pvt: &NavPvt) -> bool {
    *pvt == fix(pvt.itow)
}

#[test]
fn concurrent_snapshots_are_never_torn() {
    let buf = Arc::new(DoubleBuffer::new(fix(0)));
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let buf = Arc::clone(&buf);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut last_generation = 0;
                let mut seen = 0u64;
                while !done.load(Ordering::Relaxed) {
                    if let Some(snap) = buf.snapshot() {
                        assert!(is_consistent(&snap.value), "torn read: {:?}", snap.value);
                        assert!(snap.generation >= last_generation);
                        assert_eq!(u64::from(snap.value.itow), snap.generation);
                        last_generation = snap.generation;
                        seen += 1;
                    }
                }
                seen
            })
        })
        .collect();

    for n in 1..=20_000u32 {
        buf.publish(fix(n));
    }
    done.store(true, Ordering::Relaxed);

    for reader in readers {
        reader.join().unwrap();
    }
    let last = buf.snapshot().unwrap();
    assert_eq!(last.value, fix(20_000));
    assert_eq!(last.generation, 20_000);
}

#[test]
fn slow_consumer_sees_only_the_latest() {
    let buf = DoubleBuffer::new(fix(0));
    let first = {
        buf.publish(fix(1));
        buf.snapshot().unwrap()
    };
    for n in 2..=10 {
        buf.publish(fix(n));
    }
    let later = buf.snapshot().unwrap();
    assert_eq!(later.value.itow, 10);
    // Publishes between the two reads were never observed
    assert_eq!(later.generation - first.generation, 9);
}

#[test]
fn snapshot_is_a_copy() {
    let buf = DoubleBuffer::new(fix(0));
    buf.publish(fix(1));
    let snap = buf.snapshot().unwrap();
    buf.publish(fix(2));
    buf.publish(fix(3));
    assert_eq!(snap.value, fix(1));
    assert_eq!(snap.slot, Slot::A);
    assert_eq!(buf.snapshot().unwrap().slot, Slot::A);
}

#[test]
fn waiting_consumer_follows_the_producer() {
    let buf = Arc::new(DoubleBuffer::new(fix(0)));
    let consumer = {
        let buf = Arc::clone(&buf);
        thread::spawn(move || {
            let mut generation = 0;
            let mut values = Vec::new();
            while generation < 5 {
                let snap = buf
                    .wait_for_update(generation, Duration::from_secs(10))
                    .expect("producer stalled");
                assert!(snap.generation > generation);
                generation = snap.generation;
                values.push(snap.value.itow);
            }
            values
        })
    };
    for n in 1..=5 {
        thread::sleep(Duration::from_millis(5));
        buf.publish(fix(n));
    }
    let values = consumer.join().unwrap();
    assert_eq!(values.last(), Some(&5));
    assert!(values.windows(2).all(|w| w[0] < w[1]));
}
