//! Account Concurrency Tests
//!
//! Tests for thread safety:
//! - Exclusive writer under contention
//! - Transfers with abort-and-retry conserve the total

use crate::*;
use parking_lot::Mutex;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;
use std::thread;
use std::time::Duration;
use txbed::FixedLatency;

/// Many threads race for one write lock; exactly one wins per round
#[test]
fn test_single_writer_under_contention() {
    let (workers, account) = create_account(0);

    const NUM_THREADS: usize = 8;
    let barrier = Arc::new(Barrier::new(NUM_THREADS));
    let winners = Arc::new(Mutex::new(Vec::new()));

    for t in 0..NUM_THREADS {
        workers.register_fixed(txn(t as u128 + 1), Duration::from_millis(5));
    }

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|t| {
            let account = Arc::clone(&account);
            let barrier = Arc::clone(&barrier);
            let winners = Arc::clone(&winners);

            thread::spawn(move || {
                let me = txn(t as u128 + 1);
                barrier.wait();
                match account.open_write(me) {
                    Ok(()) => winners.lock().push(me),
                    Err(err) => {
                        assert!(err.is_retryable(), "unexpected error: {}", err);
                        assert_eq!(err.estimated_wait(), Some(Duration::from_millis(5)));
                    }
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let winners = winners.lock();
    assert_eq!(winners.len(), 1);
    assert_eq!(account.holders().writer, Some(winners[0]));
}

/// Move one unit between two accounts, or abort without side effects
fn transfer(set: &mut LockSet, from: &Arc<ResourceLock>, to: &Arc<ResourceLock>) -> Result<()> {
    let me = set.txn();
    let seen_from = from.peek(me)?;
    let seen_to = to.peek(me)?;

    set.open(from, false)?;
    from.verify(me, seen_from)?;
    set.open(from, true)?;

    set.open(to, false)?;
    to.verify(me, seen_to)?;
    set.open(to, true)?;

    from.update(me, seen_from - 1)?;
    to.update(me, seen_to + 1)?;
    set.release_all()
}

/// Transfers retried on abort keep the total balance constant
#[test]
fn test_transfers_conserve_total() {
    init_tracing();
    let workers = Arc::new(Workers::new());

    const NUM_ACCOUNTS: usize = 4;
    const NUM_THREADS: usize = 6;
    const TRANSFERS_PER_THREAD: usize = 25;
    const INITIAL: i64 = 1_000;

    let accounts: Arc<Vec<Arc<ResourceLock>>> = Arc::new(
        (0..NUM_ACCOUNTS)
            .map(|_| {
                Arc::new(
                    ResourceLock::builder(workers.clone())
                        .initial_value(INITIAL)
                        .latency(FixedLatency(Duration::from_micros(20)))
                        .build(),
                )
            })
            .collect(),
    );

    let aborts = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(NUM_THREADS));

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|t| {
            let accounts = Arc::clone(&accounts);
            let workers = Arc::clone(&workers);
            let aborts = Arc::clone(&aborts);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                let me = txn(t as u128 + 1);
                let mut rng = rand::thread_rng();
                workers.register(me, Duration::from_millis(2));
                barrier.wait();

                for _ in 0..TRANSFERS_PER_THREAD {
                    let from = rng.gen_range(0..NUM_ACCOUNTS);
                    let to = (from + rng.gen_range(1..NUM_ACCOUNTS)) % NUM_ACCOUNTS;

                    loop {
                        let mut set = LockSet::new(me);
                        match transfer(&mut set, &accounts[from], &accounts[to]) {
                            Ok(()) => break,
                            Err(err) => {
                                assert!(err.is_retryable(), "unexpected error: {}", err);
                                aborts.fetch_add(1, Ordering::Relaxed);
                                set.release_all().unwrap();
                                let hint = err.estimated_wait().unwrap_or_default();
                                let jitter = Duration::from_micros(rng.gen_range(0..200));
                                thread::sleep(hint.min(Duration::from_millis(1)) + jitter);
                            }
                        }
                    }
                }

                workers.deregister(me);
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let total: i64 = accounts.iter().map(|a| a.snapshot_value()).sum();
    assert_eq!(total, INITIAL * NUM_ACCOUNTS as i64);
    assert!(accounts.iter().all(|a| a.holders().is_idle()));
    assert!(workers.is_empty());
    tracing::debug!(aborts = aborts.load(Ordering::Relaxed), "transfer run finished");
}
