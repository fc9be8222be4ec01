//! Integration tests for `SizeClassPool` under concurrent use.

#![allow(
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    reason = "we do not need to worry about these things when writing test code"
)]

use std::thread;

use new_zealand::nz;
use size_class_pool::{BIN_COUNT, SizeClassPool};
use testing::with_watchdog;

#[test]
fn repeated_get_put_reuses_one_block() {
    let pool = SizeClassPool::new();

    let first = pool.get(1010);
    let address = first.as_ptr();
    pool.put(first);

    for _ in 0..10_000 {
        let block = pool.get(1010);
        assert_eq!(block.as_ptr(), address);
        pool.put(block);
    }

    assert_eq!(pool.retained_blocks(), 1);
}

#[test]
fn every_size_class_round_trips() {
    let pool = SizeClassPool::new();

    for bin in 0..20 {
        let size = 1_usize << bin;
        let block = pool.get(size);

        assert_eq!(block.len(), size);
        assert_eq!(block.capacity(), size);

        pool.put(block);
    }

    assert_eq!(pool.retained_blocks(), 20);
    assert!(BIN_COUNT >= 20);
}

#[test]
fn get_zero_has_no_side_effects() {
    let pool = SizeClassPool::new();
    pool.put(Vec::with_capacity(1));

    for _ in 0..10 {
        assert!(pool.get(0).is_empty());
    }

    assert_eq!(pool.retained_blocks(), 1);
}

#[cfg_attr(miri, ignore)]
#[test]
fn concurrent_get_put_from_many_threads() {
    with_watchdog(|| {
        let pool = SizeClassPool::builder().max_blocks_per_bin(nz!(4)).build();

        let workers = (0..8)
            .map(|worker: usize| {
                let pool = pool.clone();

                thread::spawn(move || {
                    let mut size = worker + 1;

                    for iteration in 0..2000_usize {
                        let mut block = pool.get(size);
                        assert_eq!(block.len(), size);
                        assert!(block.capacity() >= size);

                        // Leave a mark so a corrupt double-issue would show up as a mismatch.
                        #[expect(clippy::cast_possible_truncation, reason = "marker byte")]
                        let marker = (iteration % 256) as u8;
                        block.fill(marker);
                        assert!(block.iter().all(|b| *b == marker));

                        pool.put(block);

                        size = if size > 1 << 16 { worker + 1 } else { size * 3 };
                    }
                })
            })
            .collect::<Vec<_>>();

        for worker in workers {
            worker.join().unwrap();
        }

        // At most 4 blocks per size class are kept.
        assert!(pool.retained_blocks() <= 4 * BIN_COUNT);
    });
}

#[cfg_attr(miri, ignore)]
#[test]
fn clear_while_in_use_is_safe() {
    with_watchdog(|| {
        let pool = SizeClassPool::new();

        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..1000 {
                        let block = pool.get(300);
                        pool.put(block);
                    }
                });
            }

            s.spawn(|| {
                for _ in 0..100 {
                    _ = pool.clear();
                }
            });
        });

        assert!(pool.retained_blocks() <= 4);
    });
}
