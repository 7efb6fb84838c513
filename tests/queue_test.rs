/*!
 * Blocking Queue Tests
 * FIFO ordering, non-blocking receive, and timeout behavior for every strategy
 */

use blocking_queue::{BlockingQueue, RecvTimeoutError, StrategyType, SyncConfig, TryRecvError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serial_test::serial;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const STRATEGIES: [StrategyType; 2] = [StrategyType::Futex, StrategyType::Condvar];

fn queue_for<T>(strategy: StrategyType) -> BlockingQueue<T> {
    BlockingQueue::with_config(SyncConfig::new(strategy))
}

proptest! {
    #[test]
    fn prop_sends_drain_in_order(
        messages in proptest::collection::vec(any::<u32>(), 0..64),
        use_recv in any::<bool>(),
    ) {
        for strategy in STRATEGIES {
            let queue = queue_for(strategy);
            for message in &messages {
                queue.send(*message);
            }

            let drained: Vec<u32> = (0..messages.len())
                .map(|i| {
                    // Mix blocking and non-blocking receives
                    if use_recv && i % 2 == 0 {
                        queue.recv()
                    } else {
                        queue.try_recv().unwrap()
                    }
                })
                .collect();

            prop_assert_eq!(&drained, &messages);
            prop_assert_eq!(queue.try_recv(), Err(TryRecvError::Empty));
        }
    }
}

#[test]
fn test_try_recv_empty_does_not_block() {
    for strategy in STRATEGIES {
        let queue = queue_for::<String>(strategy);

        let start = Instant::now();
        let result = queue.try_recv();

        assert_eq!(result, Err(TryRecvError::Empty));
        assert!(start.elapsed() < Duration::from_millis(10));
    }
}

#[test]
#[serial]
fn test_recv_timeout_without_sender() {
    for strategy in STRATEGIES {
        let queue = queue_for::<String>(strategy);

        let start = Instant::now();
        let result = queue.recv_timeout(Duration::from_millis(200));
        let elapsed = start.elapsed();

        assert_eq!(result, Err(RecvTimeoutError::Timeout), "{:?}", strategy);
        assert!(elapsed >= Duration::from_millis(200), "{:?}: {:?}", strategy, elapsed);
        assert!(elapsed < Duration::from_millis(400), "{:?}: {:?}", strategy, elapsed);
    }
}

#[test]
#[serial]
fn test_message_before_deadline_is_received_early() {
    for strategy in STRATEGIES {
        let queue = Arc::new(queue_for::<String>(strategy));
        let sender_queue = queue.clone();

        let sender = thread::spawn(move || {
            thread::sleep(Duration::from_secs(1));
            sender_queue.send("X".to_string());
        });

        let start = Instant::now();
        let result = queue.recv_timeout(Duration::from_secs(3));
        let elapsed = start.elapsed();

        assert_eq!(result, Ok("X".to_string()));
        assert!(elapsed >= Duration::from_millis(900), "{:?}: {:?}", strategy, elapsed);
        assert!(elapsed < Duration::from_millis(1500), "{:?}: {:?}", strategy, elapsed);

        sender.join().unwrap();
    }
}

#[test]
#[serial]
fn test_message_after_deadline_times_out() {
    for strategy in STRATEGIES {
        let queue = Arc::new(queue_for::<String>(strategy));
        let sender_queue = queue.clone();

        let sender = thread::spawn(move || {
            thread::sleep(Duration::from_secs(3));
            sender_queue.send("X".to_string());
        });

        let start = Instant::now();
        let result = queue.recv_timeout(Duration::from_secs(1));
        let elapsed = start.elapsed();

        assert_eq!(result, Err(RecvTimeoutError::Timeout));
        assert!(elapsed >= Duration::from_secs(1), "{:?}: {:?}", strategy, elapsed);
        assert!(elapsed < Duration::from_millis(1500), "{:?}: {:?}", strategy, elapsed);

        // The late message is kept for the next receiver
        sender.join().unwrap();
        assert_eq!(queue.try_recv(), Ok("X".to_string()));
    }
}

#[test]
#[serial]
fn test_message_at_deadline_is_never_lost() {
    for strategy in STRATEGIES {
        for round in 0..20u64 {
            let queue = Arc::new(queue_for::<u64>(strategy));
            let sender_queue = queue.clone();
            let timeout = Duration::from_millis(20);

            // Land the send within about a millisecond of the deadline
            let sender = thread::spawn(move || {
                thread::sleep(timeout - Duration::from_millis(1) + Duration::from_micros(round * 100));
                sender_queue.send(round);
            });

            let received = queue.recv_timeout(timeout);
            sender.join().unwrap();

            match received {
                Ok(message) => assert_eq!(message, round),
                Err(RecvTimeoutError::Timeout) => assert_eq!(queue.try_recv(), Ok(round)),
            }
            assert_eq!(queue.try_recv(), Err(TryRecvError::Empty));
        }
    }
}

#[test]
fn test_recv_blocks_until_send() {
    for strategy in STRATEGIES {
        let queue = Arc::new(queue_for::<u32>(strategy));
        let receiver_queue = queue.clone();

        let receiver = thread::spawn(move || receiver_queue.recv());

        thread::sleep(Duration::from_millis(50));
        assert!(!receiver.is_finished());

        queue.send(42);
        assert_eq!(receiver.join().unwrap(), 42);
    }
}

#[test]
fn test_every_message_delivered_once_across_consumers() {
    const PRODUCERS: u32 = 4;
    const CONSUMERS: usize = 4;
    const PER_PRODUCER: u32 = 500;

    for strategy in STRATEGIES {
        let queue = Arc::new(queue_for::<u32>(strategy));

        let consumers: Vec<_> = (0..CONSUMERS)
            .map(|_| {
                let queue = queue.clone();
                thread::spawn(move || {
                    let mut seen = Vec::new();
                    // Stop once the producers have gone quiet
                    while let Ok(message) = queue.recv_timeout(Duration::from_millis(500)) {
                        seen.push(message);
                    }
                    seen
                })
            })
            .collect();

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let queue = queue.clone();
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        queue.send(p * PER_PRODUCER + i);
                    }
                })
            })
            .collect();

        for producer in producers {
            producer.join().unwrap();
        }

        let mut all = HashSet::new();
        let mut total = 0;
        for consumer in consumers {
            let seen = consumer.join().unwrap();

            // Per-producer order survives within a single consumer
            for p in 0..PRODUCERS {
                let from_p: Vec<_> = seen
                    .iter()
                    .filter(|m| **m / PER_PRODUCER == p)
                    .collect();
                assert!(from_p.windows(2).all(|w| w[0] < w[1]), "{:?}", strategy);
            }

            total += seen.len();
            all.extend(seen);
        }

        assert_eq!(total, (PRODUCERS * PER_PRODUCER) as usize, "{:?}", strategy);
        assert_eq!(all.len(), total);
        assert!(queue.is_empty());
    }
}

#[test]
fn test_queue_outlives_dropped_timers() {
    // Timed receives that return early leave no work behind
    let queue = Arc::new(queue_for::<u32>(StrategyType::Condvar));
    for i in 0..50 {
        let sender_queue = queue.clone();
        let sender = thread::spawn(move || sender_queue.send(i));
        assert_eq!(queue.recv_timeout(Duration::from_secs(10)), Ok(i));
        sender.join().unwrap();
    }
    drop(queue);
}
