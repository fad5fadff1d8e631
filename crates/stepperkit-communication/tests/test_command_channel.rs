use std::collections::HashMap;
use std::thread;
use stepperkit_communication::command_channel;

#[test]
fn test_fifo_single_producer() {
    let (tx, mut rx) = command_channel();
    tx.enqueue("MA 100");
    tx.enqueue("MA 200");
    tx.enqueue(String::from("ER 0"));

    assert_eq!(rx.try_dequeue().as_deref(), Some("MA 100"));
    assert_eq!(rx.try_dequeue().as_deref(), Some("MA 200"));
    assert_eq!(rx.try_dequeue().as_deref(), Some("ER 0"));
    assert_eq!(rx.try_dequeue(), None);
}

#[test]
fn test_concurrent_producers_lose_nothing() {
    const PRODUCERS: usize = 8;
    const PER_PRODUCER: usize = 250;

    let (tx, mut rx) = command_channel();
    let workers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let tx = tx.clone();
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    tx.enqueue(format!("{} {}", p, i));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let mut next_expected: HashMap<usize, usize> = HashMap::new();
    let mut total = 0;
    while let Some(command) = rx.try_dequeue() {
        let (p, i) = command.split_once(' ').unwrap();
        let p: usize = p.parse().unwrap();
        let i: usize = i.parse().unwrap();
        let expected = next_expected.entry(p).or_insert(0);
        assert_eq!(i, *expected, "producer {} out of order", p);
        *expected += 1;
        total += 1;
    }

    assert_eq!(total, PRODUCERS * PER_PRODUCER);
    assert!(next_expected.values().all(|n| *n == PER_PRODUCER));
}
