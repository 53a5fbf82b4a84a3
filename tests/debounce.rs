use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use confwatch::watch::next_burst;

const WINDOW: Duration = Duration::from_millis(100);

#[tokio::test(start_paused = true)]
async fn rapid_events_coalesce_into_one_burst() {
    let (tx, mut rx) = mpsc::unbounded_channel::<u32>();

    tokio::spawn(async move {
        for i in 0..5 {
            tx.send(i).unwrap();
            sleep(Duration::from_millis(20)).await;
        }
        // Quiet for longer than the window, then a second burst.
        sleep(Duration::from_millis(500)).await;
        tx.send(10).unwrap();
        tx.send(11).unwrap();
        sleep(Duration::from_millis(500)).await;
    });

    assert_eq!(next_burst(&mut rx, WINDOW, |_| true).await, Some(5));
    assert_eq!(next_burst(&mut rx, WINDOW, |_| true).await, Some(2));
    assert_eq!(next_burst(&mut rx, WINDOW, |_| true).await, None);
}

#[tokio::test(start_paused = true)]
async fn irrelevant_events_neither_start_nor_extend_a_burst() {
    let (tx, mut rx) = mpsc::unbounded_channel::<&'static str>();

    tokio::spawn(async move {
        tx.send("other").unwrap();
        sleep(Duration::from_millis(300)).await;
        tx.send("config").unwrap();
        // Irrelevant noise inside the window must not keep it open.
        for _ in 0..3 {
            sleep(Duration::from_millis(60)).await;
            tx.send("other").unwrap();
        }
        sleep(Duration::from_millis(500)).await;
    });

    let start = tokio::time::Instant::now();
    let burst = next_burst(&mut rx, WINDOW, |e| *e == "config").await;

    assert_eq!(burst, Some(1));
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(400), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(450), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn closed_channel_mid_burst_ends_the_loop() {
    let (tx, mut rx) = mpsc::unbounded_channel::<u32>();
    tx.send(1).unwrap();
    drop(tx);

    assert_eq!(next_burst(&mut rx, WINDOW, |_| true).await, None);
}
