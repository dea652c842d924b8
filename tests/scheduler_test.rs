use bluesky_daily_bot::{Schedule, Scheduler};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_interval_runs_until_shutdown() {
    let counter = Arc::new(AtomicU64::new(0));
    let scheduler = Scheduler::new(Schedule::Interval(Duration::from_secs(10)));

    let job_counter = counter.clone();
    let runs = scheduler
        .run(
            move || {
                let c = job_counter.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                }
            },
            tokio::time::sleep(Duration::from_secs(35)),
        )
        .await;

    assert_eq!(runs, 3);
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_run_on_start_adds_an_immediate_run() {
    let counter = Arc::new(AtomicU64::new(0));
    let scheduler =
        Scheduler::new(Schedule::Interval(Duration::from_secs(10))).run_on_start(true);

    let job_counter = counter.clone();
    let runs = scheduler
        .run(
            move || {
                let c = job_counter.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                }
            },
            tokio::time::sleep(Duration::from_secs(15)),
        )
        .await;

    assert_eq!(runs, 2);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_runs_never_overlap() {
    let active = Arc::new(AtomicU64::new(0));
    let overlaps = Arc::new(AtomicU64::new(0));
    // each run takes longer than the interval
    let scheduler = Scheduler::new(Schedule::Interval(Duration::from_secs(1)));

    let (a, o) = (active.clone(), overlaps.clone());
    let runs = scheduler
        .run(
            move || {
                let (a, o) = (a.clone(), o.clone());
                async move {
                    if a.fetch_add(1, Ordering::SeqCst) > 0 {
                        o.fetch_add(1, Ordering::SeqCst);
                    }
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    a.fetch_sub(1, Ordering::SeqCst);
                }
            },
            tokio::time::sleep(Duration::from_secs(20)),
        )
        .await;

    assert!(runs >= 1);
    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_before_first_run() {
    let scheduler = Scheduler::new(Schedule::Interval(Duration::from_secs(3600)));
    let runs = scheduler.run(|| async {}, async {}).await;
    assert_eq!(runs, 0);
}
