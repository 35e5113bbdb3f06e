//! Concurrency helpers shared across strategies and reporters.
//!
//! `Sleeper` is grounded on `flyingrobots-ninelives`'s sleeper abstraction:
//! production code sleeps on the tokio clock, tests substitute a sleeper
//! that records calls instead of actually waiting (spec §9: "inject a clock
//! so properties remain deterministic").

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

#[async_trait]
pub trait Sleeper: Send + Sync + std::fmt::Debug {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Default, Clone)]
pub struct TrackingSleeper {
    calls: Arc<Mutex<Vec<Duration>>>,
}

impl TrackingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Duration> {
        self.calls.lock().expect("TrackingSleeper mutex poisoned").clone()
    }
}

#[async_trait]
impl Sleeper for TrackingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.calls.lock().expect("TrackingSleeper mutex poisoned").push(duration);
    }
}

/// Golang-style wait-group: no equivalent primitive exists in std/tokio, so
/// this is a minimal Arc<AtomicUsize> + Notify construct. `add()` must be
/// called before spawning the tracked task; `done()` after it completes
/// (spec §4.F: "increments ... before launch and decrements ... after
/// publish, even on analyzer failure" — see `guard()` for the panic-safe
/// variant used by strategies).
#[derive(Debug, Clone, Default)]
pub struct WaitGroup {
    count: Arc<AtomicUsize>,
    notify: Arc<Notify>,
}

impl WaitGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn done(&self) {
        let prev = self.count.fetch_sub(1, Ordering::SeqCst);
        if prev == 1 {
            self.notify.notify_waiters();
        }
    }

    /// Register one unit of pending work and return a guard that calls
    /// `done()` on drop (including on panic-unwind), so a failing analyzer
    /// still releases the wait-group per spec §9's open-question decision.
    pub fn guard(&self) -> WaitGroupGuard {
        self.add();
        WaitGroupGuard { wg: self.clone() }
    }

    pub async fn wait(&self) {
        loop {
            if self.count.load(Ordering::SeqCst) == 0 {
                return;
            }
            let notified = self.notify.notified();
            if self.count.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

pub struct WaitGroupGuard {
    wg: WaitGroup,
}

impl Drop for WaitGroupGuard {
    fn drop(&mut self) {
        self.wg.done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wait_returns_immediately_with_no_pending_work() {
        let wg = WaitGroup::new();
        wg.wait().await;
    }

    #[tokio::test]
    async fn wait_blocks_until_all_guards_drop() {
        let wg = WaitGroup::new();
        let g1 = wg.guard();
        let g2 = wg.guard();
        let wg2 = wg.clone();
        let handle = tokio::spawn(async move {
            wg2.wait().await;
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());
        drop(g1);
        drop(g2);
        tokio::time::timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn guard_releases_even_if_task_panics() {
        let wg = WaitGroup::new();
        let wg2 = wg.clone();
        let handle = tokio::spawn(async move {
            let _g = wg2.guard();
            panic!("analyzer blew up");
        });
        let _ = handle.await;
        tokio::time::timeout(Duration::from_secs(1), wg.wait()).await.unwrap();
    }

    #[tokio::test]
    async fn tracking_sleeper_records_durations_without_waiting() {
        let sleeper = TrackingSleeper::new();
        let start = std::time::Instant::now();
        sleeper.sleep(Duration::from_secs(5)).await;
        assert!(start.elapsed() < Duration::from_millis(100));
        assert_eq!(sleeper.calls(), vec![Duration::from_secs(5)]);
    }
}
