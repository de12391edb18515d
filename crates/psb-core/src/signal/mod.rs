use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

/// Binary flag with blocking wait, used to pace producer and consumer in lockstep.
///
/// Backed by a watch channel: [`wait`](Self::wait) checks the current value before
/// sleeping, so a `set` that lands before the waiter arrives is never missed.
#[derive(Debug)]
pub struct AlternationSignal {
    flag: watch::Sender<bool>,
    sets: AtomicU64,
    clears: AtomicU64,
}

impl AlternationSignal {
    /// New signal in the cleared state.
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag,
            sets: AtomicU64::new(0),
            clears: AtomicU64::new(0),
        }
    }

    /// Raise the flag and wake every waiter.
    pub fn set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
        self.flag.send_replace(true);
    }

    pub fn clear(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
        self.flag.send_replace(false);
    }

    pub fn is_set(&self) -> bool {
        *self.flag.borrow()
    }

    /// Block until the flag is raised.
    pub async fn wait(&self) {
        let mut rx = self.flag.subscribe();
        // the sender lives in `self`, so the channel cannot close while we wait
        let _ = rx.wait_for(|set| *set).await;
    }

    /// Number of `set` calls so far.
    pub fn sets(&self) -> u64 {
        self.sets.load(Ordering::Relaxed)
    }

    /// Number of `clear` calls so far.
    pub fn clears(&self) -> u64 {
        self.clears.load(Ordering::Relaxed)
    }
}

impl Default for AlternationSignal {
    fn default() -> Self {
        Self::new()
    }
}
