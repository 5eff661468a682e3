//! Cancellation and deadlines for layouts that wait on an asynchronous algorithm.
//!
//! Both are runtime-agnostic: the token is a shared flag, and the deadline is a oneshot channel
//! completed by a std timer thread, so any executor (or `futures::executor::block_on`) can
//! drive them.

use futures::FutureExt;
use futures::channel::oneshot;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::task::{Context, Poll};
use std::thread::JoinHandle;
use std::time::Duration;

/// Shared cancellation flag. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A future that resolves once `after` has elapsed.
///
/// Dropping it before then stops and joins the timer thread.
pub fn deadline(after: Duration) -> Deadline {
    let (fired_tx, fired) = oneshot::channel::<()>();
    let (stop, stopped) = mpsc::channel::<()>();
    let timer = std::thread::spawn(move || {
        if let Err(mpsc::RecvTimeoutError::Timeout) = stopped.recv_timeout(after) {
            let _ = fired_tx.send(());
        }
    });
    Deadline {
        fired,
        stop: Some(stop),
        timer: Some(timer),
    }
}

#[derive(Debug)]
pub struct Deadline {
    fired: oneshot::Receiver<()>,
    stop: Option<mpsc::Sender<()>>,
    timer: Option<JoinHandle<()>>,
}

impl Future for Deadline {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.fired.poll_unpin(cx).map(|_| ())
    }
}

impl Drop for Deadline {
    fn drop(&mut self) {
        // Disconnecting wakes the timer thread if it is still waiting.
        drop(self.stop.take());
        if let Some(timer) = self.timer.take() {
            let _ = timer.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_cancellation() {
        let a = CancelToken::new();
        let b = a.clone();
        assert!(!b.is_cancelled());
        a.cancel();
        assert!(b.is_cancelled());
    }

    #[test]
    fn deadline_resolves() {
        futures::executor::block_on(deadline(Duration::from_millis(5)));
    }

    #[test]
    fn dropping_an_unexpired_deadline_releases_its_thread() {
        let started = std::time::Instant::now();
        for _ in 0..5 {
            drop(deadline(Duration::from_secs(10)));
        }
        // Each drop joins its timer thread, so this only returns once all of them exited.
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
