//! The cooperative drive loop.
//!
//! Tasks in this crate are ordinary [`Future`]s whose suspension points are
//! io readiness: a task returns [`Poll::Pending`] exactly when its underlying
//! [`Source`](crate::io::Source) or [`Sink`](crate::io::Sink) reported "no
//! data yet" / "no capacity yet". There is no reactor and no waker plumbing,
//! since sources are *polled* rather than waker-driven, so the one scheduling
//! primitive is [`block_on`]: pin the task in place and poll it until ready.
//!
//! Futures here still honor the wider contract: before suspending they wake
//! their own waker, so a foreign executor that schedules by wakeups keeps
//! polling them too.
//!
//! Discarding a still-pending task is always safe. Tasks borrow the
//! connection's reader and writer rather than owning them, so nothing leaks
//! and nothing is left half-closed; the bytes already consumed are simply
//! gone.

use std::future::Future;
use std::pin::{Pin, pin};
use std::task::{Context, Poll, Waker};

/// Drives a future to completion on the current thread.
///
/// The future is pinned on the stack and never moves again, then polled in a
/// tight spin until it returns [`Poll::Ready`]. Between polls the loop only
/// issues a spin hint; embedders that need a gentler cadence (or a deadline)
/// should poll the future themselves via [`poll_once`].
pub fn block_on<F: Future>(future: F) -> F::Output {
    let mut future = pin!(future);
    let mut cx = Context::from_waker(Waker::noop());
    loop {
        match future.as_mut().poll(&mut cx) {
            Poll::Ready(output) => return output,
            Poll::Pending => std::hint::spin_loop(),
        }
    }
}

/// Advances a pinned future by exactly one poll.
///
/// This is the escape hatch for embedders that interleave many tasks or
/// enforce deadlines between polls, and it is what the tests use to observe
/// a suspension point.
pub fn poll_once<F: Future>(future: Pin<&mut F>) -> Poll<F::Output> {
    let mut cx = Context::from_waker(Waker::noop());
    future.poll(&mut cx)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Suspends `remaining` times before yielding a value.
    struct Stubborn {
        remaining: u32,
        value: u32,
    }

    impl Future for Stubborn {
        type Output = u32;

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<u32> {
            if self.remaining == 0 {
                Poll::Ready(self.value)
            } else {
                self.remaining -= 1;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    #[test]
    fn block_on_ready_future() {
        assert_eq!(block_on(async { 7 }), 7);
    }

    #[test]
    fn block_on_retries_until_ready() {
        let value = block_on(Stubborn { remaining: 3, value: 42 });
        assert_eq!(value, 42);
    }

    #[test]
    fn poll_once_observes_each_suspension() {
        let mut future = pin!(Stubborn { remaining: 2, value: 9 });
        assert_eq!(poll_once(future.as_mut()), Poll::Pending);
        assert_eq!(poll_once(future.as_mut()), Poll::Pending);
        assert_eq!(poll_once(future.as_mut()), Poll::Ready(9));
    }

    #[test]
    fn pending_task_can_be_dropped() {
        let mut future = pin!(Stubborn {
            remaining: u32::MAX,
            value: 0,
        });
        assert_eq!(poll_once(future.as_mut()), Poll::Pending);
        // Falls out of scope while still pending; nothing to assert beyond
        // that this does not panic.
    }
}
