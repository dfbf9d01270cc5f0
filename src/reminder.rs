use log::info;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A one-shot delayed notification that can be cancelled before it fires.
///
/// Used to nudge signed-out visitors towards the sign-in command a moment
/// after the browse shell starts. Cancelled explicitly on sign-in, and
/// implicitly when the handle is dropped on teardown. If a cancel races the
/// timeout the notification may be lost, which is fine.
#[derive(Debug)]
pub struct Reminder {
    cancel: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Reminder {
    /// Schedule `notify` to run on its own thread after `delay`.
    pub fn schedule_with<F>(delay: Duration, notify: F) -> Reminder
    where
        F: FnOnce() + Send + 'static,
    {
        let (cancel, fired) = mpsc::channel();
        let handle = thread::spawn(move || {
            if let Err(RecvTimeoutError::Timeout) = fired.recv_timeout(delay) {
                notify();
            }
            // anything else means we were cancelled or the handle was dropped
        });

        Reminder {
            cancel,
            handle: Some(handle),
        }
    }

    /// Schedule the standard sign-in nudge.
    pub fn sign_in_nudge(delay: Duration) -> Reminder {
        Self::schedule_with(delay, || {
            info!("sign in to save events and see your personal \"My Events\" view (try: signin you@example.com)");
        })
    }

    /// Cancel the reminder and wait for its thread to finish.
    pub fn cancel(mut self) {
        let _ = self.cancel.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Reminder {
    fn drop(&mut self) {
        // fire-and-forget teardown: signal the thread but do not wait for it
        let _ = self.cancel.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn fires_after_the_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();

        let mut reminder = Reminder::schedule_with(Duration::from_millis(5), move || {
            flag.store(true, Ordering::SeqCst);
        });

        // nothing cancels it, so joining waits out the timeout path
        reminder.handle.take().unwrap().join().unwrap();
        assert!(fired.load(Ordering::SeqCst));
    }

    #[test]
    fn cancel_prevents_the_notification() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();

        let reminder = Reminder::schedule_with(Duration::from_secs(30), move || {
            flag.store(true, Ordering::SeqCst);
        });
        reminder.cancel();

        assert!(!fired.load(Ordering::SeqCst));
    }

    #[test]
    fn dropping_cancels_without_blocking() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();

        {
            let _reminder = Reminder::schedule_with(Duration::from_secs(30), move || {
                flag.store(true, Ordering::SeqCst);
            });
        }

        assert!(!fired.load(Ordering::SeqCst));
    }
}
