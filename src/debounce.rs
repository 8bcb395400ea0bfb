//! Debouncing for rapidly changing input values.

use std::time::Duration;
use tokio::sync::watch;
use tokio_util::task::AbortOnDropHandle;

/// Delays propagation of a value until it has been stable for a quiet period.
///
/// The output starts at the initial value without delay. Each new input restarts
/// the wait, so only a value that stays unchanged for the full delay is emitted;
/// superseded values are never emitted. Dropping the debouncer cancels any
/// pending emission.
///
/// Must be created inside a tokio runtime.
pub struct Debouncer<T> {
    input: watch::Sender<T>,
    output: watch::Receiver<T>,
    _task: AbortOnDropHandle<()>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("input", &*self.input.borrow())
            .field("output", &*self.output.borrow())
            .finish_non_exhaustive()
    }
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: T, delay: Duration) -> Self {
        let (input, input_rx) = watch::channel(initial.clone());
        let (output_tx, output) = watch::channel(initial);
        let task = tokio::spawn(debounce(input_rx, output_tx, delay));
        Self {
            input,
            output,
            _task: AbortOnDropHandle::new(task),
        }
    }

    /// Feeds a new input value. Re-sending the current input is a no-op.
    pub fn set(&self, value: T) {
        self.input.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }

    /// The latest raw input.
    pub fn input(&self) -> T {
        self.input.borrow().clone()
    }

    /// The latest emitted (debounced) value.
    pub fn current(&self) -> T {
        self.output.borrow().clone()
    }

    /// Observe emitted values.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.clone()
    }
}

async fn debounce<T>(mut input: watch::Receiver<T>, output: watch::Sender<T>, delay: Duration)
where
    T: Clone + PartialEq,
{
    loop {
        if input.changed().await.is_err() {
            return;
        }

        // Restart the quiet period on every further change.
        loop {
            tokio::select! {
                changed = input.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                () = tokio::time::sleep(delay) => break,
            }
        }

        let value = input.borrow_and_update().clone();
        output.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }
}
