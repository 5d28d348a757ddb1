use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Coalesces bursts of values: a value is forwarded only after `window`
/// passes without a newer one. Dropping the debouncer cancels its timer and
/// discards anything pending.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    cancel: CancellationToken,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn spawn(window: Duration, output: mpsc::UnboundedSender<T>) -> Self {
        Self::spawn_with_token(window, output, CancellationToken::new())
    }

    /// Like [`Debouncer::spawn`], torn down when `cancel` fires.
    pub fn spawn_with_token(
        window: Duration,
        output: mpsc::UnboundedSender<T>,
        cancel: CancellationToken,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(window, rx, output, cancel.clone()));
        Self { tx, cancel }
    }

    pub fn push(&self, value: T) {
        let _ = self.tx.send(value);
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run<T>(
    window: Duration,
    mut rx: mpsc::UnboundedReceiver<T>,
    output: mpsc::UnboundedSender<T>,
    cancel: CancellationToken,
) {
    let mut pending: Option<T> = None;
    let timer = tokio::time::sleep(window);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            msg = rx.recv() => match msg {
                Some(value) => {
                    pending = Some(value);
                    timer.as_mut().reset(Instant::now() + window);
                }
                None => break,
            },
            _ = &mut timer, if pending.is_some() => {
                if let Some(value) = pending.take() {
                    if output.send(value).is_err() {
                        break;
                    }
                }
            }
        }
    }
}
