use super::{ListenerError, ServerError};
use crate::dns::worker_pool::panic_message;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

type Exit = (usize, Result<(), ListenerError>);

/// Keeps a fixed set of listeners running.
///
/// Every listener exit, clean, failed or panicked, is reported over one
/// channel and the same index is launched again. Exits are counted over the
/// supervisor's whole lifetime; the exit that would push restarts past
/// `max_restarts` ends supervision with [`ServerError::TooManyRestarts`].
#[derive(Debug, Clone)]
pub struct Supervisor {
    max_restarts: usize,
    shutdown: CancellationToken,
}

impl Supervisor {
    pub fn new(max_restarts: usize, shutdown: CancellationToken) -> Self {
        Self {
            max_restarts,
            shutdown,
        }
    }

    /// Launches listeners `1..=count` and supervises them until shutdown or
    /// the restart budget runs out. Running listeners are cancelled on return.
    pub async fn run<F, Fut>(&self, count: usize, mut launch: F) -> Result<(), ServerError>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = Result<(), ListenerError>> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<Exit>(count.max(1));
        let listeners = self.shutdown.child_token();
        let _stop_listeners = listeners.clone().drop_guard();

        for index in 1..=count {
            spawn_listener(index, launch(index), tx.clone(), listeners.clone());
        }

        let mut restarts = 0usize;
        loop {
            let (index, result) = tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("DNS listeners shutting down");
                    return Ok(());
                }
                exit = rx.recv() => match exit {
                    Some(exit) => exit,
                    // `tx` lives in this frame, so the channel never drains.
                    None => return Ok(()),
                },
            };

            match &result {
                Ok(()) => warn!(listener = index, "Listener exited"),
                Err(e) => warn!(listener = index, error = %e, "Listener exited"),
            }

            if restarts >= self.max_restarts {
                error!(
                    restarts,
                    max_restarts = self.max_restarts,
                    "Too many listener restarts, giving up"
                );
                return Err(ServerError::TooManyRestarts(restarts));
            }

            restarts += 1;
            info!(listener = index, restarts, "Restarting listener");
            spawn_listener(index, launch(index), tx.clone(), listeners.clone());
        }
    }
}

fn spawn_listener<Fut>(
    index: usize,
    listener: Fut,
    exits: mpsc::Sender<Exit>,
    cancel: CancellationToken,
) where
    Fut: Future<Output = Result<(), ListenerError>> + Send + 'static,
{
    tokio::spawn(async move {
        let result = tokio::select! {
            _ = cancel.cancelled() => return,
            outcome = AssertUnwindSafe(listener).catch_unwind() => match outcome {
                Ok(result) => result,
                Err(panic) => Err(ListenerError::Panicked(panic_message(panic.as_ref()))),
            },
        };
        let _ = exits.send((index, result)).await;
    });
}
