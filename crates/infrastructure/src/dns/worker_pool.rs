use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error};

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Reusable set of tokio tasks that run submitted futures.
///
/// [`WorkerPool::go`] never waits for capacity: it hands the future to the
/// most recently parked worker or spawns a new one. Workers that stay parked
/// longer than the idle timeout exit, so the pool shrinks back after a burst.
#[derive(Clone)]
pub struct WorkerPool {
    inner: Arc<Inner>,
}

struct Inner {
    idle: Mutex<Vec<IdleWorker>>,
    idle_timeout: Duration,
    next_id: AtomicU64,
    spawned: AtomicUsize,
    live: AtomicUsize,
}

struct IdleWorker {
    id: u64,
    tx: mpsc::Sender<Task>,
}

impl Inner {
    fn idle_list(&self) -> MutexGuard<'_, Vec<IdleWorker>> {
        self.idle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WorkerPool {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                idle: Mutex::new(Vec::new()),
                idle_timeout,
                next_id: AtomicU64::new(0),
                spawned: AtomicUsize::new(0),
                live: AtomicUsize::new(0),
            }),
        }
    }

    /// Runs `task` on a pooled worker. Must be called inside a tokio runtime.
    pub fn go<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut task: Task = Box::pin(task);
        loop {
            let parked = self.inner.idle_list().pop();
            let Some(worker) = parked else {
                self.spawn_worker(task);
                return;
            };
            match worker.tx.try_send(task) {
                Ok(()) => return,
                // A popped worker always waits for its handoff, so this is
                // only reachable if its task was torn down with the runtime.
                Err(TrySendError::Full(t)) | Err(TrySendError::Closed(t)) => task = t,
            }
        }
    }

    fn spawn_worker(&self, first: Task) {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.spawned.fetch_add(1, Ordering::Relaxed);
        self.inner.live.fetch_add(1, Ordering::Relaxed);

        let (tx, rx) = mpsc::channel(1);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(run_worker(inner, id, tx, rx, first));
    }

    /// Workers parked waiting for a task.
    pub fn idle_workers(&self) -> usize {
        self.inner.idle_list().len()
    }

    /// Workers currently alive, busy or parked.
    pub fn live_workers(&self) -> usize {
        self.inner.live.load(Ordering::Relaxed)
    }

    /// Workers spawned over the pool's lifetime.
    pub fn spawned_workers(&self) -> usize {
        self.inner.spawned.load(Ordering::Relaxed)
    }

    pub fn idle_timeout(&self) -> Duration {
        self.inner.idle_timeout
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("idle_timeout", &self.inner.idle_timeout)
            .field("live", &self.live_workers())
            .field("idle", &self.idle_workers())
            .finish()
    }
}

async fn run_worker(
    inner: Arc<Inner>,
    id: u64,
    tx: mpsc::Sender<Task>,
    mut rx: mpsc::Receiver<Task>,
    first: Task,
) {
    let mut task = first;
    loop {
        if let Err(panic) = AssertUnwindSafe(task).catch_unwind().await {
            error!(
                worker = id,
                panic = panic_message(panic.as_ref()),
                "Task panicked"
            );
        }

        inner.idle_list().push(IdleWorker { id, tx: tx.clone() });

        task = loop {
            match tokio::time::timeout(inner.idle_timeout, rx.recv()).await {
                Ok(Some(next)) => break next,
                // We hold a sender ourselves; the channel cannot close.
                Ok(None) => return,
                Err(_) => {
                    let mut idle = inner.idle_list();
                    if let Some(pos) = idle.iter().position(|w| w.id == id) {
                        idle.remove(pos);
                        drop(idle);
                        inner.live.fetch_sub(1, Ordering::Relaxed);
                        debug!(worker = id, "Idle worker exiting");
                        return;
                    }
                    // Popped by `go` right as we timed out: the task is on its way.
                }
            }
        };
    }
}

pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
