use fastdns_domain::Request;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Objects that can be emptied for reuse without giving up their allocations.
///
/// `Default` must not allocate: it fills the guard's slot while the real
/// object travels back to the free list.
pub trait Recycle: Default {
    fn recycle(&mut self);
}

impl Recycle for Vec<u8> {
    fn recycle(&mut self) {
        self.clear();
    }
}

impl Recycle for Request {
    fn recycle(&mut self) {
        self.reset();
    }
}

/// Free-list of reusable objects.
///
/// [`Pool::acquire`] never blocks: it pops a recycled object or builds a new
/// one. The returned [`Pooled`] guard owns the object exclusively and hands it
/// back, emptied, when dropped, so every exit path (early return, `?`, panic
/// unwinding) releases it and a second acquirer can never observe it while it
/// is held.
pub struct Pool<T: Recycle> {
    inner: Arc<PoolInner<T>>,
}

struct PoolInner<T> {
    free: Mutex<Vec<T>>,
    factory: Box<dyn Fn() -> T + Send + Sync>,
    max_idle: usize,
    created: AtomicU64,
    reused: AtomicU64,
}

impl<T: Recycle> PoolInner<T> {
    fn free_list(&self) -> MutexGuard<'_, Vec<T>> {
        // The free list stays consistent even if a holder panicked mid-push.
        self.free.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Recycle> Pool<T> {
    /// Creates a pool keeping at most `max_idle` released objects around.
    pub fn new<F>(max_idle: usize, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(PoolInner {
                free: Mutex::new(Vec::new()),
                factory: Box::new(factory),
                max_idle,
                created: AtomicU64::new(0),
                reused: AtomicU64::new(0),
            }),
        }
    }

    pub fn acquire(&self) -> Pooled<T> {
        let recycled = self.inner.free_list().pop();
        let item = match recycled {
            Some(item) => {
                self.inner.reused.fetch_add(1, Ordering::Relaxed);
                item
            }
            None => {
                self.inner.created.fetch_add(1, Ordering::Relaxed);
                (self.inner.factory)()
            }
        };

        Pooled {
            item,
            pool: Arc::clone(&self.inner),
        }
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            total_created: self.inner.created.load(Ordering::Relaxed),
            total_reused: self.inner.reused.load(Ordering::Relaxed),
            idle: self.inner.free_list().len(),
        }
    }
}

impl Pool<Vec<u8>> {
    /// Byte buffer pool whose fresh buffers reserve `capacity` bytes.
    pub fn byte_buffers(max_idle: usize, capacity: usize) -> Self {
        Self::new(max_idle, move || Vec::with_capacity(capacity))
    }
}

impl Pool<Request> {
    pub fn requests(max_idle: usize) -> Self {
        Self::new(max_idle, Request::new)
    }
}

impl<T: Recycle> Clone for Pool<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Recycle> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("max_idle", &self.inner.max_idle)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Exclusive checkout from a [`Pool`]; returned on drop.
pub struct Pooled<T: Recycle> {
    item: T,
    pool: Arc<PoolInner<T>>,
}

impl<T: Recycle> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}

impl<T: Recycle> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.item
    }
}

impl<T: Recycle> Drop for Pooled<T> {
    fn drop(&mut self) {
        let mut item = std::mem::take(&mut self.item);
        item.recycle();
        let mut free = self.pool.free_list();
        if free.len() < self.pool.max_idle {
            free.push(item);
        }
    }
}

impl<T: Recycle + fmt::Debug> fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub total_created: u64,
    pub total_reused: u64,
    pub idle: usize,
}
