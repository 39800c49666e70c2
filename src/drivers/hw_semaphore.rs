//! Cross-core hardware semaphore.
//!
//! Both cores share one random number generator and its kernel clock.
//! Whoever touches it first must hold the RNG semaphore for the whole
//! init → generate → deinit → clock-switch sequence.
//!
//! [`HwSemaphore`] is a bank of spin locks over shared-memory atomics,
//! usable on any dual-core part with coherent atomics.  [`SemaphoreGuard`]
//! scopes a held semaphore on any [`SemaphorePort`]: it is released when
//! the guard drops, including on early `?` returns.

use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

use crate::app::ports::SemaphorePort;

/// Semaphores in the board's shared bank.
pub const SEMAPHORE_BANK: usize = 8;

/// Bank of `N` spin semaphores.
pub struct HwSemaphore<const N: usize> {
    locks: [AtomicBool; N],
}

impl<const N: usize> HwSemaphore<N> {
    pub const fn new() -> Self {
        Self {
            locks: [const { AtomicBool::new(false) }; N],
        }
    }

    /// Single attempt.  Returns `true` if the semaphore was granted.
    pub fn try_lock(&self, id: usize) -> bool {
        self.locks[id]
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Spin until granted.
    pub fn lock(&self, id: usize) {
        while !self.try_lock(id) {
            while self.locks[id].load(Ordering::Relaxed) {
                core::hint::spin_loop();
            }
        }
    }

    pub fn release(&self, id: usize) {
        self.locks[id].store(false, Ordering::Release);
    }

    pub fn is_locked(&self, id: usize) -> bool {
        self.locks[id].load(Ordering::Acquire)
    }
}

impl<const N: usize> Default for HwSemaphore<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// A held semaphore.  Derefs to the port it was taken on so the critical
/// section can keep driving the same hardware.
pub struct SemaphoreGuard<'a, H: SemaphorePort> {
    hw: &'a mut H,
    id: usize,
}

impl<'a, H: SemaphorePort> SemaphoreGuard<'a, H> {
    /// Spin until semaphore `id` is granted.
    pub fn acquire(hw: &'a mut H, id: usize) -> Self {
        hw.sem_lock(id);
        Self { hw, id }
    }
}

impl<H: SemaphorePort> Deref for SemaphoreGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.hw
    }
}

impl<H: SemaphorePort> DerefMut for SemaphoreGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.hw
    }
}

impl<H: SemaphorePort> Drop for SemaphoreGuard<'_, H> {
    fn drop(&mut self) {
        self.hw.sem_release(self.id);
    }
}
