//! Session identity.
//!
//! A session is one Active-mode activation.  It is identified by a counter
//! that advances on every Active exit and by a random identifier drawn
//! from the shared hardware RNG.  The identifier is boot-scoped: it is
//! drawn on the first Active entry and every later activation in the same
//! boot reuses it.

use core::fmt::{self, Write as _};

use log::{debug, info};

use crate::app::ports::{RngClock, RngPort, SemaphorePort};
use crate::config::{RNG_SEMAPHORE_ID, SESSION_ID_WORDS};
use crate::drivers::hw_semaphore::SemaphoreGuard;
use crate::error::{Error, Result, RngOp};

/// Hex characters needed to render a [`SessionId`].
pub const SESSION_ID_HEX_LEN: usize = SESSION_ID_WORDS * 8;

/// Random session identifier, six 32-bit words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub [u32; SESSION_ID_WORDS]);

impl SessionId {
    pub const fn words(&self) -> &[u32; SESSION_ID_WORDS] {
        &self.0
    }

    /// Lowercase hex, most significant word first.  This is the form the
    /// session log writes into its header.
    pub fn to_hex(&self) -> heapless::String<SESSION_ID_HEX_LEN> {
        let mut s = heapless::String::new();
        for word in self.0 {
            // Capacity is exact; write cannot fail.
            let _ = write!(s, "{word:08x}");
        }
        s
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in self.0 {
            write!(f, "{word:08x}")?;
        }
        Ok(())
    }
}

/// Identity handed to the log writer for one activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInfo {
    /// Activations completed before this one.
    pub counter: u32,
    pub id: SessionId,
}

/// Per-boot session state.  Owned by the mode service.
#[derive(Debug, Default)]
pub struct Session {
    counter: u32,
    id: Option<SessionId>,
}

impl Session {
    pub const fn new() -> Self {
        Self {
            counter: 0,
            id: None,
        }
    }

    pub const fn counter(&self) -> u32 {
        self.counter
    }

    pub const fn id(&self) -> Option<SessionId> {
        self.id
    }

    /// Return the boot's session identifier, drawing it from the RNG the
    /// first time.
    ///
    /// The draw runs entirely under the RNG semaphore: init, six words,
    /// deinit, then hand the kernel clock back to the 48 MHz source the
    /// other core expects.  The semaphore is released on every path.
    pub fn ensure_id<H>(&mut self, hw: &mut H) -> Result<SessionId>
    where
        H: SemaphorePort + RngPort,
    {
        if let Some(id) = self.id {
            debug!("session: reusing id {id}");
            return Ok(id);
        }

        let id = {
            let mut rng = SemaphoreGuard::acquire(hw, RNG_SEMAPHORE_ID);
            rng.rng_init()?;
            let mut words = [0u32; SESSION_ID_WORDS];
            for word in &mut words {
                *word = rng.rng_next()?;
            }
            rng.rng_deinit()?;
            rng.rng_select_clock(RngClock::Clk48)?;
            SessionId(words)
        };

        info!("session: id {id}");
        self.id = Some(id);
        Ok(id)
    }

    /// Identity of the activation in progress.
    ///
    /// Fails with [`RngOp::Generate`] if called before
    /// [`ensure_id`](Self::ensure_id) succeeded.
    pub fn info(&self) -> Result<SessionInfo> {
        let id = self.id.ok_or(Error::Rng(RngOp::Generate))?;
        Ok(SessionInfo {
            counter: self.counter,
            id,
        })
    }

    /// Close the current activation.
    pub fn advance(&mut self) {
        self.counter = self.counter.wrapping_add(1);
    }
}
