//! Stored Entry Module
//!
//! A single key's value and expiry inside the in-process store.

use std::time::{Duration, Instant};

// == Stored Entry ==
/// Value plus optional expiry instant.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// The stored value
    pub value: String,
    /// When the entry stops being visible, None = never
    pub expires_at: Option<Instant>,
}

impl StoredEntry {
    // == Constructors ==
    /// Creates an entry that never expires.
    pub fn persistent(value: String) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// Creates an entry that expires `ttl_seconds` from now.
    ///
    /// Returns `None` if the expiry instant is not representable.
    pub fn expiring(value: String, ttl_seconds: u64) -> Option<Self> {
        let expires_at = Instant::now().checked_add(Duration::from_secs(ttl_seconds))?;
        Some(Self {
            value,
            expires_at: Some(expires_at),
        })
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiry instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a given instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}
