//! Query deadlines consulted between traversal levels.

use crate::error::{KgError, Result};
use std::time::{Duration, Instant};

/// A point in time after which a traversal gives up.
///
/// Traversals check the deadline between BFS levels only; a single level is
/// never interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    expires_at: Option<Instant>,
}

impl Deadline {
    /// A deadline that never expires
    pub const fn none() -> Self {
        Self { expires_at: None }
    }

    /// A deadline `timeout` from now
    pub fn after(timeout: Duration) -> Self {
        Self {
            expires_at: Instant::now().checked_add(timeout),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    /// Fail with [`KgError::Timeout`] if the deadline has passed
    pub fn check(&self, operation: &str) -> Result<()> {
        if self.is_expired() {
            Err(KgError::timeout(format!("{} exceeded its deadline", operation)))
        } else {
            Ok(())
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_never_expires() {
        assert!(Deadline::none().check("bfs").is_ok());
        assert!(Deadline::default().check("bfs").is_ok());
    }

    #[test]
    fn test_elapsed_deadline_fails() {
        let deadline = Deadline::after(Duration::ZERO);
        let err = deadline.check("component").unwrap_err();
        assert!(err.is_timeout());
    }
}
