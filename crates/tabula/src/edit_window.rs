use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tabula_core::{Error, Result};

/// Time limit on an edit session that spans several requests.
///
/// The session stores [`EditWindow::opened_at`] when the edit form is
/// handed out and resumes the window when the form comes back. Committing
/// through [`crate::Db::commit_within`] then refuses stale edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditWindow {
    opened_at: SystemTime,
    allowed: Duration,
}

impl EditWindow {
    pub fn open(allowed: Duration) -> Self {
        Self {
            opened_at: SystemTime::now(),
            allowed,
        }
    }

    /// Resumes a window opened at `opened_at` seconds since the UNIX epoch.
    pub fn resume(opened_at: u64, allowed: Duration) -> Self {
        Self {
            opened_at: UNIX_EPOCH + Duration::from_secs(opened_at),
            allowed,
        }
    }

    /// Seconds since the UNIX epoch, for storing in a session.
    pub fn opened_at(&self) -> u64 {
        self.opened_at
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default()
    }

    pub fn allowed(&self) -> Duration {
        self.allowed
    }

    /// Time left at `now`; zero once expired.
    pub fn remaining_at(&self, now: SystemTime) -> Duration {
        self.allowed.saturating_sub(self.elapsed_at(now))
    }

    pub fn check(&self) -> Result<()> {
        self.check_at(SystemTime::now())
    }

    pub fn check_at(&self, now: SystemTime) -> Result<()> {
        if self.elapsed_at(now) > self.allowed {
            return Err(Error::transaction_timeout(self.allowed));
        }
        Ok(())
    }

    fn elapsed_at(&self, now: SystemTime) -> Duration {
        // A clock that went backwards counts as no time elapsed
        now.duration_since(self.opened_at).unwrap_or_default()
    }
}
