//! Frame-coalesced job scheduling
//!
//! Caret repositioning after scroll, resize or click is deferred to the next
//! frame tick. At most one job is pending; scheduling a new one supersedes the
//! old, and a handle to a superseded job is stale by revision.

/// Revocable handle to a scheduled job
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Single-slot scheduler for work that runs on the next frame.
#[derive(Debug)]
pub struct FrameScheduler<J> {
    pending: Option<(FrameHandle, J)>,
    revision: u64,
}

impl<J> Default for FrameScheduler<J> {
    fn default() -> Self {
        Self::new()
    }
}

impl<J> FrameScheduler<J> {
    pub fn new() -> Self {
        Self {
            pending: None,
            revision: 0,
        }
    }

    /// Schedule `job` for the next frame, dropping any pending one
    pub fn schedule(&mut self, job: J) -> FrameHandle {
        self.revision += 1;
        let handle = FrameHandle(self.revision);
        if self.pending.is_some() {
            tracing::trace!(revision = self.revision, "superseding pending frame job");
        }
        self.pending = Some((handle, job));
        handle
    }

    /// Revoke the job behind `handle`. Stale handles are ignored.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        match &self.pending {
            Some((pending, _)) if *pending == handle => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Drop whatever is pending
    pub fn clear(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Peek at the pending job
    pub fn pending(&self) -> Option<&J> {
        self.pending.as_ref().map(|(_, job)| job)
    }

    /// Take the pending job for this frame tick
    pub fn take(&mut self) -> Option<J> {
        self.pending.take().map(|(_, job)| job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_supersedes_pending() {
        let mut frames = FrameScheduler::new();
        frames.schedule(1);
        frames.schedule(2);
        assert_eq!(frames.take(), Some(2));
        assert_eq!(frames.take(), None);
    }

    #[test]
    fn test_cancel_with_current_handle() {
        let mut frames = FrameScheduler::new();
        let handle = frames.schedule("reposition");
        assert!(frames.cancel(handle));
        assert!(!frames.is_pending());
    }

    #[test]
    fn test_stale_handle_does_not_cancel_newer_job() {
        let mut frames = FrameScheduler::new();
        let old = frames.schedule(1);
        frames.schedule(2);
        assert!(!frames.cancel(old));
        assert_eq!(frames.take(), Some(2));
    }
}
