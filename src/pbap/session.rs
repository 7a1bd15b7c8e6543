//! PBAP Session State
//!
//! Per-connection state of the server: the folder the client has navigated to, the
//! missed call count last reported to it, and the one-shot reply flags raised while a
//! GET is being interpreted.

use super::path::VirtualPath;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;

/// Application parameter replies owed to the client for the current GET
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingReplies {
    /// Client asked for the phonebook size only (MAXLISTCOUNT = 0)
    pub size_only: bool,
    /// Response must carry the number of new missed calls
    pub missed_call_delta: bool,
}

/// State of one PBAP session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    current_path: VirtualPath,
    missed_call_baseline: usize,
    pending: PendingReplies,
}

impl SessionState {
    /// Create a session at the root folder
    #[must_use]
    pub fn new(missed_call_baseline: usize) -> Self {
        Self {
            current_path: VirtualPath::new(),
            missed_call_baseline,
            pending: PendingReplies::default(),
        }
    }

    /// Current virtual folder, empty at the root
    #[must_use]
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Replace the current folder after a successful SETPATH
    pub fn set_current_path(&mut self, path: VirtualPath) {
        self.current_path = path;
    }

    /// Missed call count at the time of the last report
    #[must_use]
    pub fn missed_call_baseline(&self) -> usize {
        self.missed_call_baseline
    }

    /// Number of missed calls since the last report, then remember `current` as the baseline
    ///
    /// A shrinking history (calls deleted on the phone) reports zero.
    pub fn take_missed_call_delta(&mut self, current: usize) -> usize {
        let delta = current.saturating_sub(self.missed_call_baseline);
        self.missed_call_baseline = current;
        delta
    }

    /// Replies raised so far for the current GET
    #[must_use]
    pub fn pending(&self) -> PendingReplies {
        self.pending
    }

    /// Raise the size-only reply
    pub fn request_size_only(&mut self) {
        self.pending.size_only = true;
    }

    /// Raise the new missed calls reply
    pub fn request_missed_call_delta(&mut self) {
        self.pending.missed_call_delta = true;
    }

    /// Consume the pending replies, clearing both flags
    pub fn take_pending(&mut self) -> PendingReplies {
        core::mem::take(&mut self.pending)
    }
}

/// Session lifecycle notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionEvent {
    /// A client connected to the PBAP target
    SessionEstablished,
    /// The client disconnected
    SessionDisconnected,
    /// The OBEX server session was closed
    ServerSessionClosed,
}

/// Receiver of session lifecycle notifications
pub trait SessionListener {
    /// Handle a session event; must not block
    fn on_session_event(&mut self, event: SessionEvent);
}

impl SessionListener for () {
    fn on_session_event(&mut self, _event: SessionEvent) {}
}

impl<M: RawMutex, const N: usize> SessionListener for Sender<'_, M, SessionEvent, N> {
    fn on_session_event(&mut self, event: SessionEvent) {
        if self.try_send(event).is_err() {
            warn!("[PBAP] Session event channel full, dropping {:?}", event);
        }
    }
}
