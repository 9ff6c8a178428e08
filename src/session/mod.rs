use crate::models::{Notification, NotificationKind, VideoRecord};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// The one shared mutable state of the client: transient flags for the two
/// request phases, the current record and rendition selection, and the
/// single-slot notification.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Metadata phase in flight.
    pub loading: bool,
    /// Transfer phase in flight.
    pub is_downloading: bool,
    /// Percent complete of the current transfer, 0..=100. Stays at its last
    /// value when the transport declares no length.
    pub progress_percent: f64,
    pub last_error: Option<String>,
    pub notification: Option<Notification>,
    /// Most recently resolved record; left untouched by failed resolutions.
    pub video: Option<VideoRecord>,
    /// Must name a format of `video`; None until a record with at least one
    /// rendition is resolved.
    pub selected_format: Option<String>,
}

/// Controller for [`SessionState`]. All mutation goes through here so the
/// resolution/download logic stays testable without any rendering layer.
#[derive(Clone)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
    notify_seq: Arc<AtomicU64>,
    dismiss_after: Duration,
}

impl Session {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            notify_seq: Arc::new(AtomicU64::new(0)),
            dismiss_after,
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.read().expect("session lock poisoned").clone()
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        f(&mut self.state.write().expect("session lock poisoned"))
    }

    pub fn set_progress(&self, percent: f64) {
        self.update(|s| s.progress_percent = percent);
    }

    /// Replace the notification slot outright and schedule auto-dismissal.
    /// The sequence token turns a stale timer into a no-op instead of letting
    /// it erase a newer, still-valid notification.
    pub fn notify(&self, kind: NotificationKind, message: impl Into<String>) {
        let token = self.notify_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.update(|s| {
            s.notification = Some(Notification {
                message: message.into(),
                kind,
                visible: true,
            });
        });

        let state = Arc::clone(&self.state);
        let seq = Arc::clone(&self.notify_seq);
        let ttl = self.dismiss_after;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if seq.load(Ordering::SeqCst) == token {
                let mut guard = state.write().expect("session lock poisoned");
                if let Some(n) = guard.notification.as_mut() {
                    n.visible = false;
                }
            }
        });
    }

    /// Record a terminal session error and surface it through the slot.
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|s| s.last_error = Some(message.clone()));
        self.notify(NotificationKind::Error, message);
    }
}
