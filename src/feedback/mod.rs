//! Severity-keyed feedback dispatcher.
//!
//! [`FeedbackChannel::dispatch`] fires up to three side effects for a freshly
//! created notification: an audible cue, a haptic pulse, and an OS-level alert
//! banner. All three are best-effort and independent: one failing is logged
//! and never stops the others, and nothing here ever propagates an error back
//! into the notification-creation path.
//!
//! The OS alert only fires when the host application is not foregrounded and
//! the user has granted permission. Permission is requested lazily on the
//! first occasion that needs it, cached for the process lifetime, and never
//! re-requested after an explicit grant or deny.

mod sink;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::FeedbackSettings;
use crate::notification::{NotificationKind, NotificationPriority};

pub use sink::{
    FeedbackError, FeedbackSink, HapticPulse, NullFeedbackSink, PermissionState, RecordedEffect,
    RecordingFeedbackSink, SoundCue,
};

/// Stateless dispatcher over a platform [`FeedbackSink`].
///
/// The only state carried is the cached OS-alert permission.
pub struct FeedbackChannel {
    sink: Arc<dyn FeedbackSink>,
    settings: FeedbackSettings,
    permission: Arc<Mutex<PermissionState>>,
    permission_pending: Arc<AtomicBool>,
}

impl FeedbackChannel {
    pub fn new(sink: Arc<dyn FeedbackSink>, settings: FeedbackSettings) -> Self {
        Self {
            sink,
            settings,
            permission: Arc::new(Mutex::new(PermissionState::Undetermined)),
            permission_pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cached OS-alert permission state.
    pub fn permission_state(&self) -> PermissionState {
        *self.permission.lock().expect("permission lock poisoned")
    }

    /// Fire the feedback effects for one notification.
    ///
    /// Synchronous and fire-and-forget from the caller's point of view: the
    /// effects run on a spawned task. Without a reachable runtime feedback is
    /// skipped entirely; it never blocks or fails notification creation.
    pub fn dispatch(
        &self,
        kind: NotificationKind,
        priority: NotificationPriority,
        title: &str,
        message: &str,
    ) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::debug!("No async runtime, feedback effects skipped");
                return;
            }
        };

        let intense = kind.is_urgent() || priority.is_high();
        let sink = Arc::clone(&self.sink);
        let settings = self.settings.clone();
        let permission = Arc::clone(&self.permission);
        let pending = Arc::clone(&self.permission_pending);
        let title = title.to_string();
        let body = message.to_string();

        handle.spawn(async move {
            let audible = async {
                if !settings.sound_enabled || !sink.audio_ready() {
                    return;
                }
                let cue = if intense { SoundCue::Alarm } else { SoundCue::Chime };
                if let Err(e) = sink.play_sound(cue).await {
                    tracing::warn!(error = %e, "Audible cue failed");
                }
            };

            let haptic = async {
                if !settings.haptics_enabled {
                    return;
                }
                let pattern = if intense {
                    HapticPulse::LongPattern
                } else {
                    HapticPulse::Short
                };
                if let Err(e) = sink.pulse(pattern).await {
                    tracing::debug!(error = %e, "Haptic pulse failed");
                }
            };

            let os_alert = async {
                if !settings.os_alerts_enabled || sink.in_foreground() {
                    return;
                }
                Self::os_alert_with_permission(&sink, &permission, &pending, &title, &body).await;
            };

            tokio::join!(audible, haptic, os_alert);
        });
    }

    /// OS alert path with lazy permission acquisition.
    ///
    /// The first caller finding the state undetermined performs the request
    /// and, on grant, shows its own banner. Callers arriving while a request
    /// is already in flight skip their banner rather than wait on it.
    async fn os_alert_with_permission(
        sink: &Arc<dyn FeedbackSink>,
        permission: &Arc<Mutex<PermissionState>>,
        pending: &Arc<AtomicBool>,
        title: &str,
        body: &str,
    ) {
        let state = *permission.lock().expect("permission lock poisoned");
        let state = match state {
            PermissionState::Undetermined => {
                if pending.swap(true, Ordering::SeqCst) {
                    tracing::debug!("Permission request in flight, skipping OS alert");
                    return;
                }
                let answer = sink.request_permission().await;
                *permission.lock().expect("permission lock poisoned") = answer;
                pending.store(false, Ordering::SeqCst);
                tracing::info!(state = ?answer, "OS alert permission resolved");
                answer
            }
            determined => determined,
        };

        if state == PermissionState::Granted {
            if let Err(e) = sink.os_alert(title, body).await {
                tracing::warn!(error = %e, "OS alert failed");
            }
        }
    }
}
