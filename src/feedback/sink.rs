use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

/// Audible cue variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Soft chime for ordinary events
    Chime,
    /// Insistent alarm for urgent / high-priority events
    Alarm,
}

/// Haptic pulse variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPulse {
    /// Single short pulse
    Short,
    /// Longer repeating pattern for urgent / high-priority events
    LongPattern,
}

/// OS-level alert permission, cached for the process lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    #[default]
    Undetermined,
    Granted,
    Denied,
}

/// Failure of a single feedback effect. Always logged, never propagated.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Audio unavailable: {0}")]
    Audio(String),

    #[error("Haptics unsupported on this platform")]
    HapticsUnsupported,

    #[error("OS alert failed: {0}")]
    OsAlert(String),
}

/// Platform capability behind the feedback dispatcher.
///
/// Implementations wrap whatever the host platform offers for audio playback,
/// vibration, and OS notification banners. Every method is best-effort; the
/// dispatcher swallows and logs all errors.
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    /// Whether the audio resource is loaded and playable right now.
    fn audio_ready(&self) -> bool;

    /// Play an audible cue.
    async fn play_sound(&self, cue: SoundCue) -> Result<(), FeedbackError>;

    /// Fire a haptic pulse. Platforms without haptics return
    /// `HapticsUnsupported`.
    async fn pulse(&self, pattern: HapticPulse) -> Result<(), FeedbackError>;

    /// Whether the host application currently has foreground focus.
    fn in_foreground(&self) -> bool;

    /// Ask the OS for alert permission. Called at most once per process.
    async fn request_permission(&self) -> PermissionState;

    /// Show an OS-level alert banner.
    async fn os_alert(&self, title: &str, body: &str) -> Result<(), FeedbackError>;
}

/// Sink for platforms with no feedback capabilities at all.
#[derive(Debug, Default)]
pub struct NullFeedbackSink;

#[async_trait]
impl FeedbackSink for NullFeedbackSink {
    fn audio_ready(&self) -> bool {
        false
    }

    async fn play_sound(&self, _cue: SoundCue) -> Result<(), FeedbackError> {
        Ok(())
    }

    async fn pulse(&self, _pattern: HapticPulse) -> Result<(), FeedbackError> {
        Err(FeedbackError::HapticsUnsupported)
    }

    fn in_foreground(&self) -> bool {
        true
    }

    async fn request_permission(&self) -> PermissionState {
        PermissionState::Denied
    }

    async fn os_alert(&self, _title: &str, _body: &str) -> Result<(), FeedbackError> {
        Err(FeedbackError::OsAlert("no alert surface".to_string()))
    }
}

/// Recorded feedback effect, for assertions in host test harnesses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedEffect {
    Sound(SoundCue),
    Pulse(HapticPulse),
    OsAlert { title: String, body: String },
    PermissionRequested,
}

/// Sink that records every effect instead of performing it.
///
/// Foreground focus, audio readiness, permission answer, and per-effect
/// failure are all configurable so tests can drive each dispatch branch.
pub struct RecordingFeedbackSink {
    effects: Mutex<Vec<RecordedEffect>>,
    audio_ready: AtomicBool,
    in_foreground: AtomicBool,
    grant_permission: AtomicBool,
    fail_audio: AtomicBool,
    fail_haptics: AtomicBool,
}

impl Default for RecordingFeedbackSink {
    fn default() -> Self {
        Self {
            effects: Mutex::new(Vec::new()),
            audio_ready: AtomicBool::new(true),
            in_foreground: AtomicBool::new(true),
            grant_permission: AtomicBool::new(true),
            fail_audio: AtomicBool::new(false),
            fail_haptics: AtomicBool::new(false),
        }
    }
}

impl RecordingFeedbackSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_audio_ready(&self, ready: bool) {
        self.audio_ready.store(ready, Ordering::SeqCst);
    }

    pub fn set_in_foreground(&self, foreground: bool) {
        self.in_foreground.store(foreground, Ordering::SeqCst);
    }

    pub fn set_grant_permission(&self, grant: bool) {
        self.grant_permission.store(grant, Ordering::SeqCst);
    }

    pub fn set_fail_audio(&self, fail: bool) {
        self.fail_audio.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_haptics(&self, fail: bool) {
        self.fail_haptics.store(fail, Ordering::SeqCst);
    }

    /// Everything recorded so far, in dispatch order.
    pub fn effects(&self) -> Vec<RecordedEffect> {
        self.effects.lock().expect("effects lock poisoned").clone()
    }

    fn record(&self, effect: RecordedEffect) {
        self.effects
            .lock()
            .expect("effects lock poisoned")
            .push(effect);
    }
}

#[async_trait]
impl FeedbackSink for RecordingFeedbackSink {
    fn audio_ready(&self) -> bool {
        self.audio_ready.load(Ordering::SeqCst)
    }

    async fn play_sound(&self, cue: SoundCue) -> Result<(), FeedbackError> {
        if self.fail_audio.load(Ordering::SeqCst) {
            return Err(FeedbackError::Audio("playback blocked".to_string()));
        }
        self.record(RecordedEffect::Sound(cue));
        Ok(())
    }

    async fn pulse(&self, pattern: HapticPulse) -> Result<(), FeedbackError> {
        if self.fail_haptics.load(Ordering::SeqCst) {
            return Err(FeedbackError::HapticsUnsupported);
        }
        self.record(RecordedEffect::Pulse(pattern));
        Ok(())
    }

    fn in_foreground(&self) -> bool {
        self.in_foreground.load(Ordering::SeqCst)
    }

    async fn request_permission(&self) -> PermissionState {
        self.record(RecordedEffect::PermissionRequested);
        if self.grant_permission.load(Ordering::SeqCst) {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        }
    }

    async fn os_alert(&self, title: &str, body: &str) -> Result<(), FeedbackError> {
        self.record(RecordedEffect::OsAlert {
            title: title.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
