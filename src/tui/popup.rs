use std::time::{Duration, Instant};

use log::trace;

use crate::config::settings::PopupConfig;

/// Which canned title/icon preset the popup uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupKind {
    Task,
    Progress,
    #[default]
    Achievement,
}

impl PopupKind {
    pub fn title(&self) -> &'static str {
        match self {
            PopupKind::Task => "Task Added Successfully!",
            PopupKind::Progress => "Progress Saved!",
            PopupKind::Achievement => "Achievement Unlocked!",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PopupKind::Task | PopupKind::Achievement => "✔",
            PopupKind::Progress => "✨",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Hidden,
    Entering,
    Visible,
    Exiting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupEvent {
    /// The exit fade finished; the popup is gone.
    Closed,
}

/// Transient celebration overlay. Time only moves when the owner calls
/// [`tick`](Popup::tick), so every transition is reproducible in tests.
#[derive(Debug, Clone)]
pub struct Popup {
    phase: Phase,
    kind: PopupKind,
    message: String,
    shown_at: Instant,
    phase_started: Instant,
    auto_dismiss: Duration,
    fade: Duration,
}

impl Popup {
    pub fn new(auto_dismiss: Duration, fade: Duration) -> Self {
        let now = Instant::now();
        Self {
            phase: Phase::Hidden,
            kind: PopupKind::default(),
            message: String::new(),
            shown_at: now,
            phase_started: now,
            auto_dismiss,
            fade,
        }
    }

    pub fn from_config(config: &PopupConfig) -> Self {
        Self::new(
            Duration::from_millis(config.auto_dismiss_ms),
            Duration::from_millis(config.fade_ms),
        )
    }

    /// Open (or re-open) with a new message. The auto-dismiss timer restarts.
    pub fn show(&mut self, kind: PopupKind, message: impl Into<String>, now: Instant) {
        self.kind = kind;
        self.message = message.into();
        self.shown_at = now;
        self.enter(Phase::Entering, now);
    }

    /// Start the exit fade early. No-op when already hidden or leaving.
    pub fn dismiss(&mut self, now: Instant) {
        if matches!(self.phase, Phase::Entering | Phase::Visible) {
            self.enter(Phase::Exiting, now);
        }
    }

    /// Advance timers. Catches up over several phases if `now` jumped.
    pub fn tick(&mut self, now: Instant) -> Option<PopupEvent> {
        loop {
            match self.phase {
                Phase::Hidden => return None,
                Phase::Entering => {
                    if now.saturating_duration_since(self.phase_started) < self.fade {
                        return None;
                    }
                    let at = self.phase_started + self.fade;
                    self.enter(Phase::Visible, at);
                }
                Phase::Visible => {
                    if now.saturating_duration_since(self.shown_at) < self.auto_dismiss {
                        return None;
                    }
                    let at = (self.shown_at + self.auto_dismiss).max(self.phase_started);
                    self.enter(Phase::Exiting, at);
                }
                Phase::Exiting => {
                    if now.saturating_duration_since(self.phase_started) < self.fade {
                        return None;
                    }
                    let at = self.phase_started + self.fade;
                    self.enter(Phase::Hidden, at);
                    return Some(PopupEvent::Closed);
                }
            }
        }
    }

    /// 0.0 (transparent) to 1.0 (opaque), following the fade in and out.
    pub fn opacity(&self, now: Instant) -> f64 {
        let fade_progress = || {
            if self.fade.is_zero() {
                1.0
            } else {
                let elapsed = now.saturating_duration_since(self.phase_started);
                (elapsed.as_secs_f64() / self.fade.as_secs_f64()).min(1.0)
            }
        };
        match self.phase {
            Phase::Hidden => 0.0,
            Phase::Entering => fade_progress(),
            Phase::Visible => 1.0,
            Phase::Exiting => 1.0 - fade_progress(),
        }
    }

    /// Fraction of the auto-dismiss window already used.
    pub fn elapsed_ratio(&self, now: Instant) -> f64 {
        if self.phase == Phase::Hidden || self.auto_dismiss.is_zero() {
            return 0.0;
        }
        let elapsed = now.saturating_duration_since(self.shown_at);
        (elapsed.as_secs_f64() / self.auto_dismiss.as_secs_f64()).min(1.0)
    }

    pub fn is_open(&self) -> bool {
        self.phase != Phase::Hidden
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn kind(&self) -> PopupKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn enter(&mut self, phase: Phase, at: Instant) {
        trace!("popup {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.phase_started = at;
    }
}
