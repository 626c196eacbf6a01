//! Calls deferred until a group finishes loading.

use resona_config::FilterBundle;
use resona_core::FilterType;

use crate::voice::VoiceId;

/// A group call captured before the group was loaded.
///
/// Actions are replayed in submission order by [`Group::load`](crate::Group::load).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueuedAction {
    /// `play(id)`
    Play(Option<VoiceId>),
    /// `pause(id)`
    Pause(Option<VoiceId>),
    /// `stop(id)`
    Stop(Option<VoiceId>),
    /// `set_q_factor(q, id)`
    QFactor {
        /// Requested resonance.
        q: f32,
        /// Target voice, or every voice.
        id: Option<VoiceId>,
    },
    /// `set_frequency(frequency, id)`
    Frequency {
        /// Requested frequency in Hz.
        frequency: f32,
        /// Target voice, or every voice.
        id: Option<VoiceId>,
    },
    /// `set_filter_type(filter_type, id)`
    FilterType {
        /// Requested shape.
        filter_type: FilterType,
        /// Target voice, or every voice.
        id: Option<VoiceId>,
    },
    /// `add_filter(bundle, id)`
    AddFilter {
        /// Requested parameters.
        bundle: FilterBundle,
        /// Target voice, or every voice.
        id: Option<VoiceId>,
    },
}

impl QueuedAction {
    /// Name of the call this action replays.
    pub fn event(&self) -> &'static str {
        match self {
            QueuedAction::Play(_) => "play",
            QueuedAction::Pause(_) => "pause",
            QueuedAction::Stop(_) => "stop",
            QueuedAction::QFactor { .. } => "qFactor",
            QueuedAction::Frequency { .. } => "frequency",
            QueuedAction::FilterType { .. } => "filterType",
            QueuedAction::AddFilter { .. } => "addFilter",
        }
    }

    /// The voice the action targets, if any.
    pub fn target(&self) -> Option<VoiceId> {
        match *self {
            QueuedAction::Play(id) | QueuedAction::Pause(id) | QueuedAction::Stop(id) => id,
            QueuedAction::QFactor { id, .. }
            | QueuedAction::Frequency { id, .. }
            | QueuedAction::FilterType { id, .. }
            | QueuedAction::AddFilter { id, .. } => id,
        }
    }
}
