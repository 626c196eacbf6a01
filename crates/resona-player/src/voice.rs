//! Individual playback voices.

use std::fmt;

use resona_config::FilterParameters;
use resona_core::{FilterType, NodeId};

/// Identifier of a voice within its group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceId(pub(crate) u32);

impl VoiceId {
    /// Raw numeric value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "voice {}", self.0)
    }
}

/// Playback state of a voice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceState {
    /// A source node is feeding the voice's chain.
    Playing,
    /// The chain is built but has no source; `seek` holds the position.
    Paused,
    /// Stopped or finished; the voice sits in the pool for reuse.
    Ended,
}

/// Graph nodes owned by a voice while it has a live chain.
///
/// The chain is `source → insert_in → [filter →] … → insert_out → output →
/// destination`. Effects may be spliced between the two insert taps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoicePorts {
    /// Head of the insert chain.
    pub insert_in: NodeId,
    /// Tail of the insert chain.
    pub insert_out: NodeId,
    /// Per-voice volume gain feeding the destination.
    pub output: NodeId,
    /// Buffer player, present while playing.
    pub source: Option<NodeId>,
    /// Biquad filter, created lazily on the first filter change.
    pub filter: Option<NodeId>,
}

impl VoicePorts {
    /// Every node in the chain that the voice created.
    pub(crate) fn owned_nodes(&self) -> impl Iterator<Item = NodeId> {
        [
            self.source,
            Some(self.insert_in),
            self.filter,
            Some(self.insert_out),
            Some(self.output),
        ]
        .into_iter()
        .flatten()
    }
}

/// One playing, paused or pooled instance of a group's sound.
#[derive(Debug, Clone)]
pub struct Voice {
    id: VoiceId,
    pub(crate) params: FilterParameters,
    pub(crate) state: VoiceState,
    pub(crate) seek: usize,
    pub(crate) ports: Option<VoicePorts>,
    /// Nodes handed over through `Group::insert_effect`, removed with the chain.
    pub(crate) effects: Vec<NodeId>,
}

impl Voice {
    /// Creation hook: a fresh voice inherits the group's current filter
    /// parameters.
    pub(crate) fn init(id: VoiceId, defaults: FilterParameters) -> Self {
        Self {
            id,
            params: defaults,
            state: VoiceState::Ended,
            seek: 0,
            ports: None,
            effects: Vec::new(),
        }
    }

    /// Reset hook for pool reuse. Overrides are discarded in favour of the
    /// group's current defaults.
    pub(crate) fn reset(&mut self, defaults: FilterParameters) {
        self.params = defaults;
        self.seek = 0;
    }

    /// The voice's id.
    pub fn id(&self) -> VoiceId {
        self.id
    }

    /// The voice's own filter parameters.
    pub fn filter_params(&self) -> FilterParameters {
        self.params
    }

    /// The voice's resonance.
    pub fn q_factor(&self) -> f32 {
        self.params.q_factor
    }

    /// The voice's frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.params.frequency
    }

    /// The voice's filter shape.
    pub fn filter_type(&self) -> FilterType {
        self.params.filter_type
    }

    /// Current playback state.
    pub fn state(&self) -> VoiceState {
        self.state
    }

    /// True while a source is feeding the chain.
    pub fn is_playing(&self) -> bool {
        self.state == VoiceState::Playing
    }

    /// True while paused.
    pub fn is_paused(&self) -> bool {
        self.state == VoiceState::Paused
    }

    /// True once stopped or finished.
    pub fn is_ended(&self) -> bool {
        self.state == VoiceState::Ended
    }

    /// Resume position in frames. Only meaningful while paused or ended.
    pub fn seek(&self) -> usize {
        self.seek
    }

    /// The voice's graph nodes, if it has a live chain.
    pub fn ports(&self) -> Option<VoicePorts> {
        self.ports
    }

    /// True if the voice has a live chain in the graph.
    pub fn has_node(&self) -> bool {
        self.ports.is_some()
    }

    /// Effect nodes spliced into the chain, in insertion order.
    pub fn effects(&self) -> &[NodeId] {
        &self.effects
    }

    /// The voice's filter node, once created.
    pub fn filter_node(&self) -> Option<NodeId> {
        self.ports.and_then(|ports| ports.filter)
    }
}
