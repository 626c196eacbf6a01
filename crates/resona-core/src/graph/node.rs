//! Graph node types.
//!
//! Each node in the graph has a [`NodeId`] and a [`NodeKind`] that determines
//! how it turns its summed input into output. The crate-private `NodeData`
//! bundles the kind with the node's adjacency lists.

use std::fmt;
use std::rc::Rc;

use crate::biquad::{Biquad, FilterType};
use crate::param::AudioParam;

use super::edge::EdgeId;

/// Unique identifier for a node in the audio graph.
///
/// Slots freed by [`remove_node()`](super::AudioGraph::remove_node) are
/// reused, but each reuse bumps the slot's generation, so a stale ID simply
/// stops resolving instead of naming the new node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    /// Returns the slot index. Two IDs may share it across generations.
    #[inline]
    pub fn index(self) -> u32 {
        self.slot
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.slot, self.generation)
    }
}

/// The role of a node in the audio graph.
#[derive(Debug)]
pub enum NodeKind {
    /// Plays a sample buffer. Sources have no inputs.
    Source(SourceNode),
    /// Scales its input.
    Gain(GainNode),
    /// Filters its input.
    Biquad(BiquadFilterNode),
    /// Final output. Exactly one per graph, never removed.
    Destination,
}

impl NodeKind {
    /// Short lowercase label used in logs and errors.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Source(_) => "source",
            NodeKind::Gain(_) => "gain",
            NodeKind::Biquad(_) => "biquad",
            NodeKind::Destination => "destination",
        }
    }
}

/// Mono buffer player.
pub struct SourceNode {
    buffer: Rc<[f32]>,
    position: usize,
    looping: bool,
}

impl SourceNode {
    /// Creates a source that starts reading `buffer` at `offset`.
    pub fn new(buffer: Rc<[f32]>, offset: usize, looping: bool) -> Self {
        let position = offset.min(buffer.len());
        Self {
            buffer,
            position,
            looping,
        }
    }

    /// Read position in frames.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether playback wraps at the end of the buffer.
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Number of frames in the buffer.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True for an empty buffer.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// True once a non-looping source has played its last frame.
    pub fn is_finished(&self) -> bool {
        !self.looping && self.position >= self.buffer.len()
    }

    /// Writes the next `out.len()` frames, zero-padding past the end.
    pub(crate) fn fill(&mut self, out: &mut [f32]) {
        let len = self.buffer.len();
        for sample in out.iter_mut() {
            if self.position >= len {
                if self.looping && len > 0 {
                    self.position = 0;
                } else {
                    *sample = 0.0;
                    continue;
                }
            }
            *sample = self.buffer[self.position];
            self.position += 1;
        }
    }
}

impl fmt::Debug for SourceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceNode")
            .field("frames", &self.buffer.len())
            .field("position", &self.position)
            .field("looping", &self.looping)
            .finish()
    }
}

/// Linear gain stage.
#[derive(Debug, Clone)]
pub struct GainNode {
    gain: AudioParam,
}

impl GainNode {
    /// Creates a gain node with the given linear gain.
    pub fn new(gain: f32) -> Self {
        let mut param = AudioParam::new("gain", 1.0, 0.0, f32::MAX);
        param.set_value(gain);
        Self { gain: param }
    }

    /// Gain parameter.
    pub fn gain(&self) -> &AudioParam {
        &self.gain
    }

    /// Mutable gain parameter.
    pub fn gain_mut(&mut self) -> &mut AudioParam {
        &mut self.gain
    }

    pub(crate) fn process(&mut self, block: &mut [f32]) {
        let gain = self.gain.clamped();
        if gain != 1.0 {
            for sample in block.iter_mut() {
                *sample *= gain;
            }
        }
    }
}

/// Second-order filter node.
///
/// Parameters are read at the start of every rendered block; coefficients are
/// recalculated only when type, frequency or Q changed since the last block.
/// `gain` is a linear output gain applied after filtering (1.0 is unity).
#[derive(Debug, Clone)]
pub struct BiquadFilterNode {
    filter_type: FilterType,
    frequency: AudioParam,
    q: AudioParam,
    gain: AudioParam,
    sample_rate: f32,
    biquad: Biquad,
    applied: Option<(FilterType, f32, f32)>,
}

impl BiquadFilterNode {
    /// Creates a lowpass node at 350 Hz, Q 1, unity gain.
    ///
    /// 350 Hz is the Web Audio `BiquadFilterNode` default; players write
    /// their own frequency before the node is heard.
    pub fn new(sample_rate: f32) -> Self {
        let nyquist = sample_rate / 2.0;
        Self {
            filter_type: FilterType::Lowpass,
            frequency: AudioParam::new("frequency", 350.0, 0.0, nyquist),
            q: AudioParam::new("Q", 1.0, 1.0e-4, 1000.0),
            gain: AudioParam::new("gain", 1.0, 0.0, f32::MAX),
            sample_rate,
            biquad: Biquad::new(),
            applied: None,
        }
    }

    /// Current response shape.
    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Changes the response shape.
    pub fn set_filter_type(&mut self, filter_type: FilterType) {
        self.filter_type = filter_type;
    }

    /// Cutoff or center frequency in Hz.
    pub fn frequency(&self) -> &AudioParam {
        &self.frequency
    }

    /// Mutable frequency parameter.
    pub fn frequency_mut(&mut self) -> &mut AudioParam {
        &mut self.frequency
    }

    /// Resonance.
    pub fn q(&self) -> &AudioParam {
        &self.q
    }

    /// Mutable Q parameter.
    pub fn q_mut(&mut self) -> &mut AudioParam {
        &mut self.q
    }

    /// Linear output gain.
    pub fn gain(&self) -> &AudioParam {
        &self.gain
    }

    /// Mutable gain parameter.
    pub fn gain_mut(&mut self) -> &mut AudioParam {
        &mut self.gain
    }

    /// Sample rate the coefficients are computed for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn refresh_coefficients(&mut self) {
        let wanted = (self.filter_type, self.frequency.value(), self.q.value());
        if self.applied != Some(wanted) {
            let (filter_type, frequency, q) = wanted;
            self.biquad
                .load(filter_type.coefficients(frequency, q, self.sample_rate));
            self.applied = Some(wanted);
        }
    }

    pub(crate) fn process(&mut self, block: &mut [f32]) {
        self.refresh_coefficients();
        let gain = self.gain.clamped();
        for sample in block.iter_mut() {
            *sample = self.biquad.process(*sample) * gain;
        }
    }
}

/// Internal bookkeeping for a node in the graph.
#[derive(Debug)]
pub(crate) struct NodeData {
    pub kind: NodeKind,
    /// Edges arriving at this node.
    pub incoming: Vec<EdgeId>,
    /// Edges leaving this node.
    pub outgoing: Vec<EdgeId>,
}

impl NodeData {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }
}
