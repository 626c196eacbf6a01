//! Shared handle to an audio graph.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::edge::EdgeId;
use super::node::{BiquadFilterNode, GainNode, NodeId};
use super::processing::{AudioGraph, GraphError};

/// Cheap-to-clone handle to one [`AudioGraph`].
///
/// Every clone refers to the same graph. The handle is how players share a
/// single graph between many groups and voices; it is the analogue of a
/// browser `AudioContext`.
#[derive(Clone)]
pub struct AudioContext {
    graph: Rc<RefCell<AudioGraph>>,
}

impl AudioContext {
    /// Creates a context around a fresh graph.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            graph: Rc::new(RefCell::new(AudioGraph::new(sample_rate))),
        }
    }

    /// Sample rate of the underlying graph.
    pub fn sample_rate(&self) -> f32 {
        self.graph.borrow().sample_rate()
    }

    /// The graph's destination node.
    pub fn destination(&self) -> NodeId {
        self.graph.borrow().destination()
    }

    /// Borrows the graph immutably.
    pub fn graph(&self) -> Ref<'_, AudioGraph> {
        self.graph.borrow()
    }

    /// Borrows the graph mutably.
    pub fn graph_mut(&self) -> RefMut<'_, AudioGraph> {
        self.graph.borrow_mut()
    }

    /// True if both handles refer to the same graph.
    pub fn same_graph(&self, other: &AudioContext) -> bool {
        Rc::ptr_eq(&self.graph, &other.graph)
    }

    /// See [`AudioGraph::create_source`].
    pub fn create_source(&self, buffer: Rc<[f32]>, offset: usize, looping: bool) -> NodeId {
        self.graph_mut().create_source(buffer, offset, looping)
    }

    /// See [`AudioGraph::create_gain`].
    pub fn create_gain(&self, gain: f32) -> NodeId {
        self.graph_mut().create_gain(gain)
    }

    /// See [`AudioGraph::create_biquad_filter`].
    pub fn create_biquad_filter(&self) -> NodeId {
        self.graph_mut().create_biquad_filter()
    }

    /// See [`AudioGraph::connect`].
    pub fn connect(&self, from: NodeId, to: NodeId) -> Result<EdgeId, GraphError> {
        self.graph_mut().connect(from, to)
    }

    /// See [`AudioGraph::disconnect_outputs`].
    pub fn disconnect_outputs(&self, node: NodeId) -> Result<Vec<NodeId>, GraphError> {
        self.graph_mut().disconnect_outputs(node)
    }

    /// See [`AudioGraph::remove_node`].
    pub fn remove_node(&self, id: NodeId) -> Result<(), GraphError> {
        self.graph_mut().remove_node(id)
    }

    /// See [`AudioGraph::outputs`].
    pub fn outputs(&self, node: NodeId) -> Vec<NodeId> {
        self.graph().outputs(node)
    }

    /// Frame position of a source node, if `id` is one.
    pub fn source_position(&self, id: NodeId) -> Option<usize> {
        self.graph().source(id).map(|source| source.position())
    }

    /// Runs `f` on a biquad node. Returns `None` if `id` is not one.
    pub fn with_biquad<R>(&self, id: NodeId, f: impl FnOnce(&mut BiquadFilterNode) -> R) -> Option<R> {
        self.graph_mut().biquad_mut(id).map(f)
    }

    /// Runs `f` on a gain node. Returns `None` if `id` is not one.
    pub fn with_gain<R>(&self, id: NodeId, f: impl FnOnce(&mut GainNode) -> R) -> Option<R> {
        self.graph_mut().gain_mut(id).map(f)
    }

    /// See [`AudioGraph::render`].
    pub fn render(&self, out: &mut [f32]) {
        self.graph_mut().render(out);
    }
}

impl fmt::Debug for AudioContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.graph.try_borrow() {
            Ok(graph) => f
                .debug_struct("AudioContext")
                .field("sample_rate", &graph.sample_rate())
                .field("nodes", &graph.node_count())
                .field("edges", &graph.edge_count())
                .finish(),
            Err(_) => f.write_str("AudioContext { <borrowed> }"),
        }
    }
}
