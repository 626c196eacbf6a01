//! Audio graph: mutation API, cycle detection and block rendering.
//!
//! [`AudioGraph`] owns the topology (nodes and edges) and the per-node DSP
//! state. Mutations validate structure eagerly: an edge that would create a
//! cycle is refused at [`connect()`](AudioGraph::connect) time, so rendering
//! can always order the nodes topologically.

use std::rc::Rc;

use thiserror::Error;

use super::edge::{Edge, EdgeId};
use super::node::{BiquadFilterNode, GainNode, NodeData, NodeId, NodeKind, SourceNode};

/// Errors that can occur during graph mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The specified node was not found in the graph.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    /// The specified edge was not found in the graph.
    #[error("edge {0} not found")]
    EdgeNotFound(EdgeId),
    /// Adding this edge would create a cycle.
    #[error("adding this edge would create a cycle")]
    CycleDetected,
    /// A duplicate edge already exists between these nodes.
    #[error("edge from {0} to {1} already exists")]
    DuplicateEdge(NodeId, NodeId),
    /// The connection is structurally invalid (e.g. an edge into a source).
    #[error("invalid connection: {0}")]
    InvalidConnection(String),
    /// The destination node cannot be removed.
    #[error("node {0} is the graph destination and cannot be removed")]
    ProtectedNode(NodeId),
}

/// Directed acyclic audio graph.
///
/// # Usage
///
/// 1. Create a graph with [`new()`](Self::new); the destination node exists
///    from the start.
/// 2. Add nodes: [`create_source()`](Self::create_source),
///    [`create_gain()`](Self::create_gain),
///    [`create_biquad_filter()`](Self::create_biquad_filter)
/// 3. Wire them: [`connect()`](Self::connect),
///    [`disconnect_outputs()`](Self::disconnect_outputs)
/// 4. Render: [`render()`](Self::render)
#[derive(Debug)]
pub struct AudioGraph {
    nodes: Vec<Option<NodeData>>,
    node_generations: Vec<u32>,
    free_nodes: Vec<u32>,
    edges: Vec<Option<Edge>>,
    edge_generations: Vec<u32>,
    free_edges: Vec<u32>,
    /// Per-slot output blocks, reused across renders.
    scratch: Vec<Vec<f32>>,
    sample_rate: f32,
    destination: NodeId,
}

impl AudioGraph {
    /// Creates a graph holding only its destination node.
    pub fn new(sample_rate: f32) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            node_generations: Vec::new(),
            free_nodes: Vec::new(),
            edges: Vec::new(),
            edge_generations: Vec::new(),
            free_edges: Vec::new(),
            scratch: Vec::new(),
            sample_rate,
            destination: NodeId {
                slot: 0,
                generation: 0,
            },
        };
        graph.destination = graph.add_node(NodeKind::Destination);
        graph
    }

    /// Returns the sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Returns the destination node.
    pub fn destination(&self) -> NodeId {
        self.destination
    }

    // --- Node mutations ---

    /// Adds a buffer source starting at frame `offset`.
    pub fn create_source(&mut self, buffer: Rc<[f32]>, offset: usize, looping: bool) -> NodeId {
        let id = self.add_node(NodeKind::Source(SourceNode::new(buffer, offset, looping)));
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_add: source node {id} at frame {offset}");
        id
    }

    /// Adds a gain stage with the given linear gain.
    pub fn create_gain(&mut self, gain: f32) -> NodeId {
        let id = self.add_node(NodeKind::Gain(GainNode::new(gain)));
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_add: gain node {id}");
        id
    }

    /// Adds a biquad filter node with default parameters.
    pub fn create_biquad_filter(&mut self) -> NodeId {
        let id = self.add_node(NodeKind::Biquad(BiquadFilterNode::new(self.sample_rate)));
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_add: biquad node {id}");
        id
    }

    /// Removes a node and all its connected edges.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), GraphError> {
        if id == self.destination {
            return Err(GraphError::ProtectedNode(id));
        }
        let node = self.get_node(id)?;

        let edge_ids: Vec<EdgeId> = node
            .incoming
            .iter()
            .chain(node.outgoing.iter())
            .copied()
            .collect();
        for edge_id in edge_ids {
            self.disconnect_internal(edge_id);
        }

        let idx = id.slot as usize;
        self.nodes[idx] = None;
        self.node_generations[idx] = self.node_generations[idx].wrapping_add(1);
        self.free_nodes.push(id.slot);
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_remove: node {id}");
        Ok(())
    }

    /// Connects two nodes with a directed edge.
    ///
    /// Returns the new edge's ID, or an error if:
    /// - Either node doesn't exist
    /// - The edge would create a cycle
    /// - A duplicate edge already exists
    /// - The edge enters a source or leaves the destination
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Result<EdgeId, GraphError> {
        self.validate_connection(from, to)?;

        if self.find_edge(from, to).is_some() {
            return Err(GraphError::DuplicateEdge(from, to));
        }

        // A cycle exists if `to` can already reach `from`.
        if self.reaches(to, from) {
            return Err(GraphError::CycleDetected);
        }

        let edge = Some(Edge { from, to });
        let slot = match self.free_edges.pop() {
            Some(slot) => {
                self.edges[slot as usize] = edge;
                slot
            }
            None => {
                self.edges.push(edge);
                self.edge_generations.push(0);
                (self.edges.len() - 1) as u32
            }
        };
        let edge_id = EdgeId {
            slot,
            generation: self.edge_generations[slot as usize],
        };

        if let Some(Some(node)) = self.nodes.get_mut(from.slot as usize) {
            node.outgoing.push(edge_id);
        }
        if let Some(Some(node)) = self.nodes.get_mut(to.slot as usize) {
            node.incoming.push(edge_id);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("graph_connect: {from} → {to}");
        Ok(edge_id)
    }

    /// Disconnects a single edge.
    pub fn disconnect(&mut self, id: EdgeId) -> Result<(), GraphError> {
        let live = self.edges.get(id.slot as usize).is_some_and(Option::is_some)
            && self.edge_generations[id.slot as usize] == id.generation;
        if !live {
            return Err(GraphError::EdgeNotFound(id));
        }
        self.disconnect_internal(id);
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_disconnect: edge {id}");
        Ok(())
    }

    /// Disconnects every outgoing edge of `node`.
    ///
    /// Returns the former destinations in connection order, so a caller can
    /// splice a new node in front of them.
    pub fn disconnect_outputs(&mut self, node: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let outgoing = self.get_node(node)?.outgoing.clone();
        let mut targets = Vec::with_capacity(outgoing.len());
        for edge_id in outgoing {
            if let Some(edge) = self.edges[edge_id.slot as usize].as_ref() {
                targets.push(edge.to);
            }
            self.disconnect_internal(edge_id);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_disconnect: {node} from {} outputs", targets.len());
        Ok(targets)
    }

    // --- Queries ---

    /// Finds the edge ID connecting `from` to `to`, if one exists.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        let node = self.get_node(from).ok()?;
        node.outgoing.iter().copied().find(|edge_id| {
            self.edges[edge_id.slot as usize]
                .as_ref()
                .is_some_and(|edge| edge.to == to)
        })
    }

    /// Nodes fed by `node`, in connection order. Empty for unknown nodes.
    pub fn outputs(&self, node: NodeId) -> Vec<NodeId> {
        self.neighbours(node, |data| &data.outgoing, |edge| edge.to)
    }

    /// Nodes feeding `node`, in connection order. Empty for unknown nodes.
    pub fn inputs(&self, node: NodeId) -> Vec<NodeId> {
        self.neighbours(node, |data| &data.incoming, |edge| edge.from)
    }

    /// DFS reachability: can audio flow from `from` to `to`?
    pub fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![from];

        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            let idx = current.slot as usize;
            if idx >= visited.len() || visited[idx] {
                continue;
            }
            visited[idx] = true;

            if let Some(Some(node)) = self.nodes.get(idx) {
                for edge_id in &node.outgoing {
                    if let Some(edge) = &self.edges[edge_id.slot as usize] {
                        stack.push(edge.to);
                    }
                }
            }
        }
        false
    }

    /// Returns true if `id` names a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get_node(id).is_ok()
    }

    /// Returns the number of live nodes, destination included.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Returns the number of live edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_some()).count()
    }

    /// Returns the kind of a node.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get_node(id).ok().map(|n| &n.kind)
    }

    /// Returns a biquad node, or `None` if `id` is not one.
    pub fn biquad(&self, id: NodeId) -> Option<&BiquadFilterNode> {
        match self.kind(id)? {
            NodeKind::Biquad(node) => Some(node),
            _ => None,
        }
    }

    /// Returns a mutable biquad node, or `None` if `id` is not one.
    pub fn biquad_mut(&mut self, id: NodeId) -> Option<&mut BiquadFilterNode> {
        match self.kind_mut(id)? {
            NodeKind::Biquad(node) => Some(node),
            _ => None,
        }
    }

    /// Returns a gain node, or `None` if `id` is not one.
    pub fn gain(&self, id: NodeId) -> Option<&GainNode> {
        match self.kind(id)? {
            NodeKind::Gain(node) => Some(node),
            _ => None,
        }
    }

    /// Returns a mutable gain node, or `None` if `id` is not one.
    pub fn gain_mut(&mut self, id: NodeId) -> Option<&mut GainNode> {
        match self.kind_mut(id)? {
            NodeKind::Gain(node) => Some(node),
            _ => None,
        }
    }

    /// Returns a source node, or `None` if `id` is not one.
    pub fn source(&self, id: NodeId) -> Option<&SourceNode> {
        match self.kind(id)? {
            NodeKind::Source(node) => Some(node),
            _ => None,
        }
    }

    // --- Rendering ---

    /// Renders `out.len()` frames into `out`.
    ///
    /// Nodes run in topological order. Each node's input is the sum of the
    /// outputs of every node feeding it; sources advance whether or not they
    /// reach the destination.
    pub fn render(&mut self, out: &mut [f32]) {
        let frames = out.len();
        let order = self.topological_order();
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.resize_with(self.nodes.len(), Vec::new);

        for idx in order {
            let mut block = std::mem::take(&mut scratch[idx]);
            block.clear();
            block.resize(frames, 0.0);
            let Some(node) = self.nodes[idx].as_ref() else {
                continue;
            };
            for edge_id in &node.incoming {
                if let Some(edge) = &self.edges[edge_id.slot as usize] {
                    let upstream = &scratch[edge.from.slot as usize];
                    for (sample, input) in block.iter_mut().zip(upstream) {
                        *sample += *input;
                    }
                }
            }

            if let Some(node) = self.nodes[idx].as_mut() {
                match &mut node.kind {
                    NodeKind::Source(source) => source.fill(&mut block),
                    NodeKind::Gain(gain) => gain.process(&mut block),
                    NodeKind::Biquad(filter) => filter.process(&mut block),
                    NodeKind::Destination => out.copy_from_slice(&block),
                }
            }
            scratch[idx] = block;
        }
        self.scratch = scratch;
    }

    /// Allocated node and edge slots, live or free.
    ///
    /// Bounded by the peak number of live nodes and edges, not by how many
    /// were ever created.
    pub fn slot_counts(&self) -> (usize, usize) {
        (self.nodes.len(), self.edges.len())
    }

    // --- Internals ---

    fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let data = Some(NodeData::new(kind));
        let slot = match self.free_nodes.pop() {
            Some(slot) => {
                self.nodes[slot as usize] = data;
                slot
            }
            None => {
                self.nodes.push(data);
                self.node_generations.push(0);
                (self.nodes.len() - 1) as u32
            }
        };
        NodeId {
            slot,
            generation: self.node_generations[slot as usize],
        }
    }

    fn get_node(&self, id: NodeId) -> Result<&NodeData, GraphError> {
        let idx = id.slot as usize;
        self.nodes
            .get(idx)
            .and_then(|n| n.as_ref())
            .filter(|_| self.node_generations[idx] == id.generation)
            .ok_or(GraphError::NodeNotFound(id))
    }

    fn kind_mut(&mut self, id: NodeId) -> Option<&mut NodeKind> {
        let idx = id.slot as usize;
        if self.node_generations.get(idx) != Some(&id.generation) {
            return None;
        }
        self.nodes.get_mut(idx)?.as_mut().map(|n| &mut n.kind)
    }

    fn neighbours(
        &self,
        node: NodeId,
        edges_of: impl Fn(&NodeData) -> &Vec<EdgeId>,
        endpoint: impl Fn(&Edge) -> NodeId,
    ) -> Vec<NodeId> {
        let Ok(data) = self.get_node(node) else {
            return Vec::new();
        };
        edges_of(data)
            .iter()
            .filter_map(|edge_id| self.edges[edge_id.slot as usize].as_ref())
            .map(endpoint)
            .collect()
    }

    fn validate_connection(&self, from: NodeId, to: NodeId) -> Result<(), GraphError> {
        let from_node = self.get_node(from)?;
        let to_node = self.get_node(to)?;

        if matches!(to_node.kind, NodeKind::Source(_)) {
            return Err(GraphError::InvalidConnection(format!(
                "cannot connect into source node {from}→{to}"
            )));
        }
        if matches!(from_node.kind, NodeKind::Destination) {
            return Err(GraphError::InvalidConnection(format!(
                "cannot connect from destination node {from}→{to}"
            )));
        }
        Ok(())
    }

    fn disconnect_internal(&mut self, id: EdgeId) {
        let idx = id.slot as usize;
        if let Some(edge) = self.edges[idx].take() {
            self.edge_generations[idx] = self.edge_generations[idx].wrapping_add(1);
            self.free_edges.push(id.slot);
            if let Some(Some(node)) = self.nodes.get_mut(edge.from.slot as usize) {
                node.outgoing.retain(|e| *e != id);
            }
            if let Some(Some(node)) = self.nodes.get_mut(edge.to.slot as usize) {
                node.incoming.retain(|e| *e != id);
            }
        }
    }

    /// Kahn's algorithm over live nodes. Cycles are refused at connect time,
    /// so every live node appears exactly once.
    fn topological_order(&self) -> Vec<usize> {
        let n = self.nodes.len();
        let mut in_degree = vec![0u32; n];
        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(node) = node {
                in_degree[i] = node.incoming.len() as u32;
            }
        }

        let mut queue: Vec<usize> = (0..n)
            .rev()
            .filter(|&i| self.nodes[i].is_some() && in_degree[i] == 0)
            .collect();
        let mut sorted = Vec::with_capacity(n);

        while let Some(idx) = queue.pop() {
            sorted.push(idx);
            let Some(node) = self.nodes[idx].as_ref() else {
                continue;
            };
            for edge_id in &node.outgoing {
                if let Some(edge) = &self.edges[edge_id.slot as usize] {
                    let to_idx = edge.to.slot as usize;
                    in_degree[to_idx] -= 1;
                    if in_degree[to_idx] == 0 {
                        queue.push(to_idx);
                    }
                }
            }
        }
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biquad::FilterType;

    fn ones(frames: usize) -> Rc<[f32]> {
        vec![1.0; frames].into()
    }

    #[test]
    fn new_graph_has_destination_only() {
        let graph = AudioGraph::new(48000.0);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert!(matches!(
            graph.kind(graph.destination()),
            Some(NodeKind::Destination)
        ));
    }

    #[test]
    fn connect_and_query_neighbours() {
        let mut graph = AudioGraph::new(48000.0);
        let a = graph.create_gain(1.0);
        let b = graph.create_gain(1.0);
        let edge = graph.connect(a, b).unwrap();
        assert_eq!(graph.find_edge(a, b), Some(edge));
        assert_eq!(graph.outputs(a), vec![b]);
        assert_eq!(graph.inputs(b), vec![a]);
        assert!(graph.reaches(a, b));
        assert!(!graph.reaches(b, a));
    }

    #[test]
    fn rejects_cycles_and_duplicates() {
        let mut graph = AudioGraph::new(48000.0);
        let a = graph.create_gain(1.0);
        let b = graph.create_gain(1.0);
        graph.connect(a, b).unwrap();
        assert_eq!(graph.connect(a, b), Err(GraphError::DuplicateEdge(a, b)));
        assert_eq!(graph.connect(b, a), Err(GraphError::CycleDetected));
        assert_eq!(graph.connect(a, a), Err(GraphError::CycleDetected));
    }

    #[test]
    fn rejects_structurally_invalid_edges() {
        let mut graph = AudioGraph::new(48000.0);
        let source = graph.create_source(ones(4), 0, false);
        let gain = graph.create_gain(1.0);
        let dest = graph.destination();
        assert!(matches!(
            graph.connect(gain, source),
            Err(GraphError::InvalidConnection(_))
        ));
        assert!(matches!(
            graph.connect(dest, gain),
            Err(GraphError::InvalidConnection(_))
        ));
    }

    #[test]
    fn unknown_nodes_are_reported() {
        let mut graph = AudioGraph::new(48000.0);
        let a = graph.create_gain(1.0);
        graph.remove_node(a).unwrap();
        assert_eq!(
            graph.connect(a, graph.destination()),
            Err(GraphError::NodeNotFound(a))
        );
        assert!(graph.outputs(a).is_empty());
        assert!(!graph.contains(a));
    }

    #[test]
    fn destination_is_protected() {
        let mut graph = AudioGraph::new(48000.0);
        let dest = graph.destination();
        assert_eq!(graph.remove_node(dest), Err(GraphError::ProtectedNode(dest)));
    }

    #[test]
    fn remove_node_drops_its_edges() {
        let mut graph = AudioGraph::new(48000.0);
        let a = graph.create_gain(1.0);
        let b = graph.create_gain(1.0);
        let c = graph.create_gain(1.0);
        graph.connect(a, b).unwrap();
        graph.connect(b, c).unwrap();
        graph.remove_node(b).unwrap();
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.outputs(a).is_empty());
        assert!(graph.inputs(c).is_empty());
    }

    #[test]
    fn disconnect_outputs_returns_former_targets() {
        let mut graph = AudioGraph::new(48000.0);
        let a = graph.create_gain(1.0);
        let b = graph.create_gain(1.0);
        let c = graph.create_gain(1.0);
        graph.connect(a, b).unwrap();
        graph.connect(a, c).unwrap();
        assert_eq!(graph.disconnect_outputs(a).unwrap(), vec![b, c]);
        assert!(graph.outputs(a).is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn disconnect_single_edge() {
        let mut graph = AudioGraph::new(48000.0);
        let a = graph.create_gain(1.0);
        let b = graph.create_gain(1.0);
        let edge = graph.connect(a, b).unwrap();
        graph.disconnect(edge).unwrap();
        assert_eq!(graph.disconnect(edge), Err(GraphError::EdgeNotFound(edge)));
    }

    #[test]
    fn render_sums_fan_in() {
        let mut graph = AudioGraph::new(48000.0);
        let s1 = graph.create_source(ones(4), 0, false);
        let s2 = graph.create_source(ones(4), 0, false);
        let half = graph.create_gain(0.5);
        let dest = graph.destination();
        graph.connect(s1, half).unwrap();
        graph.connect(s2, half).unwrap();
        graph.connect(half, dest).unwrap();

        let mut out = [0.0_f32; 4];
        graph.render(&mut out);
        assert_eq!(out, [1.0; 4]);
    }

    #[test]
    fn render_silence_without_path() {
        let mut graph = AudioGraph::new(48000.0);
        let source = graph.create_source(ones(8), 0, false);
        let mut out = [1.0_f32; 8];
        graph.render(&mut out);
        assert_eq!(out, [0.0; 8]);
        // The source still advanced.
        assert_eq!(graph.source(source).unwrap().position(), 8);
    }

    #[test]
    fn render_through_highpass_removes_dc() {
        let mut graph = AudioGraph::new(48000.0);
        let source = graph.create_source(ones(48000), 0, false);
        let filter = graph.create_biquad_filter();
        let node = graph.biquad_mut(filter).unwrap();
        node.set_filter_type(FilterType::Highpass);
        node.frequency_mut().set_value(500.0);
        let dest = graph.destination();
        graph.connect(source, filter).unwrap();
        graph.connect(filter, dest).unwrap();

        let mut out = vec![0.0_f32; 4800];
        graph.render(&mut out);
        assert!(out[4799].abs() < 0.01, "got {}", out[4799]);
    }

    #[test]
    fn removed_slots_are_reused_with_new_generation() {
        let mut graph = AudioGraph::new(48000.0);
        let old = graph.create_gain(1.0);
        let old_edge = graph.connect(old, graph.destination()).unwrap();
        graph.remove_node(old).unwrap();

        let new = graph.create_gain(0.5);
        let new_edge = graph.connect(new, graph.destination()).unwrap();
        assert_eq!(new.index(), old.index());
        assert_eq!(new_edge.index(), old_edge.index());
        assert_ne!(new, old);
        assert_ne!(new_edge, old_edge);

        assert!(!graph.contains(old));
        assert!(graph.gain(old).is_none());
        assert_eq!(graph.remove_node(old), Err(GraphError::NodeNotFound(old)));
        assert_eq!(
            graph.disconnect(old_edge),
            Err(GraphError::EdgeNotFound(old_edge))
        );
        assert!(graph.contains(new));
        assert_eq!(graph.outputs(new), vec![graph.destination()]);
    }

    #[test]
    fn slot_counts_track_peak_not_history() {
        let mut graph = AudioGraph::new(48000.0);
        let dest = graph.destination();
        let mut out = [0.0_f32; 16];
        for _ in 0..1000 {
            let source = graph.create_source(ones(32), 0, false);
            let gain = graph.create_gain(1.0);
            graph.connect(source, gain).unwrap();
            graph.connect(gain, dest).unwrap();
            graph.render(&mut out);
            graph.remove_node(source).unwrap();
            graph.remove_node(gain).unwrap();
        }
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.slot_counts(), (3, 2));
    }

    #[test]
    fn render_reuses_slot_without_stale_audio() {
        let mut graph = AudioGraph::new(48000.0);
        let dest = graph.destination();
        let loud = graph.create_source(vec![4.0; 8].into(), 0, false);
        graph.connect(loud, dest).unwrap();
        let mut out = [0.0_f32; 8];
        graph.render(&mut out);
        assert_eq!(out, [4.0; 8]);

        graph.remove_node(loud).unwrap();
        let quiet = graph.create_source(ones(8), 0, false);
        graph.connect(quiet, dest).unwrap();
        graph.render(&mut out);
        assert_eq!(out, [1.0; 8]);
    }

    #[test]
    fn typed_accessors_reject_other_kinds() {
        let mut graph = AudioGraph::new(48000.0);
        let gain = graph.create_gain(1.0);
        assert!(graph.biquad(gain).is_none());
        assert!(graph.biquad_mut(gain).is_none());
        assert!(graph.source(gain).is_none());
        assert!(graph.gain(gain).is_some());
        assert!(graph.gain_mut(gain).is_some());
    }
}
