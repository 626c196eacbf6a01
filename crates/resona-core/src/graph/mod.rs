//! Native audio graph.
//!
//! A small graph in the spirit of a browser audio context: nodes are
//! created from a shared [`AudioContext`], wired with
//! [`connect()`](AudioGraph::connect) and
//! [`disconnect_outputs()`](AudioGraph::disconnect_outputs), and rendered one
//! block at a time in topological order.
//!
//! # Node kinds
//!
//! - [`SourceNode`]: plays a mono sample buffer from a start offset
//! - [`GainNode`]: multiplies its summed input by a gain parameter
//! - [`BiquadFilterNode`]: second-order filter with type/frequency/Q/gain
//! - Destination: exactly one per graph, created up front; whatever reaches
//!   it is written to the render output
//!
//! Every node sums all of its inputs before processing, so fan-in needs no
//! dedicated merge node. Fan-out is simply several outgoing edges.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use resona_core::graph::AudioGraph;
//!
//! let mut graph = AudioGraph::new(48000.0);
//! let samples: Rc<[f32]> = vec![1.0; 64].into();
//! let source = graph.create_source(samples, 0, false);
//! let filter = graph.create_biquad_filter();
//! graph.connect(source, filter).unwrap();
//! graph.connect(filter, graph.destination()).unwrap();
//!
//! let mut out = [0.0_f32; 64];
//! graph.render(&mut out);
//! ```

mod context;
mod edge;
mod node;
mod processing;

pub use context::AudioContext;
pub use edge::EdgeId;
pub use node::{BiquadFilterNode, GainNode, NodeId, NodeKind, SourceNode};
pub use processing::{AudioGraph, GraphError};
