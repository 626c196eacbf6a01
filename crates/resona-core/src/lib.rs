//! Resona Core - native audio graph primitives
//!
//! This crate is the platform layer the rest of resona builds on: a small
//! single-threaded audio graph with buffer sources, gain stages and biquad
//! filters, plus the filter math those nodes run.
//!
//! # Core Abstractions
//!
//! ## Filters
//!
//! - [`Biquad`] - Second-order IIR filter with RBJ cookbook coefficients
//! - [`FilterType`] - The four response shapes a [`BiquadFilterNode`] offers
//!
//! ## Graph
//!
//! - [`AudioGraph`] - Node arena with connect/disconnect and block rendering
//! - [`AudioContext`] - Shared, cheap-to-clone handle to one graph
//! - [`AudioParam`] - Named scalar parameter with default and nominal range
//!
//! # Example
//!
//! ```rust
//! use resona_core::{AudioContext, FilterType};
//!
//! let ctx = AudioContext::new(48000.0);
//! let filter = ctx.create_biquad_filter();
//! let tap = ctx.create_gain(1.0);
//! ctx.connect(tap, filter).unwrap();
//! ctx.connect(filter, ctx.destination()).unwrap();
//!
//! ctx.with_biquad(filter, |node| {
//!     node.set_filter_type(FilterType::Highpass);
//!     node.frequency_mut().set_value(250.0);
//! });
//! ```
//!
//! # Threading
//!
//! The graph is driven from a single thread. [`AudioContext`] wraps it in
//! `Rc<RefCell<_>>`; it is neither `Send` nor `Sync`.

pub mod biquad;
pub mod graph;
pub mod param;

pub use biquad::{
    Biquad, Coefficients, FilterType, ParseFilterTypeError, bandpass_coefficients,
    highpass_coefficients, lowpass_coefficients, notch_coefficients,
};
pub use graph::{
    AudioContext, AudioGraph, BiquadFilterNode, EdgeId, GainNode, GraphError, NodeId, NodeKind,
    SourceNode,
};
pub use param::AudioParam;
