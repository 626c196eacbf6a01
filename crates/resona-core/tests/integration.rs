//! Integration tests for resona-core.
//!
//! Verifies filter responses through the full graph path (source → biquad →
//! destination) using sine-wave RMS measurements, and the splice pattern the
//! player relies on: inserting a node between two taps without losing what
//! was already chained there.

use std::rc::Rc;

use resona_core::{AudioContext, AudioGraph, FilterType, NodeId};

const SAMPLE_RATE: f32 = 48000.0;
const TAU: f32 = core::f32::consts::TAU;

/// Generate a sine wave buffer at the given frequency.
fn generate_sine(freq_hz: f32, num_samples: usize) -> Rc<[f32]> {
    (0..num_samples)
        .map(|n| libm::sinf(TAU * freq_hz * n as f32 / SAMPLE_RATE))
        .collect::<Vec<_>>()
        .into()
}

/// Measure RMS amplitude of a signal buffer.
fn rms(signal: &[f32]) -> f32 {
    let sum_sq: f32 = signal.iter().map(|&s| s * s).sum();
    libm::sqrtf(sum_sq / signal.len() as f32)
}

fn to_db(linear: f32) -> f32 {
    20.0 * libm::log10f(linear.max(1e-10))
}

/// Render a sine through a single biquad node and return its gain in dB.
fn measure(filter_type: FilterType, cutoff: f32, q: f32, freq_hz: f32) -> f32 {
    let num_samples = 4800;
    let settle = 2400;
    let input = generate_sine(freq_hz, num_samples);

    let mut graph = AudioGraph::new(SAMPLE_RATE);
    let source = graph.create_source(Rc::clone(&input), 0, false);
    let filter = graph.create_biquad_filter();
    {
        let node = graph.biquad_mut(filter).unwrap();
        node.set_filter_type(filter_type);
        node.frequency_mut().set_value(cutoff);
        node.q_mut().set_value(q);
    }
    let dest = graph.destination();
    graph.connect(source, filter).unwrap();
    graph.connect(filter, dest).unwrap();

    let mut output = vec![0.0_f32; num_samples];
    graph.render(&mut output);
    to_db(rms(&output[settle..]) / rms(&input[settle..]))
}

#[test]
fn lowpass_frequency_response() {
    for freq in [50.0, 100.0, 200.0] {
        let gain_db = measure(FilterType::Lowpass, 1000.0, 0.707, freq);
        assert!(gain_db.abs() < 1.0, "{freq} Hz should pass, got {gain_db:.1} dB");
    }
    for freq in [4000.0, 8000.0, 16000.0] {
        let gain_db = measure(FilterType::Lowpass, 1000.0, 0.707, freq);
        assert!(gain_db < -6.0, "{freq} Hz should be cut, got {gain_db:.1} dB");
    }
}

#[test]
fn highpass_frequency_response() {
    for freq in [50.0, 100.0] {
        let gain_db = measure(FilterType::Highpass, 1000.0, 0.707, freq);
        assert!(gain_db < -6.0, "{freq} Hz should be cut, got {gain_db:.1} dB");
    }
    for freq in [5000.0, 10000.0] {
        let gain_db = measure(FilterType::Highpass, 1000.0, 0.707, freq);
        assert!(gain_db.abs() < 1.0, "{freq} Hz should pass, got {gain_db:.1} dB");
    }
}

#[test]
fn bandpass_peaks_at_center() {
    let center = measure(FilterType::Bandpass, 1000.0, 2.0, 1000.0);
    let below = measure(FilterType::Bandpass, 1000.0, 2.0, 100.0);
    let above = measure(FilterType::Bandpass, 1000.0, 2.0, 10000.0);
    assert!(center.abs() < 1.0, "center should be ~0 dB, got {center:.1}");
    assert!(below < center - 10.0);
    assert!(above < center - 10.0);
}

#[test]
fn notch_rejects_center() {
    let center = measure(FilterType::Notch, 1000.0, 1.0, 1000.0);
    let away = measure(FilterType::Notch, 1000.0, 1.0, 100.0);
    assert!(center < -20.0, "notch center should be deep, got {center:.1} dB");
    assert!(away.abs() < 1.0, "far from the notch should pass, got {away:.1} dB");
}

#[test]
fn parameter_changes_take_effect_on_next_block() {
    let input = generate_sine(5000.0, 9600);
    let mut graph = AudioGraph::new(SAMPLE_RATE);
    let source = graph.create_source(input, 0, false);
    let filter = graph.create_biquad_filter();
    graph.biquad_mut(filter).unwrap().frequency_mut().set_value(20000.0);
    let dest = graph.destination();
    graph.connect(source, filter).unwrap();
    graph.connect(filter, dest).unwrap();

    let mut open = vec![0.0_f32; 4800];
    graph.render(&mut open);

    graph.biquad_mut(filter).unwrap().frequency_mut().set_value(200.0);
    let mut closed = vec![0.0_f32; 4800];
    graph.render(&mut closed);

    assert!(rms(&closed[2400..]) < rms(&open[2400..]) * 0.1);
}

/// Insert `node` directly after `tap`, keeping whatever followed `tap`.
fn splice_after(ctx: &AudioContext, tap: NodeId, node: NodeId) {
    let downstream = ctx.disconnect_outputs(tap).unwrap();
    ctx.connect(tap, node).unwrap();
    for target in downstream {
        ctx.connect(node, target).unwrap();
    }
}

#[test]
fn splice_preserves_existing_chain() {
    let ctx = AudioContext::new(SAMPLE_RATE);
    let insert_in = ctx.create_gain(1.0);
    let insert_out = ctx.create_gain(1.0);
    let existing = ctx.create_gain(0.5);
    ctx.connect(insert_in, existing).unwrap();
    ctx.connect(existing, insert_out).unwrap();

    let filter = ctx.create_biquad_filter();
    splice_after(&ctx, insert_in, filter);

    assert_eq!(ctx.outputs(insert_in), vec![filter]);
    assert_eq!(ctx.outputs(filter), vec![existing]);
    assert_eq!(ctx.outputs(existing), vec![insert_out]);
    assert!(ctx.graph().reaches(insert_in, insert_out));
}
