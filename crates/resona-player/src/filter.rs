//! Per-voice biquad filtering for groups.
//!
//! Each voice carries its own [`FilterParameters`], copied from the group when
//! the voice is created or reused. The first filter change made while a voice
//! has a live chain splices a biquad node in at the head of its insert chain:
//!
//! ```text
//! before:  insert_in ──────────────► (effects…) ─► insert_out
//! after:   insert_in ─► biquad ────► (effects…) ─► insert_out
//! ```
//!
//! A playing voice is then paused and resumed in place so the new path takes
//! effect from its current position.
//!
//! Setters return `&mut Self`. They do nothing on an unsupported group, and
//! are queued on a group that has not finished loading.

use resona_config::{FilterBundle, FilterParameters};
use resona_core::{AudioContext, FilterType, GraphError, NodeId};

use crate::group::{Group, LoadState};
use crate::queue::QueuedAction;
use crate::voice::VoiceId;

/// One parameter write.
#[derive(Clone, Copy, Debug)]
enum FilterChange {
    QFactor(f32),
    Frequency(f32),
    Type(FilterType),
}

impl FilterChange {
    fn store(self, params: &mut FilterParameters) {
        match self {
            FilterChange::QFactor(q) => params.q_factor = q,
            FilterChange::Frequency(frequency) => params.frequency = frequency,
            FilterChange::Type(filter_type) => params.filter_type = filter_type,
        }
    }

    fn queued(self, id: Option<VoiceId>) -> QueuedAction {
        match self {
            FilterChange::QFactor(q) => QueuedAction::QFactor { q, id },
            FilterChange::Frequency(frequency) => QueuedAction::Frequency { frequency, id },
            FilterChange::Type(filter_type) => QueuedAction::FilterType { filter_type, id },
        }
    }

    fn is_valid(self) -> bool {
        match self {
            FilterChange::QFactor(value) | FilterChange::Frequency(value) => value.is_finite(),
            FilterChange::Type(_) => true,
        }
    }
}

impl Group {
    /// The group's default resonance.
    pub fn q_factor(&self) -> f32 {
        self.params.q_factor
    }

    /// The group's default frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.params.frequency
    }

    /// The group's default filter shape.
    pub fn filter_type(&self) -> FilterType {
        self.params.filter_type
    }

    /// The group's default filter parameters.
    pub fn filter_params(&self) -> FilterParameters {
        self.params
    }

    /// A voice's own resonance.
    pub fn voice_q_factor(&self, id: VoiceId) -> Option<f32> {
        self.voice(id).map(|voice| voice.q_factor())
    }

    /// A voice's own frequency.
    pub fn voice_frequency(&self, id: VoiceId) -> Option<f32> {
        self.voice(id).map(|voice| voice.frequency())
    }

    /// A voice's own filter shape.
    pub fn voice_filter_type(&self, id: VoiceId) -> Option<FilterType> {
        self.voice(id).map(|voice| voice.filter_type())
    }

    /// A voice's own filter parameters.
    pub fn voice_filter_params(&self, id: VoiceId) -> Option<FilterParameters> {
        self.voice(id).map(|voice| voice.filter_params())
    }

    /// Sets the resonance of one voice, or of every voice for `None`.
    ///
    /// The value also becomes the group default. Non-finite values are
    /// ignored.
    pub fn set_q_factor(&mut self, q: f32, id: Option<VoiceId>) -> &mut Self {
        self.change_filter(FilterChange::QFactor(q), id)
    }

    /// Sets the frequency of one voice, or of every voice for `None`.
    ///
    /// The value also becomes the group default. Non-finite values are
    /// ignored.
    pub fn set_frequency(&mut self, frequency: f32, id: Option<VoiceId>) -> &mut Self {
        self.change_filter(FilterChange::Frequency(frequency), id)
    }

    /// Sets the filter shape of one voice, or of every voice for `None`.
    ///
    /// The value also becomes the group default.
    pub fn set_filter_type(&mut self, filter_type: FilterType, id: Option<VoiceId>) -> &mut Self {
        self.change_filter(FilterChange::Type(filter_type), id)
    }

    /// Applies several parameters at once to voices with a live chain.
    ///
    /// Fields missing from `bundle` keep each voice's current value. Voices
    /// without a chain and the group defaults are left alone.
    pub fn add_filter(&mut self, bundle: FilterBundle, id: Option<VoiceId>) -> &mut Self {
        if self.context.is_none() {
            return self;
        }
        if self.state != LoadState::Loaded {
            self.defer(QueuedAction::AddFilter { bundle, id });
            return self;
        }

        for index in self.indices(id) {
            if !self.voices[index].has_node() {
                continue;
            }
            let params = bundle.resolve(&self.voices[index].params);
            self.voices[index].params = params;
            if let Some((ctx, filter)) = self.ensure_filter(index) {
                write_params(&ctx, filter, &params);
            }
        }
        self
    }

    fn change_filter(&mut self, change: FilterChange, id: Option<VoiceId>) -> &mut Self {
        if self.context.is_none() {
            return self;
        }
        if self.state != LoadState::Loaded {
            self.defer(change.queued(id));
            return self;
        }
        if !change.is_valid() {
            tracing::debug!("filter_ignored: '{}' {change:?}", self.name);
            return self;
        }

        change.store(&mut self.params);
        for index in self.indices(id) {
            change.store(&mut self.voices[index].params);
            if !self.voices[index].has_node() {
                continue;
            }
            if let Some((ctx, filter)) = self.ensure_filter(index) {
                ctx.with_biquad(filter, |node| match change {
                    FilterChange::QFactor(q) => {
                        node.q_mut().set_value(q);
                    }
                    FilterChange::Frequency(frequency) => {
                        node.frequency_mut().set_value(frequency);
                    }
                    FilterChange::Type(filter_type) => node.set_filter_type(filter_type),
                });
            }
        }
        self
    }

    /// Returns the voice's filter node, creating and splicing it first if
    /// needed. `None` if the voice has no live chain or the splice failed.
    fn ensure_filter(&mut self, index: usize) -> Option<(AudioContext, NodeId)> {
        let ctx = self.context.clone()?;
        let voice = &self.voices[index];
        let ports = voice.ports()?;
        if let Some(filter) = ports.filter {
            return Some((ctx, filter));
        }

        let filter = ctx.create_biquad_filter();
        ctx.with_biquad(filter, |node| {
            node.gain_mut().set_value(1.0);
        });
        write_params(&ctx, filter, &voice.params);

        if let Err(err) = splice(&ctx, ports.insert_in, filter) {
            tracing::warn!(
                "filter_setup: '{}' {} left unfiltered: {err}",
                self.name,
                voice.id()
            );
            return None;
        }
        let id = voice.id();
        let playing = voice.is_playing();
        if let Some(ports) = self.voices[index].ports.as_mut() {
            ports.filter = Some(filter);
        }
        tracing::debug!("filter_setup: '{}' {id} → {filter}", self.name);

        if playing {
            self.pause(Some(id));
            self.play(Some(id));
        }
        Some((ctx, filter))
    }
}

/// Moves everything `tap` feeds behind `filter`.
///
/// On failure the filter is removed and the tap's former outputs restored.
fn splice(ctx: &AudioContext, tap: NodeId, filter: NodeId) -> Result<(), GraphError> {
    let targets = match ctx.disconnect_outputs(tap) {
        Ok(targets) => targets,
        Err(err) => {
            let _ = ctx.remove_node(filter);
            return Err(err);
        }
    };
    let wired = ctx.connect(tap, filter).and_then(|_| {
        targets
            .iter()
            .try_for_each(|&target| ctx.connect(filter, target).map(|_| ()))
    });
    if let Err(err) = wired {
        let _ = ctx.remove_node(filter);
        for &target in &targets {
            let _ = ctx.connect(tap, target);
        }
        return Err(err);
    }
    Ok(())
}

fn write_params(ctx: &AudioContext, filter: NodeId, params: &FilterParameters) {
    ctx.with_biquad(filter, |node| {
        node.set_filter_type(params.filter_type);
        node.frequency_mut().set_value(params.frequency);
        node.q_mut().set_value(params.q_factor);
    });
}
