//! The global tier: one context, many groups.

use resona_config::{GroupOptions, MixerConfig};
use resona_core::{AudioContext, FilterType};

use crate::group::Group;

/// Owns the shared [`AudioContext`] and every [`Group`] created through it.
///
/// Filter setters here fan out to every group, newest first, targeting all
/// voices of each group.
#[derive(Debug)]
pub struct Mixer {
    context: Option<AudioContext>,
    groups: Vec<Group>,
    block_size: usize,
}

impl Mixer {
    /// Builds a mixer and its configured groups.
    ///
    /// With `audio = false` the mixer has no context and every group is
    /// unsupported.
    pub fn new(config: &MixerConfig) -> Self {
        let context = config
            .audio
            .then(|| AudioContext::new(config.sample_rate as f32));
        let groups = config
            .groups
            .iter()
            .map(|options| Group::new(context.clone(), options))
            .collect();
        tracing::debug!(
            "mixer_new: {} Hz, {} groups, audio={}",
            config.sample_rate,
            config.groups.len(),
            config.audio
        );
        Self {
            context,
            groups,
            block_size: config.block_size.max(1),
        }
    }

    /// A mixer with no audio graph.
    pub fn without_audio() -> Self {
        Self::new(&MixerConfig::default().with_audio(false))
    }

    /// The shared context, if audio is enabled.
    pub fn context(&self) -> Option<&AudioContext> {
        self.context.as_ref()
    }

    /// True if the mixer renders through an audio graph.
    pub fn is_supported(&self) -> bool {
        self.context.is_some()
    }

    /// Largest block rendered in one graph pass.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Creates a group on the shared context and returns its index.
    pub fn add_group(&mut self, options: &GroupOptions) -> usize {
        self.groups.push(Group::new(self.context.clone(), options));
        self.groups.len() - 1
    }

    /// Group by index.
    pub fn group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    /// Mutable group by index.
    pub fn group_mut(&mut self, index: usize) -> Option<&mut Group> {
        self.groups.get_mut(index)
    }

    /// Mutable group by name.
    pub fn group_named(&mut self, name: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|group| group.name() == name)
    }

    /// Every group, in creation order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Sets the resonance of every voice of every group.
    pub fn set_q_factor(&mut self, q: f32) -> &mut Self {
        if self.context.is_none() {
            return self;
        }
        for group in self.groups.iter_mut().rev() {
            group.set_q_factor(q, None);
        }
        self
    }

    /// Sets the frequency of every voice of every group.
    pub fn set_frequency(&mut self, frequency: f32) -> &mut Self {
        if self.context.is_none() {
            return self;
        }
        for group in self.groups.iter_mut().rev() {
            group.set_frequency(frequency, None);
        }
        self
    }

    /// Sets the filter shape of every voice of every group.
    pub fn set_filter_type(&mut self, filter_type: FilterType) -> &mut Self {
        if self.context.is_none() {
            return self;
        }
        for group in self.groups.iter_mut().rev() {
            group.set_filter_type(filter_type, None);
        }
        self
    }

    /// Renders `out.len()` frames in blocks of at most
    /// [`block_size`](Self::block_size), then ends voices that played out.
    ///
    /// Without audio the output is silence.
    pub fn render(&mut self, out: &mut [f32]) {
        let Some(ctx) = &self.context else {
            out.fill(0.0);
            return;
        };
        for block in out.chunks_mut(self.block_size) {
            ctx.render(block);
        }
        for group in &mut self.groups {
            group.reap_finished();
        }
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new(&MixerConfig::default())
    }
}
