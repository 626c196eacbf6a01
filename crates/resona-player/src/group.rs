//! Sound groups: one loaded buffer, many voices.

use std::collections::VecDeque;
use std::rc::Rc;

use resona_config::{FilterParameters, GroupOptions};
use resona_core::{AudioContext, AudioGraph, EdgeId, GraphError, NodeId};

use crate::queue::QueuedAction;
use crate::voice::{Voice, VoiceId, VoicePorts, VoiceState};

/// Load state of a group's buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No buffer.
    #[default]
    Unloaded,
    /// A load has been started but not completed.
    Loading,
    /// The buffer is available and calls run immediately.
    Loaded,
}

/// A sound and the voices playing it.
///
/// A group without an [`AudioContext`] is "unsupported": it still tracks
/// voices and play state, but builds no graph nodes and ignores every filter
/// call.
///
/// Calls made before [`load`](Group::load) completes are queued and replayed
/// in order once it does.
#[derive(Debug)]
pub struct Group {
    pub(crate) name: String,
    pub(crate) context: Option<AudioContext>,
    pub(crate) state: LoadState,
    pub(crate) buffer: Option<Rc<[f32]>>,
    pub(crate) volume: f32,
    pub(crate) looping: bool,
    pub(crate) pool: usize,
    pub(crate) params: FilterParameters,
    pub(crate) voices: Vec<Voice>,
    pub(crate) queue: VecDeque<QueuedAction>,
    next_id: u32,
}

impl Group {
    /// Creates an unloaded group.
    pub fn new(context: Option<AudioContext>, options: &GroupOptions) -> Self {
        tracing::debug!(
            "group_new: '{}' supported={}",
            options.name,
            context.is_some()
        );
        Self {
            name: options.name.clone(),
            context,
            state: LoadState::Unloaded,
            buffer: None,
            volume: options.volume,
            looping: options.looping,
            pool: options.pool,
            params: options.filter_params(),
            voices: Vec::new(),
            queue: VecDeque::new(),
            next_id: 1,
        }
    }

    /// The group's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared context, if the group has one.
    pub fn context(&self) -> Option<&AudioContext> {
        self.context.as_ref()
    }

    /// True if the group renders through an audio graph.
    pub fn is_supported(&self) -> bool {
        self.context.is_some()
    }

    /// Current load state.
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// True once [`load`](Self::load) has completed.
    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// Marks a load as in progress.
    pub fn begin_load(&mut self) -> &mut Self {
        if self.state == LoadState::Unloaded {
            self.state = LoadState::Loading;
        }
        self
    }

    /// Load completion: stores the buffer and replays every queued call in
    /// submission order.
    pub fn load(&mut self, samples: impl Into<Rc<[f32]>>) -> &mut Self {
        self.buffer = Some(samples.into());
        self.state = LoadState::Loaded;
        tracing::debug!(
            "group_load: '{}' replaying {} queued calls",
            self.name,
            self.queue.len()
        );
        while let Some(action) = self.queue.pop_front() {
            self.replay(action);
        }
        self
    }

    /// Stops and drops every voice, drops the buffer and pending calls.
    pub fn unload(&mut self) -> &mut Self {
        for index in 0..self.voices.len() {
            self.teardown(index);
        }
        self.voices.clear();
        self.queue.clear();
        self.buffer = None;
        self.state = LoadState::Unloaded;
        tracing::debug!("group_unload: '{}'", self.name);
        self
    }

    /// Output volume.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Sets the output volume of the group and every live voice.
    pub fn set_volume(&mut self, volume: f32) -> &mut Self {
        if !volume.is_finite() {
            return self;
        }
        self.volume = volume;
        if let Some(ctx) = &self.context {
            for ports in self.voices.iter().filter_map(Voice::ports) {
                ctx.with_gain(ports.output, |gain| gain.gain_mut().set_value(volume));
            }
        }
        self
    }

    /// Whether new sources loop.
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Maximum number of ended voices kept for reuse.
    pub fn pool_size(&self) -> usize {
        self.pool
    }

    /// Starts or resumes playback.
    ///
    /// `None` claims a pooled voice (resetting it) or creates a new one.
    /// `Some(id)` resumes that voice. Returns the voice's id, or `None` when
    /// the call was queued or the id is unknown.
    pub fn play(&mut self, id: Option<VoiceId>) -> Option<VoiceId> {
        if self.state != LoadState::Loaded {
            self.defer(QueuedAction::Play(id));
            return None;
        }
        let index = match id {
            Some(id) => self.index_of(id)?,
            None => self.claim_voice(),
        };
        self.start(index);
        Some(self.voices[index].id())
    }

    /// Pauses playing voices, keeping their position.
    pub fn pause(&mut self, id: Option<VoiceId>) -> &mut Self {
        if self.state != LoadState::Loaded {
            self.defer(QueuedAction::Pause(id));
            return self;
        }
        for index in self.indices(id) {
            if self.voices[index].is_playing() {
                self.detach_source(index);
                self.voices[index].state = VoiceState::Paused;
                tracing::debug!(
                    "group_pause: '{}' {} at {}",
                    self.name,
                    self.voices[index].id(),
                    self.voices[index].seek
                );
            }
        }
        self
    }

    /// Stops voices: their graph nodes are removed and they rewind.
    pub fn stop(&mut self, id: Option<VoiceId>) -> &mut Self {
        if self.state != LoadState::Loaded {
            self.defer(QueuedAction::Stop(id));
            return self;
        }
        for index in self.indices(id) {
            self.teardown(index);
            let voice = &mut self.voices[index];
            voice.seek = 0;
            voice.state = VoiceState::Ended;
        }
        self.drain_pool();
        self
    }

    /// Ends voices whose non-looping source has played out.
    ///
    /// Returns the ids that ended.
    pub fn reap_finished(&mut self) -> Vec<VoiceId> {
        let Some(ctx) = &self.context else {
            return Vec::new();
        };
        let finished: Vec<VoiceId> = {
            let graph = ctx.graph();
            self.voices
                .iter()
                .filter(|voice| voice.is_playing())
                .filter(|voice| {
                    voice
                        .ports
                        .and_then(|ports| ports.source)
                        .and_then(|source| graph.source(source))
                        .is_some_and(|source| source.is_finished())
                })
                .map(Voice::id)
                .collect()
        };
        for &id in &finished {
            self.stop(Some(id));
        }
        finished
    }

    /// Ids a call with `id` applies to: every voice in creation order for
    /// `None`, the voice itself if it exists otherwise.
    pub fn voice_ids(&self, id: Option<VoiceId>) -> Vec<VoiceId> {
        match id {
            None => self.voices.iter().map(Voice::id).collect(),
            Some(id) => self.index_of(id).map(|_| id).into_iter().collect(),
        }
    }

    /// Looks a voice up by id.
    pub fn voice(&self, id: VoiceId) -> Option<&Voice> {
        self.voices.iter().find(|voice| voice.id() == id)
    }

    /// Every voice, in creation order.
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Number of calls waiting for load completion.
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Event names of the waiting calls, oldest first.
    pub fn queued_events(&self) -> Vec<&'static str> {
        self.queue.iter().map(QueuedAction::event).collect()
    }

    /// Splices `effect` at the end of a voice's insert chain, just before the
    /// insert-output tap.
    ///
    /// The voice takes ownership of `effect`: it is removed from the graph
    /// together with the rest of the chain when the voice stops or the group
    /// unloads. On error the chain is left exactly as it was.
    ///
    /// Returns `Ok(false)` when the voice has no live chain.
    pub fn insert_effect(&mut self, id: VoiceId, effect: NodeId) -> Result<bool, GraphError> {
        let Some(ctx) = self.context.clone() else {
            return Ok(false);
        };
        let Some(index) = self.index_of(id) else {
            return Ok(false);
        };
        let Some(ports) = self.voices[index].ports else {
            return Ok(false);
        };

        let mut graph = ctx.graph_mut();
        let mut severed = Vec::new();
        let mut created = Vec::new();
        if let Err(err) = wire_before(
            &mut graph,
            ports.insert_out,
            effect,
            &mut severed,
            &mut created,
        ) {
            for edge in created {
                let _ = graph.disconnect(edge);
            }
            for upstream in severed {
                if let Err(restore) = graph.connect(upstream, ports.insert_out) {
                    tracing::warn!(
                        "group_insert: '{}' could not restore {upstream}: {restore}",
                        self.name
                    );
                }
            }
            return Err(err);
        }
        drop(graph);

        tracing::debug!("group_insert: '{}' voice {id} owns {effect}", self.name);
        self.voices[index].effects.push(effect);
        Ok(true)
    }

    pub(crate) fn defer(&mut self, action: QueuedAction) {
        tracing::debug!(
            "group_defer: '{}' {} for {:?}",
            self.name,
            action.event(),
            action.target()
        );
        self.queue.push_back(action);
    }

    fn replay(&mut self, action: QueuedAction) {
        match action {
            QueuedAction::Play(id) => {
                self.play(id);
            }
            QueuedAction::Pause(id) => {
                self.pause(id);
            }
            QueuedAction::Stop(id) => {
                self.stop(id);
            }
            QueuedAction::QFactor { q, id } => {
                self.set_q_factor(q, id);
            }
            QueuedAction::Frequency { frequency, id } => {
                self.set_frequency(frequency, id);
            }
            QueuedAction::FilterType { filter_type, id } => {
                self.set_filter_type(filter_type, id);
            }
            QueuedAction::AddFilter { bundle, id } => {
                self.add_filter(bundle, id);
            }
        }
    }

    pub(crate) fn index_of(&self, id: VoiceId) -> Option<usize> {
        self.voices.iter().position(|voice| voice.id() == id)
    }

    pub(crate) fn indices(&self, id: Option<VoiceId>) -> Vec<usize> {
        self.voice_ids(id)
            .into_iter()
            .filter_map(|id| self.index_of(id))
            .collect()
    }

    /// Reuses the first ended voice, or creates one.
    fn claim_voice(&mut self) -> usize {
        if let Some(index) = self.voices.iter().position(Voice::is_ended) {
            self.voices[index].reset(self.params);
            return index;
        }
        let id = VoiceId(self.next_id);
        self.next_id += 1;
        self.voices.push(Voice::init(id, self.params));
        self.voices.len() - 1
    }

    fn start(&mut self, index: usize) {
        if self.voices[index].is_playing() {
            return;
        }
        if let (Some(ctx), Some(buffer)) = (self.context.clone(), self.buffer.clone())
            && let Err(err) = self.attach_source(&ctx, index, buffer)
        {
            tracing::warn!(
                "group_play: '{}' {} has no graph chain: {err}",
                self.name,
                self.voices[index].id()
            );
        }
        self.voices[index].state = VoiceState::Playing;
        tracing::debug!(
            "group_play: '{}' {} from {}",
            self.name,
            self.voices[index].id(),
            self.voices[index].seek
        );
    }

    fn attach_source(
        &mut self,
        ctx: &AudioContext,
        index: usize,
        buffer: Rc<[f32]>,
    ) -> Result<(), GraphError> {
        let ports = match self.voices[index].ports {
            Some(ports) => ports,
            None => {
                let ports = build_chain(ctx, self.volume)?;
                self.voices[index].ports = Some(ports);
                ports
            }
        };
        let source = ctx.create_source(buffer, self.voices[index].seek, self.looping);
        if let Err(err) = ctx.connect(source, ports.insert_in) {
            let _ = ctx.remove_node(source);
            return Err(err);
        }
        if let Some(ports) = self.voices[index].ports.as_mut() {
            ports.source = Some(source);
        }
        Ok(())
    }

    /// Removes the source, remembering where it was.
    fn detach_source(&mut self, index: usize) {
        let voice = &mut self.voices[index];
        let Some(source) = voice.ports.as_mut().and_then(|ports| ports.source.take()) else {
            return;
        };
        if let Some(ctx) = &self.context {
            if let Some(position) = ctx.source_position(source) {
                voice.seek = position;
            }
            let _ = ctx.remove_node(source);
        }
    }

    /// Removes every node the voice owns, filter included.
    fn teardown(&mut self, index: usize) {
        let effects = std::mem::take(&mut self.voices[index].effects);
        let Some(ports) = self.voices[index].ports.take() else {
            return;
        };
        if let Some(ctx) = &self.context {
            for node in ports.owned_nodes() {
                if let Err(err) = ctx.remove_node(node) {
                    tracing::warn!("group_stop: '{}' could not remove {node}: {err}", self.name);
                }
            }
            // Callers may already have removed an effect themselves.
            for node in effects {
                if let Err(err) = ctx.remove_node(node) {
                    tracing::debug!("group_stop: '{}' effect {node} already gone: {err}", self.name);
                }
            }
        }
    }

    /// Drops the oldest ended voices beyond the pool limit.
    fn drain_pool(&mut self) {
        let pool = self.pool;
        let mut excess = self
            .voices
            .iter()
            .filter(|voice| voice.is_ended())
            .count()
            .saturating_sub(pool);
        if excess == 0 {
            return;
        }
        self.voices.retain(|voice| {
            if excess > 0 && voice.is_ended() {
                excess -= 1;
                false
            } else {
                true
            }
        });
    }
}

/// `insert_in → insert_out → output → destination`
fn build_chain(ctx: &AudioContext, volume: f32) -> Result<VoicePorts, GraphError> {
    let insert_in = ctx.create_gain(1.0);
    let insert_out = ctx.create_gain(1.0);
    let output = ctx.create_gain(volume);
    let ports = VoicePorts {
        insert_in,
        insert_out,
        output,
        source: None,
        filter: None,
    };
    let wired = ctx
        .connect(insert_in, insert_out)
        .and_then(|_| ctx.connect(insert_out, output))
        .and_then(|_| ctx.connect(output, ctx.destination()));
    if let Err(err) = wired {
        for node in ports.owned_nodes() {
            let _ = ctx.remove_node(node);
        }
        return Err(err);
    }
    Ok(ports)
}

/// Moves every edge into `tail` onto `effect`, then feeds `effect` into
/// `tail`. Records what it changed so the caller can undo a partial splice.
fn wire_before(
    graph: &mut AudioGraph,
    tail: NodeId,
    effect: NodeId,
    severed: &mut Vec<NodeId>,
    created: &mut Vec<EdgeId>,
) -> Result<(), GraphError> {
    for upstream in graph.inputs(tail) {
        if let Some(edge) = graph.find_edge(upstream, tail) {
            graph.disconnect(edge)?;
            severed.push(upstream);
        }
        created.push(graph.connect(upstream, effect)?);
    }
    created.push(graph.connect(effect, tail)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_group(pool: usize) -> Group {
        let ctx = AudioContext::new(48000.0);
        let mut group = Group::new(Some(ctx), &GroupOptions::new("test").with_pool(pool));
        group.load(vec![0.5_f32; 4800]);
        group
    }

    #[test]
    fn play_builds_chain() {
        let mut group = loaded_group(5);
        let id = group.play(None).unwrap();
        let voice = group.voice(id).unwrap();
        assert!(voice.is_playing());
        let ports = voice.ports().unwrap();
        assert!(ports.source.is_some());

        let ctx = group.context().unwrap();
        assert_eq!(ctx.outputs(ports.insert_in), vec![ports.insert_out]);
        assert_eq!(ctx.outputs(ports.output), vec![ctx.destination()]);
    }

    #[test]
    fn pause_keeps_position() {
        let mut group = loaded_group(5);
        let id = group.play(None).unwrap();
        let mut out = [0.0_f32; 128];
        group.context().unwrap().render(&mut out);
        group.pause(Some(id));
        let voice = group.voice(id).unwrap();
        assert!(voice.is_paused());
        assert_eq!(voice.seek(), 128);
        assert!(voice.ports().unwrap().source.is_none());
    }

    #[test]
    fn stop_tears_down() {
        let mut group = loaded_group(5);
        let id = group.play(None).unwrap();
        let nodes_before = group.context().unwrap().graph().node_count();
        group.stop(Some(id));
        let voice = group.voice(id).unwrap();
        assert!(voice.is_ended());
        assert!(!voice.has_node());
        // source + three taps
        assert_eq!(
            group.context().unwrap().graph().node_count(),
            nodes_before - 4
        );
    }

    #[test]
    fn pool_limit_drops_oldest_ended() {
        let mut group = loaded_group(1);
        let a = group.play(None).unwrap();
        let b = group.play(None).unwrap();
        group.stop(None);
        assert_eq!(group.voices().len(), 1);
        assert!(group.voice(a).is_none());
        assert!(group.voice(b).is_some());
    }

    #[test]
    fn unknown_ids_resolve_to_nothing() {
        let group = loaded_group(5);
        assert!(group.voice_ids(Some(VoiceId(99))).is_empty());
        assert!(group.voice_ids(None).is_empty());
    }

    #[test]
    fn calls_before_load_are_queued() {
        let mut group = Group::new(None, &GroupOptions::default());
        group.begin_load();
        assert_eq!(group.state(), LoadState::Loading);
        assert_eq!(group.play(None), None);
        group.pause(None);
        assert_eq!(group.queued_events(), vec!["play", "pause"]);

        group.load(vec![0.0_f32; 16]);
        assert_eq!(group.queued_len(), 0);
        assert_eq!(group.voices().len(), 1);
        assert!(group.voices()[0].is_paused());
    }

    #[test]
    fn unsupported_group_plays_without_nodes() {
        let mut group = Group::new(None, &GroupOptions::default());
        group.load(vec![0.0_f32; 16]);
        let id = group.play(None).unwrap();
        assert!(group.voice(id).unwrap().is_playing());
        assert!(!group.voice(id).unwrap().has_node());
    }

    #[test]
    fn unload_clears_everything() {
        let mut group = loaded_group(5);
        group.play(None);
        group.unload();
        assert_eq!(group.state(), LoadState::Unloaded);
        assert!(group.voices().is_empty());
        // only the destination remains
        assert_eq!(group.context().unwrap().graph().node_count(), 1);
    }

    #[test]
    fn stop_removes_inserted_effect() {
        let mut group = loaded_group(5);
        let id = group.play(None).unwrap();
        let ctx = group.context().unwrap().clone();
        let effect = ctx.create_gain(0.5);
        assert!(group.insert_effect(id, effect).unwrap());
        assert_eq!(group.voice(id).unwrap().effects(), &[effect]);

        group.stop(Some(id));
        assert!(!ctx.graph().contains(effect));
        assert!(group.voice(id).unwrap().effects().is_empty());
        assert_eq!(ctx.graph().node_count(), 1);
    }

    #[test]
    fn pause_keeps_inserted_effect() {
        let mut group = loaded_group(5);
        let id = group.play(None).unwrap();
        let ctx = group.context().unwrap().clone();
        let effect = ctx.create_gain(0.5);
        group.insert_effect(id, effect).unwrap();

        group.pause(Some(id));
        assert!(ctx.graph().contains(effect));
        let ports = group.voice(id).unwrap().ports().unwrap();
        assert_eq!(ctx.outputs(effect), vec![ports.insert_out]);
    }

    #[test]
    fn unload_removes_inserted_effect() {
        let mut group = loaded_group(5);
        let id = group.play(None).unwrap();
        let ctx = group.context().unwrap().clone();
        let effect = ctx.create_gain(0.5);
        group.insert_effect(id, effect).unwrap();
        // already removed by the caller
        let dropped = ctx.create_gain(1.0);
        group.insert_effect(id, dropped).unwrap();
        ctx.remove_node(dropped).unwrap();

        group.unload();
        assert!(!ctx.graph().contains(effect));
        assert_eq!(ctx.graph().node_count(), 1);
    }

    #[test]
    fn failed_insert_restores_chain() {
        let mut group = loaded_group(5);
        let id = group.play(None).unwrap();
        let ctx = group.context().unwrap().clone();
        let ports = group.voice(id).unwrap().ports().unwrap();
        // feeding the chain head makes the splice cyclic
        let effect = ctx.create_gain(0.5);
        ctx.connect(effect, ports.insert_in).unwrap();

        let err = group.insert_effect(id, effect).unwrap_err();
        assert!(matches!(err, GraphError::CycleDetected));
        assert_eq!(ctx.outputs(ports.insert_in), vec![ports.insert_out]);
        assert_eq!(ctx.outputs(effect), vec![ports.insert_in]);
        assert!(group.voice(id).unwrap().effects().is_empty());

        let mut out = [0.0_f32; 64];
        ctx.render(&mut out);
        assert!(out.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn insert_effect_without_chain_is_refused() {
        let mut group = loaded_group(5);
        let id = group.play(None).unwrap();
        group.stop(Some(id));
        let effect = group.context().unwrap().create_gain(0.5);
        assert!(!group.insert_effect(id, effect).unwrap());
        assert!(!group.insert_effect(VoiceId(99), effect).unwrap());
    }

    #[test]
    fn set_volume_reaches_output_gain() {
        let mut group = loaded_group(5);
        let id = group.play(None).unwrap();
        group.set_volume(0.25);
        let output = group.voice(id).unwrap().ports().unwrap().output;
        let gain = group
            .context()
            .unwrap()
            .with_gain(output, |gain| gain.gain().value())
            .unwrap();
        assert_eq!(gain, 0.25);
    }
}
