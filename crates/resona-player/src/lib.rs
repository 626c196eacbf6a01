//! Sound groups with per-voice biquad filtering.
//!
//! `resona-player` is a small playback host on top of the
//! [`resona_core`] audio graph, organised in three tiers:
//!
//! - [`Mixer`]: owns the shared [`AudioContext`](resona_core::AudioContext)
//!   and fans global filter changes out to every group
//! - [`Group`]: one loaded buffer, default filter parameters, a pool of voices
//!   and a queue of calls made before loading finished
//! - [`Voice`]: one playing instance with its own filter parameters and,
//!   once a filter change reaches it, its own biquad node
//!
//! # Example
//!
//! ```rust
//! use resona_config::{FilterBundle, FilterType, GroupOptions, MixerConfig};
//! use resona_player::Mixer;
//!
//! let mut mixer = Mixer::new(&MixerConfig::default());
//! let index = mixer.add_group(&GroupOptions::new("engine").with_looping(true));
//! let group = mixer.group_mut(index).unwrap();
//!
//! // Queued until the buffer arrives.
//! group.set_frequency(600.0, None);
//! group.load(vec![0.1_f32; 48000]);
//!
//! let id = group.play(None).unwrap();
//! group.add_filter(
//!     FilterBundle::new().with_q_factor(4.0).with_filter_type(FilterType::Bandpass),
//!     Some(id),
//! );
//! assert_eq!(group.voice_frequency(id), Some(600.0));
//! assert_eq!(group.voice_filter_type(id), Some(FilterType::Bandpass));
//!
//! let mut block = vec![0.0_f32; 256];
//! mixer.render(&mut block);
//! ```

mod filter;
mod group;
mod mixer;
mod queue;
mod voice;

pub use group::{Group, LoadState};
pub use mixer::Mixer;
pub use queue::QueuedAction;
pub use voice::{Voice, VoiceId, VoicePorts, VoiceState};
