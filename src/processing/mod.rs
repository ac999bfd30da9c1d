// Audio Processing Module
//
// Split into focused files:
// - channels.rs: Channel count conversion table
// - resampling.rs: Sample rate conversion
// - duration.rs: Pad / truncate to a fixed length

pub mod channels;
pub mod resampling;
pub mod duration;

pub use channels::{normalize_channels, ChannelStrategy};
pub use resampling::{resample, resampled_length};
pub use duration::{normalize_duration, target_length, PaddingSplit};
