//! In-place audio buffer view over host channel slices.
//!
//! The engine processes audio in place: every stage reads and writes the
//! same channel slices the host handed in. [`Buffer`] is a planar view over
//! those slices (one `&mut [S]` per channel), generic over the sample type.
//!
//! # Real-Time Safety
//!
//! Channel references are kept in fixed-size stack storage. Constructing or
//! using a buffer never allocates.
//!
//! # Example
//!
//! ```
//! use tonestrip_core::Buffer;
//!
//! let mut left = [0.5f32; 64];
//! let mut right = [-0.5f32; 64];
//! let mut buffer = Buffer::new([&mut left[..], &mut right[..]], 64);
//!
//! for channel in buffer.channels_mut() {
//!     for sample in channel.iter_mut() {
//!         *sample *= 0.5;
//!     }
//! }
//! assert_eq!(left[0], 0.25);
//! ```

use crate::sample::Sample;
use crate::types::MAX_CHANNELS;

/// Planar, in-place audio buffer for one processing block.
///
/// # Type Parameter
///
/// `S` is the sample type, defaulting to `f32`. Use `Buffer<f64>` for
/// 64-bit double precision processing.
///
/// # Lifetime
///
/// The `'a` lifetime ties the buffer to the host's audio data. A buffer is
/// only valid within a single process call.
pub struct Buffer<'a, S: Sample = f32> {
    /// Channel slices (Option because `&mut` is not `Copy`)
    channels: [Option<&'a mut [S]>; MAX_CHANNELS],
    /// Number of active channels
    num_channels: usize,
    /// Number of samples in this processing block
    num_samples: usize,
}

impl<'a, S: Sample> Buffer<'a, S> {
    /// Create a new buffer from channel slices.
    ///
    /// `num_samples` is reduced to the length of the shortest channel so that
    /// every accessor stays in bounds. Channels beyond [`MAX_CHANNELS`] are
    /// silently ignored.
    #[inline]
    pub fn new(channels: impl IntoIterator<Item = &'a mut [S]>, num_samples: usize) -> Self {
        let mut channel_arr: [Option<&'a mut [S]>; MAX_CHANNELS] = std::array::from_fn(|_| None);
        let mut num_channels = 0;
        let mut num_samples = num_samples;
        for (i, slice) in channels.into_iter().take(MAX_CHANNELS).enumerate() {
            num_samples = num_samples.min(slice.len());
            channel_arr[i] = Some(slice);
            num_channels = i + 1;
        }

        Self {
            channels: channel_arr,
            num_channels,
            num_samples,
        }
    }

    // =========================================================================
    // Buffer Info
    // =========================================================================

    /// Number of samples in this processing block.
    #[inline]
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Number of channels.
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Returns true if the block holds no samples or no channels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_samples == 0 || self.num_channels == 0
    }

    // =========================================================================
    // Channel Access
    // =========================================================================

    /// Get a channel by index.
    ///
    /// Returns an empty slice if the channel doesn't exist.
    #[inline]
    pub fn channel(&self, channel: usize) -> &[S] {
        self.channels
            .get(channel)
            .and_then(|opt| opt.as_deref())
            .map(|ch| &ch[..self.num_samples])
            .unwrap_or(&[])
    }

    /// Get a mutable channel by index.
    ///
    /// Returns `None` if the channel doesn't exist.
    #[inline]
    pub fn channel_mut(&mut self, channel: usize) -> Option<&mut [S]> {
        let n = self.num_samples;
        self.channels
            .get_mut(channel)
            .and_then(|opt| opt.as_deref_mut())
            .map(|ch| &mut ch[..n])
    }

    /// Iterate over all channels mutably.
    #[inline]
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [S]> + use<'_, 'a, S> {
        let n = self.num_samples;
        self.channels[..self.num_channels]
            .iter_mut()
            .filter_map(move |opt| opt.as_deref_mut().map(|ch| &mut ch[..n]))
    }

    // =========================================================================
    // Bulk Operations
    // =========================================================================

    /// Fill one channel with silence. Missing channels are ignored.
    pub fn clear_channel(&mut self, channel: usize) {
        if let Some(samples) = self.channel_mut(channel) {
            samples.fill(S::ZERO);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_samples_limited_to_shortest_channel() {
        let mut a = [0.0f32; 8];
        let mut b = [0.0f32; 4];
        let buffer = Buffer::new([&mut a[..], &mut b[..]], 16);
        assert_eq!(buffer.num_samples(), 4);
        assert_eq!(buffer.num_channels(), 2);
    }

    #[test]
    fn test_missing_channel_access() {
        let mut a = [1.0f64; 4];
        let mut buffer = Buffer::new([&mut a[..]], 4);
        assert!(buffer.channel(3).is_empty());
        assert!(buffer.channel_mut(3).is_none());
        buffer.clear_channel(3);
        assert_eq!(buffer.channel(0), &[1.0; 4]);
    }

    #[test]
    fn test_clear_channel() {
        let mut a = [0.25f32, -0.75, 0.5, 0.0];
        let mut b = [0.9f32; 4];
        let mut buffer = Buffer::new([&mut a[..], &mut b[..]], 4);
        buffer.clear_channel(1);
        assert_eq!(buffer.channel(0), &[0.25, -0.75, 0.5, 0.0]);
        assert_eq!(b, [0.0; 4]);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer: Buffer<'_, f32> = Buffer::new(std::iter::empty(), 128);
        assert!(buffer.is_empty());
    }
}
