use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use enough::Stop;

use crate::channel::{ChannelMatcher, ChannelPlane, FuzzyMatcher, select_channels};
use crate::error::NpyError;
use crate::info::NpyInfo;
use crate::limits::{Limits, MemoryUse};
use crate::npy::{header, pixels};

/// Decoded image: selected channel planes and a single unnamed root layer.
///
/// `.npy` has no notion of layers, so [`layers`](Self::layers) is always
/// `[""]`.
#[derive(Clone, Debug)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    channels: Vec<ChannelPlane>,
    layers: Vec<String>,
    info: NpyInfo,
}

impl ImageData {
    /// Selected channels, in selector order.
    pub fn channels(&self) -> &[ChannelPlane] {
        &self.channels
    }

    pub fn into_channels(self) -> Vec<ChannelPlane> {
        self.channels
    }

    /// Look up a channel by exact name.
    pub fn channel(&self, name: &str) -> Option<&ChannelPlane> {
        self.channels.iter().find(|c| c.name() == name)
    }

    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// Header the image was decoded from.
    pub fn info(&self) -> &NpyInfo {
        &self.info
    }

    /// `.npy` data is never premultiplied.
    pub fn has_premultiplied_alpha(&self) -> bool {
        false
    }

    /// Interleave the selected channels into a `[row][col][channel]` buffer.
    pub fn interleaved(&self) -> Result<Vec<f32>, NpyError> {
        pixels::interleave_planes(&self.channels)
    }
}

/// Decode configuration. Build with [`DecodeRequest::new`], then call
/// [`decode`](Self::decode).
#[derive(Clone, Copy)]
pub struct DecodeRequest<'a> {
    limits: Option<&'a Limits>,
    channel_selector: &'a str,
    matcher: &'a dyn ChannelMatcher,
    parallel: bool,
}

impl Default for DecodeRequest<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> DecodeRequest<'a> {
    /// All channels, no limits, parallel rows when the `rayon` feature is on.
    pub fn new() -> Self {
        Self {
            limits: None,
            channel_selector: "",
            matcher: &FuzzyMatcher,
            parallel: true,
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Channel selector pattern, e.g. `"R,G"`. Empty keeps every channel.
    pub fn with_channel_selector(mut self, pattern: &'a str) -> Self {
        self.channel_selector = pattern;
        self
    }

    /// Replace the default [`FuzzyMatcher`].
    pub fn with_matcher(mut self, matcher: &'a dyn ChannelMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Scatter rows on the rayon pool (only with the `rayon` feature).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Decode a complete `.npy` file held in memory.
    pub fn decode(&self, data: &[u8], stop: impl Stop) -> Result<ImageData, NpyError> {
        let info = header::parse_header(data)?;
        let body = &data[info.data_offset..];
        self.decode_body(info, body, &stop)
    }

    pub(crate) fn check_limits(&self, info: &NpyInfo) -> Result<(), NpyError> {
        let Some(limits) = self.limits else {
            return Ok(());
        };
        let geom = &info.geometry;
        limits.check(geom)?;
        let raw = pixels::data_len(&info.descriptor, geom)?;
        let planes = geom
            .samples_or_err()?
            .checked_mul(core::mem::size_of::<f32>())
            .ok_or(geom.too_large())?;
        limits.check_memory(raw.saturating_add(planes), MemoryUse::Decode)
    }

    pub(crate) fn decode_body(
        &self,
        info: NpyInfo,
        body: &[u8],
        stop: &dyn Stop,
    ) -> Result<ImageData, NpyError> {
        self.check_limits(&info)?;
        stop.check()?;
        let planes = pixels::decode_planes(
            body,
            &info.descriptor,
            &info.geometry,
            self.parallel,
            stop,
        )?;
        let channels = select_channels(planes, self.channel_selector, self.matcher);
        Ok(ImageData {
            width: info.geometry.width,
            height: info.geometry.height,
            channels,
            layers: vec![String::new()],
            info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EncodeRequest;
    use enough::Unstoppable;

    fn rgb_2x1() -> Vec<u8> {
        EncodeRequest::new()
            .encode(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6], 2, 1, 3, Unstoppable)
            .unwrap()
    }

    #[test]
    fn decodes_all_channels() {
        let image = DecodeRequest::new().decode(&rgb_2x1(), Unstoppable).unwrap();
        assert_eq!((image.width, image.height), (2, 1));
        let names: Vec<&str> = image.channels().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["R", "G", "B"]);
        assert_eq!(image.channel("G").unwrap().data(), &[0.2, 0.5]);
        assert_eq!(image.layers(), [String::new()]);
        assert!(!image.has_premultiplied_alpha());
    }

    #[test]
    fn selector_applies() {
        let image = DecodeRequest::new()
            .with_channel_selector("B,R")
            .decode(&rgb_2x1(), Unstoppable)
            .unwrap();
        let names: Vec<&str> = image.channels().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["B", "R"]);
        assert_eq!(image.interleaved().unwrap(), [0.3, 0.1, 0.6, 0.4]);
    }

    #[test]
    fn memory_limit_counts_raw_and_planes() {
        let data = rgb_2x1();
        // 6 samples: 24 raw bytes + 24 plane bytes.
        let tight = Limits {
            max_memory_bytes: Some(47),
            ..Default::default()
        };
        assert!(matches!(
            DecodeRequest::new().with_limits(&tight).decode(&data, Unstoppable),
            Err(NpyError::LimitExceeded(_))
        ));
        let enough_mem = Limits {
            max_memory_bytes: Some(48),
            ..Default::default()
        };
        assert!(
            DecodeRequest::new()
                .with_limits(&enough_mem)
                .decode(&data, Unstoppable)
                .is_ok()
        );
    }
}
