//! Load/save contract for host image pipelines.
//!
//! The host keeps a [`CodecRegistry`] of boxed [`ImageCodec`]s, probes them in
//! order to pick a loader, and matches file extensions to pick a saver.

use alloc::boxed::Box;
use alloc::vec::Vec;
use enough::Unstoppable;

use crate::decode::{DecodeRequest, ImageData};
use crate::encode::EncodeRequest;
use crate::error::NpyError;

/// Capabilities a format plugs into the host with.
pub trait ImageCodec: Send + Sync {
    /// Human-readable format name.
    fn name(&self) -> &'static str;

    /// Cheap magic-byte check. Must not fail.
    fn can_load(&self, data: &[u8]) -> bool;

    /// Decode `data`, keeping the channels matched by `channel_selector`.
    ///
    /// `path` is informational only.
    fn load(
        &self,
        data: &[u8],
        path: &str,
        channel_selector: &str,
    ) -> Result<ImageData, NpyError>;

    /// Whether files with this extension (no dot) are written by this codec.
    fn can_save(&self, extension: &str) -> bool;

    /// Encode interleaved float pixels.
    fn save(
        &self,
        path: &str,
        pixels: &[f32],
        width: u32,
        height: u32,
        channels: u32,
    ) -> Result<Vec<u8>, NpyError>;

    fn has_premultiplied_alpha(&self) -> bool {
        false
    }
}

/// The `.npy` codec.
#[derive(Clone, Copy, Debug, Default)]
pub struct NpyCodec;

impl ImageCodec for NpyCodec {
    fn name(&self) -> &'static str {
        "Numpy"
    }

    fn can_load(&self, data: &[u8]) -> bool {
        crate::npy::is_npy(data)
    }

    fn load(
        &self,
        data: &[u8],
        path: &str,
        channel_selector: &str,
    ) -> Result<ImageData, NpyError> {
        log::debug!("loading {path} as npy (selector {channel_selector:?})");
        DecodeRequest::new()
            .with_channel_selector(channel_selector)
            .decode(data, Unstoppable)
    }

    fn can_save(&self, extension: &str) -> bool {
        extension.eq_ignore_ascii_case("npy")
    }

    fn save(
        &self,
        path: &str,
        pixels: &[f32],
        width: u32,
        height: u32,
        channels: u32,
    ) -> Result<Vec<u8>, NpyError> {
        log::debug!("saving {path} as npy ({width}x{height}, {channels} channel(s))");
        EncodeRequest::new().encode(pixels, width, height, channels, Unstoppable)
    }
}

/// Ordered set of codecs.
pub struct CodecRegistry {
    codecs: Vec<Box<dyn ImageCodec>>,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecRegistry {
    /// Registry with the built-in [`NpyCodec`].
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(NpyCodec));
        registry
    }

    pub fn empty() -> Self {
        Self { codecs: Vec::new() }
    }

    /// Append a codec. Earlier codecs are probed first.
    pub fn register(&mut self, codec: Box<dyn ImageCodec>) {
        self.codecs.push(codec);
    }

    pub fn codecs(&self) -> &[Box<dyn ImageCodec>] {
        &self.codecs
    }

    /// First codec whose magic check accepts `data`.
    pub fn find_loader(&self, data: &[u8]) -> Option<&dyn ImageCodec> {
        self.codecs
            .iter()
            .find(|c| c.can_load(data))
            .map(|c| c.as_ref())
    }

    /// First codec that saves files with `extension`. A leading dot is ignored.
    pub fn find_saver(&self, extension: &str) -> Option<&dyn ImageCodec> {
        let extension = extension.strip_prefix('.').unwrap_or(extension);
        self.codecs
            .iter()
            .find(|c| c.can_save(extension))
            .map(|c| c.as_ref())
    }
}
