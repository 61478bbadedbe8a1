//! # zennpy
//!
//! NumPy `.npy` image codec: sniff, decode to float channel planes, encode
//! float images.
//!
//! ## Supported Arrays
//!
//! - **Element types**: `<f4` (float32), `<f2` (float16, widened), `|u1`
//!   (uint8, normalized to `0.0..=1.0`)
//! - **Shapes**: `(H, W)`, `(H, W, C)` and `(N, H, W, C)` with 1 to 4 channels;
//!   for batched arrays only the first image is decoded
//! - **Order**: C (row-major), little-endian
//!
//! Encoding always writes native-endian float32, C order, shape `(H, W, C)`.
//!
//! ## Non-Goals
//!
//! - Fortran-ordered or big-endian arrays
//! - Integer types other than `u1`, float64, complex or structured dtypes
//! - `.npz` archives
//!
//! ## Usage
//!
//! ```no_run
//! use zennpy::{DecodeRequest, EncodeRequest, NpyInfo, Unstoppable};
//!
//! let data: &[u8] = &[]; // your .npy bytes
//!
//! // Probe without decoding
//! let info = NpyInfo::from_bytes(data)?;
//! println!("{}x{} x{} {}", info.width(), info.height(), info.channels(),
//!          info.descriptor.descr());
//!
//! // Decode, keeping only the red and green planes
//! let image = DecodeRequest::new()
//!     .with_channel_selector("R,G")
//!     .decode(data, Unstoppable)?;
//!
//! // Encode the selection back to .npy
//! let pixels = image.interleaved()?;
//! let encoded = EncodeRequest::new().encode(
//!     &pixels,
//!     image.width,
//!     image.height,
//!     image.channels().len() as u32,
//!     Unstoppable,
//! )?;
//! # Ok::<(), zennpy::NpyError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod channel;
mod codec;
mod decode;
mod encode;
mod error;
mod info;
mod limits;
mod npy;

#[cfg(feature = "std")]
mod io;

// Re-exports
pub use channel::{ChannelMatcher, ChannelPlane, FuzzyMatcher, channel_names, select_channels};
pub use codec::{CodecRegistry, ImageCodec, NpyCodec};
pub use decode::{DecodeRequest, ImageData};
pub use encode::EncodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::NpyError;
pub use info::{ElementKind, FormatDescriptor, ImageGeometry, NpyInfo};
pub use limits::Limits;
pub use npy::is_npy;
pub use npy::pixels::interleave_planes;

#[cfg(feature = "std")]
pub use io::probe_reader;

/// Decode all channels of an `.npy` file with default settings.
pub fn decode(data: &[u8], stop: impl Stop) -> Result<ImageData, NpyError> {
    DecodeRequest::new().decode(data, stop)
}

/// Encode interleaved float pixels with default settings.
pub fn encode(
    pixels: &[f32],
    width: u32,
    height: u32,
    channels: u32,
    stop: impl Stop,
) -> Result<alloc::vec::Vec<u8>, NpyError> {
    EncodeRequest::new().encode(pixels, width, height, channels, stop)
}
