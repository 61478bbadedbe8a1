use alloc::vec::Vec;
use enough::Stop;

use crate::error::NpyError;
use crate::info::ImageGeometry;
use crate::limits::{Limits, MemoryUse};
use crate::npy::{header, pixels};

/// Encode configuration. Output is always little/native-endian float32,
/// C order, shape `(height, width, channels)`.
#[derive(Clone, Debug, Default)]
pub struct EncodeRequest<'a> {
    limits: Option<&'a Limits>,
}

impl<'a> EncodeRequest<'a> {
    pub fn new() -> Self {
        Self { limits: None }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Encode interleaved `[row][col][channel]` floats.
    ///
    /// `pixels.len()` must equal `width * height * channels`, and `channels`
    /// must be 1 to 4.
    pub fn encode(
        &self,
        pixels: &[f32],
        width: u32,
        height: u32,
        channels: u32,
        stop: impl Stop,
    ) -> Result<Vec<u8>, NpyError> {
        let geom = ImageGeometry::new(width, height, channels);
        self.check_limits(&geom)?;
        pixels::check_buffer(pixels, &geom)?;
        let header = header::build_header(width, height, channels);
        pixels::encode_f32(&header, pixels, &geom, &stop)
    }

    /// Encode typed RGB pixels (3 channels).
    #[cfg(feature = "rgb")]
    pub fn encode_rgb(
        &self,
        pixels: &[rgb::RGB<f32>],
        width: u32,
        height: u32,
        stop: impl Stop,
    ) -> Result<Vec<u8>, NpyError> {
        use rgb::ComponentSlice;
        self.encode(ComponentSlice::as_slice(pixels), width, height, 3, stop)
    }

    /// Encode typed RGBA pixels (4 channels, straight alpha).
    #[cfg(feature = "rgb")]
    pub fn encode_rgba(
        &self,
        pixels: &[rgb::RGBA<f32>],
        width: u32,
        height: u32,
        stop: impl Stop,
    ) -> Result<Vec<u8>, NpyError> {
        use rgb::ComponentSlice;
        self.encode(ComponentSlice::as_slice(pixels), width, height, 4, stop)
    }

    /// Stream the header and rows to `writer`.
    #[cfg(feature = "std")]
    pub fn encode_to<W: std::io::Write>(
        &self,
        writer: &mut W,
        pixels: &[f32],
        width: u32,
        height: u32,
        channels: u32,
        stop: impl Stop,
    ) -> Result<(), NpyError> {
        let geom = ImageGeometry::new(width, height, channels);
        self.check_limits(&geom)?;
        let row_len = pixels::check_buffer(pixels, &geom)?;
        writer.write_all(&header::build_header(width, height, channels))?;

        let mut row_bytes = Vec::with_capacity(row_len * 4);
        for (row_idx, row) in pixels.chunks_exact(row_len).enumerate() {
            if row_idx % 16 == 0 {
                stop.check()?;
            }
            row_bytes.clear();
            for v in row {
                row_bytes.extend_from_slice(&v.to_ne_bytes());
            }
            writer.write_all(&row_bytes)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn check_limits(&self, geom: &ImageGeometry) -> Result<(), NpyError> {
        if let Some(limits) = self.limits {
            limits.check(geom)?;
            let bytes = geom
                .samples_or_err()?
                .checked_mul(core::mem::size_of::<f32>())
                .ok_or(geom.too_large())?;
            limits.check_memory(bytes, MemoryUse::Encode)?;
        }
        Ok(())
    }
}
