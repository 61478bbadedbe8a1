//! Element conversion, row scatter into channel planes, and float encoding.

use alloc::vec;
use alloc::vec::Vec;
use enough::Stop;
use half::f16;

use crate::channel::{ChannelPlane, channel_names};
use crate::error::NpyError;
use crate::info::{ElementKind, FormatDescriptor, ImageGeometry};

/// Element encodings the decoder converts to normalized `f32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SampleFormat {
    F32,
    F16,
    U8,
}

impl SampleFormat {
    pub(crate) fn for_descriptor(desc: &FormatDescriptor) -> Result<Self, NpyError> {
        match (desc.element_kind, desc.element_size) {
            (ElementKind::Float, 4) => Ok(Self::F32),
            (ElementKind::Float, 2) => Ok(Self::F16),
            (ElementKind::UnsignedInt, 1) => Ok(Self::U8),
            _ => Err(NpyError::UnsupportedElementType(desc.descr())),
        }
    }

    pub(crate) fn size(self) -> usize {
        match self {
            Self::F32 => 4,
            Self::F16 => 2,
            Self::U8 => 1,
        }
    }

    /// Convert one little-endian element. `bytes.len() == self.size()`.
    #[inline]
    fn to_f32(self, bytes: &[u8]) -> f32 {
        match self {
            Self::F32 => f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            Self::F16 => f16::from_le_bytes([bytes[0], bytes[1]]).to_f32(),
            Self::U8 => f32::from(bytes[0]) / 255.0,
        }
    }
}

/// Number of raw bytes the data region must hold.
pub(crate) fn data_len(desc: &FormatDescriptor, geom: &ImageGeometry) -> Result<usize, NpyError> {
    geom.samples_or_err()?
        .checked_mul(usize::from(desc.element_size))
        .ok_or(geom.too_large())
}

/// Decode the data region into one plane per channel.
///
/// `body` starts at the first data byte; bytes past the declared size are
/// ignored.
pub(crate) fn decode_planes(
    body: &[u8],
    desc: &FormatDescriptor,
    geom: &ImageGeometry,
    parallel: bool,
    stop: &dyn Stop,
) -> Result<Vec<ChannelPlane>, NpyError> {
    let format = SampleFormat::for_descriptor(desc)?;
    let needed = data_len(desc, geom)?;
    let src = body.get(..needed).ok_or(NpyError::TruncatedData {
        needed,
        actual: body.len(),
    })?;

    let w = geom.width as usize;
    let h = geom.height as usize;
    let channels = geom.channels as usize;
    let row_bytes = w * channels * format.size();

    let mut planes: Vec<Vec<f32>> = (0..channels).map(|_| vec![0.0f32; w * h]).collect();
    {
        let mut rows = row_slices(&mut planes, w, h);
        stop.check()?;
        scatter_rows(src, row_bytes, &mut rows, format, parallel, stop)?;
    }
    stop.check()?;

    Ok(channel_names(geom.channels)
        .into_iter()
        .zip(planes)
        .map(|(name, data)| ChannelPlane::new(name, geom.width, geom.height, data))
        .collect())
}

/// Regroup plane rows so that `rows[y]` holds row `y` of every plane.
fn row_slices(planes: &mut [Vec<f32>], width: usize, height: usize) -> Vec<Vec<&mut [f32]>> {
    let mut rows: Vec<Vec<&mut [f32]>> = (0..height)
        .map(|_| Vec::with_capacity(planes.len()))
        .collect();
    for plane in planes.iter_mut() {
        for (row, dst) in plane.chunks_exact_mut(width).zip(rows.iter_mut()) {
            dst.push(row);
        }
    }
    rows
}

/// Deinterleave one `[col][channel]` source row into per-channel rows.
#[inline]
fn scatter_row(src: &[u8], dst: &mut [&mut [f32]], format: SampleFormat) {
    let size = format.size();
    let pixel_bytes = dst.len() * size;
    for (x, pixel) in src.chunks_exact(pixel_bytes).enumerate() {
        for (plane_row, sample) in dst.iter_mut().zip(pixel.chunks_exact(size)) {
            plane_row[x] = format.to_f32(sample);
        }
    }
}

#[cfg(feature = "rayon")]
fn scatter_rows(
    src: &[u8],
    row_bytes: usize,
    rows: &mut [Vec<&mut [f32]>],
    format: SampleFormat,
    parallel: bool,
    stop: &dyn Stop,
) -> Result<(), NpyError> {
    use rayon::prelude::*;

    if !parallel {
        return scatter_rows_sequential(src, row_bytes, rows, format, stop);
    }
    rows.par_iter_mut()
        .zip(src.par_chunks_exact(row_bytes))
        .for_each(|(dst, src_row)| scatter_row(src_row, dst, format));
    Ok(())
}

#[cfg(not(feature = "rayon"))]
fn scatter_rows(
    src: &[u8],
    row_bytes: usize,
    rows: &mut [Vec<&mut [f32]>],
    format: SampleFormat,
    _parallel: bool,
    stop: &dyn Stop,
) -> Result<(), NpyError> {
    scatter_rows_sequential(src, row_bytes, rows, format, stop)
}

fn scatter_rows_sequential(
    src: &[u8],
    row_bytes: usize,
    rows: &mut [Vec<&mut [f32]>],
    format: SampleFormat,
    stop: &dyn Stop,
) -> Result<(), NpyError> {
    let pairs = src.chunks_exact(row_bytes).zip(rows.iter_mut());
    for (row_idx, (src_row, dst)) in pairs.enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        scatter_row(src_row, dst, format);
    }
    Ok(())
}

/// Interleave planes back into a `[row][col][channel]` buffer.
///
/// All planes must share the same dimensions.
pub fn interleave_planes(planes: &[ChannelPlane]) -> Result<Vec<f32>, NpyError> {
    let Some(first) = planes.first() else {
        return Ok(Vec::new());
    };
    let pixel_count = first.data().len();
    if let Some(odd) = planes.iter().find(|p| p.data().len() != pixel_count) {
        return Err(NpyError::SizeMismatch {
            expected: pixel_count,
            actual: odd.data().len(),
        });
    }
    let mut out = Vec::with_capacity(pixel_count * planes.len());
    for i in 0..pixel_count {
        out.extend(planes.iter().map(|p| p.data()[i]));
    }
    Ok(out)
}

/// Encode `pixels` (`[row][col][channel]`, native endian) behind `header`.
pub(crate) fn encode_f32(
    header: &[u8],
    pixels: &[f32],
    geom: &ImageGeometry,
    stop: &dyn Stop,
) -> Result<Vec<u8>, NpyError> {
    let row_len = check_buffer(pixels, geom)?;
    let total = (pixels.len() * 4)
        .checked_add(header.len())
        .ok_or(geom.too_large())?;

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(header);
    for (row_idx, row) in pixels.chunks_exact(row_len).enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        for v in row {
            out.extend_from_slice(&v.to_ne_bytes());
        }
    }
    log::debug!(
        "npy encode: {}x{}x{} -> {} bytes",
        geom.width,
        geom.height,
        geom.channels,
        out.len()
    );
    Ok(out)
}

/// Validate an encode buffer against the geometry. Returns the row length in
/// samples.
pub(crate) fn check_buffer(pixels: &[f32], geom: &ImageGeometry) -> Result<usize, NpyError> {
    if geom.width == 0 || geom.height == 0 || geom.channels == 0 {
        return Err(NpyError::ZeroDimension);
    }
    if geom.channels > 4 {
        return Err(NpyError::TooManyChannels(u64::from(geom.channels)));
    }
    let expected = geom.samples_or_err()?;
    if pixels.len() != expected {
        return Err(NpyError::SizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(geom.width as usize * geom.channels as usize)
}
