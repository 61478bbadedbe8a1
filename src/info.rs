use alloc::vec::Vec;

use crate::error::NpyError;

/// Element kind from the `descr` type code.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `f`: IEEE-754 floating point.
    Float,
    /// `u`: unsigned integer.
    UnsignedInt,
}

impl ElementKind {
    pub(crate) fn from_code(code: u8) -> Option<Self> {
        match code {
            b'f' => Some(Self::Float),
            b'u' => Some(Self::UnsignedInt),
            _ => None,
        }
    }

    /// The numpy type character.
    pub fn code(self) -> char {
        match self {
            Self::Float => 'f',
            Self::UnsignedInt => 'u',
        }
    }
}

/// Typed view of an `.npy` header dictionary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub element_kind: ElementKind,
    /// Bytes per element: 1, 2 or 4.
    pub element_size: u8,
    pub little_endian: bool,
    pub fortran_order: bool,
    /// Array shape, 2 to 4 dimensions.
    pub shape: Vec<u64>,
}

impl FormatDescriptor {
    /// The `descr` string this descriptor corresponds to, e.g. `<f4`.
    ///
    /// Single-byte elements have no byte order and print as `|u1`, as numpy
    /// writes them.
    pub fn descr(&self) -> alloc::string::String {
        let order = match (self.element_size, self.little_endian) {
            (1, _) => '|',
            (_, true) => '<',
            (_, false) => '>',
        };
        alloc::format!("{order}{}{}", self.element_kind.code(), self.element_size)
    }
}

/// Image dimensions derived from an array shape.
///
/// Rank 2 is `(height, width)` with one channel, rank 3 is
/// `(height, width, channels)` and rank 4 is `(batch, height, width, channels)`
/// where only the first batch entry is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageGeometry {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl ImageGeometry {
    pub fn new(width: u32, height: u32, channels: u32) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    /// Derive the geometry from a shape.
    pub fn from_shape(shape: &[u64]) -> Result<Self, NpyError> {
        let (height, width, channels) = match *shape {
            [h, w] => (h, w, 1),
            [h, w, c] => (h, w, c),
            [_, h, w, c] => (h, w, c),
            _ => return Err(NpyError::UnsupportedRank(shape.len())),
        };
        if channels > 4 {
            return Err(NpyError::TooManyChannels(channels));
        }
        if width == 0 || height == 0 || channels == 0 {
            return Err(NpyError::ZeroDimension);
        }
        let too_large = NpyError::DimensionsTooLarge {
            width,
            height,
            channels,
        };
        let width = u32::try_from(width).map_err(|_| too_large)?;
        let height = u32::try_from(height).map_err(|_| NpyError::DimensionsTooLarge {
            width: u64::from(width),
            height,
            channels,
        })?;
        Ok(Self::new(width, height, channels as u32))
    }

    /// Pixel count (`width * height`).
    pub fn pixel_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// Total element count (`width * height * channels`).
    pub fn sample_count(&self) -> Option<usize> {
        self.pixel_count()?.checked_mul(self.channels as usize)
    }

    pub(crate) fn samples_or_err(&self) -> Result<usize, NpyError> {
        self.sample_count().ok_or(self.too_large())
    }

    pub(crate) fn too_large(&self) -> NpyError {
        NpyError::DimensionsTooLarge {
            width: u64::from(self.width),
            height: u64::from(self.height),
            channels: u64::from(self.channels),
        }
    }
}

/// Header information probed without decoding pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NpyInfo {
    pub descriptor: FormatDescriptor,
    pub geometry: ImageGeometry,
    /// Offset of the first data byte (just past the header line).
    pub data_offset: usize,
}

impl NpyInfo {
    /// Parse the header without touching the data region.
    pub fn from_bytes(data: &[u8]) -> Result<Self, NpyError> {
        crate::npy::header::parse_header(data)
    }

    pub fn width(&self) -> u32 {
        self.geometry.width
    }

    pub fn height(&self) -> u32 {
        self.geometry.height
    }

    pub fn channels(&self) -> u32 {
        self.geometry.channels
    }
}
