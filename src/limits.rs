use crate::error::NpyError;
use crate::info::ImageGeometry;

/// Resource limits for decode/encode operations.
///
/// All fields default to `None` (no limit). Limits are checked against the
/// header before anything is allocated.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height), channels not included.
    pub max_pixels: Option<u64>,
    /// Maximum bytes a single call may hold at once.
    ///
    /// Decoding counts the raw element data plus the `f32` channel planes.
    /// Encoding counts the float payload.
    pub max_memory_bytes: Option<u64>,
}

/// What a [`Limits::check_memory`] figure measures, for the error message.
#[derive(Clone, Copy, Debug)]
pub(crate) enum MemoryUse {
    /// Raw element data plus decoded planes.
    Decode,
    /// Encoded float payload.
    Encode,
}

impl MemoryUse {
    fn describe(self) -> &'static str {
        match self {
            Self::Decode => "raw data plus f32 planes",
            Self::Encode => "f32 payload",
        }
    }
}

impl Limits {
    /// Check image dimensions.
    pub(crate) fn check(&self, geom: &ImageGeometry) -> Result<(), NpyError> {
        let exceeds = |what: &str, value: u64, max: Option<u64>| match max {
            Some(max) if value > max => Err(NpyError::LimitExceeded(alloc::format!(
                "{what} {value} exceeds limit {max}"
            ))),
            _ => Ok(()),
        };
        exceeds("width", u64::from(geom.width), self.max_width)?;
        exceeds("height", u64::from(geom.height), self.max_height)?;
        let pixels = u64::from(geom.width) * u64::from(geom.height);
        exceeds("pixel count", pixels, self.max_pixels)
    }

    /// Check the byte total one call will hold.
    pub(crate) fn check_memory(&self, bytes: usize, usage: MemoryUse) -> Result<(), NpyError> {
        match self.max_memory_bytes {
            Some(max_mem) if bytes as u64 > max_mem => Err(NpyError::LimitExceeded(
                alloc::format!(
                    "{bytes} bytes of {} exceeds memory limit {max_mem}",
                    usage.describe()
                ),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn default_is_unlimited() {
        let limits = Limits::default();
        let huge = ImageGeometry::new(u32::MAX, u32::MAX, 4);
        assert!(limits.check(&huge).is_ok());
        assert!(limits.check_memory(usize::MAX, MemoryUse::Decode).is_ok());
    }

    #[test]
    fn width_and_pixel_limits() {
        let limits = Limits {
            max_width: Some(100),
            max_pixels: Some(1000),
            ..Default::default()
        };
        assert!(limits.check(&ImageGeometry::new(100, 10, 4)).is_ok());
        assert!(matches!(
            limits.check(&ImageGeometry::new(101, 1, 1)),
            Err(NpyError::LimitExceeded(_))
        ));
        assert!(matches!(
            limits.check(&ImageGeometry::new(50, 21, 1)),
            Err(NpyError::LimitExceeded(_))
        ));
    }

    #[test]
    fn memory_limit_names_usage() {
        let limits = Limits {
            max_memory_bytes: Some(4096),
            ..Default::default()
        };
        assert!(limits.check_memory(4096, MemoryUse::Decode).is_ok());
        let err = limits.check_memory(4097, MemoryUse::Decode).unwrap_err();
        assert!(err.to_string().contains("raw data plus f32 planes"));
        let err = limits.check_memory(4097, MemoryUse::Encode).unwrap_err();
        assert!(err.to_string().contains("f32 payload"));
    }
}
