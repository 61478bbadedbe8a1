//! Channel planes and channel selection.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// One decoded channel: a dense row-major `f32` plane.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelPlane {
    name: String,
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl ChannelPlane {
    /// Create a plane. `data.len()` must equal `width * height`.
    pub fn new(name: impl Into<String>, width: u32, height: u32, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        Self {
            name: name.into(),
            width,
            height,
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major samples.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Sample at column `x`, row `y`.
    pub fn at(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Zero-copy 2D view of the plane.
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, f32> {
        imgref::ImgRef::new(&self.data, self.width as usize, self.height as usize)
    }
}

/// Names given to decoded channels, by channel count.
///
/// 1 → `L`; 2 → `L`, `A`; 3 → `R`, `G`, `B`; 4 → `R`, `G`, `B`, `A`.
pub fn channel_names(channels: u32) -> Vec<String> {
    let names: &[&str] = match channels {
        1 => &["L"],
        2 => &["L", "A"],
        3 => &["R", "G", "B"],
        4 => &["R", "G", "B", "A"],
        n => return (0..n).map(|i| i.to_string()).collect(),
    };
    names.iter().map(|s| s.to_string()).collect()
}

/// Scores a channel name against a user-supplied selector pattern.
///
/// Lower ranks sort first. `None` drops the channel.
pub trait ChannelMatcher {
    fn match_rank(&self, name: &str, pattern: &str) -> Option<usize>;
}

/// Comma-separated, case-insensitive substring matching.
///
/// An empty pattern matches everything with rank 0. Otherwise the rank is the
/// index of the first term contained in the channel name, so `"B,G,R"`
/// reorders an RGB image to BGR.
#[derive(Clone, Copy, Debug, Default)]
pub struct FuzzyMatcher;

impl ChannelMatcher for FuzzyMatcher {
    fn match_rank(&self, name: &str, pattern: &str) -> Option<usize> {
        if pattern.is_empty() {
            return Some(0);
        }
        let name = name.to_lowercase();
        pattern
            .split(',')
            .map(str::trim)
            .position(|term| !term.is_empty() && name.contains(&term.to_lowercase()))
    }
}

/// Keep the planes matching `pattern`, ordered by `(rank, original index)`.
///
/// An empty pattern keeps the original order.
pub fn select_channels(
    planes: Vec<ChannelPlane>,
    pattern: &str,
    matcher: &dyn ChannelMatcher,
) -> Vec<ChannelPlane> {
    let mut ranked: Vec<(usize, usize)> = planes
        .iter()
        .enumerate()
        .filter_map(|(i, plane)| matcher.match_rank(plane.name(), pattern).map(|r| (r, i)))
        .collect();
    if !pattern.is_empty() {
        ranked.sort_unstable();
    }

    let mut slots: Vec<Option<ChannelPlane>> = planes.into_iter().map(Some).collect();
    let selected: Vec<ChannelPlane> = ranked
        .into_iter()
        .filter_map(|(_, i)| slots[i].take())
        .collect();
    log::trace!(
        "channel selector {pattern:?}: kept {:?}",
        selected.iter().map(ChannelPlane::name).collect::<Vec<_>>()
    );
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn planes(names: &[&str]) -> Vec<ChannelPlane> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| ChannelPlane::new(*n, 1, 1, vec![i as f32]))
            .collect()
    }

    fn names(planes: &[ChannelPlane]) -> Vec<&str> {
        planes.iter().map(ChannelPlane::name).collect()
    }

    struct OnlyIndexOne;

    impl ChannelMatcher for OnlyIndexOne {
        fn match_rank(&self, name: &str, _pattern: &str) -> Option<usize> {
            (name == "G").then_some(0)
        }
    }

    #[test]
    fn empty_pattern_keeps_order() {
        let out = select_channels(planes(&["R", "G", "B"]), "", &FuzzyMatcher);
        assert_eq!(names(&out), ["R", "G", "B"]);
    }

    #[test]
    fn single_match() {
        let out = select_channels(planes(&["R", "G", "B"]), "g", &OnlyIndexOne);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name(), "G");
        assert_eq!(out[0].data(), &[1.0]);
    }

    #[test]
    fn pattern_reorders_by_rank() {
        let out = select_channels(planes(&["R", "G", "B", "A"]), "b,g,r", &FuzzyMatcher);
        assert_eq!(names(&out), ["B", "G", "R"]);
    }

    #[test]
    fn equal_ranks_keep_original_order() {
        let out = select_channels(
            planes(&["depth.z", "normal.x", "depth.y"]),
            "depth",
            &FuzzyMatcher,
        );
        assert_eq!(names(&out), ["depth.z", "depth.y"]);
    }

    #[test]
    fn empty_input() {
        assert!(select_channels(Vec::new(), "", &FuzzyMatcher).is_empty());
        assert!(select_channels(Vec::new(), "R", &FuzzyMatcher).is_empty());
    }

    #[test]
    fn fuzzy_matcher_ranks() {
        let m = FuzzyMatcher;
        assert_eq!(m.match_rank("R", ""), Some(0));
        assert_eq!(m.match_rank("R", "g, r"), Some(1));
        assert_eq!(m.match_rank("R", "g,,"), None);
        assert_eq!(m.match_rank("Normal.X", "normal"), Some(0));
    }

    #[test]
    fn default_names() {
        assert_eq!(channel_names(1), ["L"]);
        assert_eq!(channel_names(2), ["L", "A"]);
        assert_eq!(channel_names(3), ["R", "G", "B"]);
        assert_eq!(channel_names(4), ["R", "G", "B", "A"]);
    }

    #[test]
    fn plane_indexing() {
        let plane = ChannelPlane::new("L", 2, 2, vec![0.0, 0.25, 0.5, 1.0]);
        assert_eq!(plane.at(1, 0), Some(0.25));
        assert_eq!(plane.at(0, 1), Some(0.5));
        assert_eq!(plane.at(2, 0), None);
    }
}
