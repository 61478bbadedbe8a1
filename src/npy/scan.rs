//! Byte-level scanning of the header dictionary line.
//!
//! The dictionary is located by key search and fixed offsets from each key,
//! the same way numpy's own writers lay it out (`{'descr': '<f4', ...}`).

use alloc::vec::Vec;

/// Scanner over the first header line (preamble included, newline excluded).
pub(crate) struct HeaderScanner<'a> {
    line: &'a [u8],
}

impl<'a> HeaderScanner<'a> {
    pub(crate) fn new(line: &'a [u8]) -> Self {
        Self { line }
    }

    /// Position of the first occurrence of `key`.
    pub(crate) fn find(&self, key: &str) -> Option<usize> {
        find_bytes(self.line, key.as_bytes())
    }

    pub(crate) fn byte_at(&self, pos: usize) -> Option<u8> {
        self.line.get(pos).copied()
    }

    /// Whether the bytes at `pos` start with `literal`. Short lines never match.
    pub(crate) fn starts_with_at(&self, pos: usize, literal: &str) -> bool {
        self.line
            .get(pos..)
            .is_some_and(|rest| rest.starts_with(literal.as_bytes()))
    }

    /// Contents of the first parenthesized group, without the parentheses.
    pub(crate) fn tuple(&self) -> Option<&'a [u8]> {
        let open = self.line.iter().position(|&b| b == b'(')?;
        let inner = &self.line[open + 1..];
        let close = inner.iter().position(|&b| b == b')')?;
        Some(&inner[..close])
    }
}

/// Every maximal run of ASCII digits, in order. Runs that overflow `u64`
/// saturate so that geometry validation rejects them as too large.
pub(crate) fn digit_runs(text: &[u8]) -> Vec<u64> {
    let mut out = Vec::new();
    let mut current: Option<u64> = None;
    for &b in text {
        if b.is_ascii_digit() {
            let digit = u64::from(b - b'0');
            let acc = current.unwrap_or(0);
            current = Some(
                acc.checked_mul(10)
                    .and_then(|v| v.checked_add(digit))
                    .unwrap_or(u64::MAX),
            );
        } else if let Some(value) = current.take() {
            out.push(value);
        }
    }
    if let Some(value) = current {
        out.push(value);
    }
    out
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
