//! NumPy `.npy` format internals.
//!
//! Layout: `\x93NUMPY`, major and minor version bytes, a big-endian u16
//! dictionary length, then a Python-literal dictionary with `descr`,
//! `fortran_order` and `shape`, padded with spaces and terminated by `\n`
//! so the whole header is 16-byte aligned. Raw C-order element data follows.

pub(crate) mod header;
pub(crate) mod pixels;
mod scan;

/// `\x93NUMPY` magic prefix.
pub(crate) const MAGIC: [u8; 6] = *b"\x93NUMPY";

/// Magic + version + dictionary length.
pub(crate) const PREAMBLE_LEN: usize = 10;

/// Longest header line a version 1 file can have.
pub(crate) const MAX_HEADER_LINE: usize = PREAMBLE_LEN + u16::MAX as usize;

/// Split off the first `\n`-terminated line. Returns the line (without the
/// newline) and the offset just past it. Without a newline the whole input is
/// the line.
pub(crate) fn split_header_line(data: &[u8]) -> (&[u8], usize) {
    match data.iter().position(|&b| b == b'\n') {
        Some(nl) => (&data[..nl], nl + 1),
        None => (data, data.len()),
    }
}

pub(crate) fn is_magic_line(line: &[u8]) -> bool {
    line.len() >= PREAMBLE_LEN && line[0] == MAGIC[0] && &line[1..6] == b"NUMPY"
}

/// Cheap check for the `.npy` magic prefix on the first header line.
///
/// Never fails; anything that is not an `.npy` header yields `false`.
pub fn is_npy(data: &[u8]) -> bool {
    let (line, _) = split_header_line(data);
    is_magic_line(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_line() {
        assert_eq!(split_header_line(b"abc\ndef"), (&b"abc"[..], 4));
        assert_eq!(split_header_line(b"abc"), (&b"abc"[..], 3));
        assert_eq!(split_header_line(b""), (&b""[..], 0));
    }

    #[test]
    fn sniff() {
        assert!(is_npy(b"\x93NUMPY\x01\x00\x76\x00{'descr'\n"));
        assert!(is_npy(b"\x93NUMPY\x01\x00\x76\x00"));
        // Line shorter than the preamble.
        assert!(!is_npy(b"\x93NUMPY\x01\n"));
        assert!(!is_npy(b"\x94NUMPY\x01\x00\x76\x00{}\n"));
        assert!(!is_npy(b"\x93NUMPX\x01\x00\x76\x00{}\n"));
        assert!(!is_npy(b""));
        assert!(!is_npy(b"P6\n1 1\n255\n"));
    }
}
