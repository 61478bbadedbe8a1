//! Header dictionary parsing and construction.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use super::scan::{HeaderScanner, digit_runs};
use super::{MAGIC, PREAMBLE_LEN, split_header_line};
use crate::error::NpyError;
use crate::info::{ElementKind, FormatDescriptor, ImageGeometry, NpyInfo};

// Offsets from the start of each key to its value in `{'key': value` layout.
const DESCR_VALUE_OFFSET: usize = 9;
const FORTRAN_VALUE_OFFSET: usize = 16;

/// Parse the header line of `data` into a descriptor and geometry.
pub(crate) fn parse_header(data: &[u8]) -> Result<NpyInfo, NpyError> {
    let (line, data_offset) = split_header_line(data);
    if !super::is_magic_line(line) {
        return Err(NpyError::BadMagic);
    }
    let scan = HeaderScanner::new(line);

    let descr = scan.find("descr").ok_or(NpyError::MissingField("descr"))?;
    let value = |i: usize| {
        scan.byte_at(descr + DESCR_VALUE_OFFSET + i)
            .ok_or(NpyError::MissingField("descr"))
    };
    let (order, kind_code, size_code) = (value(0)?, value(1)?, value(2)?);

    if !matches!(order, b'<' | b'|') {
        return Err(NpyError::UnsupportedByteOrder);
    }
    let unsupported = || {
        let text = String::from_utf8_lossy(&[order, kind_code, size_code]).into_owned();
        NpyError::UnsupportedElementType(text)
    };
    let element_kind = ElementKind::from_code(kind_code).ok_or_else(unsupported)?;
    let element_size = match size_code {
        b'1' => 1,
        b'2' => 2,
        b'4' => 4,
        _ => return Err(unsupported()),
    };

    let fortran = scan
        .find("fortran_order")
        .ok_or(NpyError::MissingField("fortran_order"))?;
    if scan.starts_with_at(fortran + FORTRAN_VALUE_OFFSET, "True") {
        return Err(NpyError::UnsupportedMemoryOrder);
    }

    let shape = digit_runs(scan.tuple().ok_or(NpyError::MissingField("shape"))?);
    let geometry = ImageGeometry::from_shape(&shape)?;

    let descriptor = FormatDescriptor {
        element_kind,
        element_size,
        little_endian: true,
        fortran_order: false,
        shape,
    };
    log::debug!(
        "npy header: descr={} shape={:?} -> {}x{}, {} channel(s)",
        descriptor.descr(),
        descriptor.shape,
        geometry.width,
        geometry.height,
        geometry.channels
    );

    Ok(NpyInfo {
        descriptor,
        geometry,
        data_offset,
    })
}

/// `<` on little-endian hosts, `>` on big-endian hosts.
pub(crate) fn native_endian_marker() -> char {
    if cfg!(target_endian = "little") {
        '<'
    } else {
        '>'
    }
}

/// Build the preamble and padded dictionary for a float32 C-order image.
///
/// The shape is written as `(height, width, channels)`, the order
/// [`parse_header`] reads it back in.
pub(crate) fn build_header(width: u32, height: u32, channels: u32) -> Vec<u8> {
    let mut dict = format!(
        "{{'descr': '{}f{}', 'fortran_order': False, 'shape': ({},{},{}),}}",
        native_endian_marker(),
        core::mem::size_of::<f32>(),
        height,
        width,
        channels
    )
    .into_bytes();

    // Pad so preamble + dict is a multiple of 16, ending in a newline.
    let pad = 16 - (PREAMBLE_LEN + dict.len()) % 16;
    dict.resize(dict.len() + pad, b' ');
    if let Some(last) = dict.last_mut() {
        *last = b'\n';
    }

    // A u32 shape keeps the dictionary far below u16::MAX bytes.
    let dict_len = dict.len() as u16;

    let mut out = Vec::with_capacity(PREAMBLE_LEN + dict.len());
    out.extend_from_slice(&MAGIC);
    out.push(0x01); // major version
    out.push(0x00); // minor version
    out.extend_from_slice(&dict_len.to_be_bytes());
    out.extend_from_slice(&dict);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn with_dict(dict: &str) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&[1, 0]);
        out.extend_from_slice(&(dict.len() as u16 + 1).to_be_bytes());
        out.extend_from_slice(dict.as_bytes());
        out.push(b'\n');
        out
    }

    #[test]
    fn parses_numpy_style_header() {
        let data = with_dict("{'descr': '<f4', 'fortran_order': False, 'shape': (3, 5, 2), }");
        let info = parse_header(&data).unwrap();
        assert_eq!(info.descriptor.element_kind, ElementKind::Float);
        assert_eq!(info.descriptor.element_size, 4);
        assert_eq!(info.descriptor.shape, vec![3, 5, 2]);
        assert_eq!(info.geometry, ImageGeometry::new(5, 3, 2));
        assert_eq!(info.data_offset, data.len());
    }

    #[test]
    fn pipe_order_is_little_endian() {
        let data = with_dict("{'descr': '|u1', 'fortran_order': False, 'shape': (2, 2), }");
        let info = parse_header(&data).unwrap();
        assert_eq!(info.descriptor.element_kind, ElementKind::UnsignedInt);
        assert_eq!(info.descriptor.element_size, 1);
        assert!(info.descriptor.little_endian);
    }

    #[test]
    fn bad_magic() {
        let mut data = with_dict("{'descr': '<f4', 'fortran_order': False, 'shape': (2, 2), }");
        data[0] = b'X';
        assert!(matches!(parse_header(&data), Err(NpyError::BadMagic)));
        assert!(matches!(parse_header(b""), Err(NpyError::BadMagic)));
        assert!(matches!(parse_header(b"\x93NUMPY\n"), Err(NpyError::BadMagic)));
    }

    #[test]
    fn missing_descr() {
        let data = with_dict("{'fortran_order': False, 'shape': (2, 2), }");
        assert!(matches!(
            parse_header(&data),
            Err(NpyError::MissingField("descr"))
        ));
    }

    #[test]
    fn truncated_descr_value() {
        let data = with_dict("{'descr'");
        assert!(matches!(
            parse_header(&data),
            Err(NpyError::MissingField("descr"))
        ));
    }

    #[test]
    fn big_endian_rejected() {
        let data = with_dict("{'descr': '>f4', 'fortran_order': False, 'shape': (2, 2), }");
        assert!(matches!(
            parse_header(&data),
            Err(NpyError::UnsupportedByteOrder)
        ));
    }

    #[test]
    fn unknown_kind_and_size_rejected() {
        let data = with_dict("{'descr': '<i4', 'fortran_order': False, 'shape': (2, 2), }");
        assert!(matches!(
            parse_header(&data),
            Err(NpyError::UnsupportedElementType(ref s)) if s == "<i4"
        ));
        let data = with_dict("{'descr': '<f8', 'fortran_order': False, 'shape': (2, 2), }");
        assert!(matches!(
            parse_header(&data),
            Err(NpyError::UnsupportedElementType(_))
        ));
    }

    #[test]
    fn missing_fortran_order() {
        let data = with_dict("{'descr': '<f4', 'shape': (2, 2), }");
        assert!(matches!(
            parse_header(&data),
            Err(NpyError::MissingField("fortran_order"))
        ));
    }

    #[test]
    fn fortran_order_rejected() {
        let data = with_dict("{'descr': '<f4', 'fortran_order': True, 'shape': (2, 2), }");
        assert!(matches!(
            parse_header(&data),
            Err(NpyError::UnsupportedMemoryOrder)
        ));
    }

    #[test]
    fn missing_shape() {
        let data = with_dict("{'descr': '<f4', 'fortran_order': False, 'shape': [2, 2], }");
        assert!(matches!(
            parse_header(&data),
            Err(NpyError::MissingField("shape"))
        ));
    }

    #[test]
    fn rank_and_channel_checks() {
        let data = with_dict("{'descr': '<f4', 'fortran_order': False, 'shape': (16,), }");
        assert!(matches!(
            parse_header(&data),
            Err(NpyError::UnsupportedRank(1))
        ));
        let data =
            with_dict("{'descr': '<f4', 'fortran_order': False, 'shape': (1, 2, 2, 2, 1), }");
        assert!(matches!(
            parse_header(&data),
            Err(NpyError::UnsupportedRank(5))
        ));
        let data = with_dict("{'descr': '<f4', 'fortran_order': False, 'shape': (2, 2, 5), }");
        assert!(matches!(
            parse_header(&data),
            Err(NpyError::TooManyChannels(5))
        ));
    }

    #[test]
    fn built_header_is_aligned() {
        for (w, h, c) in [(1, 1, 1), (640, 480, 3), (u32::MAX, u32::MAX, 4), (7, 3, 2)] {
            let header = build_header(w, h, c);
            assert_eq!(header.len() % 16, 0, "{w}x{h}x{c}");
            assert_eq!(header.last(), Some(&b'\n'));
            assert_eq!(&header[..6], &MAGIC);
            assert_eq!(&header[6..8], &[1, 0]);
            let dict_len = u16::from_be_bytes([header[8], header[9]]) as usize;
            assert_eq!(dict_len + PREAMBLE_LEN, header.len());
        }
    }

    #[test]
    fn built_header_text() {
        let header = build_header(4, 3, 2);
        let dict = core::str::from_utf8(&header[PREAMBLE_LEN..]).unwrap();
        let expected = format!(
            "{{'descr': '{}f4', 'fortran_order': False, 'shape': (3,4,2),}}",
            native_endian_marker()
        );
        assert!(dict.starts_with(&expected));
        assert!(dict[expected.len()..].trim_end_matches('\n').bytes().all(|b| b == b' '));
    }

    #[test]
    fn built_header_parses_back() {
        let header = build_header(9, 5, 3);
        let info = parse_header(&header).unwrap();
        assert_eq!(info.geometry, ImageGeometry::new(9, 5, 3));
        assert_eq!(info.data_offset, header.len());
    }
}
