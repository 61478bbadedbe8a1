//! Reader-based probing and decoding (`std` feature).
//!
//! Readers are read byte-by-byte up to the header newline, so wrap
//! unbuffered sources in a [`std::io::BufReader`].

use std::io::{self, Read, Seek, SeekFrom};

use enough::Stop;

use crate::decode::{DecodeRequest, ImageData};
use crate::error::NpyError;
use crate::npy::{self, MAX_HEADER_LINE, header};

const INITIAL_BODY_CAPACITY: usize = 1 << 20;

/// Read the first header line, newline included if present.
///
/// Gives up after [`MAX_HEADER_LINE`] bytes without a newline.
fn read_header_line<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut line = Vec::with_capacity(128);
    for byte in reader.by_ref().take(MAX_HEADER_LINE as u64 + 1).bytes() {
        let byte = byte?;
        line.push(byte);
        if byte == b'\n' {
            break;
        }
    }
    Ok(line)
}

/// Check whether `reader` starts with an `.npy` header.
///
/// The reader is returned to the position it started at, whatever the
/// outcome. I/O failures count as "not npy".
pub fn probe_reader<R: Read + Seek>(reader: &mut R) -> bool {
    let Ok(start) = reader.stream_position() else {
        return false;
    };
    let line = read_header_line(reader);
    let restored = reader.seek(SeekFrom::Start(start)).is_ok();
    restored && line.is_ok_and(|line| npy::is_npy(&line))
}

impl DecodeRequest<'_> {
    /// Decode from a reader positioned at the start of an `.npy` stream.
    ///
    /// Consumes the header line and exactly the declared data bytes.
    pub fn decode_reader<R: Read>(
        &self,
        reader: &mut R,
        stop: impl Stop,
    ) -> Result<ImageData, NpyError> {
        let line = read_header_line(reader)?;
        let info = header::parse_header(&line)?;
        self.check_limits(&info)?;

        let needed = npy::pixels::data_len(&info.descriptor, &info.geometry)?;
        // The shape is untrusted; grow with the bytes actually read.
        let mut body = Vec::with_capacity(needed.min(INITIAL_BODY_CAPACITY));
        reader.by_ref().take(needed as u64).read_to_end(&mut body)?;
        if body.len() < needed {
            return Err(NpyError::TruncatedData {
                needed,
                actual: body.len(),
            });
        }
        self.decode_body(info, &body, &stop)
    }
}
