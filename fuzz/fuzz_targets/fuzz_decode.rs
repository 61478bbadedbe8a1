#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Sniffing, header parsing and decoding must never panic
    let _ = zennpy::is_npy(data);
    let _ = zennpy::NpyInfo::from_bytes(data);
    let _ = zennpy::decode(data, enough::Unstoppable);

    // Reader path must agree with the slice path on the sniff and restore position
    let mut cursor = std::io::Cursor::new(data);
    assert_eq!(zennpy::probe_reader(&mut cursor), zennpy::is_npy(data));
    assert_eq!(cursor.position(), 0);
    let _ = zennpy::DecodeRequest::new().decode_reader(&mut cursor, enough::Unstoppable);
});
