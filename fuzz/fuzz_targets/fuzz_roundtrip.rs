#![no_main]
use libfuzzer_sys::fuzz_target;
use zennpy::*;

fuzz_target!(|data: &[u8]| {
    // If we can decode it, re-encoding and decoding again must produce identical planes
    let Ok(decoded) = decode(data, enough::Unstoppable) else {
        return;
    };
    let Ok(pixels) = decoded.interleaved() else {
        return;
    };
    let channels = decoded.channels().len() as u32;

    let Ok(reencoded) = encode(
        &pixels, decoded.width, decoded.height, channels, enough::Unstoppable,
    ) else {
        panic!("decoded image failed to re-encode");
    };
    let Ok(decoded2) = decode(&reencoded, enough::Unstoppable) else {
        panic!("re-encoded data failed to decode");
    };

    assert_eq!(decoded.width, decoded2.width);
    assert_eq!(decoded.height, decoded2.height);
    // Compare bit patterns so NaN payloads count as equal
    let bits = |v: &[f32]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&pixels), bits(&decoded2.interleaved().unwrap()), "roundtrip pixel mismatch");
});
