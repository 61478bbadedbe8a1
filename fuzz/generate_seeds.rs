#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn npy(dict: &str, body: &[u8]) -> Vec<u8> {
    let mut header = dict.as_bytes().to_vec();
    let padded = (10 + header.len() + 1).div_ceil(64) * 64;
    header.resize(padded - 11, b' ');
    header.push(b'\n');
    let mut out = b"\x93NUMPY\x01\x00".to_vec();
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(&header);
    out.extend_from_slice(body);
    out
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // f4 2x2 gray
    let f4: Vec<u8> = [0.0f32, 0.25, 0.5, 1.0].iter().flat_map(|v| v.to_le_bytes()).collect();
    let seed = npy("{'descr': '<f4', 'fortran_order': False, 'shape': (2, 2), }", &f4);
    fs::write(format!("{dir}/f4_2x2.npy"), seed).unwrap();

    // u1 1x2 RGB
    let seed = npy("{'descr': '|u1', 'fortran_order': False, 'shape': (1, 2, 3), }", &[0, 64, 128, 192, 255, 7]);
    fs::write(format!("{dir}/u1_1x2_rgb.npy"), seed).unwrap();

    // f2 1x1 RGBA in a batch of one
    let seed = npy("{'descr': '<f2', 'fortran_order': False, 'shape': (1, 1, 1, 4), }", &[0, 0, 0, 0x38, 0, 0x3c, 0, 0xc0]);
    fs::write(format!("{dir}/f2_batch_rgba.npy"), seed).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_magic.bin"), b"\x93NUMPY").unwrap();
    fs::write(format!("{dir}/fortran.npy"), npy("{'descr': '<f4', 'fortran_order': True, 'shape': (1, 1), }", &[0; 4])).unwrap();
    fs::write(format!("{dir}/no_shape.npy"), npy("{'descr': '<f4', 'fortran_order': False, }", &[])).unwrap();

    println!("Generated seed corpus in {dir}/");
}
