#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn seed(flags: u8, pal: &[u8], bm: &[u8]) -> Vec<u8> {
    let mut out = vec![flags];
    out.extend_from_slice(&(pal.len() as u16).to_le_bytes());
    out.extend_from_slice(pal);
    out.extend_from_slice(bm);
    out
}

fn bm(width: u32, height: u32, reserved: bool, indices: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    if reserved {
        out.extend_from_slice(&[0; 4]);
    }
    out.extend_from_slice(indices);
    out
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_transcode";
    fs::create_dir_all(dir).unwrap();

    let gray: Vec<u8> = (0..=255u8).flat_map(|i| [i, i, i]).collect();

    // Full palette, 3x2 image
    fs::write(
        format!("{dir}/gray_3x2.bin"),
        seed(0, &gray, &bm(3, 2, false, &[0, 64, 128, 192, 255, 100])),
    )
    .unwrap();

    // Reserved header layout, uncached palette
    fs::write(
        format!("{dir}/reserved_1x1.bin"),
        seed(3, &gray, &bm(1, 1, true, &[7])),
    )
    .unwrap();

    // Empty image
    fs::write(format!("{dir}/empty_0x5.bin"), seed(0, &gray, &bm(0, 5, false, &[]))).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/short_palette.bin"), seed(0, &[1, 2, 3], &bm(2, 1, false, &[0, 1]))).unwrap();
    fs::write(format!("{dir}/short_indices.bin"), seed(0, &gray, &bm(4, 4, false, &[1; 5]))).unwrap();
    fs::write(format!("{dir}/short_header.bin"), seed(0, &gray, &[1, 0, 0])).unwrap();
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();

    println!("Generated seed corpus in {dir}/");
}
