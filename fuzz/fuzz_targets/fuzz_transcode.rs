#![no_main]
use std::io::Cursor;

use bmtobmp::*;
use libfuzzer_sys::fuzz_target;

// Input: [flags u8][palette length u16 LE][palette bytes][BM bytes]
fuzz_target!(|data: &[u8]| {
    let Some((&flags, rest)) = data.split_first() else {
        return;
    };
    if rest.len() < 2 {
        return;
    }
    let pal_len = u16::from_le_bytes([rest[0], rest[1]]) as usize % (raster::PALETTE_SIZE_IN_BYTES + 1);
    let pal_len = pal_len.min(rest.len() - 2);
    let (pal, bm) = rest[2..].split_at(pal_len);

    let layout = if flags & 1 == 0 {
        BmLayout::Compact
    } else {
        BmLayout::Reserved
    };
    let options = ConvertOptions::new()
        .with_layout(layout)
        .with_palette_cache(flags & 2 == 0)
        .with_limits(Limits {
            max_memory_bytes: Some(16 << 20),
            ..Default::default()
        })
        .with_diagnostics(&Silent);

    let mut out = Vec::new();
    let Ok(size) = transcode(
        &mut Cursor::new(bm),
        &mut Cursor::new(pal),
        &mut out,
        &options,
        enough::Unstoppable,
    ) else {
        return;
    };

    // Every successful output must be self-consistent.
    assert_eq!(size as usize, out.len());
    assert_eq!(&out[0..2], b"BM");
    assert_eq!(u32::from_le_bytes(out[2..6].try_into().unwrap()), size);
    let width = u32::from_le_bytes(out[18..22].try_into().unwrap()) as usize;
    let height = u32::from_le_bytes(out[22..26].try_into().unwrap()) as usize;
    let stride = (width * 3).div_ceil(4) * 4;
    assert_eq!(out.len(), 54 + stride * height);
});
