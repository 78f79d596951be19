#![allow(dead_code)]

use std::io::Cursor;

/// Build a compact-layout BM stream.
pub fn bm(width: u32, height: u32, indices: &[u8]) -> Cursor<Vec<u8>> {
    let mut data = Vec::with_capacity(8 + indices.len());
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    data.extend_from_slice(indices);
    Cursor::new(data)
}

/// Full 256-entry palette where entry `i` is `(i, 255 - i, i ^ 0x5a)`.
pub fn palette() -> Cursor<Vec<u8>> {
    let data: Vec<u8> = (0..=255u8).flat_map(|i| [i, 255 - i, i ^ 0x5a]).collect();
    assert_eq!(data.len(), bmtobmp::raster::PALETTE_SIZE_IN_BYTES);
    Cursor::new(data)
}

/// BMP `(B, G, R)` cell expected for index `i` of [`palette`].
pub fn bgr(i: u8) -> [u8; 3] {
    [i ^ 0x5a, 255 - i, i]
}

pub fn noise_indices(len: usize) -> Vec<u8> {
    let mut state: u32 = 0xDEAD_BEEF;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

/// Fields of a 54-byte BMP header.
#[derive(Debug)]
pub struct BmpHeader {
    pub file_size: u32,
    pub reserved: u32,
    pub data_offset: u32,
    pub info_size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bpp: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_ppm: i32,
    pub y_ppm: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

pub fn parse_header(data: &[u8]) -> BmpHeader {
    assert!(data.len() >= 54, "BMP shorter than its header");
    assert_eq!(&data[0..2], b"BM");
    let u32_at = |off: usize| u32::from_le_bytes(data[off..off + 4].try_into().unwrap());
    let u16_at = |off: usize| u16::from_le_bytes(data[off..off + 2].try_into().unwrap());
    BmpHeader {
        file_size: u32_at(2),
        reserved: u32_at(6),
        data_offset: u32_at(10),
        info_size: u32_at(14),
        width: u32_at(18) as i32,
        height: u32_at(22) as i32,
        planes: u16_at(26),
        bpp: u16_at(28),
        compression: u32_at(30),
        image_size: u32_at(34),
        x_ppm: u32_at(38) as i32,
        y_ppm: u32_at(42) as i32,
        colors_used: u32_at(46),
        colors_important: u32_at(50),
    }
}

/// Split the pixel array into rows of `stride` bytes, in file order.
pub fn rows(data: &[u8], stride: usize) -> Vec<&[u8]> {
    if stride == 0 {
        return Vec::new();
    }
    data[54..].chunks(stride).collect()
}

pub fn stride(width: u32) -> usize {
    (width as usize * 3).div_ceil(4) * 4
}
