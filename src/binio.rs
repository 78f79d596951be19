//! Fixed-width little-endian read/write helpers.
//!
//! Every helper transfers exactly the requested number of bytes or fails.
//! A partial transfer is never retried, padded or reported as success.

use std::io::{Read, Write};

use crate::error::{BmError, InputStream};

/// Read exactly `N` bytes from `stream`.
pub fn read_fixed_bytes<const N: usize, R: Read + ?Sized>(
    reader: &mut R,
    stream: InputStream,
) -> Result<[u8; N], BmError> {
    let mut buf = [0u8; N];
    read_exact_bytes(reader, &mut buf, stream)?;
    Ok(buf)
}

/// Fill `buf` completely from `stream`.
pub fn read_exact_bytes<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
    stream: InputStream,
) -> Result<(), BmError> {
    reader
        .read_exact(buf)
        .map_err(|e| BmError::from_read(stream, e))
}

pub fn read_u8<R: Read + ?Sized>(reader: &mut R, stream: InputStream) -> Result<u8, BmError> {
    let [b] = read_fixed_bytes::<1, R>(reader, stream)?;
    Ok(b)
}

pub fn read_u32_le<R: Read + ?Sized>(reader: &mut R, stream: InputStream) -> Result<u32, BmError> {
    Ok(u32::from_le_bytes(read_fixed_bytes::<4, R>(reader, stream)?))
}

/// Write a fixed-length byte string.
pub fn write_bytes<W: Write + ?Sized>(writer: &mut W, bytes: &[u8]) -> Result<(), BmError> {
    writer.write_all(bytes).map_err(BmError::WriteFailure)
}

pub fn write_u8<W: Write + ?Sized>(writer: &mut W, x: u8) -> Result<(), BmError> {
    write_bytes(writer, &[x])
}

pub fn write_u16_le<W: Write + ?Sized>(writer: &mut W, x: u16) -> Result<(), BmError> {
    write_bytes(writer, &x.to_le_bytes())
}

pub fn write_u32_le<W: Write + ?Sized>(writer: &mut W, x: u32) -> Result<(), BmError> {
    write_bytes(writer, &x.to_le_bytes())
}

pub fn write_i32_le<W: Write + ?Sized>(writer: &mut W, x: i32) -> Result<(), BmError> {
    write_bytes(writer, &x.to_le_bytes())
}
