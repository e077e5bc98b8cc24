//! Field primitives of the binary metric protocol.
//!
//! Every integer is 4 bytes big-endian. Strings carry a 4-byte length prefix
//! and are zero padded so the raw bytes end on a 4-byte boundary.

pub const INT_SIZE: usize = 4;

pub fn encode_int(wtr: &mut Vec<u8>, value: i32) {
    wtr.extend_from_slice(&value.to_be_bytes());
}

pub fn encode_uint(wtr: &mut Vec<u8>, value: u32) {
    wtr.extend_from_slice(&value.to_be_bytes());
}

/// Enumerations go on the wire as their zero-based ordinal.
pub fn encode_enum(wtr: &mut Vec<u8>, ordinal: u32) {
    encode_uint(wtr, ordinal);
}

/// Number of zero bytes needed after `len` raw bytes.
pub fn padding(len: usize) -> usize {
    (INT_SIZE - len % INT_SIZE) % INT_SIZE
}

/// # Panics
///
/// If `s` is longer than a 32-bit length field can describe.
pub fn encode_string(wtr: &mut Vec<u8>, s: &[u8]) {
    let len = u32::try_from(s.len()).expect("string field exceeds u32::MAX bytes");
    encode_uint(wtr, len);
    wtr.extend_from_slice(s);
    wtr.extend(core::iter::repeat(0).take(padding(s.len())));
}
