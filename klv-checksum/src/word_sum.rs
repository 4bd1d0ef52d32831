//! 16-bit word sum checksum
//!
//! MISB ST0601 checksum: the packet is read as big-endian 16-bit words and
//! summed with wrap-around. A trailing odd byte counts as a high byte.

/// Running 16-bit word sum of `data`
pub fn word_sum_16(data: &[u8]) -> u16 {
    data.iter().enumerate().fold(0u16, |sum, (i, &byte)| {
        let shift = if i % 2 == 0 { 8 } else { 0 };
        sum.wrapping_add((byte as u16) << shift)
    })
}
