//! Comm-verification checksum engine.
//!
//! Computes the 64-bit integrity value stored in every frame trailer. The
//! frame encoder serializes header + payload + trailer with the
//! comm-verification field zeroed, checksums the whole buffer, and patches
//! the result into the final 8 bytes; the decoder recomputes the same way
//! and compares.
//!
//! CRC-64 with the ECMA-182 polynomial, zero initial value, no bit
//! reflection, zero final xor. Interoperability with deployed stations
//! should be confirmed against golden vectors; the variant is isolated
//! behind [`checksum`] so a mismatch is a one-table fix.

/// ECMA-182 CRC-64 polynomial.
const POLY: u64 = 0x42F0_E1EB_A9EA_3693;

const fn build_table() -> [u64; 256] {
    let mut table = [0u64; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u64) << 56;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & (1 << 63) != 0 { (crc << 1) ^ POLY } else { crc << 1 };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

static CRC64_TABLE: [u64; 256] = build_table();

/// Compute the comm-verification value over `bytes`.
///
/// Pure and deterministic; safe to call from any thread.
pub fn checksum(bytes: &[u8]) -> u64 {
    let mut crc = 0u64;
    for &byte in bytes {
        let index = (((crc >> 56) as u8) ^ byte) as usize;
        crc = (crc << 8) ^ CRC64_TABLE[index];
    }
    crc
}
