//! CRC16-CCITT calculation
//!
//! Polynomial 0x1021, initial value 0xFFFF, no input/output reflection and
//! no final XOR (the "CCITT-FALSE" parameter set).

/// CRC calculation constants
const INITIAL_CRC: u16 = 0xFFFF;
const POLYNOMIAL: u16 = 0x1021;

/// Precomputed CRC table, indexed by the high byte of the running CRC
static CRC_TABLE: once_cell::sync::Lazy<[u16; 256]> = once_cell::sync::Lazy::new(|| {
    let mut table = [0u16; 256];
    for b in 0..=0xFFu16 {
        let mut v = b << 8;
        for _ in 0..8 {
            if (v & 0x8000) != 0 {
                v = (v << 1) ^ POLYNOMIAL;
            } else {
                v <<= 1;
            }
        }
        table[b as usize] = v;
    }
    table
});

/// Incremental CRC16-CCITT calculator
#[derive(Debug, Clone)]
pub struct Crc16 {
    crc_value: u16,
}

impl Crc16 {
    /// Create a new CRC calculator
    pub fn new() -> Self {
        Self {
            crc_value: INITIAL_CRC,
        }
    }

    /// Reset the CRC value to initial state
    pub fn reset(&mut self) {
        self.crc_value = INITIAL_CRC;
    }

    /// Update the CRC value with a single byte
    pub fn update(&mut self, data: u8) {
        let index = ((self.crc_value >> 8) ^ data as u16) & 0xFF;
        self.crc_value = (self.crc_value << 8) ^ CRC_TABLE[index as usize];
    }

    /// Update the CRC value with multiple bytes
    pub fn update_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.update(byte);
        }
    }

    /// Get the CRC value as bytes (big-endian, as written in trailers)
    pub fn value_bytes(&self) -> [u8; 2] {
        self.crc_value.to_be_bytes()
    }

    /// Get the current CRC value
    pub fn value(&self) -> u16 {
        self.crc_value
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

/// CRC16-CCITT of `data` in one call
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut calc = Crc16::new();
    calc.update_bytes(data);
    calc.value()
}
