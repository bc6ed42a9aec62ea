//! CRC-16 lookup table generation (MSB-first, no reflection).

/// CRC-16/CCITT polynomial.
pub const CRC16_CCITT_POLY: u16 = 0x1021;

/// 256-entry CRC-16 lookup table for a given polynomial.
#[derive(Clone, PartialEq, Eq)]
pub struct Crc16Lut {
    poly: u16,
    table: [u16; 256],
}

impl Crc16Lut {
    /// Generates the table for `poly`.
    #[allow(clippy::indexing_slicing, reason = "loop index is bounded by the table length")]
    pub const fn new(poly: u16) -> Self {
        let mut table = [0u16; 256];
        let mut i = 0usize;
        while i < 256 {
            let mut crc = (i as u16) << 8;
            let mut bit = 0;
            while bit < 8 {
                crc = if (crc & 0x8000) != 0 {
                    (crc << 1) ^ poly
                } else {
                    crc << 1
                };
                bit += 1;
            }
            table[i] = crc;
            i += 1;
        }
        Self { poly, table }
    }

    /// Polynomial the table was generated for.
    pub fn poly(&self) -> u16 {
        self.poly
    }

    /// Table entry for `index`.
    #[inline]
    pub fn get(&self, index: u8) -> u16 {
        self.table.get(usize::from(index)).copied().unwrap_or(0)
    }

    /// Feeds one byte into a running CRC.
    #[inline]
    pub fn update(&self, crc: u16, byte: u8) -> u16 {
        (crc << 8) ^ self.get(((crc >> 8) as u8) ^ byte)
    }

    /// CRC over `bytes` starting from `init`.
    pub fn checksum(&self, init: u16, bytes: &[u8]) -> u16 {
        bytes.iter().fold(init, |crc, &b| self.update(crc, b))
    }
}

impl core::fmt::Debug for Crc16Lut {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Crc16Lut")
            .field("poly", &format_args!("{:#06x}", self.poly))
            .finish_non_exhaustive()
    }
}
