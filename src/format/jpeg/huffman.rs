//! Canonical Huffman tables (ITU-T T.81 Annex C and F.2.2.3).
//!
//! A DHT segment transmits only the number of codes of each length 1..16 and
//! the symbols in code order. The codes themselves are reconstructed here:
//!
//! ```text
//! counts  [0, 1, 5, 1, ...]     Generate_size_table
//!   │                           ───────────────────►  sizes [2, 3, 3, 3, 3, 3, 4, ...]
//!   │                           Generate_code_table
//!   │                           ───────────────────►  codes [00, 010, 011, 100, ...]
//!   ▼                           Decoder_tables
//! min_code / max_code / val_ptr per length, for O(code length) decoding
//! ```

use thiserror::Error;

/// Longest code length in bits.
pub const MAX_CODE_LENGTH: usize = 16;

/// Most symbols a table may carry.
pub const MAX_SYMBOLS: usize = 256;

pub const TABLE_CLASS_DC: u8 = 0;
pub const TABLE_CLASS_AC: u8 = 1;

/// Why a table definition cannot form a valid code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HuffmanTableError {
    #[error("table declares {0} codes")]
    TooManyCodes(usize),

    #[error("code lengths overflow at length {0}")]
    InvalidCodeLengths(usize),
}

/// Code length of every symbol, in symbol order.
pub fn generate_size_table(counts: &[u8; MAX_CODE_LENGTH]) -> Vec<u8> {
    counts
        .iter()
        .enumerate()
        .flat_map(|(index, &count)| std::iter::repeat(index as u8 + 1).take(usize::from(count)))
        .collect()
}

/// Canonical code of every symbol, given the sizes from [`generate_size_table`].
///
/// Codes of one length are consecutive; moving to the next length shifts the
/// running code left by one bit. A code that no longer fits its length, or
/// one made up of only 1 bits, makes the table invalid.
pub fn generate_code_table(sizes: &[u8]) -> Result<Vec<u16>, HuffmanTableError> {
    let mut codes = Vec::with_capacity(sizes.len());
    let mut code: u32 = 0;
    let mut index = 0;
    for length in 1..=MAX_CODE_LENGTH {
        while index < sizes.len() && usize::from(sizes[index]) == length {
            codes.push(code as u16);
            code += 1;
            index += 1;
        }
        if code >= 1 << length {
            return Err(HuffmanTableError::InvalidCodeLengths(length));
        }
        code <<= 1;
    }
    Ok(codes)
}

// =============================================================================
// JpegHuffmanTable
// =============================================================================

/// One DHT table with its derived code and decoder tables.
#[derive(Debug, Clone)]
pub struct JpegHuffmanTable {
    /// 0 = DC (or lossless), 1 = AC
    pub class: u8,
    pub id: u8,
    pub counts: [u8; MAX_CODE_LENGTH],
    pub symbols: Vec<u8>,
    pub sizes: Vec<u8>,
    pub codes: Vec<u16>,
    /// Indexed by code length 1..=16; index 0 unused
    min_code: [i32; MAX_CODE_LENGTH + 1],
    max_code: [i32; MAX_CODE_LENGTH + 1],
    val_ptr: [usize; MAX_CODE_LENGTH + 1],
}

impl JpegHuffmanTable {
    /// Build and canonicalize a table.
    ///
    /// `symbols` must hold exactly as many entries as `counts` sums to.
    pub fn build(
        class: u8,
        id: u8,
        counts: [u8; MAX_CODE_LENGTH],
        symbols: Vec<u8>,
    ) -> Result<Self, HuffmanTableError> {
        let total: usize = counts.iter().map(|&c| usize::from(c)).sum();
        if total > MAX_SYMBOLS {
            return Err(HuffmanTableError::TooManyCodes(total));
        }
        let sizes = generate_size_table(&counts);
        let codes = generate_code_table(&sizes)?;

        let mut min_code = [0i32; MAX_CODE_LENGTH + 1];
        let mut max_code = [-1i32; MAX_CODE_LENGTH + 1];
        let mut val_ptr = [0usize; MAX_CODE_LENGTH + 1];
        let mut j = 0;
        for length in 1..=MAX_CODE_LENGTH {
            let count = usize::from(counts[length - 1]);
            if count == 0 {
                continue;
            }
            val_ptr[length] = j;
            min_code[length] = i32::from(codes[j]);
            j += count;
            max_code[length] = i32::from(codes[j - 1]);
        }

        Ok(Self {
            class,
            id,
            counts,
            symbols,
            sizes,
            codes,
            min_code,
            max_code,
            val_ptr,
        })
    }

    pub fn num_codes(&self) -> usize {
        self.codes.len()
    }

    /// Largest code of `length` bits, or -1 if there is none.
    pub fn max_code(&self, length: usize) -> i32 {
        self.max_code.get(length).copied().unwrap_or(-1)
    }

    /// Symbol for a complete `code` of `length` bits.
    pub fn symbol(&self, length: usize, code: i32) -> Option<u8> {
        if length == 0 || length > MAX_CODE_LENGTH || code > self.max_code[length] {
            return None;
        }
        let offset = usize::try_from(code - self.min_code[length]).ok()?;
        self.symbols.get(self.val_ptr[length] + offset).copied()
    }
}
