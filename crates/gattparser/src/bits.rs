//! Bit buffer used by the characteristic codec
//!
//! A byte string is addressed as an ordered sequence of bits in little-endian order: bit 0 is the
//! least-significant bit of the first byte, bit 8 the least-significant bit of the second byte and
//! so on. Reads past the end of the buffer yield zero bits rather than failing; callers that need
//! the data to actually be there check [`BitBuf::len`] first.
//!
//! An invariant of the implementation is that any bits in the last block that are not part of the
//! buffer are set to 0.

use std::fmt;

/// Number of bits in a storage block.
const BITS_PER_BLOCK: usize = u8::BITS as usize;

/// Number of bytes needed to hold `num_bits` bits.
pub fn byte_len(num_bits: usize) -> usize {
    num_bits.div_ceil(BITS_PER_BLOCK)
}

/// A growable little-endian bit sequence backed by bytes
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BitBuf {
    storage: Vec<u8>,
    num_bits: usize,
}

impl BitBuf {
    /// Create a new, empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer of `size` zero bits
    pub fn zeroes(size: usize) -> Self {
        Self {
            storage: vec![0; byte_len(size)],
            num_bits: size,
        }
    }

    /// Create a buffer holding every bit of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            storage: bytes.to_vec(),
            num_bits: bytes.len() * BITS_PER_BLOCK,
        }
    }

    /// Create a buffer holding the low `size` bits of `value`
    pub fn from_u64(value: u64, size: usize) -> Self {
        let mut buf = Self::from_bytes(&value.to_le_bytes());
        buf.resize(size);
        buf
    }

    /// Number of bits in the buffer
    pub fn len(&self) -> usize {
        self.num_bits
    }

    pub fn is_empty(&self) -> bool {
        self.num_bits == 0
    }

    /// Returns true if no bit is set
    pub fn is_all_zero(&self) -> bool {
        self.storage.iter().all(|block| *block == 0)
    }

    /// Read the bit at `index`. Bits beyond the end read as zero.
    pub fn get(&self, index: usize) -> bool {
        if index >= self.num_bits {
            return false;
        }
        self.storage[index / BITS_PER_BLOCK] & (1 << (index % BITS_PER_BLOCK)) != 0
    }

    /// Set the bit at `index`, growing the buffer if needed
    pub fn set(&mut self, index: usize) {
        if index >= self.num_bits {
            self.resize(index + 1);
        }
        self.storage[index / BITS_PER_BLOCK] |= 1 << (index % BITS_PER_BLOCK);
    }

    /// Set or clear the bit at `index`, growing the buffer if needed
    pub fn set_to(&mut self, index: usize, value: bool) {
        if value {
            self.set(index);
        } else {
            if index >= self.num_bits {
                self.resize(index + 1);
            }
            self.storage[index / BITS_PER_BLOCK] &= !(1 << (index % BITS_PER_BLOCK));
        }
    }

    /// Truncate or zero-extend the buffer to exactly `size` bits
    pub fn resize(&mut self, size: usize) {
        self.storage.resize(byte_len(size), 0);
        self.num_bits = size;
        let trailing = size % BITS_PER_BLOCK;
        if trailing != 0 {
            if let Some(last) = self.storage.last_mut() {
                *last &= (1u8 << trailing) - 1;
            }
        }
    }

    /// Copy bits `[from, to)` into a new buffer of `to - from` bits.
    ///
    /// Positions past the end of this buffer are zero in the result.
    pub fn slice(&self, from: usize, to: usize) -> BitBuf {
        let size = to.saturating_sub(from);
        let mut result = BitBuf::zeroes(size);
        if from % BITS_PER_BLOCK == 0 {
            let start = from / BITS_PER_BLOCK;
            if start < self.storage.len() {
                let end = (start + byte_len(size)).min(self.storage.len());
                result.storage[..end - start].copy_from_slice(&self.storage[start..end]);
                result.resize(size);
            }
            return result;
        }
        for index in 0..size {
            if self.get(from + index) {
                result.set(index);
            }
        }
        result
    }

    /// Copy the first `size` bits of `source` into this buffer starting at `offset`.
    ///
    /// The buffer grows to at least `offset + size` bits; bits of `source` past its end are
    /// written as zero.
    pub fn concat(&mut self, source: &BitBuf, offset: usize, size: usize) {
        if self.num_bits < offset + size {
            self.resize(offset + size);
        }
        for index in 0..size {
            self.set_to(offset + index, source.get(index));
        }
    }

    /// Interpret the first (up to) 64 bits as an unsigned integer
    pub fn to_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        let n = self.storage.len().min(bytes.len());
        bytes[..n].copy_from_slice(&self.storage[..n]);
        u64::from_le_bytes(bytes)
    }

    /// The bytes backing this buffer, `byte_len(self.len())` of them
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage
    }

    /// Convert the buffer back to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        self.storage.clone()
    }

    /// Consume the buffer, returning its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.storage
    }
}

impl From<&[u8]> for BitBuf {
    fn from(bytes: &[u8]) -> Self {
        BitBuf::from_bytes(bytes)
    }
}

impl fmt::Debug for BitBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitBuf[")?;
        for index in 0..self.num_bits {
            write!(f, "{}", if self.get(index) { '1' } else { '0' })?;
        }
        write!(f, "]")
    }
}
