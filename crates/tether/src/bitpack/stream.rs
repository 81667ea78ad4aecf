pub const WORD_BITS: usize = u32::BITS as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BitpackError {
    #[error("cannot stream {count} bits at once (at most {max})", max = WORD_BITS)]
    TooManyBits { count: usize },
    #[error("bit stream exhausted: {requested} bits requested, {available} available")]
    OutOfCapacity { requested: usize, available: usize },
}

/// A cursor over a run of `u32` words, addressed MSB-first.
///
/// The same `pack` function drives both [`Packer`] and [`Unpacker`]: on a
/// writing stream [`BitStream::stream_bits`] consumes `*value`, on a reading
/// stream it overwrites it. Field order is therefore defined once.
pub trait BitStream {
    fn is_writing(&self) -> bool;

    /// Capacity in words.
    fn capacity(&self) -> usize;

    /// Cursor position in bits from the start of the buffer.
    fn current_bit(&self) -> usize;

    fn stream_bits(&mut self, value: &mut u32, count: usize);

    fn capacity_bits(&self) -> usize {
        self.capacity() * WORD_BITS
    }

    /// Index of the word the cursor is in.
    fn current(&self) -> usize {
        self.current_bit() / WORD_BITS
    }

    fn remaining_bits(&self) -> usize {
        self.capacity_bits() - self.current_bit()
    }
}

#[inline]
fn low_mask(count: usize) -> u32 {
    if count >= WORD_BITS {
        u32::MAX
    } else {
        (1u32 << count) - 1
    }
}

fn check_request(count: usize, cursor: usize, capacity_bits: usize) -> Result<(), BitpackError> {
    if count > WORD_BITS {
        return Err(BitpackError::TooManyBits { count });
    }
    if cursor + count > capacity_bits {
        return Err(BitpackError::OutOfCapacity {
            requested: count,
            available: capacity_bits - cursor,
        });
    }
    Ok(())
}

/// Writes bits into caller-owned words. The words are OR-ed into, so the
/// buffer is expected to start zeroed.
#[derive(Debug, Default)]
pub struct Packer<'a> {
    words: &'a mut [u32],
    bit_position: usize,
}

impl<'a> Packer<'a> {
    pub fn new(words: &'a mut [u32]) -> Self {
        Self {
            words,
            bit_position: 0,
        }
    }

    pub fn try_write_bits(&mut self, value: u32, count: usize) -> Result<(), BitpackError> {
        check_request(count, self.bit_position, self.capacity_bits())?;

        let mut value = value & low_mask(count);
        let mut count = count;

        // A single write touches at most two words.
        while count > 0 {
            let space = WORD_BITS - (self.bit_position % WORD_BITS);
            let chunk = count.min(space);
            let rest = count - chunk;

            let index = self.current();
            self.words[index] |= (value >> rest) << (space - chunk);
            self.bit_position += chunk;

            value &= low_mask(rest);
            count = rest;
        }

        Ok(())
    }

    /// Writes the low `count` bits of `value`.
    ///
    /// # Panics
    ///
    /// If `count > 32` or the stream has fewer than `count` bits left.
    pub fn write_bits(&mut self, value: u32, count: usize) {
        if let Err(err) = self.try_write_bits(value, count) {
            panic!("bit stream write failed: {err}");
        }
    }

    pub fn words(&self) -> &[u32] {
        &self.words[..]
    }
}

impl BitStream for Packer<'_> {
    fn is_writing(&self) -> bool {
        true
    }

    fn capacity(&self) -> usize {
        self.words.len()
    }

    fn current_bit(&self) -> usize {
        self.bit_position
    }

    fn stream_bits(&mut self, value: &mut u32, count: usize) {
        self.write_bits(*value, count);
    }
}

/// Writing stream that stores nothing and only advances its cursor. Running
/// a `pack` through it measures how many bits the value occupies.
#[derive(Debug, Default)]
pub struct BitCounter {
    bit_position: usize,
}

impl BitCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BitStream for BitCounter {
    fn is_writing(&self) -> bool {
        true
    }

    fn capacity(&self) -> usize {
        usize::MAX / WORD_BITS
    }

    fn current_bit(&self) -> usize {
        self.bit_position
    }

    fn stream_bits(&mut self, _value: &mut u32, count: usize) {
        if let Err(err) = check_request(count, self.bit_position, self.capacity_bits()) {
            panic!("bit stream write failed: {err}");
        }
        self.bit_position += count;
    }
}

#[derive(Debug, Default)]
pub struct Unpacker<'a> {
    words: &'a [u32],
    bit_position: usize,
}

impl<'a> Unpacker<'a> {
    pub fn new(words: &'a [u32]) -> Self {
        Self {
            words,
            bit_position: 0,
        }
    }

    pub fn try_read_bits(&mut self, count: usize) -> Result<u32, BitpackError> {
        check_request(count, self.bit_position, self.capacity_bits())?;

        let mut value = 0u32;
        let mut count = count;

        while count > 0 {
            let space = WORD_BITS - (self.bit_position % WORD_BITS);
            let chunk = count.min(space);

            let bits = (self.words[self.current()] >> (space - chunk)) & low_mask(chunk);
            value = value.checked_shl(chunk as u32).unwrap_or(0) | bits;

            self.bit_position += chunk;
            count -= chunk;
        }

        Ok(value)
    }

    /// Reads `count` bits written by [`Packer::write_bits`].
    ///
    /// # Panics
    ///
    /// If `count > 32` or the stream has fewer than `count` bits left.
    pub fn read_bits(&mut self, count: usize) -> u32 {
        match self.try_read_bits(count) {
            Ok(value) => value,
            Err(err) => panic!("bit stream read failed: {err}"),
        }
    }
}

impl BitStream for Unpacker<'_> {
    fn is_writing(&self) -> bool {
        false
    }

    fn capacity(&self) -> usize {
        self.words.len()
    }

    fn current_bit(&self) -> usize {
        self.bit_position
    }

    fn stream_bits(&mut self, value: &mut u32, count: usize) {
        *value = self.read_bits(count);
    }
}
