use super::math::bits_needed_for_range;
use super::stream::{BitStream, WORD_BITS};

/// Integers that can be biased and range-packed.
pub trait RangeValue: Copy + PartialOrd + Into<i128> + TryFrom<i128> {}

impl<T: Copy + PartialOrd + Into<i128> + TryFrom<i128>> RangeValue for T {}

#[inline]
fn widen<V: RangeValue>(value: V) -> i128 {
    value.into()
}

fn from_wide<V: RangeValue>(wide: i128) -> V {
    match V::try_from(wide) {
        Ok(value) => value,
        Err(_) => panic!(
            "unpacked value {wide} does not fit {}",
            std::any::type_name::<V>()
        ),
    }
}

/// Packs `value - begin` in `bits` bits.
///
/// # Panics
///
/// When writing, if `value < begin` or `value - begin` needs more than
/// `bits` bits. Always, if `bits > 32`.
pub fn pack_bits<S: BitStream, V: RangeValue>(
    stream: &mut S,
    value: &mut V,
    begin: V,
    bits: usize,
) {
    assert!(bits <= WORD_BITS, "pack_bits: {bits} bits requested, at most {WORD_BITS}");
    if stream.is_writing() {
        let offset = widen(*value) - widen(begin);
        assert!(offset >= 0, "pack_bits: value is {} below range start", -offset);
        assert!(
            (offset as u128) < (1u128 << bits),
            "pack_bits: offset {offset} does not fit in {bits} bits"
        );
    }
    pack_bits_wrapping(stream, value, begin, bits);
}

/// Like [`pack_bits`] without range checks: the low `bits` of
/// `value - begin` are sent. With zero bits nothing is sent and the reader
/// gets `begin`.
pub fn pack_bits_wrapping<S: BitStream, V: RangeValue>(
    stream: &mut S,
    value: &mut V,
    begin: V,
    bits: usize,
) {
    assert!(bits <= WORD_BITS, "pack_bits: {bits} bits requested, at most {WORD_BITS}");

    let writing = stream.is_writing();
    if bits == 0 {
        if !writing {
            *value = begin;
        }
        return;
    }

    let mut biased = (widen(*value) - widen(begin)) as u32;
    stream.stream_bits(&mut biased, bits);
    if !writing {
        *value = from_wide(widen(begin) + i128::from(biased));
    }
}

/// Packs a value known to lie in `[begin, end)` using only as many bits as
/// the range needs.
///
/// # Panics
///
/// If the range needs more than 32 bits, or when writing a value outside
/// `[begin, end)`.
pub fn pack_range<S: BitStream, V: RangeValue>(stream: &mut S, value: &mut V, begin: V, end: V) {
    let bits = bits_needed_for_range(begin, end) as usize;
    assert!(
        bits <= WORD_BITS,
        "pack_range: [{}, {}) needs {bits} bits, at most {WORD_BITS}",
        widen(begin),
        widen(end)
    );
    if stream.is_writing() {
        assert!(
            *value >= begin && *value < end,
            "pack_range: {} outside [{}, {})",
            widen(*value),
            widen(begin),
            widen(end)
        );
    }

    let low = if begin <= end { begin } else { end };
    pack_bits_wrapping(stream, value, low, bits);
}
