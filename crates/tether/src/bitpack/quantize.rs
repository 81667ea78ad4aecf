use super::stream::{BitStream, WORD_BITS};

pub trait Quantizable: Copy + PartialOrd {
    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
}

impl Quantizable for f32 {
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Quantizable for f64 {
    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }
}

/// Largest integer a `bits`-wide quantized value can take.
#[inline]
pub fn quantize_steps(bits: usize) -> u64 {
    (1u64 << bits) - 1
}

/// Lossy float packing: `value` in `[min, max]` is mapped linearly onto
/// `0..=2^bits - 1` and rounded to the nearest step.
///
/// The reconstruction error is at most `(max - min) / (2^bits - 1)`.
///
/// # Panics
///
/// If `bits` is 0 or above 32, or when writing a value outside
/// `[min, max]`. Use [`pack_quantize_clamp`] to saturate instead.
pub fn pack_quantize<S: BitStream, F: Quantizable>(
    stream: &mut S,
    value: &mut F,
    min: F,
    max: F,
    bits: usize,
) {
    assert!(
        bits > 0 && bits <= WORD_BITS,
        "pack_quantize: bits must be in 1..={WORD_BITS}, got {bits}"
    );

    let steps = quantize_steps(bits) as f64;
    let (low, high) = (min.to_f64(), max.to_f64());
    let range = high - low;

    let mut stored = 0u32;
    if stream.is_writing() {
        let v = value.to_f64();
        assert!(
            v >= low && v <= high,
            "pack_quantize: {v} outside [{low}, {high}]"
        );
        let t = if range > 0.0 { (v - low) / range } else { 0.0 };
        stored = (t * steps).round() as u32;
    }

    stream.stream_bits(&mut stored, bits);

    if !stream.is_writing() {
        let t = f64::from(stored) / steps;
        *value = F::from_f64(low + t * range);
    }
}

/// [`pack_quantize`] that saturates `value` into `[min, max]` before writing.
/// NaN is written as zero, itself saturated into the range.
pub fn pack_quantize_clamp<S: BitStream, F: Quantizable>(
    stream: &mut S,
    value: &mut F,
    min: F,
    max: F,
    bits: usize,
) {
    if stream.is_writing() {
        if value.to_f64().is_nan() {
            *value = F::from_f64(0.0);
        }
        if *value < min {
            *value = min;
        } else if *value > max {
            *value = max;
        }
    }
    pack_quantize(stream, value, min, max, bits);
}
