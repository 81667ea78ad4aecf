/// Minimum number of bits that can distinguish `n` values.
///
/// Zero or one possible value needs nothing on the wire.
pub const fn bits_to_represent_n_values(n: u128) -> u32 {
    if n <= 1 {
        return 0;
    }

    // n - 1 so exact powers of two don't take an extra bit
    let mut rest = n - 1;
    let mut bits = 0;
    while rest > 0 {
        rest >>= 1;
        bits += 1;
    }
    bits
}

/// Bits needed for any value of `[begin, end)`. Argument order doesn't matter.
pub fn bits_needed_for_range<T: Into<i128>>(begin: T, end: T) -> u32 {
    let (begin, end): (i128, i128) = (begin.into(), end.into());
    bits_to_represent_n_values(begin.abs_diff(end))
}
