mod codec;
mod math;
mod quantize;
mod range;
mod stream;

pub use codec::{pack_bool, Pack};
pub use math::{bits_needed_for_range, bits_to_represent_n_values};
pub use quantize::{pack_quantize, pack_quantize_clamp, quantize_steps, Quantizable};
pub use range::{pack_bits, pack_bits_wrapping, pack_range, RangeValue};
pub use stream::{BitCounter, BitStream, BitpackError, Packer, Unpacker, WORD_BITS};
