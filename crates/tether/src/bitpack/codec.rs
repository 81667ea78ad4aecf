use glam::{Quat, Vec3};

use super::stream::BitStream;

/// Symmetric wire encoding: one definition both serializes and deserializes.
///
/// ```
/// use tether::bitpack::{pack_bool, BitStream, Pack, Packer, Unpacker};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Skeleton {
///     hitpoints: u32,
///     alive: bool,
/// }
///
/// impl Pack for Skeleton {
///     fn pack<S: BitStream>(&mut self, stream: &mut S) {
///         self.hitpoints.pack(stream);
///         pack_bool(stream, &mut self.alive);
///     }
/// }
///
/// let mut words = [0u32; 2];
/// let mut before = Skeleton { hitpoints: 20, alive: true };
/// before.pack(&mut Packer::new(&mut words));
///
/// let mut after = Skeleton::default();
/// after.pack(&mut Unpacker::new(&words));
/// assert_eq!(before, after);
/// ```
pub trait Pack {
    fn pack<S: BitStream>(&mut self, stream: &mut S);
}

macro_rules! impl_pack_narrow_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Pack for $ty {
                #[inline]
                fn pack<S: BitStream>(&mut self, stream: &mut S) {
                    let mut raw = u32::from(*self);
                    stream.stream_bits(&mut raw, <$ty>::BITS as usize);
                    *self = raw as $ty;
                }
            }
        )*
    };
}

impl_pack_narrow_unsigned!(u8, u16, u32);

impl Pack for u64 {
    fn pack<S: BitStream>(&mut self, stream: &mut S) {
        let mut high = (*self >> 32) as u32;
        let mut low = *self as u32;
        high.pack(stream);
        low.pack(stream);
        *self = (u64::from(high) << 32) | u64::from(low);
    }
}

macro_rules! impl_pack_signed {
    ($($ty:ty => $unsigned:ty),*) => {
        $(
            impl Pack for $ty {
                #[inline]
                fn pack<S: BitStream>(&mut self, stream: &mut S) {
                    let mut raw = *self as $unsigned;
                    raw.pack(stream);
                    *self = raw as $ty;
                }
            }
        )*
    };
}

impl_pack_signed!(i8 => u8, i16 => u16, i32 => u32, i64 => u64);

impl Pack for f32 {
    fn pack<S: BitStream>(&mut self, stream: &mut S) {
        let mut raw = self.to_bits();
        raw.pack(stream);
        *self = f32::from_bits(raw);
    }
}

impl Pack for f64 {
    fn pack<S: BitStream>(&mut self, stream: &mut S) {
        let mut raw = self.to_bits();
        raw.pack(stream);
        *self = f64::from_bits(raw);
    }
}

impl Pack for bool {
    fn pack<S: BitStream>(&mut self, stream: &mut S) {
        pack_bool(stream, self);
    }
}

/// Packs a single bit and hands it back, so a message can send the rest of
/// its fields only when the flag is set.
#[inline]
pub fn pack_bool<S: BitStream>(stream: &mut S, value: &mut bool) -> bool {
    let mut raw = u32::from(*value);
    stream.stream_bits(&mut raw, 1);
    *value = raw != 0;
    *value
}

impl<T: Pack, const N: usize> Pack for [T; N] {
    fn pack<S: BitStream>(&mut self, stream: &mut S) {
        for item in self.iter_mut() {
            item.pack(stream);
        }
    }
}

impl Pack for Vec3 {
    fn pack<S: BitStream>(&mut self, stream: &mut S) {
        let mut components = self.to_array();
        components.pack(stream);
        *self = Vec3::from_array(components);
    }
}

impl Pack for Quat {
    fn pack<S: BitStream>(&mut self, stream: &mut S) {
        let mut components = self.to_array();
        components.pack(stream);
        *self = Quat::from_array(components);
    }
}
