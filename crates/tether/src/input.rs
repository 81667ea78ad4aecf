use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::bitpack::{
    bits_needed_for_range, pack_bits, pack_quantize_clamp, BitStream, Pack, Packer, Unpacker,
};

/// Wire precision of each direction component.
pub const DIRECTION_BITS: usize = 10;

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct InputFlags: u8 {
        const JUMP = 1 << 0;
    }
}

impl InputFlags {
    fn wire_bits() -> usize {
        bits_needed_for_range(0u16, u16::from(Self::all().bits()) + 1) as usize
    }
}

/// Player intent for one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Input {
    /// Desired move direction in world space, each component in `[-1, 1]`.
    pub direction: Vec3,
    pub flags: InputFlags,
}

impl Input {
    pub fn new(direction: Vec3, flags: InputFlags) -> Self {
        Self { direction, flags }
    }

    pub fn jump(&self) -> bool {
        self.flags.contains(InputFlags::JUMP)
    }

    /// Bits one packed input occupies.
    pub fn wire_bits() -> usize {
        InputFlags::wire_bits() + 3 * DIRECTION_BITS
    }

    /// This input as a peer decodes it off the wire. Predicting with the
    /// quantized value keeps both ends stepping on identical inputs.
    pub fn quantized(&self) -> Input {
        let mut words = [0u32; 1];
        let mut sent = *self;
        sent.pack(&mut Packer::new(&mut words));

        let mut received = Input::default();
        received.pack(&mut Unpacker::new(&words));
        received
    }
}

impl Pack for Input {
    fn pack<S: BitStream>(&mut self, stream: &mut S) {
        let mut raw = self.flags.bits();
        pack_bits(stream, &mut raw, 0, InputFlags::wire_bits());
        self.flags = InputFlags::from_bits_truncate(raw);

        let mut components = self.direction.to_array();
        for component in &mut components {
            pack_quantize_clamp(stream, component, -1.0, 1.0, DIRECTION_BITS);
        }
        self.direction = Vec3::from_array(components);
    }
}
