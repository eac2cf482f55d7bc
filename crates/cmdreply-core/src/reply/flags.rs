//! Message flag bitmask.

use serde::{Deserialize, Serialize};

/// Raw message flags as sent on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageFlags(u32);

impl MessageFlags {
    /// Reply is only visible to the invoking user.
    pub const EPHEMERAL: u32 = 1 << 6;

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, bit: u32) -> bool {
        self.0 & bit == bit
    }

    /// Set or clear `bit`. Idempotent.
    pub fn toggle(&mut self, bit: u32, on: bool) {
        if on {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }

    pub const fn is_ephemeral(self) -> bool {
        self.contains(Self::EPHEMERAL)
    }
}
