//! Identifiers for arena-stored armature entities.

use serde::{Deserialize, Serialize};

/// Index of a bone inside an [`Armature`](crate::Armature) arena.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct BoneId(pub u32);

impl BoneId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Monotonic allocator for BoneId.
/// Dense indices double as arena positions.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_bone: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_bone(&mut self) -> BoneId {
        let id = BoneId(self.next_bone);
        self.next_bone = self.next_bone.wrapping_add(1);
        id
    }
}
