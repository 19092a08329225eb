//! Stable 32-bit element identity.
//!
//! Ids are derived either from a caller-provided string (optionally with an
//! index for repeated elements) or, for anonymous elements, by mixing the
//! element's sibling offset into its parent's id. Both derivations are pure
//! functions of their inputs, so ids are stable across frames as long as the
//! declaration structure is stable.

/// A resolved element identity.
///
/// `id` is the value used for lookups. `base_id` is the hash of the string
/// alone, shared by every indexed variant of the same string. An `id` of 0
/// means "none".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ElementId {
    pub id: u32,
    pub offset: u32,
    pub base_id: u32,
}

impl ElementId {
    pub fn is_none(&self) -> bool {
        self.id == 0
    }
}

/// Hashes a string id with a seed (0 for top-level ids, the parent id for
/// nested local ids).
pub fn hash_string(key: &str, seed: u32) -> ElementId {
    hash_string_indexed(key, 0, seed)
}

/// Hashes a string id plus an index, for elements declared in a loop.
pub fn hash_string_indexed(key: &str, offset: u32, seed: u32) -> ElementId {
    // Jenkins one-at-a-time over the bytes, seeded.
    let mut base = seed;
    for &byte in key.as_bytes() {
        base = base.wrapping_add(u32::from(byte));
        base = base.wrapping_add(base << 10);
        base ^= base >> 6;
    }

    let mut hash = base.wrapping_add(offset);
    hash = hash.wrapping_add(hash << 10);
    hash ^= hash >> 6;
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash = hash.wrapping_add(hash << 15);

    base = base.wrapping_add(base << 3);
    base ^= base >> 11;
    base = base.wrapping_add(base << 15);

    // +1 keeps 0 free to mean "no id".
    ElementId {
        id: hash.wrapping_add(1),
        offset,
        base_id: base.wrapping_add(1),
    }
}

/// Mixes a number into a seed id. Used for anonymous element ids and ids
/// derived from an element's own (scissor and border commands).
pub fn hash_number(offset: u32, seed: u32) -> ElementId {
    let mut hash = seed;
    hash = hash.wrapping_add(offset.wrapping_add(48));
    hash = hash.wrapping_add(hash << 10);
    hash ^= hash >> 6;
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash = hash.wrapping_add(hash << 15);
    ElementId {
        id: hash.wrapping_add(1),
        offset,
        base_id: seed,
    }
}
