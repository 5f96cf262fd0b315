// src/storage/hash.rs
// =============================================================================
// 32-bit FNV-1a hash over the UTF-8 bytes of a string.
//
// Used only to pick a bucket. It is deterministic across runs and platforms,
// which std's DefaultHasher does not promise, and it is NOT cryptographic.
// =============================================================================

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

pub fn fnv1a_32(s: &str) -> u32 {
    s.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}
