//! FNV-1 64-bit hash
//!
//! Same function as CockroachDB's `fnv64` builtin, so a seed samples the
//! same rows whichever backend serves it.

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// FNV-1 (multiply, then xor) over `bytes`
pub fn fnv64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        hash.wrapping_mul(FNV_PRIME) ^ u64::from(*byte)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vectors() {
        assert_eq!(fnv64(b""), 0xcbf29ce484222325);
        assert_eq!(fnv64(b"a"), 0xaf63bd4c8601b7be);
        assert_eq!(fnv64(b"foobar"), 0x340d8765a4dda9c2);
    }

    #[test]
    fn test_seed_changes_order_key() {
        assert_ne!(fnv64(b"1cat"), fnv64(b"2cat"));
        assert_eq!(fnv64(b"1cat"), fnv64(b"1cat"));
    }
}
