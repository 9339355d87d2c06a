//! Build-time language option values.
//!
//! Generated modules embed compile-time checks comparing the options they
//! were generated for against the values below. The values are selected with
//! Cargo features of this crate, so a crate that pulls in generated code
//! built under different options fails to compile instead of silently
//! linking mismatched assumptions.
//!
//! String-valued options are compared by their [`option_hash`].

/// FNV-1a (32-bit) hash of an option string value.
///
/// Both the generator and this crate use the same function, so a generated
/// check and the build configuration agree on the encoding.
pub const fn option_hash(value: &str) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    let bytes = value.as_bytes();
    let mut hash = OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(PRIME);
        i += 1;
    }
    hash
}

/// Whether serialization asserts are compiled in.
pub const ENABLE_SERIALIZATION_ASSERTS: bool = cfg!(feature = "serialization-asserts");

/// Whether float serialization support is left out.
pub const OMIT_FLOAT_SERIALIZATION_SUPPORT: bool = cfg!(feature = "omit-float-serialization");

/// Endianness the build targets: `"big"`, `"little"` or `"any"`.
pub const TARGET_ENDIANNESS_NAME: &str = if cfg!(feature = "big-endian") {
    "big"
} else if cfg!(feature = "little-endian") {
    "little"
} else {
    "any"
};

/// [`option_hash`] of [`TARGET_ENDIANNESS_NAME`].
pub const TARGET_ENDIANNESS: u32 = option_hash(TARGET_ENDIANNESS_NAME);

/// Option names generated Rust code may check against this crate.
pub const RECOGNIZED: &[&str] = &[
    "enable_serialization_asserts",
    "omit_float_serialization_support",
    "target_endianness",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_hash_known_values() {
        // Reference FNV-1a 32 vectors.
        assert_eq!(option_hash(""), 0x811c_9dc5);
        assert_eq!(option_hash("a"), 0xe40c_292c);
        assert_eq!(option_hash("foobar"), 0xbf9c_f968);
    }

    #[test]
    fn test_option_hash_distinguishes_endianness_names() {
        assert_ne!(option_hash("big"), option_hash("little"));
        assert_ne!(option_hash("any"), option_hash("big"));
    }

    #[test]
    fn test_target_endianness_matches_name() {
        assert_eq!(TARGET_ENDIANNESS, option_hash(TARGET_ENDIANNESS_NAME));
        assert!(["any", "big", "little"].contains(&TARGET_ENDIANNESS_NAME));
    }

    #[test]
    fn test_recognized_names_are_unique() {
        let mut names = RECOGNIZED.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RECOGNIZED.len());
    }
}
