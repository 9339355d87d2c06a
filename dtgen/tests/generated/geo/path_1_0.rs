#![allow(non_camel_case_types, non_snake_case, dead_code, deprecated, unreachable_patterns)]

const _: () = assert!(
    !::dtgen::options::ENABLE_SERIALIZATION_ASSERTS,
    "geo/path_1_0.rs is trying to use a support library that was compiled with different language options: enable_serialization_asserts"
);
const _: () = assert!(
    !::dtgen::options::OMIT_FLOAT_SERIALIZATION_SUPPORT,
    "geo/path_1_0.rs is trying to use a support library that was compiled with different language options: omit_float_serialization_support"
);
const _: () = assert!(
    ::dtgen::options::TARGET_ENDIANNESS == 0x2C29F04D, // "any"
    "geo/path_1_0.rs is trying to use a support library that was compiled with different language options: target_endianness"
);

#[derive(Debug, Clone, PartialEq)]
pub struct Path_1_0 {
    /// Whether the last point connects back to the first.
    pub closed: bool,
    // 7-bit padding
    // capacity: 8
    pub points: Vec<super::super::geo::point_1_0::Point_1_0>,
    pub id: [u8; 40],
}

impl Default for Path_1_0 {
    fn default() -> Self {
        Self {
            closed: Default::default(),
            points: Default::default(),
            id: ::core::array::from_fn(|_| Default::default()),
        }
    }
}

impl Path_1_0 {
    pub const MAX_POINTS: u8 = 8;
}

impl ::dtgen::Composite for Path_1_0 {
    const FULL_NAME: &'static str = "geo.Path";
    const VERSION: (u8, u8) = (1, 0);
    const FIXED_PORT_ID: Option<u16> = Some(100);
    const IS_UNION: bool = false;
}
