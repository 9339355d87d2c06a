#![allow(non_camel_case_types, non_snake_case, dead_code, deprecated, unreachable_patterns)]

const _: () = assert!(
    !::dtgen::options::ENABLE_SERIALIZATION_ASSERTS,
    "geo/point_1_0.rs is trying to use a support library that was compiled with different language options: enable_serialization_asserts"
);
const _: () = assert!(
    !::dtgen::options::OMIT_FLOAT_SERIALIZATION_SUPPORT,
    "geo/point_1_0.rs is trying to use a support library that was compiled with different language options: omit_float_serialization_support"
);
const _: () = assert!(
    ::dtgen::options::TARGET_ENDIANNESS == 0x2C29F04D, // "any"
    "geo/point_1_0.rs is trying to use a support library that was compiled with different language options: target_endianness"
);

/// A point in the plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Point_1_0 {
    pub x: f32,
    pub y: f32,
}

impl Default for Point_1_0 {
    fn default() -> Self {
        Self {
            x: Default::default(),
            y: Default::default(),
        }
    }
}

impl ::dtgen::Composite for Point_1_0 {
    const FULL_NAME: &'static str = "geo.Point";
    const VERSION: (u8, u8) = (1, 0);
    const FIXED_PORT_ID: Option<u16> = None;
    const IS_UNION: bool = false;
}
