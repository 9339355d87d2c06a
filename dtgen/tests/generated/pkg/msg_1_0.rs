#![allow(non_camel_case_types, non_snake_case, dead_code, deprecated, unreachable_patterns)]

const _: () = assert!(
    !::dtgen::options::ENABLE_SERIALIZATION_ASSERTS,
    "pkg/Msg.1.0.dsdl is trying to use a support library that was compiled with different language options: enable_serialization_asserts"
);
const _: () = assert!(
    !::dtgen::options::OMIT_FLOAT_SERIALIZATION_SUPPORT,
    "pkg/Msg.1.0.dsdl is trying to use a support library that was compiled with different language options: omit_float_serialization_support"
);
const _: () = assert!(
    ::dtgen::options::TARGET_ENDIANNESS == 0x2C29F04D, // "any"
    "pkg/Msg.1.0.dsdl is trying to use a support library that was compiled with different language options: target_endianness"
);

::dtgen::variant! {
    /// Alternatives of [`Msg_1_0`].
    pub union Msg_1_0_Alternatives {
        0 => a: u8,
        1 => b: f32,
    }
}

/// A message carrying either a raw byte or a float.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Msg_1_0 {
    pub value: ::dtgen::Variant<Msg_1_0_Alternatives>,
}

impl Msg_1_0 {
    pub const INDEX_A: usize = 0;
    pub const INDEX_B: usize = 1;
    pub const MAX_INDEX: usize = 2;

    pub fn is_a(&self) -> bool {
        self.value.index() == Some(Self::INDEX_A)
    }

    pub fn get_a(&self) -> Option<&u8> {
        self.value.get::<0>()
    }

    pub fn get_a_mut(&mut self) -> Option<&mut u8> {
        self.value.get_mut::<0>()
    }

    pub fn set_a(&mut self, value: u8) -> &mut u8 {
        self.value.emplace::<0>(value)
    }

    pub fn is_b(&self) -> bool {
        self.value.index() == Some(Self::INDEX_B)
    }

    pub fn get_b(&self) -> Option<&f32> {
        self.value.get::<1>()
    }

    pub fn get_b_mut(&mut self) -> Option<&mut f32> {
        self.value.get_mut::<1>()
    }

    pub fn set_b(&mut self, value: f32) -> &mut f32 {
        self.value.emplace::<1>(value)
    }
}

impl ::dtgen::Composite for Msg_1_0 {
    const FULL_NAME: &'static str = "pkg.Msg";
    const VERSION: (u8, u8) = (1, 0);
    const FIXED_PORT_ID: Option<u16> = None;
    const IS_UNION: bool = true;
}
