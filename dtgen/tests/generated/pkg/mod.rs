#![allow(non_camel_case_types, non_snake_case, dead_code, deprecated, unreachable_patterns)]

pub mod msg_1_0;

pub use msg_1_0::Msg_1_0;
