#![allow(non_camel_case_types, non_snake_case, dead_code, deprecated, unreachable_patterns)]

pub mod geo;
pub mod pkg;
