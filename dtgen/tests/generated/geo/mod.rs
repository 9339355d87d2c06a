#![allow(non_camel_case_types, non_snake_case, dead_code, deprecated, unreachable_patterns)]

pub mod path_1_0;
pub mod point_1_0;

pub use path_1_0::Path_1_0;
pub use point_1_0::Point_1_0;
