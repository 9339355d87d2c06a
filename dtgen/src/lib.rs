//! # dtgen
//!
//! Runtime support for Rust code generated by `dtgen`.
//!
//! Generated modules depend on this crate for:
//!
//! - [`Variant`], the tagged-union storage used for union types when the
//!   storage strategy is selected, together with the [`variant!`] macro that
//!   declares its alternatives
//! - [`Composite`], implemented by every generated type
//! - [`options`], the build-time language option values generated code
//!   asserts against
//!
//! ## Example
//!
//! ```rust
//! use dtgen::{Composite, Variant};
//!
//! dtgen::variant! {
//!     pub union Msg_1_0_Storage {
//!         0 => a: u8,
//!         1 => b: f32,
//!     }
//! }
//!
//! pub struct Msg_1_0 {
//!     pub value: Variant<Msg_1_0_Storage>,
//! }
//!
//! impl Composite for Msg_1_0 {
//!     const FULL_NAME: &'static str = "pkg.Msg";
//!     const VERSION: (u8, u8) = (1, 0);
//!     const IS_UNION: bool = true;
//! }
//!
//! let mut msg = Msg_1_0 { value: Variant::new() };
//! msg.value.emplace::<1>(3.5);
//! assert_eq!(msg.value.index(), Some(1));
//! assert!(msg.serialize(&mut [0u8; 4]).is_err());
//! ```

pub mod options;
pub mod traits;
pub mod variant;

pub use traits::{get_fixed_port_id, Composite, SerializeError};
pub use variant::{Alternative, AlternativeType, Alternatives, Variant, VARIANT_NPOS};
