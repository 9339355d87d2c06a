//! Traits implemented by generated composite types.

use thiserror::Error;

/// Errors returned by generated serialization routines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializeError {
    /// Serialization has not been generated for this type.
    #[error("serialization is not implemented for `{type_name}`")]
    NotImplemented { type_name: &'static str },
}

/// A generated composite type.
///
/// Carries the identity of the type description it was generated from.
pub trait Composite {
    /// Dotted full name, e.g. `pkg.sub.Msg`.
    const FULL_NAME: &'static str;

    /// `(major, minor)` version.
    const VERSION: (u8, u8);

    /// Fixed port identifier, when the type declares one.
    const FIXED_PORT_ID: Option<u16> = None;

    /// Whether the type is a tagged union.
    const IS_UNION: bool = false;

    /// Serialize into `buffer`, returning the number of bytes written.
    fn serialize(&self, buffer: &mut [u8]) -> Result<usize, SerializeError> {
        let _ = buffer;
        Err(SerializeError::NotImplemented {
            type_name: Self::FULL_NAME,
        })
    }
}

/// Fixed port identifier of `T`, if it declares one.
pub const fn get_fixed_port_id<T: Composite>() -> Option<u16> {
    T::FIXED_PORT_ID
}
