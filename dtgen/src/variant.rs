//! Tagged-union storage with index-based access.
//!
//! [`Variant`] owns raw storage for exactly one of a closed set of
//! alternative types and tracks which one is live through an integer
//! discriminant. Alternatives are addressed by their declaration index,
//! which is fixed by the order in the type description.
//!
//! The storage type is a `#[repr(C)]` union of `ManuallyDrop<T>` fields
//! declared with the [`variant!`](crate::variant!) macro. A union is as large
//! as its largest field and as aligned as its most aligned field, and every
//! field starts at offset zero, so no size or alignment arithmetic is needed.
//!
//! # Example
//!
//! ```rust
//! use dtgen::Variant;
//!
//! dtgen::variant! {
//!     pub union Reading {
//!         0 => raw: u8,
//!         1 => scaled: f32,
//!     }
//! }
//!
//! let mut value: Variant<Reading> = Variant::new();
//! assert_eq!(value.index(), Some(0));
//! assert_eq!(value.get::<0>(), Some(&0));
//!
//! value.emplace::<1>(3.5);
//! assert_eq!(value.get::<1>(), Some(&3.5));
//! assert_eq!(value.get::<0>(), None);
//! ```

use std::fmt;
use std::mem::{self, MaybeUninit};

/// Discriminant of a variant that holds no alternative.
///
/// A variant is only observed in this state after its value has been moved
/// out with [`Variant::take`].
pub const VARIANT_NPOS: usize = usize::MAX;

/// Storage for a closed set of alternative types.
///
/// Implemented by the [`variant!`](crate::variant!) macro; there is normally no
/// reason to implement it by hand.
///
/// # Safety
///
/// The implementing type must be a `#[repr(C)]` union whose fields are
/// `ManuallyDrop<T>` for the alternative types, in index order. Every method
/// must operate only on the field selected by `index`, and `COUNT` / `NAMES`
/// must describe exactly those fields.
pub unsafe trait Alternatives: Sized {
    /// Number of alternatives.
    const COUNT: usize;

    /// Alternative names in index order.
    const NAMES: &'static [&'static str];

    /// Drop the alternative at `index` in place.
    ///
    /// # Safety
    ///
    /// Alternative `index` must be live in `storage`. It is dead afterwards.
    unsafe fn drop_alternative(storage: &mut MaybeUninit<Self>, index: usize);

    /// Clone alternative `index` of `src` into `dst`.
    ///
    /// # Safety
    ///
    /// Alternative `index` must be live in `src` and `dst` must hold no live
    /// alternative.
    unsafe fn clone_alternative(
        src: &MaybeUninit<Self>,
        dst: &mut MaybeUninit<Self>,
        index: usize,
    );

    /// Compare alternative `index` of two storages.
    ///
    /// # Safety
    ///
    /// Alternative `index` must be live in both storages.
    unsafe fn eq_alternative(lhs: &MaybeUninit<Self>, rhs: &MaybeUninit<Self>, index: usize)
        -> bool;

    /// Format alternative `index`.
    ///
    /// # Safety
    ///
    /// Alternative `index` must be live in `storage`.
    unsafe fn fmt_alternative(
        storage: &MaybeUninit<Self>,
        index: usize,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result;
}

/// Binds alternative index `I` to its type.
///
/// # Safety
///
/// `Type` must be the type of field `I` of the storage union.
pub unsafe trait Alternative<const I: usize>: Alternatives {
    /// The alternative type at index `I`.
    type Type;
}

/// Type of alternative `I` of storage `S`.
pub type AlternativeType<S, const I: usize> = <S as Alternative<I>>::Type;

/// Manual tagged union over the alternatives of `S`.
///
/// Exactly one alternative is live at any time, except after [`take`](Self::take)
/// moved the value out, in which case none is and [`index`](Self::index)
/// returns `None`. The live alternative is dropped when the variant is
/// dropped or replaced.
pub struct Variant<S: Alternatives> {
    storage: MaybeUninit<S>,
    tag: usize,
}

impl<S: Alternatives> Variant<S> {
    /// Create a variant holding the default value of alternative 0.
    ///
    /// Alternative 0 must implement `Default`; a type description whose
    /// first alternative has no default value does not compile.
    pub fn new() -> Self
    where
        S: Alternative<0>,
        AlternativeType<S, 0>: Default,
    {
        Self::with_alternative::<0>(Default::default())
    }

    /// Create a variant holding `value` as alternative `I`.
    pub fn with_alternative<const I: usize>(value: AlternativeType<S, I>) -> Self
    where
        S: Alternative<I>,
    {
        let mut variant = Self::valueless();
        variant.construct::<I>(value);
        variant
    }

    const fn valueless() -> Self {
        Self {
            storage: MaybeUninit::uninit(),
            tag: VARIANT_NPOS,
        }
    }

    /// Index of the live alternative, or `None` when the value was moved out.
    pub fn index(&self) -> Option<usize> {
        (self.tag != VARIANT_NPOS).then_some(self.tag)
    }

    /// Whether the variant holds no alternative.
    pub fn is_valueless(&self) -> bool {
        self.tag == VARIANT_NPOS
    }

    /// Name of the live alternative.
    pub fn alternative_name(&self) -> Option<&'static str> {
        self.index().map(|index| S::NAMES[index])
    }

    /// Look up the index of an alternative by name.
    ///
    /// Names that were escaped with a trailing underscore because they clash
    /// with a keyword can be looked up by their unescaped form.
    pub fn index_of(name: &str) -> Option<usize> {
        S::NAMES.iter().position(|n| *n == name).or_else(|| {
            S::NAMES
                .iter()
                .position(|n| n.strip_suffix('_') == Some(name))
        })
    }

    /// Replace the live alternative with `value` as alternative `I`.
    ///
    /// The previous alternative is dropped first.
    pub fn emplace<const I: usize>(
        &mut self,
        value: AlternativeType<S, I>,
    ) -> &mut AlternativeType<S, I>
    where
        S: Alternative<I>,
    {
        self.destroy();
        self.construct::<I>(value)
    }

    /// Borrow alternative `I` if it is the live one.
    pub fn get<const I: usize>(&self) -> Option<&AlternativeType<S, I>>
    where
        S: Alternative<I>,
    {
        if self.tag == I {
            // SAFETY: alternative I is live and union fields sit at offset zero.
            Some(unsafe { &*self.storage.as_ptr().cast::<AlternativeType<S, I>>() })
        } else {
            None
        }
    }

    /// Mutably borrow alternative `I` if it is the live one.
    pub fn get_mut<const I: usize>(&mut self) -> Option<&mut AlternativeType<S, I>>
    where
        S: Alternative<I>,
    {
        if self.tag == I {
            // SAFETY: alternative I is live and union fields sit at offset zero.
            Some(unsafe { &mut *self.storage.as_mut_ptr().cast::<AlternativeType<S, I>>() })
        } else {
            None
        }
    }

    /// Move the live alternative into a new variant.
    ///
    /// `self` is left valueless, so dropping it afterwards does not drop the
    /// moved value a second time.
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::valueless())
    }

    /// Drop the live alternative and move `other`'s alternative in.
    ///
    /// `other` is left valueless.
    pub fn move_assign(&mut self, other: &mut Self) {
        *self = other.take();
    }

    fn construct<const I: usize>(
        &mut self,
        value: AlternativeType<S, I>,
    ) -> &mut AlternativeType<S, I>
    where
        S: Alternative<I>,
    {
        debug_assert!(self.is_valueless());
        let slot = self.storage.as_mut_ptr().cast::<AlternativeType<S, I>>();
        // SAFETY: no alternative is live, the storage is large and aligned
        // enough for every field, and union fields sit at offset zero.
        unsafe { slot.write(value) };
        self.tag = I;
        // SAFETY: just initialised.
        unsafe { &mut *slot }
    }

    fn destroy(&mut self) {
        // Clear the tag first so a panicking destructor cannot lead to a
        // second drop of the same value.
        let tag = mem::replace(&mut self.tag, VARIANT_NPOS);
        if tag != VARIANT_NPOS {
            // SAFETY: `tag` was the live alternative.
            unsafe { S::drop_alternative(&mut self.storage, tag) };
        }
    }
}

impl<S> Default for Variant<S>
where
    S: Alternative<0>,
    AlternativeType<S, 0>: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Alternatives> Drop for Variant<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<S: Alternatives> Clone for Variant<S> {
    fn clone(&self) -> Self {
        let mut out = Self::valueless();
        if let Some(index) = self.index() {
            // SAFETY: `index` is live in self, `out` is valueless.
            unsafe { S::clone_alternative(&self.storage, &mut out.storage, index) };
            out.tag = index;
        }
        out
    }

    fn clone_from(&mut self, source: &Self) {
        self.destroy();
        if let Some(index) = source.index() {
            // SAFETY: `index` is live in source, self was just destroyed.
            unsafe { S::clone_alternative(&source.storage, &mut self.storage, index) };
            self.tag = index;
        }
    }
}

impl<S: Alternatives> PartialEq for Variant<S> {
    fn eq(&self, other: &Self) -> bool {
        match (self.index(), other.index()) {
            (Some(lhs), Some(rhs)) if lhs == rhs => {
                // SAFETY: the same alternative is live in both.
                unsafe { S::eq_alternative(&self.storage, &other.storage, lhs) }
            }
            (None, None) => true,
            _ => false,
        }
    }
}

impl<S: Alternatives> fmt::Debug for Variant<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index() {
            None => f.write_str("Variant(<valueless>)"),
            Some(index) => {
                write!(f, "Variant({} = ", S::NAMES[index])?;
                // SAFETY: `index` is live.
                unsafe { S::fmt_alternative(&self.storage, index, f)? };
                f.write_str(")")
            }
        }
    }
}

/// Declare the storage union for a [`Variant`].
///
/// Each alternative is written as `index => name: Type`. Indices must start
/// at zero and follow declaration order; this is checked at compile time.
/// Alternative types must implement `Clone`, `PartialEq` and `Debug`.
///
/// ```rust
/// dtgen::variant! {
///     /// Payload of a sensor sample.
///     pub union Sample {
///         0 => empty: (),
///         1 => temperature: f32,
///         2 => label: String,
///     }
/// }
///
/// let sample = dtgen::Variant::<Sample>::with_alternative::<2>("outdoor".to_string());
/// assert_eq!(sample.alternative_name(), Some("label"));
/// ```
#[macro_export]
macro_rules! variant {
    (
        $(#[$meta:meta])*
        $vis:vis union $name:ident {
            $( $index:literal => $field:ident : $ty:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(C)]
        #[allow(dead_code, non_camel_case_types, non_snake_case)]
        $vis union $name {
            $( $field: ::core::mem::ManuallyDrop<$ty>, )+
        }

        const _: () = {
            let indices: &[usize] = &[$($index),+];
            let mut i = 0;
            while i < indices.len() {
                assert!(
                    indices[i] == i,
                    "alternative indices must start at 0 and follow declaration order"
                );
                i += 1;
            }
        };

        unsafe impl $crate::Alternatives for $name {
            const COUNT: usize = Self::NAMES.len();
            const NAMES: &'static [&'static str] = &[$(stringify!($field)),+];

            unsafe fn drop_alternative(storage: &mut ::core::mem::MaybeUninit<Self>, index: usize) {
                match index {
                    $( $index => ::core::ptr::drop_in_place(storage.as_mut_ptr().cast::<$ty>()), )+
                    _ => {}
                }
            }

            unsafe fn clone_alternative(
                src: &::core::mem::MaybeUninit<Self>,
                dst: &mut ::core::mem::MaybeUninit<Self>,
                index: usize,
            ) {
                match index {
                    $(
                        $index => {
                            let value =
                                <$ty as ::core::clone::Clone>::clone(&*src.as_ptr().cast::<$ty>());
                            dst.as_mut_ptr().cast::<$ty>().write(value);
                        }
                    )+
                    _ => {}
                }
            }

            unsafe fn eq_alternative(
                lhs: &::core::mem::MaybeUninit<Self>,
                rhs: &::core::mem::MaybeUninit<Self>,
                index: usize,
            ) -> bool {
                match index {
                    $( $index => *lhs.as_ptr().cast::<$ty>() == *rhs.as_ptr().cast::<$ty>(), )+
                    _ => false,
                }
            }

            unsafe fn fmt_alternative(
                storage: &::core::mem::MaybeUninit<Self>,
                index: usize,
                f: &mut ::core::fmt::Formatter<'_>,
            ) -> ::core::fmt::Result {
                match index {
                    $( $index => ::core::fmt::Debug::fmt(&*storage.as_ptr().cast::<$ty>(), f), )+
                    _ => Ok(()),
                }
            }
        }

        $(
            unsafe impl $crate::Alternative<$index> for $name {
                type Type = $ty;
            }
        )+
    };
}
