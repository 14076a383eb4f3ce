//! The underlying storage of the [`Variant`] type.
//!
//! # Implementation details
//!
//! A variant is a hand-written tagged union. The alternative list
//! `List![T0, T1]` owns a storage region shaped like:
//!
//! ```rust,no_run
//! # use core::convert::Infallible;
//! # use core::mem::ManuallyDrop;
//!
//! struct Never(Infallible);
//! union Slot<T, Rest> {
//!     value: ManuallyDrop<T>,
//!     rest: ManuallyDrop<Rest>,
//! }
//!
//! // For example only. Not actually defined.
//! struct RawVariant2<T0, T1> {
//!     tag: u8,
//!     data: Slot<T0, Slot<T1, Never>>,
//! }
//! ```
//!
//! Every alternative lives at offset zero of the region; the tag alone
//! decides which interpretation is live. All lifecycle operations recurse
//! over the list, peeling one slot per step and decrementing the tag.
//!
//! [`Variant`]: crate::Variant

use core::{convert::Infallible, mem::ManuallyDrop, ptr};

use crate::index::{At, TagIdx, I0, I1};

/// The terminator of a variant's storage union. Uninhabited.
pub struct Never(pub(crate) Infallible);

/// One level of a variant's storage union: either the alternative stored
/// at this position, or everything after it.
pub union Slot<T, Rest> {
    pub(crate) value: ManuallyDrop<T>,
    pub(crate) rest: ManuallyDrop<Rest>,
}

/// Implemented by type-level alternative lists; ties a list to its
/// storage union and to tag-directed lifecycle management.
pub trait AltList: Count {
    /// The storage union for this alternative list.
    type Repr;

    /// The list with every element replaced by `U`; index maps over this
    /// list are built from it.
    type Tags<U>;

    #[doc(hidden)]
    unsafe fn drop_live(this: &mut ManuallyDrop<Self::Repr>, tag: u8);
}

impl AltList for () {
    type Repr = Never;
    type Tags<U> = ();

    unsafe fn drop_live(_: &mut ManuallyDrop<Never>, _: u8) {}
}

impl<Head, Tail> AltList for (Head, Tail)
where
    Tail: AltList,
{
    type Repr = Slot<Head, Tail::Repr>;
    type Tags<U> = (U, Tail::Tags<U>);

    unsafe fn drop_live(this: &mut ManuallyDrop<Self::Repr>, tag: u8) {
        if tag == 0 {
            unsafe { ManuallyDrop::drop(&mut this.value) };
        } else {
            unsafe { Tail::drop_live(&mut this.rest, tag - 1) }
        }
    }
}

/// Resolves alternative type `T` to position `I` within the list, and
/// provides every operation that manipulates that one slot.
///
/// A list containing the same type twice has two applicable impls for it,
/// so the index can never be inferred: constructing or projecting the
/// duplicated type refuses to compile. Duplicate alternatives are thereby
/// a definition-time error.
pub trait Split<T, I: TagIdx>: AltList {
    #[doc(hidden)]
    fn emplace(value: T) -> Self::Repr;

    #[doc(hidden)]
    unsafe fn take_unchecked(this: Self::Repr) -> T;

    #[doc(hidden)]
    fn as_ptr(this: &Self::Repr) -> *const T;

    #[doc(hidden)]
    fn as_mut_ptr(this: &mut Self::Repr) -> *mut T;

    /// The list with the slot at `I` removed.
    type Remainder: AltList;

    /// The index map carrying each remainder element back to its position
    /// in `Self`.
    type RemainderTags;

    /// The list with the slot at `I` replaced by `T2`.
    type Substitute<T2>: Split<T2, I>;

    #[doc(hidden)]
    fn unsplit_tag(tag: u8) -> u8;

    #[doc(hidden)]
    fn split_tag(tag: u8) -> Result<(), u8>;
}

impl<Head, Tail> Split<Head, I0> for (Head, Tail)
where
    Tail: AltList,
{
    fn emplace(value: Head) -> Self::Repr {
        Slot { value: ManuallyDrop::new(value) }
    }

    unsafe fn take_unchecked(this: Self::Repr) -> Head {
        unsafe { ManuallyDrop::into_inner(this.value) }
    }

    fn as_ptr(this: &Self::Repr) -> *const Head {
        let ptr = ptr::addr_of!(this.value).cast::<Head>();
        debug_assert_eq!(ptr.cast(), this as _);
        ptr
    }

    fn as_mut_ptr(this: &mut Self::Repr) -> *mut Head {
        let ptr = ptr::addr_of_mut!(this.value).cast::<Head>();
        debug_assert_eq!(ptr.cast(), this as _);
        ptr
    }

    type Remainder = Tail;
    type RemainderTags = Tail::Tags<I1>;
    type Substitute<T2> = (T2, Tail);

    fn unsplit_tag(tag: u8) -> u8 {
        tag + 1
    }

    fn split_tag(tag: u8) -> Result<(), u8> {
        match tag.checked_sub(1) {
            None => Ok(()),
            Some(tag) => Err(tag),
        }
    }
}

impl<Head, Tail, T, I: TagIdx> Split<T, At<I>> for (Head, Tail)
where
    Tail: Split<T, I>,
{
    fn emplace(value: T) -> Self::Repr {
        Slot {
            rest: ManuallyDrop::new(Tail::emplace(value)),
        }
    }

    unsafe fn take_unchecked(this: Self::Repr) -> T {
        unsafe { Tail::take_unchecked(ManuallyDrop::into_inner(this.rest)) }
    }

    fn as_ptr(this: &Self::Repr) -> *const T {
        let ptr = unsafe { Tail::as_ptr(&this.rest) };
        debug_assert_eq!(ptr.cast(), this as _);
        ptr
    }

    fn as_mut_ptr(this: &mut Self::Repr) -> *mut T {
        let ptr = unsafe { Tail::as_mut_ptr(&mut this.rest) };
        debug_assert_eq!(ptr.cast(), this as _);
        ptr
    }

    type Remainder = (Head, <Tail as Split<T, I>>::Remainder);
    type RemainderTags = (I0, <Tail as Split<T, I>>::RemainderTags);
    type Substitute<T2> = (Head, Tail::Substitute<T2>);

    fn unsplit_tag(tag: u8) -> u8 {
        if tag < At::<I>::VALUE { tag } else { tag + 1 }
    }

    fn split_tag(tag: u8) -> Result<(), u8> {
        let cur = At::<I>::VALUE;
        match tag.cmp(&cur) {
            core::cmp::Ordering::Equal => Ok(()),
            core::cmp::Ordering::Less => Err(tag),
            core::cmp::Ordering::Greater => Err(tag - 1),
        }
    }
}

/// Counts the elements of an alternative list with a type-level index.
pub trait Count {
    /// The length of the list as a type-level index.
    type Count: TagIdx;
}

impl Count for () {
    type Count = I0;
}

impl<Head, Tail> Count for (Head, Tail)
where
    Tail: Count,
{
    type Count = At<Tail::Count>;
}
