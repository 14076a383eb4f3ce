//! Capability projections over alternative lists.
//!
//! Each trait here recurses over a list and demands the matching std
//! capability from every element, so the corresponding impl on
//! [`Variant`] exists for an instantiation iff *all* of its alternatives
//! support it. Capabilities are all-or-nothing across the set, never
//! per-alternative.
//!
//! The `unsafe fn`s take the raw storage plus the live tag; callers must
//! guarantee the tag is in range and names the live alternative.
//!
//! [`Variant`]: crate::Variant

use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    mem::ManuallyDrop,
};

use crate::repr::{AltList, Never, Slot};

pub trait AltClone: AltList {
    #[doc(hidden)]
    unsafe fn clone_live(this: &ManuallyDrop<Self::Repr>, tag: u8) -> ManuallyDrop<Self::Repr>;
}

impl AltClone for () {
    unsafe fn clone_live(_: &ManuallyDrop<Never>, _: u8) -> ManuallyDrop<Never> {
        unreachable!("tag out of range for the alternative set")
    }
}

impl<Head, Tail> AltClone for (Head, Tail)
where
    Head: Clone,
    Tail: AltClone,
{
    unsafe fn clone_live(this: &ManuallyDrop<Self::Repr>, tag: u8) -> ManuallyDrop<Self::Repr> {
        if tag == 0 {
            let value = unsafe { Head::clone(&this.value) };
            ManuallyDrop::new(Slot { value: ManuallyDrop::new(value) })
        } else {
            let rest = unsafe { Tail::clone_live(&this.rest, tag - 1) };
            ManuallyDrop::new(Slot { rest })
        }
    }
}

pub trait AltEq: AltList {
    #[doc(hidden)]
    unsafe fn eq_live(a: &ManuallyDrop<Self::Repr>, b: &ManuallyDrop<Self::Repr>, tag: u8)
        -> bool;
}

impl AltEq for () {
    unsafe fn eq_live(_: &ManuallyDrop<Never>, _: &ManuallyDrop<Never>, _: u8) -> bool {
        unreachable!("tag out of range for the alternative set")
    }
}

impl<Head, Tail> AltEq for (Head, Tail)
where
    Head: PartialEq,
    Tail: AltEq,
{
    unsafe fn eq_live(
        a: &ManuallyDrop<Self::Repr>,
        b: &ManuallyDrop<Self::Repr>,
        tag: u8,
    ) -> bool {
        if tag == 0 {
            unsafe { *a.value == *b.value }
        } else {
            unsafe { Tail::eq_live(&a.rest, &b.rest, tag - 1) }
        }
    }
}

pub trait AltPartialOrd: AltEq {
    #[doc(hidden)]
    unsafe fn partial_cmp_live(
        a: &ManuallyDrop<Self::Repr>,
        b: &ManuallyDrop<Self::Repr>,
        tag: u8,
    ) -> Option<Ordering>;
}

impl AltPartialOrd for () {
    unsafe fn partial_cmp_live(
        _: &ManuallyDrop<Never>,
        _: &ManuallyDrop<Never>,
        _: u8,
    ) -> Option<Ordering> {
        unreachable!("tag out of range for the alternative set")
    }
}

impl<Head, Tail> AltPartialOrd for (Head, Tail)
where
    Head: PartialOrd,
    Tail: AltPartialOrd,
{
    unsafe fn partial_cmp_live(
        a: &ManuallyDrop<Self::Repr>,
        b: &ManuallyDrop<Self::Repr>,
        tag: u8,
    ) -> Option<Ordering> {
        if tag == 0 {
            unsafe { Head::partial_cmp(&a.value, &b.value) }
        } else {
            unsafe { Tail::partial_cmp_live(&a.rest, &b.rest, tag - 1) }
        }
    }
}

pub trait AltOrd: AltPartialOrd {
    #[doc(hidden)]
    unsafe fn cmp_live(
        a: &ManuallyDrop<Self::Repr>,
        b: &ManuallyDrop<Self::Repr>,
        tag: u8,
    ) -> Ordering;
}

impl AltOrd for () {
    unsafe fn cmp_live(_: &ManuallyDrop<Never>, _: &ManuallyDrop<Never>, _: u8) -> Ordering {
        unreachable!("tag out of range for the alternative set")
    }
}

impl<Head, Tail> AltOrd for (Head, Tail)
where
    Head: Ord,
    Tail: AltOrd,
{
    unsafe fn cmp_live(
        a: &ManuallyDrop<Self::Repr>,
        b: &ManuallyDrop<Self::Repr>,
        tag: u8,
    ) -> Ordering {
        if tag == 0 {
            unsafe { Head::cmp(&a.value, &b.value) }
        } else {
            unsafe { Tail::cmp_live(&a.rest, &b.rest, tag - 1) }
        }
    }
}

pub trait AltHash: AltList {
    #[doc(hidden)]
    unsafe fn hash_live<H: Hasher>(this: &ManuallyDrop<Self::Repr>, tag: u8, state: &mut H);
}

impl AltHash for () {
    unsafe fn hash_live<H: Hasher>(_: &ManuallyDrop<Never>, _: u8, _: &mut H) {
        unreachable!("tag out of range for the alternative set")
    }
}

impl<Head, Tail> AltHash for (Head, Tail)
where
    Head: Hash,
    Tail: AltHash,
{
    unsafe fn hash_live<H: Hasher>(this: &ManuallyDrop<Self::Repr>, tag: u8, state: &mut H) {
        if tag == 0 {
            unsafe { Head::hash(&this.value, state) }
        } else {
            unsafe { Tail::hash_live(&this.rest, tag - 1, state) }
        }
    }
}

pub trait AltDebug: AltList {
    #[doc(hidden)]
    unsafe fn fmt_live(
        this: &ManuallyDrop<Self::Repr>,
        tag: u8,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result;
}

impl AltDebug for () {
    unsafe fn fmt_live(
        _: &ManuallyDrop<Never>,
        _: u8,
        _: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        unreachable!("tag out of range for the alternative set")
    }
}

impl<Head, Tail> AltDebug for (Head, Tail)
where
    Head: fmt::Debug,
    Tail: AltDebug,
{
    unsafe fn fmt_live(
        this: &ManuallyDrop<Self::Repr>,
        tag: u8,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if tag == 0 {
            unsafe { Head::fmt(&this.value, f) }
        } else {
            unsafe { Tail::fmt_live(&this.rest, tag - 1, f) }
        }
    }
}

/// Names the live alternative's type. Implemented for every list; this is
/// what the partial-match failure report is built from.
pub trait AltMeta: AltList {
    #[doc(hidden)]
    fn live_name(tag: u8) -> &'static str;
}

impl AltMeta for () {
    fn live_name(_: u8) -> &'static str {
        unreachable!("tag out of range for the alternative set")
    }
}

impl<Head, Tail> AltMeta for (Head, Tail)
where
    Tail: AltMeta,
{
    fn live_name(tag: u8) -> &'static str {
        if tag == 0 {
            core::any::type_name::<Head>()
        } else {
            Tail::live_name(tag - 1)
        }
    }
}
