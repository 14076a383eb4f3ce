//! Embedding one alternative list inside another.
//!
//! [`Superset`] witnesses that every element of `Sub` occurs in `Self`,
//! carrying the type-level index map `M` that renumbers tags in both
//! directions. [`Variant::widen`] and [`Variant::narrow`] are built on it,
//! and so is the arm-by-arm narrowing the match macros expand to.
//!
//! [`Variant::widen`]: crate::Variant::widen
//! [`Variant::narrow`]: crate::Variant::narrow

use crate::{
    index::{TagIdx, I0},
    repr::{AltList, Split},
    NarrowRem, Rem,
};

/// Witnesses that `Self` contains every alternative of `Sub`, mapped
/// through the index list `M`.
pub trait Superset<Sub: AltList, M>: AltList {
    /// The alternatives of `Self` not claimed by `Sub`.
    type Remainder: AltList;

    #[doc(hidden)]
    fn widen_tag(tag: u8) -> u8;

    #[doc(hidden)]
    fn narrow_tag(tag: u8) -> Result<u8, u8>;
}

impl<S: AltList> Superset<(), ()> for S {
    type Remainder = Self;

    fn widen_tag(tag: u8) -> u8 {
        unreachable!("widening tag {tag} out of an empty alternative set")
    }

    fn narrow_tag(tag: u8) -> Result<u8, u8> {
        Err(tag)
    }
}

impl<SubHead, SubTail, Head, Tail, HeadIdx: TagIdx, TailIdx>
    Superset<(SubHead, SubTail), (HeadIdx, TailIdx)> for (Head, Tail)
where
    SubTail: AltList,
    Tail: AltList,
    Self: Split<SubHead, HeadIdx>,
    Rem<Self, SubHead, HeadIdx>: Superset<SubTail, TailIdx>,
{
    type Remainder = NarrowRem<Rem<Self, SubHead, HeadIdx>, SubTail, TailIdx>;

    fn widen_tag(tag: u8) -> u8 {
        match <(SubHead, SubTail) as Split<SubHead, I0>>::split_tag(tag) {
            Ok(()) => HeadIdx::VALUE,
            Err(rest) => {
                let mapped = Rem::<Self, SubHead, HeadIdx>::widen_tag(rest);
                Self::unsplit_tag(mapped)
            }
        }
    }

    fn narrow_tag(tag: u8) -> Result<u8, u8> {
        Ok(match Self::split_tag(tag) {
            Ok(()) => 0,
            Err(rest) => {
                let mapped = Rem::<Self, SubHead, HeadIdx>::narrow_tag(rest)?;
                <(SubHead, SubTail) as Split<SubHead, I0>>::unsplit_tag(mapped)
            }
        })
    }
}
