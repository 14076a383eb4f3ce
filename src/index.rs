//! Type-level alternative indices.
//!
//! A position in an alternative list is spelled as a unary type-level
//! numeral: [`I0`] is the first slot and [`At<I>`] the slot after `I`.
//! [`TagIdx`] reflects the numeral back to the `u8` stored in a live
//! variant's tag.

use core::marker::PhantomData;

/// The first alternative slot.
pub struct I0;

/// The alternative slot following index `I`.
pub struct At<I>(PhantomData<I>);

/// Reflects a type-level index to its runtime tag value.
pub trait TagIdx {
    const VALUE: u8;
}

impl TagIdx for I0 {
    const VALUE: u8 = 0;
}

impl<I: TagIdx> TagIdx for At<I> {
    const VALUE: u8 = 1 + I::VALUE;
}

pub type I1 = At<I0>;
pub type I2 = At<I1>;
pub type I3 = At<I2>;
pub type I4 = At<I3>;
pub type I5 = At<I4>;
pub type I6 = At<I5>;
pub type I7 = At<I6>;
pub type I8 = At<I7>;
pub type I9 = At<I8>;
pub type I10 = At<I9>;
pub type I11 = At<I10>;
pub type I12 = At<I11>;
