//! Handler objects and whole-set dispatch.
//!
//! [`Handler<T>`] is the structural can-match predicate: a handler is
//! accepted for an alternative type exactly when the bound holds, i.e.
//! when calling it with that type type-checks. Closures get it through
//! the blanket impl; hand-written types may implement it for several
//! types (an overload set) or generically for all of them.
//!
//! The `Visit*` traits recurse over an alternative list and demand
//! `Handler<Ti>` for every element with one shared output type, so
//! [`Variant::apply`] and friends are exhaustive by construction: a
//! missing impl is a definition-time error naming the uncovered type.
//!
//! [`Variant::apply`]: crate::Variant::apply

use core::mem::ManuallyDrop;

use crate::repr::{AltList, Never};

/// A callable that can accept a value of type `T`.
pub trait Handler<T> {
    /// The handler's result type. Handlers dispatched over one variant
    /// must agree on it.
    type Output;

    /// Invoke the handler on a value.
    fn call(self, value: T) -> Self::Output;
}

impl<F, T, R> Handler<T> for F
where
    F: FnOnce(T) -> R,
{
    type Output = R;

    fn call(self, value: T) -> R {
        self(value)
    }
}

/// Statically asserts that `H` can match `T`, without dispatching.
///
/// ```rust
/// vsum::assert_handler::<&u32, _>(&|n: &u32| *n + 1);
/// ```
///
/// No qualifier weakening is implied: a shared-access handler does not
/// match where exclusive access is dispatched.
///
/// ```compile_fail
/// vsum::assert_handler::<&mut u32, _>(&|n: &u32| *n + 1);
/// ```
pub const fn assert_handler<T, H: Handler<T>>(_handler: &H) {}

pub trait Visit<F, R>: AltList {
    #[doc(hidden)]
    unsafe fn visit(data: Self::Repr, tag: u8, f: F) -> R;
}

impl<F, R> Visit<F, R> for () {
    unsafe fn visit(data: Never, _: u8, _: F) -> R {
        match data.0 {}
    }
}

impl<F, R, Head, Tail> Visit<F, R> for (Head, Tail)
where
    F: Handler<Head, Output = R>,
    Tail: Visit<F, R>,
{
    unsafe fn visit(data: Self::Repr, tag: u8, f: F) -> R {
        if tag == 0 {
            f.call(ManuallyDrop::into_inner(unsafe { data.value }))
        } else {
            unsafe { Tail::visit(ManuallyDrop::into_inner(data.rest), tag - 1, f) }
        }
    }
}

pub trait VisitRef<'a, F, R>: AltList {
    #[doc(hidden)]
    unsafe fn visit_ref(data: &'a ManuallyDrop<Self::Repr>, tag: u8, f: F) -> R;
}

impl<'a, F, R> VisitRef<'a, F, R> for () {
    unsafe fn visit_ref(_: &'a ManuallyDrop<Never>, _: u8, _: F) -> R {
        unreachable!("tag out of range for the alternative set")
    }
}

impl<'a, F, R, Head: 'a, Tail: 'a> VisitRef<'a, F, R> for (Head, Tail)
where
    F: Handler<&'a Head, Output = R>,
    Tail: VisitRef<'a, F, R>,
{
    unsafe fn visit_ref(data: &'a ManuallyDrop<Self::Repr>, tag: u8, f: F) -> R {
        if tag == 0 {
            f.call(unsafe { &*data.value })
        } else {
            unsafe { Tail::visit_ref(&data.rest, tag - 1, f) }
        }
    }
}

pub trait VisitMut<'a, F, R>: AltList {
    #[doc(hidden)]
    unsafe fn visit_mut(data: &'a mut ManuallyDrop<Self::Repr>, tag: u8, f: F) -> R;
}

impl<'a, F, R> VisitMut<'a, F, R> for () {
    unsafe fn visit_mut(_: &'a mut ManuallyDrop<Never>, _: u8, _: F) -> R {
        unreachable!("tag out of range for the alternative set")
    }
}

impl<'a, F, R, Head: 'a, Tail: 'a> VisitMut<'a, F, R> for (Head, Tail)
where
    F: Handler<&'a mut Head, Output = R>,
    Tail: VisitMut<'a, F, R>,
{
    unsafe fn visit_mut(data: &'a mut ManuallyDrop<Self::Repr>, tag: u8, f: F) -> R {
        if tag == 0 {
            f.call(unsafe { &mut *data.value })
        } else {
            unsafe { Tail::visit_mut(&mut data.rest, tag - 1, f) }
        }
    }
}
