#![doc = include_str!("../README.md")]
#![no_std]
#![deny(future_incompatible)]
#![deny(rust_2018_idioms)]
#![deny(rust_2024_compatibility)]
#![allow(edition_2024_expr_fragment_specifier)]

#[cfg(test)]
extern crate std;

use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    mem::{self, ManuallyDrop, MaybeUninit},
    ops::{Deref, DerefMut},
    ptr,
};

pub mod caps;
pub mod error;
pub mod index;
mod macros;
pub mod repr;
pub mod subset;
pub mod visit;

use self::{
    caps::{AltClone, AltDebug, AltEq, AltHash, AltMeta, AltOrd, AltPartialOrd},
    index::{TagIdx, I0},
    repr::{AltList, Count, Split},
    subset::Superset,
    visit::{Visit, VisitMut, VisitRef},
};

pub use self::{
    error::NoMatch,
    visit::{assert_handler, Handler},
};
pub use vsum_macros::{match_variant, try_match_variant};

/// The storage union backing a [`Variant`] over the alternative list `S`.
pub type Repr<S> = <S as repr::AltList>::Repr;

mod sealed {
    pub trait Sealed {}
}

/// Definition-time switch controlling whether a [`Variant`] may be
/// default-constructed. See [`Defaultable`] and [`NoDefault`].
pub trait DefaultPolicy: sealed::Sealed {}

/// Default construction activates alternative 0, when it has a default.
pub enum Defaultable {}

impl sealed::Sealed for Defaultable {}
impl DefaultPolicy for Defaultable {}

/// Default construction is disabled for the whole variant, regardless of
/// what alternative 0 supports. Spelled `Variant![no_default; ..]`.
pub enum NoDefault {}

impl sealed::Sealed for NoDefault {}
impl DefaultPolicy for NoDefault {}

/// A value holding exactly one alternative out of the type list `S`,
/// tagged with the index of the live alternative.
///
/// Use the [`Variant!`] macro to name the type, [`Variant::new`] to
/// construct one, and `match_variant!`/`try_match_variant!` or
/// [`Variant::apply`] to dispatch on it.
pub struct Variant<S: AltList, D: DefaultPolicy = Defaultable> {
    tag: u8,
    data: ManuallyDrop<Repr<S>>,
    _policy: PhantomData<D>,
}

/// Marker bound satisfied exactly by [`Variant`] instantiations; exposes
/// the alternative list and policy for higher-level dispatch utilities.
pub trait VariantType {
    /// The alternative list.
    type Alts: AltList;
    /// The default-construction policy.
    type Policy: DefaultPolicy;
    /// The number of alternatives in the set.
    const COUNT: u8;
}

impl<S: AltList, D: DefaultPolicy> VariantType for Variant<S, D> {
    type Alts = S;
    type Policy = D;
    const COUNT: u8 = <<S as Count>::Count as TagIdx>::VALUE;
}

impl<T, D: DefaultPolicy> From<T> for Variant<(T, ()), D> {
    /// Construct a single-alternative `Variant` from its value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vsum::Variant;
    ///
    /// let v: Variant![i32] = 42.into();
    /// assert_eq!(*v, 42);
    /// ```
    fn from(value: T) -> Self {
        Variant::new(value)
    }
}

impl<T, D: DefaultPolicy> Deref for Variant<(T, ()), D> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        unsafe { &*<(T, ()) as Split<T, I0>>::as_ptr(&self.data) }
    }
}

impl<T, D: DefaultPolicy> DerefMut for Variant<(T, ()), D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { &mut *<(T, ()) as Split<T, I0>>::as_mut_ptr(&mut self.data) }
    }
}

impl<T, D: DefaultPolicy> Variant<(T, ()), D> {
    pub fn into_inner(self) -> T {
        unsafe {
            let this = ManuallyDrop::new(self);
            mem::transmute_copy(&this.data)
        }
    }
}

impl<D: DefaultPolicy> Variant<(), D> {
    pub fn never(self) -> ! {
        match self.data.0 {}
    }
}

impl<Head, Tail> Default for Variant<(Head, Tail), Defaultable>
where
    Head: Default,
    Tail: AltList,
{
    /// Activates alternative 0 with its default value.
    fn default() -> Self {
        Variant::new(Head::default())
    }
}

impl<S: AltList, D: DefaultPolicy> Variant<S, D> {
    /// The number of alternatives in the set.
    pub const COUNT: u8 = <Self as VariantType>::COUNT;

    /// Constructs a variant holding `value`; the tag is resolved from the
    /// value's position in the alternative list.
    ///
    /// Constructing from a type absent from the list, or present twice,
    /// does not compile.
    pub fn new<T, I>(value: T) -> Self
    where
        S: Split<T, I>,
        I: TagIdx,
    {
        Variant {
            tag: I::VALUE,
            data: ManuallyDrop::new(S::emplace(value)),
            _policy: PhantomData,
        }
    }

    /// Replaces the live alternative with `value`, retagging.
    ///
    /// The replacement is installed and the tag updated before the
    /// displaced value is dropped, so even a panicking destructor leaves
    /// the variant holding the fully constructed new value.
    pub fn set<T, I>(&mut self, value: T)
    where
        S: Split<T, I>,
        I: TagIdx,
    {
        let old_tag = self.tag;
        // SAFETY: the live value moves into `old`; storage is rewritten
        // immediately below and `old` alone is responsible for the drop.
        let mut old = unsafe { ptr::read(&self.data) };
        self.tag = I::VALUE;
        self.data = ManuallyDrop::new(S::emplace(value));
        unsafe { S::drop_live(&mut old, old_tag) };
    }

    /// Projects the live value as `T`, or `None` when another alternative
    /// is live.
    pub fn get<T, I>(&self) -> Option<&T>
    where
        S: Split<T, I>,
        I: TagIdx,
    {
        (self.tag == I::VALUE).then(|| unsafe { &*S::as_ptr(&self.data) })
    }

    pub fn get_mut<T, I>(&mut self) -> Option<&mut T>
    where
        S: Split<T, I>,
        I: TagIdx,
    {
        (self.tag == I::VALUE).then(|| unsafe { &mut *S::as_mut_ptr(&mut self.data) })
    }

    /// The name of the live alternative's type.
    pub fn type_name(&self) -> &'static str
    where
        S: AltMeta,
    {
        S::live_name(self.tag)
    }
}

/// The alternative list `S` with `T` (at index `I`) removed.
pub type Rem<S, T, I> = <S as repr::Split<T, I>>::Remainder;
/// The index map from [`Rem`] back into `S`.
pub type RemTags<S, T, I> = <S as repr::Split<T, I>>::RemainderTags;
/// The alternative list `S` with `T` (at index `I`) replaced by `T2`.
pub type Substituted<S, T, T2, I> = <S as repr::Split<T, I>>::Substitute<T2>;
/// The alternatives of `S` left over after narrowing to `S2`.
pub type NarrowRem<S, S2, M> = <S as subset::Superset<S2, M>>::Remainder;

impl<S: AltList, D: DefaultPolicy> Variant<S, D> {
    /// Takes the live value out as `T`, or narrows to the remainder set
    /// with the tag renumbered.
    pub fn try_unwrap<T, I>(self) -> Result<T, Variant<Rem<S, T, I>, D>>
    where
        S: Split<T, I>,
        I: TagIdx,
    {
        let mut this = ManuallyDrop::new(self);
        match S::split_tag(this.tag) {
            Ok(()) => Ok(unsafe { S::take_unchecked(ManuallyDrop::take(&mut this.data)) }),
            Err(tag) => unsafe {
                let data = mem::transmute_copy(&this.data);
                Err(Variant { tag, data, _policy: PhantomData })
            },
        }
    }

    /// Replaces the alternative `T` by `T2` in the set, mapping the live
    /// value through `f` when `T` is the live alternative.
    pub fn map<T, T2, I>(self, f: impl FnOnce(T) -> T2) -> Variant<Substituted<S, T, T2, I>, D>
    where
        S: Split<T, I>,
        I: TagIdx,
    {
        let mut this = ManuallyDrop::new(self);
        let tag = this.tag;
        match S::split_tag(tag) {
            Ok(()) => {
                let data = f(unsafe { S::take_unchecked(ManuallyDrop::take(&mut this.data)) });
                let data = <Substituted<S, T, T2, I> as Split<T2, I>>::emplace(data);
                Variant {
                    tag,
                    data: ManuallyDrop::new(data),
                    _policy: PhantomData,
                }
            }
            Err(_) => unsafe {
                let data = mem::transmute_copy(&this.data);
                Variant { tag, data, _policy: PhantomData }
            },
        }
    }
}

impl<S: AltList, D: DefaultPolicy> Variant<S, D> {
    /// Embeds this variant into a superset alternative list, remapping
    /// the tag through the index map `M`.
    pub fn widen<S2, M>(self) -> Variant<S2, D>
    where
        S2: Superset<S, M>,
    {
        unsafe {
            let tag = <S2 as Superset<S, M>>::widen_tag(self.tag);
            let mut data = MaybeUninit::<Repr<S2>>::uninit();
            data.as_mut_ptr()
                .cast::<ManuallyDrop<Repr<S>>>()
                .write(ptr::read(&self.data));

            mem::forget(self);
            let data = data.assume_init();

            Variant {
                tag,
                data: ManuallyDrop::new(data),
                _policy: PhantomData,
            }
        }
    }

    /// Restricts this variant to a subset alternative list, or hands back
    /// the remainder when the live alternative is not in the subset.
    pub fn narrow<S2, M>(self) -> Result<Variant<S2, D>, Variant<NarrowRem<S, S2, M>, D>>
    where
        S: Superset<S2, M>,
        S2: AltList,
    {
        let this = ManuallyDrop::new(self);
        match <S as Superset<S2, M>>::narrow_tag(this.tag) {
            Ok(tag) => unsafe {
                let data = mem::transmute_copy(&this.data);
                Ok(Variant { tag, data, _policy: PhantomData })
            },
            Err(tag) => unsafe {
                let data = mem::transmute_copy(&this.data);
                Err(Variant { tag, data, _policy: PhantomData })
            },
        }
    }
}

impl<S: AltList, D: DefaultPolicy> Variant<S, D> {
    /// Consumes the variant, dispatching one handler object across every
    /// alternative. The handler must implement [`Handler`] for each
    /// alternative, with one shared output type; a missing impl is a
    /// compile error naming the uncovered type.
    pub fn apply<F, R>(self, f: F) -> R
    where
        S: Visit<F, R>,
    {
        let this = ManuallyDrop::new(self);
        // SAFETY: ownership of the storage moves into the visit; `this`
        // is never dropped.
        unsafe {
            let data = ptr::read(&this.data);
            S::visit(ManuallyDrop::into_inner(data), this.tag, f)
        }
    }

    /// Dispatches a handler over `&Ti` for the live alternative.
    pub fn apply_ref<'a, F, R>(&'a self, f: F) -> R
    where
        S: VisitRef<'a, F, R>,
    {
        unsafe { S::visit_ref(&self.data, self.tag, f) }
    }

    /// Dispatches a handler over `&mut Ti` for the live alternative;
    /// in-place mutation is visible to the caller and the tag is
    /// unchanged.
    pub fn apply_mut<'a, F, R>(&'a mut self, f: F) -> R
    where
        S: VisitMut<'a, F, R>,
    {
        unsafe { S::visit_mut(&mut self.data, self.tag, f) }
    }
}

impl<S: AltDebug, D: DefaultPolicy> fmt::Debug for Variant<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        unsafe { S::fmt_live(&self.data, self.tag, f) }
    }
}

impl<S: AltList, D: DefaultPolicy> Drop for Variant<S, D> {
    fn drop(&mut self) {
        unsafe { S::drop_live(&mut self.data, self.tag) }
    }
}

impl<S: AltClone, D: DefaultPolicy> Clone for Variant<S, D> {
    fn clone(&self) -> Self {
        Variant {
            tag: self.tag,
            data: unsafe { S::clone_live(&self.data, self.tag) },
            _policy: PhantomData,
        }
    }
}

impl<S: AltEq, D: DefaultPolicy> PartialEq for Variant<S, D> {
    /// Structural equality: tags equal and live values equal by the
    /// alternative's own `PartialEq`.
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && unsafe { S::eq_live(&self.data, &other.data, self.tag) }
    }
}

impl<S: AltEq + Eq, D: DefaultPolicy> Eq for Variant<S, D> {}

impl<S: AltPartialOrd, D: DefaultPolicy> PartialOrd for Variant<S, D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.tag.cmp(&other.tag) {
            Ordering::Equal => unsafe { S::partial_cmp_live(&self.data, &other.data, self.tag) },
            other => Some(other),
        }
    }
}

impl<S: AltOrd + Eq, D: DefaultPolicy> Ord for Variant<S, D> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tag
            .cmp(&other.tag)
            .then_with(|| unsafe { S::cmp_live(&self.data, &other.data, self.tag) })
    }
}

impl<S: AltHash, D: DefaultPolicy> Hash for Variant<S, D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag.hash(state);
        unsafe { S::hash_live(&self.data, self.tag, state) }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::Cell,
        panic::{self, AssertUnwindSafe},
        rc::Rc,
        string::{String, ToString},
        vec,
        vec::Vec,
    };

    use super::*;
    use crate::index::*;

    #[test]
    fn tag_follows_construction() {
        type V = Variant![u32, String, char];

        let mut v: V = Variant::new(12345u32);
        assert_eq!(v.get(), Some(&12345u32));
        assert_eq!(v.get::<String, _>(), None);

        v.set("hello".to_string());
        assert_eq!(v.get::<u32, _>(), None);
        assert_eq!(v.get(), Some(&"hello".to_string()));
        assert!(v.type_name().contains("String"));

        v.set('x');
        assert_eq!(v.get(), Some(&'x'));
        assert!(v.type_name().contains("char"));
    }

    #[test]
    fn widen_and_narrow_remap_tags() {
        type V0 = (u32, ());
        type V1 = (u32, (String, ()));
        type V2 = (u32, (String, (u32, ())));

        let v: Variant<V0> = 12345.into();
        assert_eq!(v.get(), Some(&12345));

        let mut v: Variant<V1> = v.widen();
        assert_eq!(v.get::<u32, _>(), Some(&12345));
        assert_eq!(v.get::<_, I1>(), None);

        v = Variant::new("Hello World!".to_string());
        assert_eq!(v.get(), Some(&"Hello World!".to_string()));

        let v: Variant<V2> = v.widen::<_, List![I2, I1]>();
        assert_eq!(v.get(), Some(&"Hello World!".to_string()));

        let v: Variant<V1> = v.narrow::<_, List![I0, I0]>().unwrap();
        let v: Variant<(String, ())> = v.narrow::<V0, _>().unwrap_err();
        assert_eq!(*v, "Hello World!");
    }

    struct Counted(Rc<Cell<u32>>);

    impl Drop for Counted {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn drop_runs_exactly_once_for_the_live_alternative() {
        let drops = Rc::new(Cell::new(0));

        let v: Variant![Counted, u32] = Variant::new(Counted(drops.clone()));
        drop(v);
        assert_eq!(drops.get(), 1);

        let mut v: Variant![Counted, u32] = Variant::new(Counted(drops.clone()));
        v.set(7u32);
        assert_eq!(drops.get(), 2);
        drop(v);
        assert_eq!(drops.get(), 2);
    }

    struct PanicOnDrop;

    impl Drop for PanicOnDrop {
        fn drop(&mut self) {
            panic!("destructor failure");
        }
    }

    #[test]
    fn set_survives_a_panicking_destructor() {
        let mut v: Variant![PanicOnDrop, u32] = Variant::new(PanicOnDrop);

        let caught = panic::catch_unwind(AssertUnwindSafe(|| v.set(5u32)));
        assert!(caught.is_err());

        // Never torn: the variant holds the fully constructed new value.
        assert_eq!(v.get(), Some(&5u32));
        assert_eq!(v.apply_ref(Plain), "u32");
    }

    #[test]
    fn default_activates_alternative_zero() {
        let v: Variant![u32, String] = Default::default();
        assert_eq!(v.get(), Some(&0u32));
    }

    #[test]
    fn structural_equality() {
        type V = Variant![u32, String];

        let a: V = Variant::new(3u32);
        let b: V = Variant::new(3u32);
        let c: V = Variant::new(4u32);
        let s: V = Variant::new("3".to_string());

        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(a, a);
        assert_ne!(a, c);
        assert_ne!(a, s);

        let t = s.clone();
        assert_eq!(s, t);
    }

    #[test]
    fn ordering_is_tag_major() {
        type V = Variant![u32, String];

        let a: V = Variant::new(9u32);
        let b: V = Variant::new("aaa".to_string());
        assert!(a < b);

        let c: V = Variant::new(10u32);
        assert!(a < c);
    }

    #[test]
    fn map_substitutes_the_live_alternative() {
        type V = Variant![u32, String];

        let v: V = Variant::new(21u32);
        let v: Variant![u64, String] = v.map(|n: u32| u64::from(n) * 2);
        assert_eq!(v.get(), Some(&42u64));

        let v: V = Variant::new("keep".to_string());
        let v: Variant![u64, String] = v.map(|n: u32| u64::from(n));
        assert_eq!(v.get(), Some(&"keep".to_string()));
    }

    #[test]
    fn introspection_surface() {
        type V = Variant![u32, String, char];
        assert_eq!(V::COUNT, 3);

        fn count_of<V: VariantType>() -> u8 {
            V::COUNT
        }
        assert_eq!(count_of::<V>(), 3);

        assert_handler::<u32, _>(&|n: u32| n + 1);
        assert_handler::<&u32, _>(&|n: &u32| *n + 1);
    }

    // An overload set: one handler object, one call path per type.
    struct Plain;

    impl Handler<&u32> for Plain {
        type Output = &'static str;

        fn call(self, _: &u32) -> &'static str {
            "u32"
        }
    }

    impl Handler<&String> for Plain {
        type Output = &'static str;

        fn call(self, _: &String) -> &'static str {
            "String"
        }
    }

    impl Handler<&PanicOnDrop> for Plain {
        type Output = &'static str;

        fn call(self, _: &PanicOnDrop) -> &'static str {
            "PanicOnDrop"
        }
    }

    #[test]
    fn overload_set_dispatch() {
        type V = Variant![u32, String];

        let v: V = Variant::new(1u32);
        assert_eq!(v.apply_ref(Plain), "u32");

        let v: V = Variant::new("s".to_string());
        assert_eq!(v.apply_ref(Plain), "String");
    }

    // A generic handler: accepted for any alternative its body
    // type-checks against.
    struct Render;

    impl<T: fmt::Debug> Handler<T> for Render {
        type Output = String;

        fn call(self, value: T) -> String {
            std::format!("{value:?}")
        }
    }

    #[test]
    fn generic_handler_dispatch() {
        type V = Variant![u32, char];

        let v: V = Variant::new('x');
        assert_eq!(v.apply(Render), "'x'");

        let v: V = Variant::new(3u32);
        assert_eq!(v.apply(Render), "3");
    }

    struct Push(char);

    impl Handler<&mut String> for Push {
        type Output = ();

        fn call(self, s: &mut String) {
            s.push(self.0);
        }
    }

    impl Handler<&mut Vec<char>> for Push {
        type Output = ();

        fn call(self, v: &mut Vec<char>) {
            v.push(self.0);
        }
    }

    #[test]
    fn mutation_through_dispatch_is_visible() {
        type V = Variant![String, Vec<char>];

        let mut v: V = Variant::new("ab".to_string());
        v.apply_mut(Push('c'));
        v.apply_mut(Push('d'));
        assert_eq!(v.get(), Some(&"abcd".to_string()));

        let mut v: V = Variant::new(vec!['a']);
        v.apply_mut(Push('b'));
        assert_eq!(v.get(), Some(&vec!['a', 'b']));
    }
}
