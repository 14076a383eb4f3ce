/// Names a [`struct@Variant`] type from a list of alternative types.
///
/// The `no_default;` form disables default construction for the whole
/// variant at definition time, even when alternative 0 is defaultable.
///
/// # Examples
///
/// ```rust
/// use vsum::Variant;
///
/// type Value = Variant![i32, u32, f64];
/// let v: Value = Variant::new(42u32);
///
/// type Opaque = Variant![no_default; i32, u32];
/// ```
///
/// [`struct@Variant`]: crate::Variant
#[macro_export]
macro_rules! Variant {
    [no_default; $($t:ty),* $(,)?] => [$crate::Variant::<$crate::List![$($t,)*], $crate::NoDefault>];
    [$($t:ty),* $(,)?] => [$crate::Variant::<$crate::List![$($t,)*]>];
}

/// Names a type-level cons list from a list of types.
///
/// The value form of this macro is [`list`].
///
/// # Examples
///
/// ```rust
/// use vsum::List;
///
/// type MyList = List![i32, u32, f64];
/// let list: MyList = (42i32, (42u32, (42.0f64, ())));
/// ```
#[macro_export]
macro_rules! List {
    [] => [()];
    [$head:ty $(, $t:ty)* $(,)?] => [($head, $crate::List!($($t,)*))];
}

/// Builds a cons-list value from a list of values.
///
/// The type form of this macro is [`List`].
///
/// # Examples
///
/// ```rust
/// use vsum::list;
///
/// type MyList = (i32, (u32, (f64, ())));
/// let list: MyList = list![42i32, 42u32, 42.0f64];
/// ```
#[macro_export]
macro_rules! list {
    [] => [()];
    [$head:expr $(, $t:expr)* $(,)?] => [($head, $crate::list!($($t,)*))];
}
