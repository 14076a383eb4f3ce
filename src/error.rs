//! The one runtime failure this crate introduces.

use core::fmt;

/// A partial match found no handler for the live alternative.
///
/// Returned by `try_match_variant!`; carries the name of the type that
/// went unhandled. Every other failure class of this crate is a
/// definition-time (compile) error.
#[derive(Clone, PartialEq, Eq)]
pub struct NoMatch {
    type_name: &'static str,
}

impl NoMatch {
    #[doc(hidden)]
    pub fn new(type_name: &'static str) -> Self {
        NoMatch { type_name }
    }

    /// The name of the alternative type no handler matched.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for NoMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoMatch")
            .field("type_name", &self.type_name)
            .finish()
    }
}

impl fmt::Display for NoMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no matching handler for type `{}`", self.type_name)
    }
}

impl core::error::Error for NoMatch {}
