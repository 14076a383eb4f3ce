use proc_macro::TokenStream;

mod expand;

/// Exhaustive structural match over a `vsum` variant.
///
/// `match_variant!(expr { arms })` claims alternative types arm by arm,
/// in order; the first arm whose pattern can accept the live alternative
/// runs. Every alternative must be claimed by exactly one unconditional
/// arm (guarded and literal arms fall through), and an arm shadowed by
/// an earlier claim of the same type is rejected. Both checks happen at
/// compile time; the expansion is a plain branch on the live tag.
#[proc_macro]
pub fn match_variant(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as expand::MatchInput);
    expand::expand(input, expand::Mode::Exhaustive).into()
}

/// Partial structural match over a `vsum` variant.
///
/// Like `match_variant!`, but alternatives may go unclaimed: arm results
/// are wrapped in `Ok`, and dispatching an unclaimed alternative returns
/// `Err(vsum::NoMatch)` naming the unhandled type instead of failing the
/// build.
#[proc_macro]
pub fn try_match_variant(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as expand::MatchInput);
    expand::expand(input, expand::Mode::Partial).into()
}
