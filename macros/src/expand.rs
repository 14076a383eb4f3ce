use std::iter;

use const_random::const_random;
use convert_case::{Case, Casing};
use either::Either::{Left, Right};
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote, ToTokens};
use syn::{parse::Parse, spanned::Spanned, visit::Visit, *};

/// Whether an unclaimed alternative is a type error or a runtime
/// `NoMatch`.
#[derive(Clone, Copy, PartialEq)]
pub enum Mode {
    Exhaustive,
    Partial,
}

/// Primitive type names double as alternative types in patterns even
/// though they are not Pascal-case.
const PRIMITIVES: &[&str] = &[
    "bool", "char", "f32", "f64", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32",
    "u64", "u128", "usize",
];

fn is_type_ident(ident: &Ident) -> bool {
    let name = ident.to_string();
    name.is_case(Case::Pascal) || PRIMITIVES.contains(&name.as_str())
}

fn is_bare_type_ident(pat: &Pat) -> bool {
    matches!(pat, Pat::Ident(inner) if inner.subpat.is_none() && is_type_ident(&inner.ident))
}

/// The alternative types one arm claims, collected by walking its
/// pattern.
#[derive(Default)]
struct ArmTypes {
    /// A `name @ ...` binding waiting for the type it belongs to.
    binding: Option<PatIdent>,
    /// The arm claims every remaining alternative.
    wildcard: bool,
    /// Claimed alternative types, in pattern order.
    types: Vec<Type>,
    /// The pattern to run the arm under, per claimed type.
    pats: Vec<Pat>,
    /// The arm may reject its value at runtime (guard, literal or
    /// refutable subpattern), so later arms may claim the same types.
    fallthrough: bool,

    in_subpat: bool,
    err: Option<Error>,
}

impl ArmTypes {
    fn claim(&mut self, ty: &Type) -> bool {
        if self.types.iter().any(|seen| seen == ty) {
            self.err = Some(Error::new_spanned(
                ty,
                "this alternative type is already claimed by an earlier pattern in this arm",
            ));
            return false;
        }
        true
    }

    fn record(&mut self, ty: Type, binding: Option<PatIdent>, pat: &Pat) {
        self.types.push(ty);
        self.pats.push(match binding {
            // A bare type ident carries no structure worth rebinding;
            // keeping it as a subpattern would introduce a second
            // by-move binding of the same value.
            Some(ident) if is_bare_type_ident(pat) => Pat::Ident(ident),
            Some(mut ident) => {
                ident.subpat = Some((<Token![@]>::default(), Box::new(pat.clone())));
                Pat::Ident(ident)
            }
            None => pat.clone(),
        });
    }

    /// An unconditional claim of a type already claimed unconditionally
    /// by an earlier arm can never run.
    fn conflict_with(&self, earlier: &Self) -> Option<Error> {
        self.types.iter().find_map(|ty| {
            let clash = earlier.types.iter().any(|seen| seen == ty);
            (clash && !self.fallthrough && !earlier.fallthrough).then(|| {
                Error::new_spanned(
                    ty,
                    "unreachable arm: this alternative type is claimed by an earlier arm",
                )
            })
        })
    }
}

impl Visit<'_> for ArmTypes {
    fn visit_pat(&mut self, pat: &'_ Pat) {
        match pat {
            Pat::Ident(ident) => {
                if !self.in_subpat {
                    if ident.subpat.is_none() && is_type_ident(&ident.ident) {
                        let ty = Type::Path(TypePath {
                            qself: None,
                            path: Path::from(ident.ident.clone()),
                        });

                        if self.claim(&ty) {
                            let binding = self.binding.take();
                            self.record(ty, binding, pat);
                        }

                        return;
                    }

                    let mut binding = ident.clone();
                    binding.subpat = None;
                    self.binding = Some(binding);
                }
                visit::visit_pat(self, pat);
            }

            Pat::Struct(PatStruct { qself, path, .. })
            | Pat::TupleStruct(PatTupleStruct { qself, path, .. })
            | Pat::Path(PatPath { qself, path, .. }) => {
                assert!(!self.in_subpat);

                let ty = Type::Path(TypePath {
                    qself: qself.clone(),
                    path: path.clone(),
                });

                if self.claim(&ty) {
                    let binding = self.binding.take();

                    self.in_subpat = true;
                    visit::visit_pat(self, pat);
                    self.in_subpat = false;

                    self.record(ty, binding, pat);
                }
            }

            Pat::Paren(_) => visit::visit_pat(self, pat),
            Pat::Or(_) => {
                if !self.in_subpat {
                    if let Some(binding) = self.binding.take() {
                        self.err = Some(Error::new_spanned(
                            binding,
                            "binding one name across patterns for different alternative types \
                             is not supported",
                        ));
                        return;
                    }
                }
                visit::visit_pat(self, pat)
            }

            Pat::Lit(lit) if !self.in_subpat => {
                self.fallthrough = true;
                let mut err = None;
                let inferred = match &lit.lit {
                    Lit::Str(_) => Some(parse_quote!(&str)),
                    Lit::ByteStr(_) => Some(parse_quote!(&[u8])),
                    Lit::CStr(_) => Some(parse_quote!(&::core::ffi::CStr)),
                    Lit::Byte(_) => Some(parse_quote!(u8)),
                    Lit::Char(_) => Some(parse_quote!(char)),
                    Lit::Int(int) => parse_str(int.suffix())
                        .inspect_err(|_| {
                            err = Some(Error::new_spanned(
                                pat,
                                "an integer literal pattern needs a type suffix here",
                            ))
                        })
                        .ok(),
                    Lit::Float(float) => parse_str(float.suffix())
                        .inspect_err(|_| {
                            err = Some(Error::new_spanned(
                                pat,
                                "a float literal pattern needs a type suffix here",
                            ))
                        })
                        .ok(),
                    Lit::Bool(_) => Some(parse_quote!(bool)),
                    _ => None,
                };
                match inferred {
                    Some(ty) => {
                        if self.claim(&ty) {
                            let binding = self.binding.take();
                            self.record(ty, binding, pat);
                        }
                    }
                    None => {
                        self.err = err.or_else(|| {
                            Some(Error::new_spanned(
                                pat,
                                format_args!(
                                    "the pattern {} is not supported",
                                    pat.to_token_stream()
                                ),
                            ))
                        })
                    }
                }
            }

            Pat::Wild(_) | Pat::Range(ExprRange { start: None, end: None, .. }) | Pat::Rest(_)
                if !self.in_subpat =>
            {
                self.wildcard = true;
            }

            Pat::Const(_)
            | Pat::Range(_)
            | Pat::Macro(_)
            | Pat::Reference(_)
            | Pat::Slice(_)
            | Pat::Type(_)
            | Pat::Verbatim(_)
            | Pat::Tuple(_)
                if !self.in_subpat =>
            {
                self.err = Some(Error::new_spanned(
                    pat,
                    format_args!("the pattern {} is not supported", pat.to_token_stream()),
                ))
            }

            Pat::Const(_) | Pat::Lit(_) => {
                self.fallthrough = true;
                visit::visit_pat(self, pat)
            }
            Pat::Range(ExprRange { start, end, .. }) if start.is_some() || end.is_some() => {
                self.fallthrough = true;
                visit::visit_pat(self, pat)
            }

            _ => visit::visit_pat(self, pat),
        }
    }
}

pub struct MatchArm {
    pat: ArmTypes,
    guard: Option<Box<Expr>>,
    body: Box<Expr>,
}

impl Parse for MatchArm {
    fn parse(input: parse::ParseStream<'_>) -> Result<Self> {
        let Arm { attrs, pat, guard, body, .. } = input.parse()?;

        if let Some(first) = attrs.first() {
            return Err(Error::new(
                first.span(),
                "custom attributes are not supported on match arms",
            ));
        }

        let mut types = ArmTypes::default();
        types.visit_pat(&pat);

        if let Some(err) = types.err.take() {
            return Err(err);
        }

        if types.types.is_empty() && !types.wildcard {
            return Err(Error::new_spanned(
                &pat,
                "cannot infer any alternative type; name at least one type in the pattern",
            ));
        }

        if types.wildcard && guard.is_some() {
            return Err(Error::new_spanned(
                &pat,
                "a guard is not supported on a wildcard arm",
            ));
        }

        if guard.is_some() {
            types.fallthrough = true;
        }

        Ok(MatchArm {
            pat: types,
            guard: guard.map(|(_, expr)| expr),
            body,
        })
    }
}

pub struct MatchInput {
    scrutinee: Box<Expr>,
    attrs: Vec<Attribute>,
    arms: Vec<MatchArm>,
}

impl Parse for MatchInput {
    fn parse(input: parse::ParseStream<'_>) -> Result<Self> {
        let scrutinee = Box::new(Expr::parse_without_eager_brace(input)?);

        let content;
        braced!(content in input);

        let attrs = Attribute::parse_inner(&content)?;

        let mut arms = Vec::new();
        while !content.is_empty() {
            arms.push(content.parse()?);
        }

        Ok(MatchInput { scrutinee, attrs, arms })
    }
}

/// Arms after an unconditional wildcard can never run.
fn after_wildcard(arms: &[MatchArm]) -> Option<Error> {
    let wildcard = (arms.iter()).position(|arm| arm.pat.wildcard && !arm.pat.fallthrough)?;
    arms.get(wildcard + 1).map(|arm| {
        Error::new(
            arm.body.span(),
            "unreachable arm: a preceding wildcard arm claims every remaining alternative",
        )
    })
}

fn expand_body(attrs: &[Attribute], arms: &[MatchArm], base: &Ident, mode: Mode) -> TokenStream {
    let done = Lifetime::new(
        &format!("'__variant_match_done{}", const_random!(u32)),
        Span::call_site(),
    );
    let arm_label = Lifetime::new(
        &format!("'__variant_match_arm{}", const_random!(u32)),
        Span::call_site(),
    );

    let ok_wrap = match mode {
        Mode::Exhaustive => quote!(ret),
        Mode::Partial => quote!(::core::result::Result::Ok(ret)),
    };

    // The inner per-case closures copy these references; the labels are
    // interpolated again in the tail below.
    let done = &done;
    let arm_label = &arm_label;
    let ok_wrap = &ok_wrap;

    let branches = arms.iter().flat_map(|arm| {
        let MatchArm { pat, guard, body } = arm;
        let ArmTypes { wildcard, types, pats, fallthrough, .. } = pat;

        if *wildcard {
            Left(iter::once(quote! {
                let #base = match #base.narrow::<(), _>() {
                    #[allow(unreachable_code)]
                    Err(_) => {
                        #[warn(unreachable_code)]
                        let ret = #arm_label: { #body };
                        break #done #ok_wrap;
                    },
                    Ok(claimed) => claimed,
                };
            }))
        } else {
            let cases = (types.iter().zip(pats)).zip(iter::repeat((&*guard, &**body)));
            Right(cases.map(move |((ty, pat), (guard, body))| {
                let success = quote! {{
                    #[warn(unreachable_code, clippy::diverging_sub_expression)]
                    let ret = #arm_label: { #body };
                    break #done #ok_wrap;
                }};
                match guard {
                    Some(guard) => quote! {
                        let mut #base = #base;
                        #base = match #base.try_unwrap::<#ty, _>() {
                            #[allow(unreachable_code, unused_variables, non_snake_case)]
                            #[allow(clippy::diverging_sub_expression)]
                            Ok(#pat) if #guard => #success,
                            Ok(res) => ::vsum::Variant::new(res),
                            Err(rem) => rem.widen(),
                        };
                    },
                    None if *fallthrough => quote! {
                        let mut #base = #base;
                        #base = match #base.try_unwrap::<#ty, _>() {
                            #[allow(unreachable_code, unused_variables, non_snake_case)]
                            #[allow(clippy::diverging_sub_expression)]
                            Ok(#pat) => #success,
                            Ok(res) => ::vsum::Variant::new(res),
                            Err(rem) => rem.widen(),
                        };
                    },
                    None => quote! {
                        let #base = match #base.try_unwrap::<#ty, _>() {
                            #[allow(unreachable_code, unused_variables, non_snake_case)]
                            #[allow(clippy::diverging_sub_expression)]
                            Ok(#pat) => #success,
                            Err(rem) => rem,
                        };
                    },
                }
            }))
        }
    });

    let tail = match mode {
        Mode::Exhaustive => quote! {
            let #base: ::vsum::Variant<(), _> = #base;
            #base.never()
        },
        Mode::Partial => quote! {
            break #done ::core::result::Result::Err(
                ::vsum::NoMatch::new(#base.type_name()),
            )
        },
    };

    quote! {#done: {
        #(#attrs)*
        #(#branches)*
        #tail
    }}
}

pub fn expand(input: MatchInput, mode: Mode) -> TokenStream {
    let MatchInput { scrutinee, attrs, arms } = input;
    let base = format_ident!("__variant_match_base{}", const_random!(u32));

    if let Some(err) = (arms.iter().enumerate())
        .flat_map(|(index, later)| arms.iter().take(index).map(move |earlier| (later, earlier)))
        .find_map(|(later, earlier)| later.pat.conflict_with(&earlier.pat))
    {
        return err.to_compile_error();
    }

    if let Some(err) = after_wildcard(&arms) {
        return err.to_compile_error();
    }

    let body = expand_body(&attrs, &arms, &base, mode);
    quote! {{
        let #base = #scrutinee;
        #body
    }}
}
