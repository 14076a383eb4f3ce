use vsum::{match_variant, try_match_variant, Variant};

type Token = Variant![i64, String, char];

#[test]
fn exhaustive_dispatch_reaches_every_alternative() {
    let describe = |t: Token| {
        match_variant!(t {
            n @ i64 => format!("int {n}"),
            s @ String => format!("str {s}"),
            c @ char => format!("char {c}"),
        })
    };

    assert_eq!(describe(Variant::new(42i64)), "int 42");
    assert_eq!(describe(Variant::new("hi".to_string())), "str hi");
    assert_eq!(describe(Variant::new('x')), "char x");
}

#[test]
fn arms_are_tried_in_order() {
    // The guarded arm claims i64 first; only when the guard rejects does
    // the value fall through to the later unconditional i64 arm.
    let bucket = |t: Token| {
        match_variant!(t {
            n @ i64 if n > 100 => "big",
            n @ i64 => {
                let _ = n;
                "small"
            }
            _ => "other",
        })
    };

    assert_eq!(bucket(Variant::new(1000i64)), "big");
    assert_eq!(bucket(Variant::new(7i64)), "small");
    assert_eq!(bucket(Variant::new('q')), "other");
}

#[test]
fn literal_patterns_fall_through() {
    let v: Variant![i64, char] = Variant::new(0i64);
    let out = match_variant!(v {
        0i64 => "zero",
        n @ i64 => {
            let _ = n;
            "nonzero"
        }
        char => "char",
    });
    assert_eq!(out, "zero");

    let v: Variant![i64, char] = Variant::new(3i64);
    let out = match_variant!(v {
        0i64 => "zero",
        i64 => "nonzero",
        char => "char",
    });
    assert_eq!(out, "nonzero");
}

#[test]
fn or_patterns_claim_several_alternatives() {
    let classify = |t: Token| {
        match_variant!(t {
            i64 | char => "scalar",
            String => "text",
        })
    };

    assert_eq!(classify(Variant::new(5i64)), "scalar");
    assert_eq!(classify(Variant::new('z')), "scalar");
    assert_eq!(classify(Variant::new("w".to_string())), "text");
}

#[test]
fn wildcard_claims_the_remaining_alternatives() {
    let t: Token = Variant::new("abc".to_string());
    let len = match_variant!(t {
        s @ String => s.len(),
        _ => 0,
    });
    assert_eq!(len, 3);

    let t: Token = Variant::new('c');
    let len = match_variant!(t {
        s @ String => s.len(),
        _ => 0,
    });
    assert_eq!(len, 0);
}

#[test]
fn partial_dispatch_reports_the_unhandled_type() {
    let digits = |t: Token| {
        try_match_variant!(t {
            n @ i64 => n.to_string(),
            s @ String => s,
        })
    };

    assert_eq!(digits(Variant::new(12i64)).unwrap(), "12");
    assert_eq!(digits(Variant::new("ok".to_string())).unwrap(), "ok");

    let err = digits(Variant::new('x')).unwrap_err();
    assert!(err.type_name().contains("char"));
    assert!(err.to_string().contains("char"));
}

#[test]
fn partial_dispatch_falls_off_a_rejecting_guard() {
    let v: Variant![i64, char] = Variant::new(3i64);
    let out = try_match_variant!(v {
        n @ i64 if n > 10 => "big",
    });
    assert!(out.unwrap_err().type_name().contains("i64"));

    let v: Variant![i64, char] = Variant::new(30i64);
    let out = try_match_variant!(v {
        n @ i64 if n > 10 => "big",
    });
    assert_eq!(out.unwrap(), "big");
}

#[test]
fn structured_subpatterns_destructure_the_alternative() {
    #[derive(Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    let v: Variant![Point, i64] = Variant::new(Point { x: 3, y: 4 });
    let out = match_variant!(v {
        Point { x, y } => x + y,
        n @ i64 => n as i32,
    });
    assert_eq!(out, 7);
}

struct Tree(Variant![i32, Kids]);
type Kids = Vec<Tree>;

fn total(tree: Tree) -> i32 {
    match_variant!(tree.0 {
        n @ i32 => n,
        kids @ Kids => kids.into_iter().map(total).sum(),
    })
}

#[test]
fn recursion_through_an_indirect_alternative() {
    let tree = Tree(Variant::new(vec![
        Tree(Variant::new(1i32)),
        Tree(Variant::new(vec![Tree(Variant::new(2i32)), Tree(Variant::new(3i32))])),
    ]));
    assert_eq!(total(tree), 6);
}

#[test]
fn match_consumes_and_returns_the_alternative_value() {
    let t: Token = Variant::new("owned".to_string());
    let s: String = match_variant!(t {
        s @ String => s,
        _ => String::new(),
    });
    assert_eq!(s, "owned");
}
