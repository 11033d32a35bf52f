use super::*;

#[test]
fn fixed_shape_kinds() {
    let shape = Shape::new("tswi");
    assert!(!shape.is_nary());
    assert_eq!(shape.min_argc(), 4);
    assert!(shape.accepts_argc(4));
    assert!(!shape.accepts_argc(5));
    let kinds: Vec<_> = shape.kinds(4).collect();
    assert_eq!(
        kinds,
        vec![FieldKind::TypeTag, FieldKind::Str, FieldKind::Word, FieldKind::Index]
    );
}

#[test]
fn nary_tail_repeats() {
    let shape = Shape::new("ptC*");
    assert!(shape.is_nary());
    assert_eq!(shape.nary_start(), 2);
    assert!(shape.accepts_argc(2));
    assert!(shape.accepts_argc(9));
    assert!(!shape.accepts_argc(1));
    assert_eq!(shape.kind_at(0), FieldKind::Protocol);
    assert_eq!(shape.kind_at(1), FieldKind::TypeTag);
    assert_eq!(shape.kind_at(2), FieldKind::Child);
    assert_eq!(shape.kind_at(7), FieldKind::Child);
}

#[test]
fn all_repeated_shape() {
    let shape = Shape::new("i*");
    assert_eq!(shape.nary_start(), 0);
    assert!(shape.accepts_argc(0));
    assert_eq!(shape.kind_at(3), FieldKind::Index);
}

#[test]
fn well_formedness() {
    assert!(Shape::new("").is_well_formed());
    assert!(Shape::new("XFtwwwwwC*").is_well_formed());
    assert!(!Shape::new("*").is_well_formed());
    assert!(!Shape::new("C*C").is_well_formed());
    assert!(!Shape::new("q").is_well_formed());
}

#[test]
fn kind_codes_round_trip() {
    for c in b"topDbhwiLXFsfdnC!" {
        let kind = FieldKind::from_char(*c).unwrap();
        assert_eq!(kind.code(), char::from(*c));
    }
    assert!(FieldKind::Str.is_owned());
    assert!(!FieldKind::Str.is_integral());
    assert!(FieldKind::Label.is_integral());
}

#[test]
#[should_panic(expected = "malformed shape string \"tC\": no kind for slot 2")]
fn kind_past_fixed_end_panics() {
    let _ = Shape::new("tC").kind_at(2);
}
