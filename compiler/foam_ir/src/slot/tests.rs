use super::*;

#[test]
fn bint_normalizes_high_zero_places() {
    let lit = BIntLit::from_places(true, vec![5, 0, 0]);
    assert_eq!(lit.places(), &[5]);
    assert!(lit.is_negative());
    assert!(!BIntLit::from_places(true, vec![0]).is_negative());
}

#[test]
fn bint_i128_conversion() {
    let big = (1i128 << 80) + 0x1234;
    assert_eq!(BIntLit::from_i128(big).to_i128(), Some(big));
    assert_eq!(BIntLit::from_i128(-42).to_i128(), Some(-42));
    assert_eq!(BIntLit::from_i128(i128::MIN).to_i128(), Some(i128::MIN));
    assert_eq!(BIntLit::from_i128(0).to_i128(), Some(0));
}

#[test]
fn bint_hex_text() {
    let lit = BIntLit::from_i128(0x1_0000_abcd);
    assert_eq!(lit.to_hex(), "10000abcd");
    assert_eq!(BIntLit::from_hex(false, "10000abcd"), Some(lit));
    assert_eq!(BIntLit::from_hex(false, "xyz"), None);
}

#[test]
fn floats_compare_by_bits() {
    assert_eq!(Slot::DFlo(f64::NAN), Slot::DFlo(f64::NAN));
    assert_ne!(Slot::SFlo(0.0), Slot::SFlo(-0.0));
}

#[test]
fn zero_slots_match_their_kind() {
    for kind in [FieldKind::Str, FieldKind::Child, FieldKind::Index, FieldKind::DFlo] {
        assert!(Slot::zero(kind).matches(kind));
    }
    assert!(!Slot::Int(1).matches(FieldKind::Child));
}
