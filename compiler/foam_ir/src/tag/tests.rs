use pretty_assertions::assert_eq;

use super::*;

#[test]
fn table_has_fixed_order() {
    assert_eq!(FoamTag::COUNT, 90);
    assert_eq!(FoamTag::Nil.ordinal(), 0);
    assert_eq!(FoamTag::NOp.ordinal(), 15);
    assert_eq!(FoamTag::Unimp.ordinal(), 51);
    assert_eq!(FoamTag::Par.ordinal(), 55);
    assert_eq!(FoamTag::Lex.ordinal(), 67);
    assert_eq!(FoamTag::Prog.ordinal(), 89);
}

#[test]
fn ordinals_round_trip() {
    for &tag in FoamTag::ALL {
        assert_eq!(FoamTag::from_u8(tag.ordinal()), Some(tag));
        assert_eq!(FoamTag::from_i64(i64::from(tag.ordinal())), Some(tag));
    }
    assert_eq!(FoamTag::from_u8(90), None);
    assert_eq!(FoamTag::from_i64(-1), None);
}

#[test]
fn arity_follows_shape() {
    assert_eq!(FoamTag::Nil.arity(), Arity::Fixed(0));
    assert_eq!(FoamTag::Cast.arity(), Arity::Fixed(2));
    assert_eq!(FoamTag::GDecl.arity(), Arity::Fixed(6));
    assert_eq!(FoamTag::Seq.arity(), Arity::Nary);
    assert_eq!(FoamTag::Prog.arity(), Arity::Nary);
    assert!(FoamTag::DEnv.is_nary());
    assert!(!FoamTag::EElt.is_nary());
}

#[test]
fn ranges_partition_the_table() {
    for &tag in FoamTag::ALL {
        assert_eq!(tag.is_data_type(), tag < FoamTag::NOp, "{tag}");
        assert_eq!(tag.is_extended(), tag >= FoamTag::Unimp, "{tag}");
    }
    assert!(FoamTag::Int128.is_data_type());
    assert!(!FoamTag::BVal.is_extended());
}

#[test]
fn sequence_exits() {
    assert!(FoamTag::Return.props().contains(TagProps::SEQ_EXIT));
    assert!(FoamTag::Throw.props().contains(TagProps::SEQ_EXIT));
    assert!(FoamTag::Goto.props().is_empty());
}

#[test]
fn info_row_matches_accessors() {
    let info = FoamTag::Decl.info();
    assert_eq!(info.name, "Decl");
    assert_eq!(info.shape.as_str(), "tswi");
    assert_eq!(info.arity, Arity::Fixed(4));
    assert_eq!(format!("{}", FoamTag::BCall), "BCall");
    assert_eq!(format!("{:?}", FoamTag::BCall), "FoamTag::BCall");
}
