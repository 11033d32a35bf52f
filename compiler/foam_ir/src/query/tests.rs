use pretty_assertions::assert_eq;

use crate::fields::ProgHeader;

use super::*;

// === Helpers ===

fn empty_prog(arena: &mut FoamArena, info: ProgInfo) -> FoamId {
    let params = arena.new_ddecl(DDeclUsage::Param, &[]);
    let locals = arena.new_ddecl(DDeclUsage::Local, &[]);
    let fluids = arena.new_dfluid(&[]);
    let levels = arena.new_denv(&[4]);
    let body = arena.new_seq(&[]);
    let header = ProgHeader { info, ..ProgHeader::default() };
    arena.new_prog(header, params, locals, fluids, levels, body)
}

/// Unit with globals `[g0]`, consts `[c0, c1]`, and two `Def`s binding
/// `Const 1` and `Glo 0`.
fn sample_unit(arena: &mut FoamArena) -> FoamId {
    let g0 = arena.new_gdecl(FoamTag::Clos, "main", 0, 4, true, ProtoTag::Foam);
    arena.set_syme(g0, Some(SymeId::new(1)));
    let globals = arena.new_ddecl(DDeclUsage::Global, &[g0]);
    let c0 = arena.new_scalar_decl(FoamTag::Prog, "c0");
    let c1 = arena.new_scalar_decl(FoamTag::Prog, "c1");
    arena.set_syme(c1, Some(SymeId::new(2)));
    let consts = arena.new_ddecl(DDeclUsage::Consts, &[c0, c1]);
    let formats = arena.new_dfmt(&[globals, consts]);

    let p1 = empty_prog(arena, ProgInfo::COROUTINE);
    let lhs1 = arena.new_const(1);
    let def1 = arena.new_def(lhs1, p1);
    let lhs2 = arena.new_glo(0);
    let clos_env = arena.new_env(0);
    let clos_prog = arena.new_const(1);
    let clos = arena.new_clos(clos_env, clos_prog);
    let def2 = arena.new_def(lhs2, clos);
    let defs = arena.new_ddef(&[def1, def2]);
    arena.new_unit(formats, defs)
}

// === Navigation ===

#[test]
fn format_lookups() {
    let mut arena = FoamArena::new();
    let u = sample_unit(&mut arena);
    let formats = arena.child(u, unit::FORMATS);
    assert_eq!(format_len(&arena, formats, 0), 1);
    assert_eq!(format_len(&arena, formats, 1), 2);
    assert_eq!(format_len(&arena, formats, 9), 0);
    assert_eq!(format_usage(&arena, formats, 1), Some(DDeclUsage::Consts));

    let consts = format_ddecl(&arena, formats, 1).unwrap();
    let c1 = ddecl_decl(&arena, consts, 1).unwrap();
    assert_eq!(arena.str_at(c1, decl::ID), "c1");
    assert_eq!(ddecl_decl(&arena, consts, 2), None);
    assert_eq!(ddecl_decl(&arena, consts, -1), None);
}

#[test]
fn const_vector_indexes_definitions() {
    let mut arena = FoamArena::new();
    let u = sample_unit(&mut arena);
    let consts = const_vector(&arena, u);
    assert_eq!(consts.len(), 2);
    assert_eq!(consts[0], FoamId::NONE);
    assert_eq!(arena.tag(consts[1]), FoamTag::Prog);
}

#[test]
fn symbols_skip_the_globals_format() {
    let mut arena = FoamArena::new();
    let u = sample_unit(&mut arena);
    assert_eq!(syme_list(&arena, u), vec![SymeId::new(2)]);
}

#[test]
fn coroutine_detection() {
    let mut arena = FoamArena::new();
    let u = sample_unit(&mut arena);
    assert!(unit_has_coroutine(&arena, u));

    let p = const_vector(&arena, u)[1];
    arena.set_int(p, prog::INFO_BITS, 0);
    assert!(!unit_has_coroutine(&arena, u));
}

#[test]
fn gdecl_direction() {
    let mut arena = FoamArena::new();
    let export = arena.new_gdecl(FoamTag::Word, "f", 0, 4, true, ProtoTag::C);
    let import = arena.new_gdecl(FoamTag::Word, "g", 0, 4, false, ProtoTag::C);
    assert!(gdecl_is_export(&arena, export));
    assert!(gdecl_is_import(&arena, import));
    assert!(gdecl_is_export_of(&arena, ProtoTag::C, export));
    assert!(!gdecl_is_export_of(&arena, ProtoTag::Lisp, export));
    assert!(!gdecl_is_export_of(&arena, ProtoTag::C, import));
}

#[test]
fn declarations_compare_by_type_and_format() {
    let mut arena = FoamArena::new();
    let a = arena.new_decl(FoamTag::Rec, "a", -1, 7);
    let b = arena.new_decl(FoamTag::Rec, "b", 3, 7);
    let c = arena.new_decl(FoamTag::Rec, "c", -1, 8);
    assert!(decl_equal(&arena, a, b));
    assert!(!decl_equal(&arena, a, c));
}

// === Predicates ===

#[test]
fn multi_assignment() {
    let mut arena = FoamArena::new();
    let a = arena.new_loc(0);
    let b = arena.new_loc(1);
    let lhs = arena.new_values(&[a, b]);
    let f = arena.new_glo(0);
    let rhs = arena.new_ccall(FoamTag::NOp, f, &[]);
    let multi = arena.new_set(lhs, rhs);
    assert!(is_multi_assign(&arena, multi));

    let single_lhs = arena.new_loc(0);
    let single_rhs = arena.new_sint(1);
    let single = arena.new_set(single_lhs, single_rhs);
    assert!(!is_multi_assign(&arena, single));
}

#[test]
fn refs_and_data() {
    let mut arena = FoamArena::new();
    let loc = arena.new_loc(0);
    let lit = arena.new_sint(3);
    let cast = arena.new_cast(FoamTag::Word, lit);
    let call = arena.new_bcall(BValTag::BoolTrue, &[]);
    assert!(is_ref(&arena, loc));
    assert!(!is_ref(&arena, lit));
    assert!(is_data(&arena, cast));
    assert!(!is_data(&arena, call));
}

#[test]
fn side_effects() {
    let mut arena = FoamArena::new();
    let a = arena.new_sint(1);
    let b = arena.new_sint(2);
    let pure = arena.new_bcall(BValTag::SIntPlus, &[a, b]);
    assert!(!has_side_effect(&arena, pure));

    let arg = arena.new_sint(0);
    let halt = arena.new_bcall(BValTag::Halt, &[arg]);
    let cast = arena.new_cast(FoamTag::Word, halt);
    assert!(has_side_effect(&arena, cast));

    let inner = arena.new_prog_empty();
    assert!(!has_side_effect(&arena, inner));
}

#[test]
fn control_flow() {
    let mut arena = FoamArena::new();
    let goto = arena.new_goto(1);
    let nil = arena.new_nil();
    assert!(is_control_flow(&arena, goto));
    assert!(!is_control_flow(&arena, nil));
}

#[test]
fn find_first_is_preorder() {
    let mut arena = FoamArena::new();
    let inner = arena.new_loc(1);
    let ret = arena.new_return(inner);
    let outer = arena.new_loc(0);
    let set_lit = arena.new_sint(1);
    let set = arena.new_set(outer, set_lit);
    let seq = arena.new_seq(&[set, ret]);
    assert_eq!(find_first_tag(&arena, seq, FoamTag::Loc), Some(outer));
    assert_eq!(find_first_tag(&arena, seq, FoamTag::Goto), None);
    let found = find_first(&arena, seq, &mut |a: &FoamArena, n: FoamId| {
        a.tag(n) == FoamTag::Loc && a.int(n, 0) == 1
    });
    assert_eq!(found, Some(inner));
}

#[test]
fn counting_statements() {
    let mut arena = FoamArena::new();
    let l0 = arena.new_label(0);
    let g = arena.new_goto(0);
    let l1 = arena.new_label(1);
    let seq = arena.new_seq(&[l0, g, l1]);
    assert_eq!(count_subtrees_of_kind(&arena, seq, FoamTag::Label), 2);
    assert_eq!(count_subtrees_of_kind(&arena, seq, FoamTag::If), 0);
}

#[test]
fn reachability_in_sequences() {
    let mut arena = FoamArena::new();
    let a = arena.new_nop();
    let g = arena.new_goto(1);
    let dead = arena.new_nop();
    let l = arena.new_label(1);
    let v = arena.new_values(&[]);
    let r = arena.new_return(v);
    let tail = arena.new_nop();
    let seq = arena.new_seq(&[a, g, dead, l, r, tail]);
    assert_eq!(seq_next_reachable(&arena, seq, -1), 0);
    assert_eq!(seq_next_reachable(&arena, seq, 0), 1);
    assert_eq!(seq_next_reachable(&arena, seq, 1), 3);
    assert_eq!(seq_next_reachable(&arena, seq, 4), -1);
    assert_eq!(seq_next_reachable(&arena, seq, 5), -1);
}

#[test]
fn char_arrays_become_strings() {
    let mut arena = FoamArena::new();
    let arr = arena.new_arr_of_str("hello");
    assert_eq!(arr_to_string(&arena, arr).as_deref(), Some("hello"));
    let words = arena.new_arr(FoamTag::SInt, &[1, 2]);
    assert_eq!(arr_to_string(&arena, words), None);
}

#[test]
fn void_and_multi_types() {
    let mut arena = FoamArena::new();
    let empty = arena.new_ddecl(DDeclUsage::Multi, &[]);
    let x = arena.new_scalar_decl(FoamTag::SInt, "x");
    let pair = arena.new_ddecl(DDeclUsage::Multi, &[x]);
    let formats = arena.new_dfmt(&[empty, pair]);
    assert!(type_is_void(&arena, formats, FoamTag::NOp, 0));
    assert!(!type_is_void(&arena, formats, FoamTag::NOp, 1));
    assert!(type_is_multi(&arena, formats, FoamTag::NOp, 1));
    assert!(!type_is_multi(&arena, formats, FoamTag::SInt, 1));
    assert!(type_is_value(FoamTag::SInt));
}

// === Rewrites ===

#[test]
fn rewrites() {
    let mut arena = FoamArena::new();
    let b = arena.new_bool(true);
    let not = arena.not_this(b);
    assert_eq!(arena.tag(not), FoamTag::BCall);
    assert_eq!(arena.int(not, 0), i64::from(BValTag::BoolNot.ordinal()));

    let w = arena.new_word(1);
    assert_eq!(arena.cast_if_needed(FoamTag::Word, FoamTag::Word, w), w);
    let cast = arena.cast_if_needed(FoamTag::Ptr, FoamTag::Word, w);
    assert_eq!(arena.tag(cast), FoamTag::Cast);

    let zero = arena.neutral_value(FoamTag::SInt);
    assert_eq!(arena.tag(zero), FoamTag::SInt);
    let ptr = arena.neutral_value(FoamTag::Ptr);
    assert_eq!(arena.tag(ptr), FoamTag::Cast);
    assert_eq!(arena.tag(arena.child(ptr, 1)), FoamTag::Nil);
}

#[test]
fn prog_levels() {
    let mut arena = FoamArena::new();
    let params = arena.new_ddecl(DDeclUsage::Param, &[]);
    let locals = arena.new_ddecl(DDeclUsage::Local, &[]);
    let fluids = arena.new_dfluid(&[]);
    let levels = arena.new_denv(&[6, 4]);
    let body = arena.new_seq(&[]);
    let p = arena.new_prog(ProgHeader::default(), params, locals, fluids, levels, body);
    assert_eq!(prog_format_for_level(&arena, p, 0), Some(6));
    assert_eq!(prog_format_for_level(&arena, p, 2), None);
    assert!(!prog_has_multi_assign(&arena, p));
}
