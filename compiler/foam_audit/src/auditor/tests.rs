use foam_codec::{from_bytes, to_bytes};
use foam_ir::fields::prog as prog_slot;
use foam_ir::{equal, equal_mod_buffer, BValTag, DDeclUsage, FoamArena, FoamId, FoamTag, ProtoTag};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::fixture::{fmt, prog, unit_of, unit_of_defs, unit_with_body, ProgParts};
use crate::{audit, audit_unit, AuditConfig, AuditReport, FaultKind};

fn kinds(report: &AuditReport) -> Vec<FaultKind> {
    report.faults.iter().map(|f| f.kind).collect()
}

/// Audit a default-layout unit whose body is the single statement `stmt`.
fn audit_stmt(arena: &mut FoamArena, stmt: FoamId) -> AuditReport {
    let u = unit_with_body(arena, &[stmt]);
    audit(arena, u)
}

// === End to end ===

#[test]
fn small_procedure_round_trip() {
    let mut arena = FoamArena::new();
    let loc = arena.new_loc(0);
    let zero = arena.new_sint(0);
    let set = arena.new_set(loc, zero);
    let values = arena.new_values(&[]);
    let ret = arena.new_return(values);
    let p = prog(&mut arena, &ProgParts::default(), &[set, ret]);
    let u = unit_of(&mut arena, p);

    assert!(audit(&arena, u).is_ok());

    let copy = arena.copy(u);
    assert!(equal(&arena, u, &arena, copy));

    let bytes = to_bytes(&arena, u).unwrap();
    let mut decoded = FoamArena::new();
    let back = from_bytes(&bytes, &mut decoded).unwrap();
    assert!(equal_mod_buffer(&arena, u, &decoded, back));
    assert!(audit(&decoded, back).is_ok());

    arena.set_int(loc, 0, 1);
    let report = audit(&arena, u);
    assert_eq!(kinds(&report), vec![FaultKind::BadRef]);
    assert_eq!(report.faults[0].node, loc);
    assert_eq!(report.faults[0].const_num, Some(0));
}

#[test]
fn repeated_audits_agree() {
    let mut arena = FoamArena::new();
    let loc = arena.new_loc(3);
    let u = unit_with_body(&mut arena, &[loc]);
    let first = audit(&arena, u);
    let second = audit(&arena, u);
    assert_eq!(first, second);
    assert_eq!(kinds(&first), vec![FaultKind::BadRef]);
}

// === Reference bounds ===

#[test]
fn local_index_bound() {
    for n in 1..5usize {
        let locals = vec![FoamTag::SInt; n];
        let parts = ProgParts {
            locals: &locals,
            ..ProgParts::default()
        };
        for (index, ok) in [(n as i64 - 1, true), (n as i64, false), (-1, false)] {
            let mut arena = FoamArena::new();
            let loc = arena.new_loc(index);
            let p = prog(&mut arena, &parts, &[loc]);
            let u = unit_of(&mut arena, p);
            let report = audit(&arena, u);
            assert_eq!(report.is_ok(), ok, "{n} locals, Loc {index}");
            if !ok {
                assert_eq!(kinds(&report), vec![FaultKind::BadRef]);
            }
        }
    }
}

proptest! {
    #[test]
    fn local_bound_matches_declared_count(n in 0usize..8, index in -2i64..10) {
        let locals = vec![FoamTag::Word; n];
        let parts = ProgParts {
            locals: &locals,
            ..ProgParts::default()
        };
        let mut arena = FoamArena::new();
        let loc = arena.new_loc(index);
        let p = prog(&mut arena, &parts, &[loc]);
        let u = unit_of(&mut arena, p);
        prop_assert_eq!(audit(&arena, u).is_ok(), (0..n as i64).contains(&index));
    }
}

#[test]
fn parameter_index_bound() {
    let mut arena = FoamArena::new();
    let parts = ProgParts {
        params: &[FoamTag::Word, FoamTag::Ptr],
        ..ProgParts::default()
    };
    let ok = arena.new_par(1);
    let bad = arena.new_par(2);
    let p = prog(&mut arena, &parts, &[ok, bad]);
    let u = unit_of(&mut arena, p);
    let report = audit(&arena, u);
    assert_eq!(kinds(&report), vec![FaultKind::BadRef]);
    assert_eq!(report.faults[0].node, bad);
}

#[test]
fn unit_level_indices() {
    let mut arena = FoamArena::new();
    let stmts = [
        arena.new_glo(1),
        arena.new_glo(2),
        arena.new_const(1),
        arena.new_const(2),
        arena.new_fluid(0),
        arena.new_fluid(1),
    ];
    let u = unit_with_body(&mut arena, &stmts);
    let report = audit(&arena, u);
    let bad: Vec<FoamId> = report.faults.iter().map(|f| f.node).collect();
    assert_eq!(bad, vec![stmts[1], stmts[3], stmts[5]]);
}

#[test]
fn lexical_references() {
    let parts = ProgParts {
        levels: &[fmt::EMPTY, fmt::ENV],
        ..ProgParts::default()
    };
    for (level, index, ok) in [(1, 1, true), (1, 2, false), (0, 0, false), (2, 0, false), (-1, 0, false)] {
        let mut arena = FoamArena::new();
        let lex = arena.new_lex(level, index);
        let p = prog(&mut arena, &parts, &[lex]);
        let u = unit_of(&mut arena, p);
        assert_eq!(audit(&arena, u).is_ok(), ok, "Lex {level} {index}");
    }
}

#[test]
fn environment_levels() {
    let parts = ProgParts {
        levels: &[fmt::EMPTY, fmt::ENV],
        ..ProgParts::default()
    };
    for (level, ok) in [(0, true), (1, true), (2, false), (-1, false)] {
        let mut arena = FoamArena::new();
        let env = arena.new_env(level);
        let p = prog(&mut arena, &parts, &[env]);
        let u = unit_of(&mut arena, p);
        assert_eq!(audit(&arena, u).is_ok(), ok, "Env {level}");
    }
}

#[test]
fn environment_elements() {
    for (format, level, lex, ok) in [
        (fmt::ENV, 0, 1, true),
        (fmt::ENV, 0, 2, false),
        (fmt::COUNT, 0, 0, false),
        (fmt::ENV, -1, 0, false),
    ] {
        let mut arena = FoamArena::new();
        let env = arena.new_env(0);
        let eelt = arena.new_eelt(format, env, level, lex);
        let report = audit_stmt(&mut arena, eelt);
        assert_eq!(report.is_ok(), ok, "EElt {format} {level} {lex}");
    }
}

#[test]
fn record_formats() {
    let mut arena = FoamArena::new();
    let rec = arena.new_rnew(fmt::RECORD);
    let field = arena.new_relt(fmt::RECORD, rec, 1);
    let bad_new = arena.new_rnew(fmt::COUNT);
    let env = arena.new_env(0);
    let bad_push = arena.new_push_env(-1, env);
    let u = unit_with_body(&mut arena, &[field, bad_new, bad_push]);
    let report = audit(&arena, u);
    let bad: Vec<FoamId> = report.faults.iter().map(|f| f.node).collect();
    assert_eq!(bad, vec![bad_new, bad_push]);
}

#[test]
fn raw_records() {
    let mut arena = FoamArena::new();
    let values = arena.new_values(&[]);
    let good_fmt = arena.new_rrfmt(values);
    let loc = arena.new_loc(0);
    let bad_fmt = arena.new_rrfmt(loc);
    let data = arena.new_loc(0);
    let fmt_arg = arena.new_loc(0);
    let bad_field = arena.new_rrelt(-1, data, fmt_arg);
    let u = unit_with_body(&mut arena, &[good_fmt, bad_fmt, bad_field]);
    let report = audit(&arena, u);
    let bad: Vec<FoamId> = report.faults.iter().map(|f| f.node).collect();
    assert_eq!(bad, vec![bad_fmt, bad_field]);
}

#[test]
fn empty_multi_assignment() {
    let mut arena = FoamArena::new();
    let lhs = arena.new_values(&[]);
    let rhs = arena.new_nil();
    let set = arena.new_set(lhs, rhs);
    let report = audit_stmt(&mut arena, set);
    assert_eq!(kinds(&report), vec![FaultKind::BadRef]);
    assert_eq!(report.faults[0].node, set);
}

#[test]
fn top_level_definitions() {
    let mut arena = FoamArena::new();
    let p = prog(&mut arena, &ProgParts::default(), &[]);
    let c0 = arena.new_const(0);
    let def0 = arena.new_def(c0, p);
    let glo = arena.new_glo(0);
    let env = arena.new_env(0);
    let target = arena.new_const(0);
    let clos = arena.new_clos(env, target);
    let def1 = arena.new_def(glo, clos);
    let u = unit_of_defs(&mut arena, &[def0, def1]);
    assert!(audit(&arena, u).is_ok());

    arena.set_int(env, 0, 1);
    let report = audit(&arena, u);
    assert_eq!(kinds(&report), vec![FaultKind::BadRef]);
    assert_eq!(report.faults[0].const_num, None);
}

// === Sharing ===

#[test]
fn shared_node_is_reported() {
    let mut arena = FoamArena::new();
    let zero = arena.new_sint(0);
    let a = arena.new_loc(0);
    let first = arena.new_set(a, zero);
    let b = arena.new_loc(0);
    let second = arena.new_set(b, zero);
    let u = unit_with_body(&mut arena, &[first, second]);
    let report = audit(&arena, u);
    assert_eq!(kinds(&report), vec![FaultKind::BadSharing]);
    assert_eq!(report.faults[0].node, zero);
}

#[test]
fn equal_copies_are_not_shared() {
    let mut arena = FoamArena::new();
    let zero = arena.new_sint(0);
    let other = arena.copy(zero);
    let a = arena.new_loc(0);
    let first = arena.new_set(a, zero);
    let b = arena.new_loc(0);
    let second = arena.new_set(b, other);
    let u = unit_with_body(&mut arena, &[first, second]);
    assert!(audit(&arena, u).is_ok());
}

#[test]
fn shared_subtree_is_reported_once() {
    let mut arena = FoamArena::new();
    let x = arena.new_loc(0);
    let y = arena.new_sint(1);
    let sum = arena.new_bcall(BValTag::SIntPlus, &[x, y]);
    let ret = arena.new_return(sum);
    let u = unit_with_body(&mut arena, &[sum, ret]);
    let report = audit(&arena, u);
    assert_eq!(kinds(&report), vec![FaultKind::BadSharing]);
    assert_eq!(report.faults[0].node, sum);
}

// === Casts ===

#[test]
fn casts() {
    for (build, expected) in [
        (cast_of_values as fn(&mut FoamArena) -> FoamId, Some(FaultKind::BadCast)),
        (cast_sint_to_ptr, Some(FaultKind::BadType)),
        (cast_arr_to_bint, Some(FaultKind::BadType)),
        (cast_sint_to_word, None),
    ] {
        let mut arena = FoamArena::new();
        let cast = build(&mut arena);
        let report = audit_stmt(&mut arena, cast);
        assert_eq!(kinds(&report), expected.into_iter().collect::<Vec<_>>());
    }
}

fn cast_of_values(arena: &mut FoamArena) -> FoamId {
    let loc = arena.new_loc(0);
    let values = arena.new_values(&[loc]);
    arena.new_cast(FoamTag::Word, values)
}

fn cast_sint_to_ptr(arena: &mut FoamArena) -> FoamId {
    let loc = arena.new_loc(0);
    arena.new_cast(FoamTag::Ptr, loc)
}

fn cast_arr_to_bint(arena: &mut FoamArena) -> FoamId {
    let arr = arena.new_arr(FoamTag::Byte, &[1, 2]);
    arena.new_cast(FoamTag::BInt, arr)
}

fn cast_sint_to_word(arena: &mut FoamArena) -> FoamId {
    let loc = arena.new_loc(0);
    arena.new_cast(FoamTag::Word, loc)
}

// === Declarations ===

#[test]
fn declaration_formats() {
    let cases = [
        (FoamTag::Arr, i64::from(FoamTag::Char.ordinal()), true),
        (FoamTag::Arr, i64::from(FoamTag::BInt.ordinal()), true),
        (FoamTag::Arr, i64::from(FoamTag::Clos.ordinal()), false),
        (FoamTag::JavaObj, fmt::RECORD, true),
        (FoamTag::CObj, fmt::COUNT, false),
        (FoamTag::Rec, fmt::RECORD, true),
        (FoamTag::SInt, fmt::EMPTY, true),
        (FoamTag::Word, 0, true),
        (FoamTag::Word, fmt::RECORD, false),
    ];
    for (ty, format, ok) in cases {
        let mut arena = FoamArena::new();
        let params = arena.new_ddecl(DDeclUsage::Param, &[]);
        let d = arena.new_decl(ty, "v", -1, format);
        let locals = arena.new_ddecl(DDeclUsage::Local, &[d]);
        let fluids = arena.new_dfluid(&[]);
        let levels = arena.new_denv(&[fmt::EMPTY]);
        let body = arena.new_seq(&[]);
        let p = arena.new_prog(Default::default(), params, locals, fluids, levels, body);
        let u = unit_of(&mut arena, p);
        let report = audit(&arena, u);
        assert_eq!(report.is_ok(), ok, "{ty} with format {format}");
        if !ok {
            assert_eq!(kinds(&report), vec![FaultKind::BadDecl]);
            assert_eq!(report.faults[0].node, d);
        }
    }
}

#[test]
fn environment_maps() {
    for (levels, ok) in [
        (&[fmt::EMPTY, fmt::EMPTY, 0, 0][..], true),
        (&[fmt::EMPTY, fmt::ENV, fmt::ENV_USED][..], true),
        (&[fmt::ENV, fmt::ENV][..], false),
        (&[fmt::COUNT][..], false),
        (&[-1][..], false),
    ] {
        let mut arena = FoamArena::new();
        let parts = ProgParts {
            levels,
            ..ProgParts::default()
        };
        let p = prog(&mut arena, &parts, &[]);
        let u = unit_of(&mut arena, p);
        let report = audit(&arena, u);
        assert_eq!(report.is_ok(), ok, "{levels:?}");
        if !ok {
            assert_eq!(kinds(&report), vec![FaultKind::BadEnv]);
            assert_eq!(report.faults[0].node, arena.child(p, prog_slot::LEVELS));
        }
    }
}

// === Java calls ===

fn java_call(arena: &mut FoamArena, proto: ProtoTag, op: FoamId, argc: usize) -> FoamId {
    let args: Vec<FoamId> = (0..argc).map(|i| arena.new_sint(i as i64)).collect();
    arena.new_pcall(proto, FoamTag::Word, op, &args)
}

#[test]
fn java_call_through_signature() {
    let mut arena = FoamArena::new();
    let op = arena.new_glo(1);
    let call = java_call(&mut arena, ProtoTag::JavaMethod, op, 2);
    assert!(audit_stmt(&mut arena, call).is_ok());

    let mut arena = FoamArena::new();
    let op = arena.new_glo(1);
    let call = java_call(&mut arena, ProtoTag::Java, op, 1);
    assert_eq!(kinds(&audit_stmt(&mut arena, call)), vec![FaultKind::BadType]);
}

#[test]
fn java_call_needs_a_signature() {
    let mut arena = FoamArena::new();
    let op = arena.new_glo(0);
    let call = java_call(&mut arena, ProtoTag::Java, op, 2);
    assert_eq!(kinds(&audit_stmt(&mut arena, call)), vec![FaultKind::BadType]);

    let mut arena = FoamArena::new();
    let op = arena.new_loc(0);
    let call = java_call(&mut arena, ProtoTag::JavaConstructor, op, 2);
    assert_eq!(kinds(&audit_stmt(&mut arena, call)), vec![FaultKind::BadType]);
}

#[test]
fn java_call_through_method_name() {
    let mut arena = FoamArena::new();
    let op = arena.new_arr_of_str("toString");
    let call = java_call(&mut arena, ProtoTag::Java, op, 0);
    assert!(audit_stmt(&mut arena, call).is_ok());

    let mut arena = FoamArena::new();
    let op = arena.new_arr(FoamTag::SInt, &[1]);
    let call = java_call(&mut arena, ProtoTag::Java, op, 0);
    assert_eq!(kinds(&audit_stmt(&mut arena, call)), vec![FaultKind::BadType]);
}

#[test]
fn other_protocols_are_unchecked() {
    let mut arena = FoamArena::new();
    let op = arena.new_loc(0);
    let call = java_call(&mut arena, ProtoTag::C, op, 5);
    assert!(audit_stmt(&mut arena, call).is_ok());
}

// === Reporting ===

#[test]
fn faults_name_their_constant() {
    let mut arena = FoamArena::new();
    let p0 = prog(&mut arena, &ProgParts::default(), &[]);
    let bad = arena.new_loc(5);
    let p1 = prog(&mut arena, &ProgParts::default(), &[bad]);
    let c0 = arena.new_const(0);
    let def0 = arena.new_def(c0, p0);
    let c1 = arena.new_const(1);
    let def1 = arena.new_def(c1, p1);
    let u = unit_of_defs(&mut arena, &[def0, def1]);

    let report = audit(&arena, u);
    assert_eq!(report.faults.len(), 1);
    let fault = &report.faults[0];
    assert_eq!(fault.const_num, Some(1));
    assert_eq!(fault.rendered, "(Loc 5)");
    assert_eq!(fault.to_string(), "bad reference in const 1: (Loc 5)");
    assert!(report.has_fault(FaultKind::BadRef));
    assert_eq!(report.faults_of(FaultKind::BadSharing).count(), 0);
}

#[test]
fn faults_are_collected_not_fatal() {
    let mut arena = FoamArena::new();
    let stmts = [arena.new_loc(7), arena.new_par(0), arena.new_glo(9)];
    let u = unit_with_body(&mut arena, &stmts);
    let report = audit_unit(&arena, u, &AuditConfig::default());
    assert_eq!(report.faults.len(), 3);
    assert!(report.type_failures.is_empty());
}

#[test]
#[should_panic(expected = "audit root must be a Unit")]
fn root_must_be_a_unit() {
    let mut arena = FoamArena::new();
    let p = prog(&mut arena, &ProgParts::default(), &[]);
    audit(&arena, p);
}
