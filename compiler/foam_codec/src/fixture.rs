//! Trees shared by the codec tests.

use foam_ir::{
    BIntLit, BValTag, DDeclUsage, FoamArena, FoamId, FoamTag, ProgHeader, ProtoTag,
};

/// `Prog` with one `SInt` local whose body is
/// `Seq(Set(Loc 0, SInt 0), Return(Values()))`.
pub(crate) fn small_prog(arena: &mut FoamArena) -> FoamId {
    let params = arena.new_ddecl(DDeclUsage::Param, &[]);
    let i = arena.new_scalar_decl(FoamTag::SInt, "i");
    let locals = arena.new_ddecl(DDeclUsage::Local, &[i]);
    let fluids = arena.new_dfluid(&[]);
    let levels = arena.new_denv(&[4]);
    let loc = arena.new_loc(0);
    let zero = arena.new_sint(0);
    let set = arena.new_set(loc, zero);
    let values = arena.new_values(&[]);
    let ret = arena.new_return(values);
    let body = arena.new_seq(&[set, ret]);
    let header = ProgHeader {
        ret_type: FoamTag::NOp,
        ..ProgHeader::default()
    };
    arena.new_prog(header, params, locals, fluids, levels, body)
}

/// `Prog` exercising wide labels, a wide literal, floats, a bignum and a
/// string.
pub(crate) fn loop_prog(arena: &mut FoamArena) -> FoamId {
    let n = arena.new_scalar_decl(FoamTag::SInt, "n");
    let params = arena.new_ddecl(DDeclUsage::Param, &[n]);
    let i = arena.new_scalar_decl(FoamTag::SInt, "i");
    let d = arena.new_scalar_decl(FoamTag::DFlo, "d");
    let b = arena.new_scalar_decl(FoamTag::BInt, "b");
    let locals = arena.new_ddecl(DDeclUsage::Local, &[i, d, b]);
    let fluids = arena.new_dfluid(&[]);
    let levels = arena.new_denv(&[4, 6]);

    let mut stmts = Vec::new();
    let top = arena.new_label(0);
    stmts.push(top);

    let loc = arena.new_loc(0);
    let limit = arena.new_sint(1 << 40);
    let test = arena.new_bcall(BValTag::SIntLE, &[loc, limit]);
    let jump = arena.new_if(test, 299);
    stmts.push(jump);

    let loc = arena.new_loc(0);
    let one = arena.new_sint(1);
    let next = arena.new_bcall(BValTag::SIntPlus, &[loc, one]);
    let lhs = arena.new_loc(0);
    stmts.push(arena.new_set(lhs, next));

    let lhs = arena.new_loc(1);
    let third = arena.new_dflo(1.0 / 3.0);
    stmts.push(arena.new_set(lhs, third));

    let lhs = arena.new_loc(2);
    let big = arena.new_bint(BIntLit::from_i128(-(1 << 100)));
    stmts.push(arena.new_set(lhs, big));

    let note = arena.new_unimp("wide labels");
    stmts.push(note);
    stmts.push(arena.new_goto(0));
    stmts.push(arena.new_label(299));

    let loc = arena.new_loc(0);
    let word = arena.new_cast(FoamTag::Word, loc);
    stmts.push(arena.new_return(word));

    let body = arena.new_seq(&stmts);
    let header = ProgHeader {
        n_labels: 300,
        ret_type: FoamTag::Word,
        ..ProgHeader::default()
    };
    arena.new_prog(header, params, locals, fluids, levels, body)
}

/// Unit with formats `[globals, consts, lexes, fluids, empty, env, record]`
/// defining `Const 0 = small_prog`, `Glo 0 = Clos(Env 0, Const 0)` and
/// `Const 1 = loop_prog`, in that order.
pub(crate) fn sample_unit(arena: &mut FoamArena) -> FoamId {
    let main = arena.new_gdecl(FoamTag::Clos, "main", 0, 4, true, ProtoTag::Foam);
    let globals = arena.new_ddecl(DDeclUsage::Global, &[main]);
    let c0 = arena.new_scalar_decl(FoamTag::Prog, "c0");
    let c1 = arena.new_scalar_decl(FoamTag::Prog, "c1");
    let consts = arena.new_ddecl(DDeclUsage::Consts, &[c0, c1]);
    let lexes = arena.new_ddecl(DDeclUsage::LocalEnv, &[]);
    let fluids = arena.new_ddecl(DDeclUsage::Fluid, &[]);
    let empty = arena.new_ddecl(DDeclUsage::LocalEnv, &[]);
    let env = arena.new_ddecl(DDeclUsage::LocalEnv, &[]);
    let x = arena.new_scalar_decl(FoamTag::SInt, "x");
    let y = arena.new_scalar_decl(FoamTag::DFlo, "y");
    let record = arena.new_ddecl(DDeclUsage::Record, &[x, y]);
    let formats = arena.new_dfmt(&[globals, consts, lexes, fluids, empty, env, record]);

    let lhs0 = arena.new_const(0);
    let rhs0 = small_prog(arena);
    let def0 = arena.new_def(lhs0, rhs0);

    let lhs1 = arena.new_glo(0);
    let env0 = arena.new_env(0);
    let prog0 = arena.new_const(0);
    let clos = arena.new_clos(env0, prog0);
    let def1 = arena.new_def(lhs1, clos);

    let lhs2 = arena.new_const(1);
    let rhs2 = loop_prog(arena);
    let def2 = arena.new_def(lhs2, rhs2);

    let defs = arena.new_ddef(&[def0, def1, def2]);
    arena.new_unit(formats, defs)
}
