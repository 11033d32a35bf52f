//! Units shared by the auditor tests.

use std::sync::Once;

use foam_ir::{DDeclUsage, FoamArena, FoamId, FoamTag, ProgHeader, ProtoTag};

static TRACING_INIT: Once = Once::new();

/// Route audit logs to the test output when `RUST_LOG` is set, e.g.
/// `RUST_LOG=foam_audit=debug`.
pub(crate) fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_test_writer().with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

/// Format numbers of [`formats`].
pub(crate) mod fmt {
    pub(crate) const EMPTY: i64 = 4;
    pub(crate) const ENV_USED: i64 = 5;
    /// Environment of two `SInt`s.
    pub(crate) const ENV: i64 = 6;
    /// Record `(x: SInt, y: DFlo)`.
    pub(crate) const RECORD: i64 = 7;
    /// Java signature `Word (SInt, SInt)`.
    pub(crate) const JAVA_SIG: i64 = 8;
    /// Multiple values `(SInt, Bool)`.
    pub(crate) const MULTI: i64 = 9;
    /// Multiple values `(Rec 7)`.
    pub(crate) const MULTI_REC: i64 = 10;
    pub(crate) const COUNT: i64 = 11;
}

/// Global 0 is `main: Clos`, global 1 is `jfn`, a Java function with
/// signature [`fmt::JAVA_SIG`]. Two constants, one fluid, no lexes.
pub(crate) fn formats(arena: &mut FoamArena) -> FoamId {
    let main = arena.new_gdecl(FoamTag::Clos, "main", 0, fmt::EMPTY, true, ProtoTag::Foam);
    let jfn = arena.new_gdecl(FoamTag::Word, "jfn", 0, fmt::JAVA_SIG, false, ProtoTag::Java);
    let globals = arena.new_ddecl(DDeclUsage::Global, &[main, jfn]);

    let c0 = arena.new_scalar_decl(FoamTag::Prog, "c0");
    let c1 = arena.new_scalar_decl(FoamTag::Prog, "c1");
    let consts = arena.new_ddecl(DDeclUsage::Consts, &[c0, c1]);
    let lexes = arena.new_ddecl(DDeclUsage::LocalEnv, &[]);
    let f = arena.new_scalar_decl(FoamTag::Word, "f");
    let fluids = arena.new_ddecl(DDeclUsage::Fluid, &[f]);
    let empty = arena.new_ddecl(DDeclUsage::Multi, &[]);
    let env_used = arena.new_ddecl(DDeclUsage::LocalEnv, &[]);

    let a = arena.new_scalar_decl(FoamTag::SInt, "a");
    let b = arena.new_scalar_decl(FoamTag::SInt, "b");
    let env = arena.new_ddecl(DDeclUsage::LocalEnv, &[a, b]);

    let x = arena.new_scalar_decl(FoamTag::SInt, "x");
    let y = arena.new_scalar_decl(FoamTag::DFlo, "y");
    let record = arena.new_ddecl(DDeclUsage::Record, &[x, y]);

    let ret = arena.new_scalar_decl(FoamTag::Word, "");
    let p0 = arena.new_scalar_decl(FoamTag::SInt, "p0");
    let p1 = arena.new_scalar_decl(FoamTag::SInt, "p1");
    let sig = arena.new_ddecl(DDeclUsage::JavaSig, &[ret, p0, p1]);

    let m0 = arena.new_scalar_decl(FoamTag::SInt, "m0");
    let m1 = arena.new_scalar_decl(FoamTag::Bool, "m1");
    let multi = arena.new_ddecl(DDeclUsage::Multi, &[m0, m1]);

    let r = arena.new_decl(FoamTag::Rec, "r", -1, fmt::RECORD);
    let multi_rec = arena.new_ddecl(DDeclUsage::Multi, &[r]);

    arena.new_dfmt(&[
        globals, consts, lexes, fluids, empty, env_used, env, record, sig, multi, multi_rec,
    ])
}

/// Layout of a test `Prog`.
pub(crate) struct ProgParts<'a> {
    pub(crate) params: &'a [FoamTag],
    pub(crate) locals: &'a [FoamTag],
    pub(crate) levels: &'a [i64],
    pub(crate) ret: FoamTag,
    pub(crate) format: i64,
}

impl Default for ProgParts<'_> {
    fn default() -> Self {
        ProgParts {
            params: &[],
            locals: &[FoamTag::SInt],
            levels: &[fmt::EMPTY],
            ret: FoamTag::NOp,
            format: 0,
        }
    }
}

fn decls(arena: &mut FoamArena, usage: DDeclUsage, prefix: &str, types: &[FoamTag]) -> FoamId {
    let ds: Vec<FoamId> = types
        .iter()
        .enumerate()
        .map(|(i, &ty)| arena.new_scalar_decl(ty, &format!("{prefix}{i}")))
        .collect();
    arena.new_ddecl(usage, &ds)
}

/// `Prog` laid out by `parts` whose body is `Seq(stmts)`.
pub(crate) fn prog(arena: &mut FoamArena, parts: &ProgParts<'_>, stmts: &[FoamId]) -> FoamId {
    let params = decls(arena, DDeclUsage::Param, "p", parts.params);
    let locals = decls(arena, DDeclUsage::Local, "l", parts.locals);
    let fluids = arena.new_dfluid(&[]);
    let levels = arena.new_denv(parts.levels);
    let body = arena.new_seq(stmts);
    let header = ProgHeader {
        ret_type: parts.ret,
        format: parts.format,
        ..ProgHeader::default()
    };
    arena.new_prog(header, params, locals, fluids, levels, body)
}

/// Unit defining `Const 0` as `prog`.
pub(crate) fn unit_of(arena: &mut FoamArena, prog: FoamId) -> FoamId {
    let lhs = arena.new_const(0);
    let def = arena.new_def(lhs, prog);
    unit_of_defs(arena, &[def])
}

pub(crate) fn unit_of_defs(arena: &mut FoamArena, defs: &[FoamId]) -> FoamId {
    init_tracing();
    let formats = formats(arena);
    let defs = arena.new_ddef(defs);
    arena.new_unit(formats, defs)
}

/// Unit whose `Const 0` is a default-layout `Prog` with body `Seq(stmts)`.
pub(crate) fn unit_with_body(arena: &mut FoamArena, stmts: &[FoamId]) -> FoamId {
    let p = prog(arena, &ProgParts::default(), stmts);
    unit_of(arena, p)
}
