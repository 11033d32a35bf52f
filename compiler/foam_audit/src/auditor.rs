//! The audit walk.
//!
//! One [`Auditor`] per run holds the unit's declaration counts and a stack
//! of procedure scopes. Every node is visited once: sharing is detected
//! through a visited set, children are audited before their parent, and
//! each reference is checked against the scope it appears in.

use foam_ir::fields::{assign, call, decl, eelt, format_slot, lex, prog, relt, rrelt, unit};
use foam_ir::query::{
    ddecl_decl, ddecl_len, ddecl_usage, decl_format, format_ddecl, format_len, prog_format_for_level,
};
use foam_ir::{
    expr_type, to_sexpr, DDeclUsage, ExprType, ExprTypeError, FoamArena, FoamId, FoamTag,
    ProgDeclLookup, ProtoTag,
};
use foam_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;

use crate::config::AuditConfig;
use crate::report::{AuditFault, AuditReport, FaultKind};

/// Audit `unit` with every check and without the type-checking sub-pass.
pub fn audit(arena: &FoamArena, unit: FoamId) -> AuditReport {
    audit_unit(arena, unit, &AuditConfig::default())
}

/// Audit the definitions of `unit`.
///
/// # Panics
///
/// If `unit` is not a `Unit` node.
pub fn audit_unit(arena: &FoamArena, unit: FoamId, config: &AuditConfig) -> AuditReport {
    assert_eq!(arena.tag(unit), FoamTag::Unit, "audit root must be a Unit");
    let mut auditor = Auditor::new(arena, unit, *config);
    tracing::debug!(
        formats = auditor.num_formats,
        consts = auditor.num_consts,
        globals = auditor.num_globals,
        type_checking = config.type_checking,
        "auditing unit",
    );
    auditor.visit(arena.child(unit, unit::DEFS));
    let report = auditor.report;
    tracing::debug!(
        faults = report.faults.len(),
        type_failures = report.type_failures.len(),
        "audit finished",
    );
    report
}

/// Reference context of the procedure being audited.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Scope {
    /// `NONE` at the top of the unit.
    pub(crate) prog: FoamId,
    num_levels: i64,
    num_locals: i64,
    num_params: i64,
}

impl Scope {
    /// Top-level definitions see one lexical level (the unit's own
    /// environment, with the empty format) and no locals or parameters.
    const UNIT: Scope = Scope {
        prog: FoamId::NONE,
        num_levels: 1,
        num_locals: 0,
        num_params: 0,
    };

    fn of_prog(arena: &FoamArena, p: FoamId) -> Self {
        let len = |slot| {
            let dd = arena.child(p, slot);
            if dd.is_valid() {
                ddecl_len(arena, dd) as i64
            } else {
                0
            }
        };
        let levels = arena.child(p, prog::LEVELS);
        Scope {
            prog: p,
            num_levels: if levels.is_valid() { arena.argc(levels) as i64 } else { 0 },
            num_locals: len(prog::LOCALS),
            num_params: len(prog::PARAMS),
        }
    }

    /// Format of lexical level `level`.
    fn level_format(&self, arena: &FoamArena, level: i64) -> Option<i64> {
        if self.prog.is_valid() {
            prog_format_for_level(arena, self.prog, level)
        } else {
            (level == 0).then_some(format_slot::EMPTY as i64)
        }
    }
}

pub(crate) struct Auditor<'a> {
    pub(crate) arena: &'a FoamArena,
    pub(crate) config: AuditConfig,
    pub(crate) formats: FoamId,
    num_formats: i64,
    num_consts: i64,
    num_globals: i64,
    num_fluids: i64,
    pub(crate) scope: Scope,
    pub(crate) const_num: Option<i64>,
    visited: FxHashSet<FoamId>,
    pub(crate) report: AuditReport,
}

impl<'a> Auditor<'a> {
    fn new(arena: &'a FoamArena, unit: FoamId, config: AuditConfig) -> Self {
        let formats = arena.child(unit, unit::FORMATS);
        let count = |slot: usize| format_len(arena, formats, slot as i64) as i64;
        Auditor {
            arena,
            config,
            formats,
            num_formats: if formats.is_valid() { arena.argc(formats) as i64 } else { 0 },
            num_consts: count(format_slot::CONSTS),
            num_globals: count(format_slot::GLOBALS),
            num_fluids: count(format_slot::FLUIDS),
            scope: Scope::UNIT,
            const_num: None,
            visited: FxHashSet::default(),
            report: AuditReport::default(),
        }
    }

    fn visit(&mut self, id: FoamId) {
        if !id.is_valid() {
            return;
        }
        ensure_sufficient_stack(|| {
            if !self.visited.insert(id) {
                self.fault(FaultKind::BadSharing, id);
                return;
            }
            let arena = self.arena;
            let tag = arena.tag(id);
            let outer_scope = self.scope;
            let outer_const = self.const_num;
            match tag {
                FoamTag::Prog => self.scope = Scope::of_prog(arena, id),
                FoamTag::Def => {
                    let lhs = arena.child(id, assign::LHS);
                    if lhs.is_valid() && arena.tag(lhs) == FoamTag::Const {
                        self.const_num = Some(arena.int(lhs, 0));
                    }
                }
                _ => {}
            }

            for child in arena.children(id) {
                self.visit(child);
            }

            self.check(id, tag);
            if self.config.type_checking {
                self.type_check(id, tag);
            }

            self.scope = outer_scope;
            self.const_num = outer_const;
        });
    }

    pub(crate) fn fault(&mut self, kind: FaultKind, node: FoamId) {
        let rendered = to_sexpr(self.arena, node);
        tracing::warn!(%kind, const_num = ?self.const_num, node = %rendered, "audit fault");
        self.report.faults.push(AuditFault {
            kind,
            node,
            const_num: self.const_num,
            rendered,
        });
    }

    pub(crate) fn type_of(&self, expr: FoamId) -> Result<ExprType, ExprTypeError> {
        expr_type(self.arena, expr, &ProgDeclLookup::new(self.scope.prog, self.formats))
    }

    fn format_in_range(&self, format: i64) -> bool {
        (0..self.num_formats).contains(&format)
    }

    /// Declaration count of unit format `format`.
    fn format_size(&self, format: i64) -> i64 {
        format_len(self.arena, self.formats, format) as i64
    }

    fn check_bound(&mut self, id: FoamId, index: i64, count: i64) {
        if !(0..count).contains(&index) {
            self.fault(FaultKind::BadRef, id);
        }
    }

    /// Post-order checks that run whatever the configuration.
    fn check(&mut self, id: FoamId, tag: FoamTag) {
        let a = self.arena;
        match tag {
            FoamTag::Set | FoamTag::Def => {
                let lhs = a.child(id, assign::LHS);
                if lhs.is_valid() && a.tag(lhs) == FoamTag::Values && a.argc(lhs) == 0 {
                    self.fault(FaultKind::BadRef, id);
                }
            }
            FoamTag::Loc => self.check_bound(id, a.int(id, 0), self.scope.num_locals),
            FoamTag::Par => self.check_bound(id, a.int(id, 0), self.scope.num_params),
            FoamTag::Const => self.check_bound(id, a.int(id, 0), self.num_consts),
            FoamTag::Glo => self.check_bound(id, a.int(id, 0), self.num_globals),
            FoamTag::Fluid => self.check_bound(id, a.int(id, 0), self.num_fluids),
            FoamTag::Env => self.check_bound(id, a.int(id, 0), self.scope.num_levels),
            FoamTag::Lex => {
                let level = a.int(id, lex::LEVEL);
                let resolved = (0..self.scope.num_levels)
                    .contains(&level)
                    .then(|| self.scope.level_format(a, level))
                    .flatten()
                    .filter(|&f| self.format_in_range(f));
                match resolved {
                    Some(format) => self.check_bound(id, a.int(id, lex::INDEX), self.format_size(format)),
                    None => self.fault(FaultKind::BadRef, id),
                }
            }
            FoamTag::EElt => {
                let env = a.int(id, eelt::ENV);
                let ok = self.format_in_range(env)
                    && (0..self.format_size(env)).contains(&a.int(id, eelt::LEX))
                    && a.int(id, eelt::LEVEL) >= 0;
                if !ok {
                    self.fault(FaultKind::BadRef, id);
                }
            }
            FoamTag::RElt | FoamTag::RNew | FoamTag::PushEnv => {
                // The format is slot 0 of all three.
                if !self.format_in_range(a.int(id, relt::FORMAT)) {
                    self.fault(FaultKind::BadRef, id);
                }
            }
            FoamTag::RRElt => {
                if a.int(id, rrelt::FIELD) < 0 {
                    self.fault(FaultKind::BadRef, id);
                }
            }
            FoamTag::RRFmt => {
                let fmt = a.child(id, 0);
                if !fmt.is_valid() || a.tag(fmt) != FoamTag::Values {
                    self.fault(FaultKind::BadRef, id);
                }
            }
            FoamTag::Cast => self.check_cast(id),
            FoamTag::Decl => self.check_decl(id),
            FoamTag::DEnv => self.check_denv(id),
            FoamTag::PCall => self.check_pcall(id),
            _ => {}
        }
    }

    fn check_cast(&mut self, id: FoamId) {
        let a = self.arena;
        let expr = a.child(id, 1);
        if !expr.is_valid() {
            return;
        }
        if a.tag(expr) == FoamTag::Values {
            self.fault(FaultKind::BadCast, id);
            return;
        }
        let target = FoamTag::from_i64(a.int(id, 0));
        let bad = match target {
            Some(FoamTag::Ptr) => self.type_of(expr).is_ok_and(|t| t.tag == FoamTag::SInt),
            Some(FoamTag::BInt) => a.tag(expr) == FoamTag::Arr,
            _ => false,
        };
        if bad {
            self.fault(FaultKind::BadType, id);
        }
    }

    /// A declaration's format must suit its type: array element types are
    /// data types or `BInt`, object types name a format, records may name
    /// any format, and everything else has none.
    fn check_decl(&mut self, id: FoamId) {
        let a = self.arena;
        let format = a.int(id, decl::FORMAT);
        let ok = match FoamTag::from_i64(a.int(id, decl::TYPE)) {
            Some(FoamTag::Arr) => {
                FoamTag::from_i64(format).is_some_and(|t| t.is_data_type() || t == FoamTag::BInt)
            }
            Some(FoamTag::JavaObj | FoamTag::CObj) => self.format_in_range(format),
            Some(FoamTag::Rec) => true,
            _ => format == format_slot::EMPTY as i64 || format == 0,
        };
        if !ok {
            self.fault(FaultKind::BadDecl, id);
        }
    }

    /// Every level's format must exist, and no real format may serve two
    /// levels.
    fn check_denv(&mut self, id: FoamId) {
        let mut seen = FxHashSet::default();
        let mut ok = true;
        for format in self.arena.ints_from(id, 0) {
            if !self.format_in_range(format) {
                ok = false;
            }
            let shareable = format == format_slot::EMPTY as i64 || format == 0;
            if !seen.insert(format) && !shareable {
                ok = false;
            }
        }
        if !ok {
            self.fault(FaultKind::BadEnv, id);
        }
    }

    /// Java-family calls go through a raw `Char` array (an already realised
    /// method) or a global whose format is a `JavaSig` of matching arity.
    fn check_pcall(&mut self, id: FoamId) {
        let a = self.arena;
        let is_java = ProtoTag::from_i64(a.int(id, call::PCALL_PROTOCOL)).is_some_and(ProtoTag::is_java);
        if !is_java {
            return;
        }
        let op = a.child(id, call::PCALL_OP);
        if !op.is_valid() {
            self.fault(FaultKind::BadType, id);
            return;
        }
        let ok = match a.tag(op) {
            FoamTag::Arr => a.int(op, 0) == i64::from(FoamTag::Char.ordinal()),
            FoamTag::Glo => {
                let argc = a.argc(id).saturating_sub(call::PCALL_ARGS) as i64;
                format_ddecl(a, self.formats, format_slot::GLOBALS as i64)
                    .and_then(|globals| ddecl_decl(a, globals, a.int(op, 0)))
                    .and_then(|g| format_ddecl(a, self.formats, decl_format(a, g)))
                    .filter(|&sig| ddecl_usage(a, sig) == Some(DDeclUsage::JavaSig))
                    .is_some_and(|sig| ddecl_len(a, sig) as i64 - 1 == argc)
            }
            _ => false,
        };
        if !ok {
            self.fault(FaultKind::BadType, id);
        }
    }
}

#[cfg(test)]
mod tests;
