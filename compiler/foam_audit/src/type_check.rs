//! Optional type-checking sub-pass.
//!
//! Rules are local to one node and compare [`expr_type`](foam_ir::expr_type)
//! results against declarations; operands are not rechecked beyond what
//! their own visit does. Failures are recorded and the walk continues.
//!
//! The rules are not complete. Passing them is not proof of a well-typed
//! unit.

use foam_ir::fields::{assign, call, decl, eelt, format_slot, prog};
use foam_ir::query::{ddecl_decl, format_ddecl, format_len, format_usage, is_ref};
use foam_ir::{to_sexpr, BValTag, DDeclUsage, ExprType, FoamId, FoamTag};

use crate::auditor::Auditor;
use crate::config::AuditChecks;
use crate::report::TypeCheckFailure;

const EMPTY: i64 = format_slot::EMPTY as i64;

/// Pairs of (expected, actual) types that are accepted though they differ.
fn loosely_equal(expected: FoamTag, actual: FoamTag) -> bool {
    matches!(
        (expected, actual),
        (FoamTag::Nil, FoamTag::Ptr) | (FoamTag::Ptr | FoamTag::Word, FoamTag::Nil)
    )
}

impl Auditor<'_> {
    pub(crate) fn type_check(&mut self, id: FoamId, tag: FoamTag) {
        match tag {
            FoamTag::Set | FoamTag::Def => self.check_assign(id),
            FoamTag::If if self.config.enabled(AuditChecks::IF) => {
                if let Some(ty) = self.typed(id, self.arena.child(id, 0)) {
                    if ty.tag != FoamTag::Bool {
                        self.type_failure(id, format!("If test has type {}, not Bool", ty.tag));
                    }
                }
            }
            FoamTag::Return if self.config.enabled(AuditChecks::RETURN) => self.check_return(id),
            FoamTag::Cast if self.config.enabled(AuditChecks::CAST) => {
                self.typed(id, self.arena.child(id, 1));
            }
            FoamTag::PushEnv => self.format_is_env(id, self.arena.int(id, 0)),
            FoamTag::EElt => self.format_is_env(id, self.arena.int(id, eelt::ENV)),
            FoamTag::BCall if self.config.enabled(AuditChecks::BCALL) => self.check_bcall(id),
            _ => {}
        }
    }

    fn type_failure(&mut self, node: FoamId, message: String) {
        let rendered = to_sexpr(self.arena, node);
        tracing::warn!(const_num = ?self.const_num, %message, node = %rendered, "type check failure");
        self.report.type_failures.push(TypeCheckFailure {
            node,
            const_num: self.const_num,
            message,
            rendered,
        });
    }

    /// Type of `expr`, recording a failure against `node` when it has none.
    fn typed(&mut self, node: FoamId, expr: FoamId) -> Option<ExprType> {
        if !expr.is_valid() {
            self.type_failure(node, "missing operand".to_owned());
            return None;
        }
        match self.type_of(expr) {
            Ok(ty) => Some(ty),
            Err(err) => {
                self.type_failure(node, err.to_string());
                None
            }
        }
    }

    fn check_assign(&mut self, id: FoamId) {
        let a = self.arena;
        let lhs = a.child(id, assign::LHS);
        let rhs = a.child(id, assign::RHS);
        if !lhs.is_valid() || !rhs.is_valid() {
            return;
        }
        let lhs_tag = a.tag(lhs);
        if lhs_tag == FoamTag::Values {
            if a.tag(rhs) != FoamTag::MFmt {
                self.type_failure(id, "multi-value assignment without MFmt on the right".to_owned());
                return;
            }
            self.check_values(id, lhs, a.int(rhs, 0));
            return;
        }
        if !is_ref(a, lhs) && lhs_tag != FoamTag::Fluid {
            self.type_failure(id, format!("{lhs_tag} is not assignable"));
            return;
        }
        let (Some(left), Some(right)) = (self.typed(id, lhs), self.typed(id, rhs)) else {
            return;
        };
        if loosely_equal(left.tag, right.tag) {
            return;
        }
        if left.tag != right.tag {
            self.type_failure(id, format!("assigning {} to {}", right.tag, left.tag));
            return;
        }
        let formats_differ = |skip: &[i64]| {
            left.extra != right.extra && !skip.contains(&left.extra) && !skip.contains(&right.extra)
        };
        match left.tag {
            FoamTag::Rec if formats_differ(&[EMPTY]) => {
                self.type_failure(id, format!("record formats {} and {} differ", left.extra, right.extra));
            }
            FoamTag::Arr if formats_differ(&[0, EMPTY]) => {
                self.type_failure(id, "array element types differ".to_owned());
            }
            _ => {}
        }
    }

    fn check_return(&mut self, id: FoamId) {
        let a = self.arena;
        let p = self.scope.prog;
        if !p.is_valid() {
            return;
        }
        let value = a.child(id, 0);
        let Some(ret) = FoamTag::from_i64(a.int(p, prog::RET_TYPE)) else {
            return;
        };
        if ret == FoamTag::NOp {
            if !value.is_valid() || a.tag(value) != FoamTag::Values {
                self.type_failure(id, "multi-value Prog returns a single value".to_owned());
                return;
            }
            self.check_values(id, value, a.int(p, prog::FORMAT));
            return;
        }
        let Some(ty) = self.typed(id, value) else {
            return;
        };
        if ty.tag != ret && !loosely_equal(ret, ty.tag) {
            self.type_failure(id, format!("returns {} from a Prog returning {ret}", ty.tag));
        }
    }

    /// `values` against the slots of format `format`; format 0 means no
    /// values.
    fn check_values(&mut self, node: FoamId, values: FoamId, format: i64) {
        if !self.config.enabled(AuditChecks::VALUES) {
            return;
        }
        let a = self.arena;
        let argc = a.argc(values);
        let slots = if format == 0 { 0 } else { format_len(a, self.formats, format) };
        if argc != slots {
            self.type_failure(node, format!("{argc} values for a format of {slots} slots"));
            return;
        }
        let Some(dd) = format_ddecl(a, self.formats, format) else {
            return;
        };
        for (i, value) in a.children_from(values, 0).enumerate() {
            let Some(ty) = self.typed(node, value) else {
                continue;
            };
            let Some(d) = ddecl_decl(a, dd, i as i64) else {
                continue;
            };
            let slot_type = FoamTag::from_i64(a.int(d, decl::TYPE));
            if slot_type != Some(ty.tag) {
                let declared = slot_type.map_or("?", FoamTag::name);
                self.type_failure(node, format!("value {i} has type {}, slot declares {declared}", ty.tag));
            }
            if matches!(ty.tag, FoamTag::Rec | FoamTag::Arr) && ty.extra != a.int(d, decl::FORMAT) {
                self.type_failure(node, format!("value {i} has a different format from its slot"));
            }
            if ty.tag == FoamTag::Rec {
                self.format_is_record(node, ty.extra);
            }
        }
    }

    fn check_bcall(&mut self, id: FoamId) {
        let a = self.arena;
        let Some(op) = BValTag::from_i64(a.int(id, call::BCALL_OP)) else {
            return;
        };
        let args: Vec<FoamId> = a.children_from(id, call::BCALL_ARGS).collect();
        let params = op.info().params;
        if args.len() != params.len() {
            self.type_failure(id, format!("{op} takes {} arguments, given {}", params.len(), args.len()));
        }
        for (i, (&arg, &param)) in args.iter().zip(params).enumerate() {
            let Some(ty) = self.typed(id, arg) else {
                continue;
            };
            if ty.tag != param {
                self.type_failure(id, format!("argument {i} of {op} is {}, expected {param}", ty.tag));
            }
            if ty.tag == FoamTag::Rec {
                self.format_is_record(id, ty.extra);
            }
        }
    }

    fn format_is_env(&mut self, node: FoamId, format: i64) {
        if !self.config.enabled(AuditChecks::ENVS) || format == format_slot::ENV_USED as i64 {
            return;
        }
        if !format_usage(self.arena, self.formats, format).is_some_and(DDeclUsage::is_env) {
            self.type_failure(node, format!("format {format} used as an environment"));
        }
    }

    fn format_is_record(&mut self, node: FoamId, format: i64) {
        if !self.config.enabled(AuditChecks::RECORDS) {
            return;
        }
        if format_usage(self.arena, self.formats, format) != Some(DDeclUsage::Record) {
            self.type_failure(node, format!("format {format} used as a record"));
        }
    }
}
