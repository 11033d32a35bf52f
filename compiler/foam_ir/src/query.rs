//! Structural queries and small rewrites over FOAM trees.
//!
//! Navigation helpers for units (`DFmt`/`DDecl` lookups), predicates used by
//! the optimizer and auditor, and a few constructors built on them.

use foam_stack::ensure_sufficient_stack;

use crate::arena::FoamArena;
use crate::builtin::BValTag;
use crate::fields::{assign, call, ddecl, decl, format_slot, gdecl, prog, unit, ProgInfo};
use crate::ids::{FoamId, SymeId};
use crate::proto::{DDeclUsage, ProtoTag};
use crate::tag::{FoamTag, TagProps};

// === Unit navigation ===

/// Number of declarations in a `DDecl` (its argc minus the usage slot).
pub fn ddecl_len(arena: &FoamArena, ddecl: FoamId) -> usize {
    arena.argc(ddecl).saturating_sub(ddecl::FIRST)
}

pub fn ddecl_usage(arena: &FoamArena, ddecl: FoamId) -> Option<DDeclUsage> {
    DDeclUsage::from_i64(arena.int(ddecl, ddecl::USAGE))
}

/// Declaration `index` of a `DDecl`, if in range.
pub fn ddecl_decl(arena: &FoamArena, ddecl: FoamId, index: i64) -> Option<FoamId> {
    let i = usize::try_from(index).ok()?;
    if i >= ddecl_len(arena, ddecl) {
        return None;
    }
    Some(arena.child(ddecl, ddecl::FIRST + i)).filter(|d| d.is_valid())
}

/// Format `index` of a `DFmt`, if in range.
pub fn format_ddecl(arena: &FoamArena, formats: FoamId, index: i64) -> Option<FoamId> {
    let i = usize::try_from(index).ok()?;
    if !formats.is_valid() || i >= arena.argc(formats) {
        return None;
    }
    Some(arena.child(formats, i)).filter(|d| d.is_valid())
}

/// Declaration count of format `index`, or zero when it does not exist.
pub fn format_len(arena: &FoamArena, formats: FoamId, index: i64) -> usize {
    format_ddecl(arena, formats, index).map_or(0, |d| ddecl_len(arena, d))
}

/// Usage of format `index`.
pub fn format_usage(arena: &FoamArena, formats: FoamId, index: i64) -> Option<DDeclUsage> {
    format_ddecl(arena, formats, index).and_then(|d| ddecl_usage(arena, d))
}

/// Type of a `Decl` or `GDecl`.
pub fn decl_type(arena: &FoamArena, d: FoamId) -> Option<FoamTag> {
    FoamTag::from_i64(arena.int(d, decl::TYPE))
}

/// Format of a `Decl` or `GDecl`.
pub fn decl_format(arena: &FoamArena, d: FoamId) -> i64 {
    match arena.tag(d) {
        FoamTag::GDecl => arena.int(d, gdecl::FORMAT),
        _ => arena.int(d, decl::FORMAT),
    }
}

/// Same type and same format.
pub fn decl_equal(arena: &FoamArena, a: FoamId, b: FoamId) -> bool {
    arena.int(a, decl::TYPE) == arena.int(b, decl::TYPE)
        && decl_format(arena, a) == decl_format(arena, b)
}

pub fn gdecl_is_export(arena: &FoamArena, g: FoamId) -> bool {
    arena.int(g, gdecl::DIR) == gdecl::EXPORT
}

pub fn gdecl_is_import(arena: &FoamArena, g: FoamId) -> bool {
    arena.int(g, gdecl::DIR) == gdecl::IMPORT
}

/// Exported with protocol `proto`.
pub fn gdecl_is_export_of(arena: &FoamArena, proto: ProtoTag, g: FoamId) -> bool {
    gdecl_is_export(arena, g) && arena.int(g, gdecl::PROTOCOL) == i64::from(proto.ordinal())
}

/// Format index of lexical level `level` of a `Prog`.
pub fn prog_format_for_level(arena: &FoamArena, p: FoamId, level: i64) -> Option<i64> {
    let levels = arena.child(p, prog::LEVELS);
    let i = usize::try_from(level).ok()?;
    if !levels.is_valid() || i >= arena.argc(levels) {
        return None;
    }
    Some(arena.int(levels, i))
}

pub fn prog_info(arena: &FoamArena, p: FoamId) -> ProgInfo {
    ProgInfo::from_bits_truncate(arena.int(p, prog::INFO_BITS) as u32)
}

/// Whether any `Prog` defined at the top of the unit is a coroutine.
pub fn unit_has_coroutine(arena: &FoamArena, u: FoamId) -> bool {
    let defs = arena.child(u, unit::DEFS);
    arena.children(defs).any(|def| {
        let rhs = arena.child(def, assign::RHS);
        rhs.is_valid()
            && arena.tag(rhs) == FoamTag::Prog
            && prog_info(arena, rhs).contains(ProgInfo::COROUTINE)
    })
}

/// Symbols of every declaration in formats `1..` of a unit, in order.
pub fn syme_list(arena: &FoamArena, u: FoamId) -> Vec<SymeId> {
    let formats = arena.child(u, unit::FORMATS);
    arena
        .children(formats)
        .skip(1)
        .flat_map(|dd| arena.children_from(dd, ddecl::FIRST))
        .filter(|d| d.is_valid())
        .filter_map(|d| arena.syme(d))
        .collect()
}

/// Defining expression of every constant of a unit, indexed by constant
/// number. Slots with no definition are `NONE`.
pub fn const_vector(arena: &FoamArena, u: FoamId) -> Vec<FoamId> {
    let count = format_len(arena, arena.child(u, unit::FORMATS), format_slot::CONSTS as i64);
    let mut out = vec![FoamId::NONE; count];
    for def in arena.children(arena.child(u, unit::DEFS)) {
        let lhs = arena.child(def, assign::LHS);
        if arena.tag(lhs) != FoamTag::Const {
            continue;
        }
        if let Some(slot) = usize::try_from(arena.int(lhs, 0)).ok().and_then(|i| out.get_mut(i)) {
            *slot = arena.child(def, assign::RHS);
        }
    }
    out
}

// === Predicates ===

/// Tags that denote a storage location.
pub fn is_ref_tag(tag: FoamTag) -> bool {
    matches!(
        tag,
        FoamTag::Loc
            | FoamTag::Par
            | FoamTag::Lex
            | FoamTag::Glo
            | FoamTag::Const
            | FoamTag::RElt
            | FoamTag::RRElt
            | FoamTag::IRElt
            | FoamTag::TRElt
            | FoamTag::EElt
            | FoamTag::EInfo
            | FoamTag::PRef
            | FoamTag::CEnv
            | FoamTag::CProg
            | FoamTag::AElt
    )
}

pub fn is_ref(arena: &FoamArena, id: FoamId) -> bool {
    is_ref_tag(arena.tag(id))
}

/// Literal data, including arrays and casts of literal data.
pub fn is_data(arena: &FoamArena, id: FoamId) -> bool {
    match arena.tag(id) {
        FoamTag::Cast => is_data(arena, arena.child(id, 1)),
        tag => matches!(
            tag,
            FoamTag::Nil
                | FoamTag::Char
                | FoamTag::Bool
                | FoamTag::Byte
                | FoamTag::HInt
                | FoamTag::SInt
                | FoamTag::BInt
                | FoamTag::SFlo
                | FoamTag::DFlo
                | FoamTag::Word
                | FoamTag::Arb
                | FoamTag::Arr
        ),
    }
}

/// `Set` or `Def` whose left side is `Values`.
pub fn is_multi_assign(arena: &FoamArena, id: FoamId) -> bool {
    matches!(arena.tag(id), FoamTag::Set | FoamTag::Def)
        && arena.tag(arena.child(id, assign::LHS)) == FoamTag::Values
}

/// Whether any top-level statement of a `Prog` body is a multi-assignment.
pub fn prog_has_multi_assign(arena: &FoamArena, p: FoamId) -> bool {
    let body = arena.child(p, prog::BODY);
    body.is_valid() && arena.children(body).any(|s| is_multi_assign(arena, s))
}

pub fn is_control_flow(arena: &FoamArena, id: FoamId) -> bool {
    matches!(
        arena.tag(id),
        FoamTag::Return
            | FoamTag::Label
            | FoamTag::Goto
            | FoamTag::If
            | FoamTag::Select
            | FoamTag::Loose
            | FoamTag::Kill
            | FoamTag::Free
            | FoamTag::Throw
            | FoamTag::Catch
            | FoamTag::Seq
            | FoamTag::GenerStep
    )
}

/// Whether evaluating the tree can have an effect. Nested `Prog`s are not
/// evaluated and so never count.
pub fn has_side_effect(arena: &FoamArena, id: FoamId) -> bool {
    match arena.tag(id) {
        FoamTag::Set
        | FoamTag::Def
        | FoamTag::PCall
        | FoamTag::OCall
        | FoamTag::CCall
        | FoamTag::Catch
        | FoamTag::EEnsure
        | FoamTag::Yield => return true,
        FoamTag::BCall => {
            let op = BValTag::from_i64(arena.int(id, call::BCALL_OP));
            if op.is_some_and(BValTag::has_side_effects) {
                return true;
            }
        }
        FoamTag::Prog => return false,
        _ => {}
    }
    ensure_sufficient_stack(|| arena.children(id).any(|c| has_side_effect(arena, c)))
}

/// First node in pre-order satisfying `pred`.
pub fn find_first<F>(arena: &FoamArena, id: FoamId, pred: &mut F) -> Option<FoamId>
where
    F: FnMut(&FoamArena, FoamId) -> bool,
{
    if !id.is_valid() {
        return None;
    }
    if pred(arena, id) {
        return Some(id);
    }
    ensure_sufficient_stack(|| arena.children(id).find_map(|c| find_first(arena, c, &mut *pred)))
}

/// First node in pre-order with tag `tag`.
pub fn find_first_tag(arena: &FoamArena, id: FoamId, tag: FoamTag) -> Option<FoamId> {
    find_first(arena, id, &mut |a: &FoamArena, n: FoamId| a.tag(n) == tag)
}

/// Number of statements of a `Seq` with tag `kind`.
pub fn count_subtrees_of_kind(arena: &FoamArena, seq: FoamId, kind: FoamTag) -> usize {
    assert_eq!(arena.tag(seq), FoamTag::Seq, "count_subtrees_of_kind expects a Seq");
    arena.children(seq).filter(|&s| arena.tag(s) == kind).count()
}

/// Index of the statement control reaches after statement `index` of a
/// `Seq`, or -1 when it leaves the sequence.
///
/// Index -1 means "before the first statement". After a `Goto`, `Return`
/// or `Throw` only a `Label` is reachable.
pub fn seq_next_reachable(arena: &FoamArena, seq: FoamId, index: i64) -> i64 {
    let argc = arena.argc(seq) as i64;
    if index == argc - 1 {
        return -1;
    }
    if index == -1 {
        return 0;
    }
    let stmt = arena.child(seq, index as usize);
    let tag = arena.tag(stmt);
    if tag == FoamTag::Goto || tag.props().contains(TagProps::SEQ_EXIT) {
        return ((index + 1)..argc)
            .find(|&i| arena.tag(arena.child(seq, i as usize)) == FoamTag::Label)
            .unwrap_or(-1);
    }
    index + 1
}

/// Text of a `Char` array, dropping the trailing terminator.
pub fn arr_to_string(arena: &FoamArena, arr: FoamId) -> Option<String> {
    if arena.tag(arr) != FoamTag::Arr || arena.int(arr, 0) != i64::from(FoamTag::Char.ordinal()) {
        return None;
    }
    let elts: Vec<u8> = arena.ints_from(arr, 1).map(|c| c as u8).collect();
    let text = elts.split_last().map_or(&[][..], |(_, rest)| rest);
    Some(String::from_utf8_lossy(text).into_owned())
}

// === Types of declared values ===

/// A `NOp` type whose format has no values.
pub fn type_is_void(arena: &FoamArena, formats: FoamId, ty: FoamTag, fmt: i64) -> bool {
    ty == FoamTag::NOp && (fmt == 0 || format_len(arena, formats, fmt) == 0)
}

/// A `NOp` type whose format has values.
pub fn type_is_multi(arena: &FoamArena, formats: FoamId, ty: FoamTag, fmt: i64) -> bool {
    ty == FoamTag::NOp && fmt != 0 && format_len(arena, formats, fmt) > 0
}

pub fn type_is_value(ty: FoamTag) -> bool {
    ty != FoamTag::NOp
}

// === Rewrites ===

impl FoamArena {
    /// `BCall(BoolNot, e)`.
    pub fn not_this(&mut self, e: FoamId) -> FoamId {
        self.new_bcall(BValTag::BoolNot, &[e])
    }

    /// `e` itself when `wanted == actual`, else `Cast(wanted, e)`.
    pub fn cast_if_needed(&mut self, wanted: FoamTag, actual: FoamTag, e: FoamId) -> FoamId {
        if wanted == actual {
            e
        } else {
            self.new_cast(wanted, e)
        }
    }

    /// A placeholder value of type `ty`: `SInt 0`, or `Cast(ty, Nil)`.
    pub fn neutral_value(&mut self, ty: FoamTag) -> FoamId {
        if ty == FoamTag::SInt {
            return self.new_sint(0);
        }
        let nil = self.new_nil();
        self.new_cast(ty, nil)
    }
}

#[cfg(test)]
mod tests;
