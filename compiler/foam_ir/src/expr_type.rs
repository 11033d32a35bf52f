//! Static type of a FOAM expression.
//!
//! Most tags are their own type. References find their declaration through
//! a [`DeclLookup`], so the auditor and other clients can each supply their
//! own declaration storage; [`ProgDeclLookup`] is the standard one, reading
//! the enclosing `Prog` and the unit's format table.

use thiserror::Error;

use crate::arena::FoamArena;
use crate::builtin::BValTag;
use crate::fields::{assign, call, decl, eelt, format_slot, lex, prog, relt, trelt};
use crate::ids::FoamId;
use crate::query::{ddecl_decl, decl_format, decl_type, format_ddecl, prog_format_for_level};
use crate::tag::FoamTag;

/// Type tag plus its format or element type.
///
/// `extra` is the record format for `Rec`/`TR`, the element type ordinal for
/// `Arr`, and [`format_slot::EMPTY`] otherwise.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExprType {
    pub tag: FoamTag,
    pub extra: i64,
}

impl ExprType {
    pub const fn plain(tag: FoamTag) -> Self {
        ExprType { tag, extra: format_slot::EMPTY as i64 }
    }

    pub const fn with_extra(tag: FoamTag, extra: i64) -> Self {
        ExprType { tag, extra }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExprTypeError {
    #[error("no declaration for {tag} node {node:?}")]
    UnresolvedDecl { tag: FoamTag, node: FoamId },
    #[error("{tag} node {node:?} has an invalid {what} ordinal {value}")]
    BadOrdinal {
        tag: FoamTag,
        node: FoamId,
        what: &'static str,
        value: i64,
    },
    #[error("{0} has no expression type")]
    Unhandled(FoamTag),
}

/// Finds the `Decl`/`GDecl` a reference node refers to.
pub trait DeclLookup {
    /// Declaration for `expr`, one of `Loc`, `Par`, `Glo`, `Fluid`,
    /// `Const`, `Lex`, `RElt`, `IRElt`, `TRElt` or `EElt`.
    fn lookup(&self, arena: &FoamArena, expr: FoamId) -> Option<FoamId>;
}

/// Declarations from a `Prog` and the unit's `DFmt`.
///
/// `prog` may be `NONE` outside procedures; `Loc`, `Par` and `Lex` then do
/// not resolve.
#[derive(Copy, Clone, Debug)]
pub struct ProgDeclLookup {
    pub prog: FoamId,
    pub formats: FoamId,
}

impl ProgDeclLookup {
    pub fn new(prog: FoamId, formats: FoamId) -> Self {
        ProgDeclLookup { prog, formats }
    }

    fn prog_decl(&self, arena: &FoamArena, slot: usize, index: i64) -> Option<FoamId> {
        if !self.prog.is_valid() {
            return None;
        }
        ddecl_decl(arena, arena.child(self.prog, slot), index)
    }

    fn format_decl(&self, arena: &FoamArena, format: i64, index: i64) -> Option<FoamId> {
        ddecl_decl(arena, format_ddecl(arena, self.formats, format)?, index)
    }
}

impl DeclLookup for ProgDeclLookup {
    fn lookup(&self, arena: &FoamArena, expr: FoamId) -> Option<FoamId> {
        match arena.tag(expr) {
            FoamTag::Loc => self.prog_decl(arena, prog::LOCALS, arena.int(expr, 0)),
            FoamTag::Par => self.prog_decl(arena, prog::PARAMS, arena.int(expr, 0)),
            FoamTag::Glo => self.format_decl(arena, format_slot::GLOBALS as i64, arena.int(expr, 0)),
            FoamTag::Fluid => self.format_decl(arena, format_slot::FLUIDS as i64, arena.int(expr, 0)),
            FoamTag::Const => self.format_decl(arena, format_slot::CONSTS as i64, arena.int(expr, 0)),
            FoamTag::Lex => {
                if !self.prog.is_valid() {
                    return None;
                }
                let format = prog_format_for_level(arena, self.prog, arena.int(expr, lex::LEVEL))?;
                self.format_decl(arena, format, arena.int(expr, lex::INDEX))
            }
            FoamTag::RElt => {
                self.format_decl(arena, arena.int(expr, relt::FORMAT), arena.int(expr, relt::FIELD))
            }
            FoamTag::IRElt => {
                let dd = format_ddecl(arena, self.formats, arena.int(expr, relt::FORMAT))?;
                trailing_leading_decl(arena, dd, arena.int(expr, relt::FIELD))
            }
            FoamTag::TRElt => {
                let dd = format_ddecl(arena, self.formats, arena.int(expr, trelt::FORMAT))?;
                trailing_array_decl(arena, dd, arena.int(expr, trelt::FIELD))
            }
            FoamTag::EElt => self.format_decl(arena, arena.int(expr, eelt::ENV), arena.int(expr, eelt::LEX)),
            _ => None,
        }
    }
}

/// Number of leading (non-array) fields of a trailing-array `DDecl`, held in
/// the format of its first declaration.
pub fn trailing_leading_count(arena: &FoamArena, dd: FoamId) -> Option<i64> {
    let first = ddecl_decl(arena, dd, 0)?;
    Some(arena.int(first, decl::FORMAT))
}

/// Leading field `field` of a trailing-array `DDecl`.
pub fn trailing_leading_decl(arena: &FoamArena, dd: FoamId, field: i64) -> Option<FoamId> {
    if field < 0 || field >= trailing_leading_count(arena, dd)? {
        return None;
    }
    ddecl_decl(arena, dd, 1 + field)
}

/// Array-element field `field` of a trailing-array `DDecl`.
pub fn trailing_array_decl(arena: &FoamArena, dd: FoamId, field: i64) -> Option<FoamId> {
    if field < 0 {
        return None;
    }
    let leading = trailing_leading_count(arena, dd)?;
    ddecl_decl(arena, dd, 1 + leading + field)
}

fn type_slot(arena: &FoamArena, id: FoamId, slot: usize) -> Result<FoamTag, ExprTypeError> {
    let value = arena.int(id, slot);
    FoamTag::from_i64(value).ok_or(ExprTypeError::BadOrdinal {
        tag: arena.tag(id),
        node: id,
        what: "type",
        value,
    })
}

fn builtin_slot(arena: &FoamArena, id: FoamId, slot: usize) -> Result<BValTag, ExprTypeError> {
    let value = arena.int(id, slot);
    BValTag::from_i64(value).ok_or(ExprTypeError::BadOrdinal {
        tag: arena.tag(id),
        node: id,
        what: "builtin",
        value,
    })
}

fn declared(arena: &FoamArena, expr: FoamId, lookup: &impl DeclLookup) -> Result<ExprType, ExprTypeError> {
    let tag = arena.tag(expr);
    let d = lookup
        .lookup(arena, expr)
        .ok_or(ExprTypeError::UnresolvedDecl { tag, node: expr })?;
    let ty = decl_type(arena, d).ok_or(ExprTypeError::BadOrdinal {
        tag: arena.tag(d),
        node: d,
        what: "type",
        value: arena.int(d, decl::TYPE),
    })?;
    if tag != FoamTag::Const && matches!(ty, FoamTag::Rec | FoamTag::Arr | FoamTag::TR) {
        return Ok(ExprType::with_extra(ty, decl_format(arena, d)));
    }
    Ok(ExprType::plain(ty))
}

/// Type of `expr`.
pub fn expr_type(arena: &FoamArena, expr: FoamId, lookup: &impl DeclLookup) -> Result<ExprType, ExprTypeError> {
    let tag = arena.tag(expr);
    let ty = match tag {
        FoamTag::Nil
        | FoamTag::Char
        | FoamTag::Bool
        | FoamTag::Byte
        | FoamTag::HInt
        | FoamTag::SInt
        | FoamTag::SFlo
        | FoamTag::DFlo
        | FoamTag::Word
        | FoamTag::Arb
        | FoamTag::Ptr
        | FoamTag::Clos
        | FoamTag::Gener
        | FoamTag::GenIter
        | FoamTag::BInt
        | FoamTag::Env
        | FoamTag::RRec
        | FoamTag::Prog => ExprType::plain(tag),

        FoamTag::Rec | FoamTag::Arr => ExprType::with_extra(tag, arena.int(expr, 0)),
        FoamTag::RNew | FoamTag::MFmt => ExprType::with_extra(FoamTag::Rec, arena.int(expr, 0)),
        FoamTag::TRNew => ExprType::with_extra(FoamTag::TR, arena.int(expr, 0)),
        FoamTag::ANew => ExprType::with_extra(FoamTag::Arr, arena.int(expr, 0)),

        FoamTag::BVal | FoamTag::BCall => ExprType::plain(builtin_slot(arena, expr, 0)?.ret_type()),
        FoamTag::CProg => ExprType::plain(FoamTag::Prog),
        FoamTag::CEnv | FoamTag::PushEnv | FoamTag::EEnv => ExprType::plain(FoamTag::Env),
        FoamTag::Cast => {
            let ty = type_slot(arena, expr, 0)?;
            if ty == FoamTag::Arr {
                ExprType::with_extra(ty, 0)
            } else {
                ExprType::plain(ty)
            }
        }
        FoamTag::Set | FoamTag::Def => return expr_type(arena, arena.child(expr, assign::RHS), lookup),
        FoamTag::AElt => ExprType::plain(type_slot(arena, expr, 0)?),

        FoamTag::Par
        | FoamTag::Loc
        | FoamTag::Glo
        | FoamTag::Fluid
        | FoamTag::Const
        | FoamTag::Lex
        | FoamTag::RElt
        | FoamTag::IRElt
        | FoamTag::TRElt
        | FoamTag::EElt => declared(arena, expr, lookup)?,

        FoamTag::RRNew => ExprType::plain(FoamTag::RRec),
        FoamTag::RRFmt | FoamTag::RRElt | FoamTag::GenerValue | FoamTag::EInfo => ExprType::plain(FoamTag::Word),
        FoamTag::PCall => ExprType::plain(type_slot(arena, expr, call::PCALL_TYPE)?),
        FoamTag::CCall => ExprType::plain(type_slot(arena, expr, call::CCALL_TYPE)?),
        FoamTag::OCall => ExprType::plain(type_slot(arena, expr, call::OCALL_TYPE)?),
        FoamTag::PRef => ExprType::plain(FoamTag::SInt),
        FoamTag::Values => ExprType::plain(FoamTag::NOp),
        _ => return Err(ExprTypeError::Unhandled(tag)),
    };
    Ok(ty)
}
