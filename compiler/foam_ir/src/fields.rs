//! Named slot positions and well-known unit layout.
//!
//! Slot indices follow the shape strings in [`crate::tag`].

use bitflags::bitflags;

use crate::tag::FoamTag;

/// Well-known declaration groups of a unit's `DFmt`.
pub mod format_slot {
    pub const GLOBALS: usize = 0;
    pub const CONSTS: usize = 1;
    pub const LEXES: usize = 2;
    pub const FLUIDS: usize = 3;
    /// A format with no fields; also the "no format" value of declarations.
    pub const EMPTY: usize = 4;
    /// Placeholder environment format for levels whose layout is unknown.
    pub const ENV_USED: usize = 5;
    /// Number of reserved slots; user formats start here.
    pub const RESERVED: usize = 6;
}

/// `Unit`: format table, definitions.
pub mod unit {
    pub const FORMATS: usize = 0;
    pub const DEFS: usize = 1;
}

/// `Set` and `Def`.
pub mod assign {
    pub const LHS: usize = 0;
    pub const RHS: usize = 1;
}

/// `Decl`: type, id, symbol index, format.
pub mod decl {
    pub const TYPE: usize = 0;
    pub const ID: usize = 1;
    pub const SYME_INDEX: usize = 2;
    pub const FORMAT: usize = 3;
}

/// `GDecl`: type, id, return type, format, direction, protocol.
pub mod gdecl {
    pub const TYPE: usize = 0;
    pub const ID: usize = 1;
    pub const RET_TYPE: usize = 2;
    pub const FORMAT: usize = 3;
    pub const DIR: usize = 4;
    pub const PROTOCOL: usize = 5;

    pub const IMPORT: i64 = 0;
    pub const EXPORT: i64 = 1;
}

/// `DDecl`: usage, then declarations.
pub mod ddecl {
    pub const USAGE: usize = 0;
    pub const FIRST: usize = 1;
}

/// `Prog`.
pub mod prog {
    pub const END_OFFSET: usize = 0;
    pub const N_LABELS: usize = 1;
    pub const RET_TYPE: usize = 2;
    pub const FORMAT: usize = 3;
    pub const INFO_BITS: usize = 4;
    pub const SIZE: usize = 5;
    pub const TIME: usize = 6;
    pub const BODY_FLAGS: usize = 7;
    pub const PARAMS: usize = 8;
    pub const LOCALS: usize = 9;
    pub const FLUIDS: usize = 10;
    pub const LEVELS: usize = 11;
    pub const BODY: usize = 12;
    pub const ARGC: usize = 13;
}

/// `Lex`: level, index.
pub mod lex {
    pub const LEVEL: usize = 0;
    pub const INDEX: usize = 1;
}

/// `RElt` and `IRElt`: format, record, field.
pub mod relt {
    pub const FORMAT: usize = 0;
    pub const EXPR: usize = 1;
    pub const FIELD: usize = 2;
}

/// `TRElt`: format, record, array index, field.
pub mod trelt {
    pub const FORMAT: usize = 0;
    pub const EXPR: usize = 1;
    pub const INDEX: usize = 2;
    pub const FIELD: usize = 3;
}

/// `EElt`: format, environment, level, lex index.
pub mod eelt {
    pub const ENV: usize = 0;
    pub const REF: usize = 1;
    pub const LEVEL: usize = 2;
    pub const LEX: usize = 3;
}

/// `RRElt`: field, record, format.
pub mod rrelt {
    pub const FIELD: usize = 0;
    pub const DATA: usize = 1;
    pub const FMT: usize = 2;
}

/// Calls with a leading type (`CCall`, `OCall`) or protocol (`PCall`).
pub mod call {
    pub const PCALL_PROTOCOL: usize = 0;
    pub const PCALL_TYPE: usize = 1;
    pub const PCALL_OP: usize = 2;
    pub const PCALL_ARGS: usize = 3;

    pub const BCALL_OP: usize = 0;
    pub const BCALL_ARGS: usize = 1;

    pub const CCALL_TYPE: usize = 0;
    pub const CCALL_OP: usize = 1;
    pub const CCALL_ARGS: usize = 2;

    pub const OCALL_TYPE: usize = 0;
    pub const OCALL_OP: usize = 1;
    pub const OCALL_ENV: usize = 2;
    pub const OCALL_ARGS: usize = 3;
}

bitflags! {
    /// `Prog` info bits.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ProgInfo: u32 {
        const LEAF = 1 << 0;
        const PURE = 1 << 1;
        const NO_OCALLS = 1 << 2;
        const NO_FLUIDS = 1 << 3;
        const INLINED = 1 << 4;
        const COROUTINE = 1 << 5;
        const GETTER = 1 << 6;
    }
}

/// Scalar header of a `Prog`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ProgHeader {
    pub n_labels: i64,
    pub ret_type: FoamTag,
    pub format: i64,
    pub info: ProgInfo,
    pub size: i64,
    pub time: i64,
    pub body_flags: i64,
}

impl Default for ProgHeader {
    fn default() -> Self {
        ProgHeader {
            n_labels: 0,
            ret_type: FoamTag::Nil,
            format: 0,
            info: ProgInfo::empty(),
            size: 0,
            time: 0,
            body_flags: 0,
        }
    }
}
