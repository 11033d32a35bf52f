//! Codec errors.
//!
//! Encoding fails only on trees the binary form cannot hold. Decoding is
//! defensive: a truncated or corrupt buffer yields a [`DecodeError`], never
//! a panic.

use foam_ir::{FieldKind, FoamTag};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("{tag} slot {slot} holds a host-only value")]
    Unencodable { tag: FoamTag, slot: usize },
    #[error("{tag} slot {slot} is a null child")]
    NullChild { tag: FoamTag, slot: usize },
    #[error("{tag} slot {slot} value {value} does not fit its `{}` encoding", kind.code())]
    OutOfRange {
        tag: FoamTag,
        slot: usize,
        kind: FieldKind,
        value: i64,
    },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("buffer ends at {len} but {wanted} more bytes are needed at {pos}")]
    UnexpectedEnd { pos: usize, wanted: usize, len: usize },
    #[error("byte {byte:#04x} at {pos} is not a tag")]
    BadTag { byte: u8, pos: usize },
    #[error("{tag} slot {slot} has invalid {what} ordinal {value}")]
    BadOrdinal {
        tag: FoamTag,
        slot: usize,
        what: &'static str,
        value: i64,
    },
    #[error("{tag} cannot have {argc} slots")]
    BadArgc { tag: FoamTag, argc: i64 },
    #[error("negative length {len} at {pos}")]
    BadLength { pos: usize, len: i64 },
    #[error("string at {pos} is not UTF-8")]
    BadString { pos: usize },
    #[error("expected {expected} at {pos}, found {found}")]
    WrongTag {
        expected: FoamTag,
        found: FoamTag,
        pos: usize,
    },
    #[error("constant {index} is defined twice or out of range")]
    BadConstIndex { index: i64 },
    #[error("unit declares {declared} constants but defines {defined}")]
    ConstCountMismatch { declared: usize, defined: usize },
}
