//! FOAM intermediate representation.
//!
//! FOAM is the low-level, first-order IR the Aldor compiler lowers to before
//! code generation. This crate holds its data model:
//! - the instruction, builtin, protocol and declaration-usage tag tables
//! - shapes: one string per tag describing every slot
//! - [`FoamArena`], the node store, with typed construction helpers
//! - shape-driven traversal (children, count, free, copy, equality, hash)
//! - unit queries, expression typing and the s-expression text form
//!
//! # Design
//!
//! - **Flat storage**: nodes live in one arena and refer to each other by
//!   [`FoamId`]; there are no boxed trees.
//! - **Shapes drive everything**: generic walks read the tag's shape and
//!   never match on tags, so adding a tag only needs a table row.
//! - **Weak annotations**: symbol and optimizer handles are plain ids kept
//!   in side tables; freeing a tree never touches what they name.

mod arena;
mod build;
mod builtin;
mod expr_type;
pub mod fields;
mod ids;
pub mod names;
mod proto;
pub mod query;
mod reduce;
mod sexpr;
mod shape;
mod slot;
mod span;
mod tag;
mod traverse;

pub use arena::{FoamArena, Slots};
pub use builtin::{BValTag, BuiltinInfo};
pub use expr_type::{
    expr_type, trailing_array_decl, trailing_leading_count, trailing_leading_decl, DeclLookup,
    ExprType, ExprTypeError, ProgDeclLookup,
};
pub use fields::{ProgHeader, ProgInfo};
pub use ids::{FoamId, OptInfoId, SymeId};
pub use proto::{DDeclUsage, ProtoTag};
pub use reduce::{fits_sint32, sint_literal_value, CHUNK_BITS};
pub use sexpr::{from_sexpr, to_sexpr, SExprError};
pub use shape::{FieldKind, Shape};
pub use slot::{BIntLit, Slot};
pub use span::Span;
pub use tag::{Arity, FoamTag, TagInfo, TagProps};
pub use traverse::{equal, equal_mod_buffer, Children};
