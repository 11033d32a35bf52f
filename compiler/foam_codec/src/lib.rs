//! Binary form of FOAM trees.
//!
//! The encoding is compact and self-delimiting: every node starts with a
//! tag byte that may fold in the width of the node's small integers, so a
//! `Loc 1` is a single byte. Besides full [`encode`]/[`decode`], encoded
//! units support random access: [`skip`] a tree, read just a `Prog` header
//! ([`prog_header`]), count and locate constants ([`const_count`],
//! [`const_offsets`]) and decode one constant ([`const_at`]).
//!
//! Integer literals wider than 32 bits are written as 31-bit chunk
//! expressions, so a decoded tree matches its source under
//! [`foam_ir::equal_mod_buffer`], which [`verify_buffer`] checks.

mod buffer;
mod decode;
mod encode;
mod error;
mod format;
mod position;
mod unit;

#[cfg(test)]
mod fixture;

pub use buffer::Buffer;
pub use decode::{decode, from_bytes, prog_header, skip, verify_buffer};
pub use encode::{encode, to_bytes};
pub use error::{DecodeError, EncodeError};
pub use format::{fold, select_format, unfold, IntFormat, FOLD_SPAN, FORMAT_COUNT, IMMEDIATE_FORMS};
pub use position::{positions_from_buffer, positions_to_buffer};
pub use unit::{const_at, const_count, const_offsets, formats_from_buffer, prog_header_at};
