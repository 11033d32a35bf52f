//! Random access into an encoded `Unit`.
//!
//! An encoded unit is `Unit(DFmt(..), DDef(Def(lhs, rhs)..))`. These readers
//! walk just enough of it to answer one question: the format table, the
//! number of constants, where each constant's value starts, or one
//! constant's value.

use foam_ir::fields::format_slot;
use foam_ir::{FoamArena, FoamId, FoamTag};

use crate::buffer::Buffer;
use crate::decode::{decode, expect_header, prog_header, read_header, skip};
use crate::error::DecodeError;

/// Decode only the unit's format table (`DFmt`).
pub fn formats_from_buffer(buf: &mut Buffer, arena: &mut FoamArena) -> Result<FoamId, DecodeError> {
    buf.rewind();
    expect_header(buf, FoamTag::Unit)?;
    decode(buf, arena)
}

/// Number of constants the unit declares.
pub fn const_count(buf: &mut Buffer) -> Result<usize, DecodeError> {
    buf.rewind();
    expect_header(buf, FoamTag::Unit)?;
    let formats = expect_header(buf, FoamTag::DFmt)?;
    if formats.argc <= format_slot::CONSTS {
        return Err(DecodeError::BadArgc {
            tag: FoamTag::DFmt,
            argc: formats.argc as i64,
        });
    }
    for _ in 0..format_slot::CONSTS {
        skip(buf)?;
    }
    let consts = expect_header(buf, FoamTag::DDecl)?;
    Ok(consts.argc - FoamTag::DDecl.shape().nary_start())
}

/// Buffer offset of each constant's defining expression, by constant
/// number.
///
/// Every declared constant must be defined exactly once.
pub fn const_offsets(buf: &mut Buffer) -> Result<Vec<usize>, DecodeError> {
    let count = const_count(buf)?;
    buf.rewind();
    expect_header(buf, FoamTag::Unit)?;
    skip(buf)?;
    let defs = expect_header(buf, FoamTag::DDef)?;

    let mut offsets = vec![None; count];
    for _ in 0..defs.argc {
        expect_header(buf, FoamTag::Def)?;
        let lhs = read_header(buf)?;
        let index = lhs.format.get(buf)?;
        match lhs.tag {
            FoamTag::Const => {
                let slot = usize::try_from(index)
                    .ok()
                    .filter(|&j| j < count && offsets[j].is_none())
                    .ok_or(DecodeError::BadConstIndex { index })?;
                offsets[slot] = Some(buf.position());
            }
            FoamTag::Glo => {}
            found => {
                return Err(DecodeError::WrongTag {
                    expected: FoamTag::Const,
                    found,
                    pos: lhs.pos,
                })
            }
        }
        skip(buf)?;
    }

    let defined = offsets.iter().filter(|o| o.is_some()).count();
    tracing::debug!(declared = count, defined, "scanned constant offsets");
    offsets
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or(DecodeError::ConstCountMismatch {
            declared: count,
            defined,
        })
}

/// Decode the constant whose value starts at `pos`.
pub fn const_at(buf: &mut Buffer, arena: &mut FoamArena, pos: usize) -> Result<FoamId, DecodeError> {
    buf.set_position(pos);
    decode(buf, arena)
}

/// Header-only read of the `Prog` at `pos`; `None` if it is not a `Prog`.
pub fn prog_header_at(
    buf: &mut Buffer,
    arena: &mut FoamArena,
    pos: usize,
) -> Result<Option<FoamId>, DecodeError> {
    buf.set_position(pos);
    prog_header(buf, arena)
}
