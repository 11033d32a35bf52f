//! Reduction of wide `SInt` literals to 31-bit chunk expressions.
//!
//! The binary format stores `SInt` in 32 bits. A literal outside that range
//! is rewritten as an expression over unsigned 31-bit chunks:
//!
//! ```text
//! acc = SInt(top)
//! acc = BCall(SIntOr, BCall(SIntShiftUp, acc, SInt 31), SInt(part))   per lower chunk
//! BCall(SIntNegate, acc)                                            if negative
//! ```

use crate::arena::FoamArena;
use crate::builtin::BValTag;
use crate::fields::call;
use crate::ids::FoamId;
use crate::tag::FoamTag;

/// Width of one chunk.
pub const CHUNK_BITS: u32 = 31;
const CHUNK_MASK: u64 = (1 << CHUNK_BITS) - 1;
/// Chunks needed to cover a 64-bit magnitude.
const CHUNKS: usize = (u64::BITS as usize).div_ceil(CHUNK_BITS as usize);

/// Whether `v` can be stored directly as a 32-bit `SInt`.
#[inline]
pub fn fits_sint32(v: i64) -> bool {
    i32::try_from(v).is_ok()
}

impl FoamArena {
    /// `SInt(v)` when it fits 32 bits, else its chunk expression.
    pub fn new_sint_reduced(&mut self, v: i64) -> FoamId {
        if fits_sint32(v) {
            return self.new_sint(v);
        }
        let mut magnitude = v.unsigned_abs();
        let mut parts = [0u64; CHUNKS];
        for part in &mut parts {
            *part = magnitude & CHUNK_MASK;
            magnitude >>= CHUNK_BITS;
        }
        let top = parts.iter().rposition(|&p| p != 0).unwrap_or(0);
        let mut acc = self.new_sint(parts[top] as i64);
        for &part in parts[..top].iter().rev() {
            let shift = self.new_sint(i64::from(CHUNK_BITS));
            let shifted = self.new_bcall(BValTag::SIntShiftUp, &[acc, shift]);
            let low = self.new_sint(part as i64);
            acc = self.new_bcall(BValTag::SIntOr, &[shifted, low]);
        }
        if v < 0 {
            acc = self.new_bcall(BValTag::SIntNegate, &[acc]);
        }
        tracing::trace!(value = v, chunks = top + 1, "split wide SInt literal");
        acc
    }
}

/// Value of an `SInt` literal or of a chunk expression built from one.
///
/// Evaluates `SInt`, `BCall SIntShiftUp/SIntOr/SIntNegate` over such
/// operands with wrapping 64-bit arithmetic; anything else is `None`.
pub fn sint_literal_value(arena: &FoamArena, id: FoamId) -> Option<i64> {
    if !id.is_valid() {
        return None;
    }
    match arena.tag(id) {
        FoamTag::SInt => Some(arena.int(id, 0)),
        FoamTag::BCall => {
            let op = BValTag::from_i64(arena.int(id, call::BCALL_OP))?;
            let args: Vec<FoamId> = arena.children_from(id, call::BCALL_ARGS).collect();
            match (op, args.as_slice()) {
                (BValTag::SIntShiftUp, &[a, n]) => {
                    let n = u32::try_from(sint_literal_value(arena, n)?).ok()?;
                    Some(sint_literal_value(arena, a)?.wrapping_shl(n))
                }
                (BValTag::SIntOr, &[a, b]) => {
                    Some(sint_literal_value(arena, a)? | sint_literal_value(arena, b)?)
                }
                (BValTag::SIntNegate, &[a]) => Some(sint_literal_value(arena, a)?.wrapping_neg()),
                _ => None,
            }
        }
        _ => None,
    }
}
