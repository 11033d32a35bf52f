//! Source positions, kept apart from the code bytes.
//!
//! A `Seq` records its statements' spans (and does not descend into them),
//! a `Prog` records its own span and descends, and every other node just
//! descends into its children. Reading walks an already-decoded tree of the
//! same shape in the same order.

use foam_ir::{FoamArena, FoamId, FoamTag, Slot, Span};
use foam_stack::ensure_sufficient_stack;

use crate::buffer::Buffer;
use crate::error::DecodeError;

/// Append the spans of the tree rooted at `id`.
pub fn positions_to_buffer(arena: &FoamArena, id: FoamId, buf: &mut Buffer) {
    if !id.is_valid() {
        return;
    }
    ensure_sufficient_stack(|| match arena.tag(id) {
        FoamTag::Seq => {
            for slot in arena.slots(id) {
                let span = match slot {
                    Slot::Code(stmt) if stmt.is_valid() => arena.span(*stmt),
                    _ => Span::NONE,
                };
                put_span(buf, span);
            }
        }
        tag => {
            if tag == FoamTag::Prog {
                put_span(buf, arena.span(id));
            }
            for child in arena.children(id) {
                positions_to_buffer(arena, child, buf);
            }
        }
    });
}

/// Restore spans written by [`positions_to_buffer`] onto `id`.
pub fn positions_from_buffer(
    buf: &mut Buffer,
    arena: &mut FoamArena,
    id: FoamId,
) -> Result<(), DecodeError> {
    if !id.is_valid() {
        return Ok(());
    }
    ensure_sufficient_stack(|| match arena.tag(id) {
        FoamTag::Seq => {
            for i in 0..arena.argc(id) {
                let span = get_span(buf)?;
                let stmt = arena.child(id, i);
                if stmt.is_valid() {
                    arena.set_span(stmt, span);
                }
            }
            Ok(())
        }
        tag => {
            if tag == FoamTag::Prog {
                let span = get_span(buf)?;
                arena.set_span(id, span);
            }
            let children: Vec<FoamId> = arena.children(id).collect();
            for child in children {
                positions_from_buffer(buf, arena, child)?;
            }
            Ok(())
        }
    })
}

fn put_span(buf: &mut Buffer, span: Span) {
    buf.put_u32(span.start);
    buf.put_u32(span.end);
}

fn get_span(buf: &mut Buffer) -> Result<Span, DecodeError> {
    Ok(Span::new(buf.get_u32()?, buf.get_u32()?))
}
