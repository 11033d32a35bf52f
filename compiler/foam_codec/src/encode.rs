//! Tree to bytes.
//!
//! One pass, driven by the tag's shape. Each node writes its folded tag
//! byte, its argc when n-ary, then its slots:
//!
//! | kind | bytes |
//! |---|---|
//! | `t` `p` `D` `b` | 1 |
//! | `o` `h` | 2 |
//! | `w` `F` `X` | 4 |
//! | `i`, `s` length, `n` place count | per node format |
//! | `L` | per label format (set by the last `F`) |
//! | `f` / `d` | 4 / 8, IEEE-754 bits |
//! | `s` | length, then UTF-8 |
//! | `n` | sign byte, place count, 16-bit places |
//!
//! A `Prog`'s `X` slot is written as a placeholder and patched afterwards
//! with the distance from the placeholder to the end of the `Prog`.

use foam_ir::{fits_sint32, FieldKind, FoamArena, FoamId, FoamTag, Slot};
use foam_stack::ensure_sufficient_stack;

use crate::buffer::Buffer;
use crate::error::EncodeError;
use crate::format::{fold, select_format, IntFormat};

/// Encode the tree rooted at `id` at the buffer's cursor.
///
/// Returns the number of bytes written. On error `buf` is left as it was.
pub fn encode(arena: &FoamArena, id: FoamId, buf: &mut Buffer) -> Result<usize, EncodeError> {
    let mut scratch = Buffer::new();
    let mut encoder = Encoder {
        buf: &mut scratch,
        label_format: IntFormat::Word,
    };
    encoder.node(arena, id, FoamTag::Nil, 0)?;
    buf.put_bytes(scratch.as_bytes());
    let written = scratch.len();
    tracing::debug!(tag = %arena.tag(id), bytes = written, "encoded FOAM tree");
    Ok(written)
}

/// Encode the tree rooted at `id` into a fresh byte vector.
pub fn to_bytes(arena: &FoamArena, id: FoamId) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Buffer::new();
    encode(arena, id, &mut buf)?;
    Ok(buf.into_bytes())
}

struct Encoder<'b> {
    buf: &'b mut Buffer,
    label_format: IntFormat,
}

impl Encoder<'_> {
    /// `parent` and `slot` locate `id` for error reporting.
    fn node(
        &mut self,
        arena: &FoamArena,
        id: FoamId,
        parent: FoamTag,
        slot: usize,
    ) -> Result<(), EncodeError> {
        if !id.is_valid() {
            return Err(EncodeError::NullChild { tag: parent, slot });
        }
        let tag = arena.tag(id);
        if tag == FoamTag::SInt {
            let v = arena.int(id, 0);
            if !fits_sint32(v) {
                let mut scratch = FoamArena::new();
                let reduced = scratch.new_sint_reduced(v);
                return self.node(&scratch, reduced, parent, slot);
            }
        }
        ensure_sufficient_stack(|| self.fields(arena, id, tag))
    }

    fn fields(&mut self, arena: &FoamArena, id: FoamId, tag: FoamTag) -> Result<(), EncodeError> {
        let shape = tag.shape();
        let slots = arena.slots(id);
        let format = select_format(arena, id);
        self.buf.put_u8(fold(tag, format));
        if shape.is_nary() {
            format.put(self.buf, slots.len() as i64);
        }

        let outer_labels = self.label_format;
        let mut tree_length_at = None;
        for (i, slot) in slots.iter().enumerate() {
            let kind = shape.kind_at(i);
            match slot {
                Slot::Int(v) => {
                    let v = *v;
                    let out_of_range = || EncodeError::OutOfRange {
                        tag,
                        slot: i,
                        kind,
                        value: v,
                    };
                    match kind {
                        FieldKind::TypeTag
                        | FieldKind::Protocol
                        | FieldKind::DeclUsage
                        | FieldKind::Byte => {
                            self.buf.put_u8(u8::try_from(v).map_err(|_| out_of_range())?);
                        }
                        FieldKind::Builtin => {
                            self.buf.put_u16(u16::try_from(v).map_err(|_| out_of_range())?);
                        }
                        FieldKind::HalfWord => {
                            self.buf.put_i16(i16::try_from(v).map_err(|_| out_of_range())?);
                        }
                        FieldKind::Word => {
                            self.buf.put_i32(i32::try_from(v).map_err(|_| out_of_range())?);
                        }
                        FieldKind::TreeLength => {
                            tree_length_at = Some(self.buf.position());
                            self.buf.put_u32(0);
                        }
                        FieldKind::LabelFormat => {
                            self.buf.put_i32(i32::try_from(v).map_err(|_| out_of_range())?);
                            self.label_format = IntFormat::explicit_for(v);
                        }
                        FieldKind::Label => self.compressible(self.label_format, v, out_of_range)?,
                        FieldKind::Index => self.compressible(format, v, out_of_range)?,
                        _ => return Err(EncodeError::Unencodable { tag, slot: i }),
                    }
                }
                Slot::Str(s) => {
                    let len = s.len() as i64;
                    self.compressible(format, len, || EncodeError::OutOfRange {
                        tag,
                        slot: i,
                        kind,
                        value: len,
                    })?;
                    self.buf.put_bytes(s.as_bytes());
                }
                Slot::SFlo(f) => self.buf.put_u32(f.to_bits()),
                Slot::DFlo(d) => self.buf.put_u64(d.to_bits()),
                Slot::BInt(b) => {
                    let places = b.places();
                    self.buf.put_u8(u8::from(b.is_negative()));
                    let count = places.len() as i64;
                    self.compressible(format, count, || EncodeError::OutOfRange {
                        tag,
                        slot: i,
                        kind,
                        value: count,
                    })?;
                    for &place in places {
                        self.buf.put_u16(place);
                    }
                }
                Slot::Code(child) => self.node(arena, *child, tag, i)?,
                Slot::Arb(_) => return Err(EncodeError::Unencodable { tag, slot: i }),
            }
        }

        if let Some(at) = tree_length_at {
            let end = self.buf.position();
            self.buf.set_position(at);
            self.buf.put_u32((end - at) as u32);
            self.buf.set_position(end);
        }
        if tag == FoamTag::Prog {
            self.label_format = outer_labels;
        }
        Ok(())
    }

    fn compressible(
        &mut self,
        format: IntFormat,
        v: i64,
        out_of_range: impl FnOnce() -> EncodeError,
    ) -> Result<(), EncodeError> {
        if !format.holds(v) {
            return Err(out_of_range());
        }
        format.put(self.buf, v);
        Ok(())
    }
}
