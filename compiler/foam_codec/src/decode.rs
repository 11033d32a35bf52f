//! Bytes to tree, plus the skip and header-only readers.
//!
//! All three readers share one header and scalar path, so they agree on the
//! layout by construction. A `Prog` restores the enclosing label format when
//! it ends, mirroring the encoder.

use foam_ir::{
    equal_mod_buffer, BIntLit, BValTag, DDeclUsage, FieldKind, FoamArena, FoamId, FoamTag,
    ProtoTag, Slot, Slots,
};
use foam_stack::ensure_sufficient_stack;

use crate::buffer::Buffer;
use crate::error::DecodeError;
use crate::format::{unfold, IntFormat};

/// Decode one tree at the buffer's cursor into `arena`.
pub fn decode(buf: &mut Buffer, arena: &mut FoamArena) -> Result<FoamId, DecodeError> {
    let start = buf.position();
    let id = Reader::new().node(buf, arena)?;
    tracing::debug!(
        tag = %arena.tag(id),
        bytes = buf.position() - start,
        "decoded FOAM tree"
    );
    Ok(id)
}

/// Decode one tree from the start of `bytes`.
pub fn from_bytes(bytes: &[u8], arena: &mut FoamArena) -> Result<FoamId, DecodeError> {
    decode(&mut Buffer::from_bytes(bytes.to_vec()), arena)
}

/// Advance past one encoded tree without building it.
///
/// A `Prog` is skipped in one step using its tree-length slot.
pub fn skip(buf: &mut Buffer) -> Result<(), DecodeError> {
    Reader::new().skip(buf)
}

/// Read the scalar header of a `Prog` at the cursor.
///
/// Child slots (params, locals, fluids, levels, body) are left
/// [`FoamId::NONE`] and never read. Returns `None`, with the cursor just past
/// the tag, if the tree at the cursor is not a `Prog`.
pub fn prog_header(buf: &mut Buffer, arena: &mut FoamArena) -> Result<Option<FoamId>, DecodeError> {
    let mut reader = Reader::new();
    let header = reader.header(buf)?;
    if header.tag != FoamTag::Prog {
        return Ok(None);
    }
    let shape = header.tag.shape();
    let mut slots = Slots::with_capacity(header.argc);
    for i in 0..header.argc {
        let kind = shape.kind_at(i);
        if kind.is_child() {
            slots.push(Slot::Code(FoamId::NONE));
        } else {
            slots.push(reader.scalar(buf, &header, i, kind)?);
        }
    }
    Ok(Some(arena.push(FoamTag::Prog, slots)))
}

/// Check that the buffer decodes, from its start, to a tree equal to `id`
/// under [`equal_mod_buffer`]. The cursor is left where it was.
pub fn verify_buffer(buf: &mut Buffer, arena: &FoamArena, id: FoamId) -> Result<bool, DecodeError> {
    let saved = buf.position();
    buf.rewind();
    let mut scratch = FoamArena::new();
    let decoded = decode(buf, &mut scratch);
    buf.set_position(saved);
    Ok(equal_mod_buffer(arena, id, &scratch, decoded?))
}

/// Read a node's tag header, requiring `expected`.
///
/// Leaves the cursor at the node's first slot.
pub(crate) fn expect_header(buf: &mut Buffer, expected: FoamTag) -> Result<Header, DecodeError> {
    let header = Reader::new().header(buf)?;
    if header.tag != expected {
        return Err(DecodeError::WrongTag {
            expected,
            found: header.tag,
            pos: header.pos,
        });
    }
    Ok(header)
}

/// Read any node's tag header.
pub(crate) fn read_header(buf: &mut Buffer) -> Result<Header, DecodeError> {
    Reader::new().header(buf)
}

pub(crate) struct Header {
    pub(crate) tag: FoamTag,
    pub(crate) format: IntFormat,
    pub(crate) argc: usize,
    /// Position of the tag byte.
    pub(crate) pos: usize,
}

struct Reader {
    label_format: IntFormat,
}

impl Reader {
    fn new() -> Self {
        Reader {
            label_format: IntFormat::Word,
        }
    }

    /// Tag byte and, for n-ary tags, argc.
    fn header(&mut self, buf: &mut Buffer) -> Result<Header, DecodeError> {
        let pos = buf.position();
        let byte = buf.get_u8()?;
        let (tag, format) = unfold(byte).ok_or(DecodeError::BadTag { byte, pos })?;
        let shape = tag.shape();
        let argc = if shape.is_nary() {
            let n = format.get(buf)?;
            let bad = || DecodeError::BadArgc { tag, argc: n };
            let argc = usize::try_from(n).map_err(|_| bad())?;
            if argc < shape.nary_start() {
                return Err(bad());
            }
            // Every repeated slot takes at least one byte.
            if argc - shape.nary_start() > buf.remaining() {
                return Err(DecodeError::UnexpectedEnd {
                    pos: buf.position(),
                    wanted: argc - shape.nary_start(),
                    len: buf.len(),
                });
            }
            argc
        } else {
            shape.len()
        };
        Ok(Header {
            tag,
            format,
            argc,
            pos,
        })
    }

    /// One non-child slot.
    fn scalar(
        &mut self,
        buf: &mut Buffer,
        header: &Header,
        slot: usize,
        kind: FieldKind,
    ) -> Result<Slot, DecodeError> {
        let tag = header.tag;
        let ordinal = |what: &'static str, value: i64, valid: bool| {
            if valid {
                Ok(Slot::Int(value))
            } else {
                Err(DecodeError::BadOrdinal {
                    tag,
                    slot,
                    what,
                    value,
                })
            }
        };
        Ok(match kind {
            FieldKind::TypeTag => {
                let v = i64::from(buf.get_u8()?);
                ordinal("type", v, FoamTag::from_i64(v).is_some())?
            }
            FieldKind::Builtin => {
                let v = i64::from(buf.get_u16()?);
                ordinal("builtin", v, BValTag::from_i64(v).is_some())?
            }
            FieldKind::Protocol => {
                let v = i64::from(buf.get_u8()?);
                ordinal("protocol", v, ProtoTag::from_i64(v).is_some())?
            }
            FieldKind::DeclUsage => {
                let v = i64::from(buf.get_u8()?);
                ordinal("usage", v, DDeclUsage::from_i64(v).is_some())?
            }
            FieldKind::Byte => Slot::Int(i64::from(buf.get_u8()?)),
            FieldKind::HalfWord => Slot::Int(i64::from(buf.get_i16()?)),
            FieldKind::Word => Slot::Int(i64::from(buf.get_i32()?)),
            FieldKind::TreeLength => {
                buf.get_u32()?;
                Slot::Int(0)
            }
            FieldKind::LabelFormat => {
                let n = i64::from(buf.get_i32()?);
                self.label_format = IntFormat::explicit_for(n);
                Slot::Int(n)
            }
            FieldKind::Label => Slot::Int(self.label_format.get(buf)?),
            FieldKind::Index => Slot::Int(header.format.get(buf)?),
            FieldKind::Str => {
                let len = length(buf, header.format)?;
                let pos = buf.position();
                let bytes = buf.take(len)?.to_vec();
                Slot::Str(String::from_utf8(bytes).map_err(|_| DecodeError::BadString { pos })?)
            }
            FieldKind::SFlo => Slot::SFlo(f32::from_bits(buf.get_u32()?)),
            FieldKind::DFlo => Slot::DFlo(f64::from_bits(buf.get_u64()?)),
            FieldKind::BInt => {
                let negative = buf.get_u8()? != 0;
                let count = length(buf, header.format)?;
                if count.saturating_mul(2) > buf.remaining() {
                    return Err(DecodeError::UnexpectedEnd {
                        pos: buf.position(),
                        wanted: count.saturating_mul(2),
                        len: buf.len(),
                    });
                }
                let places = (0..count)
                    .map(|_| buf.get_u16())
                    .collect::<Result<Vec<_>, _>>()?;
                Slot::BInt(BIntLit::from_places(negative, places))
            }
            FieldKind::Child | FieldKind::Arb => {
                return Err(DecodeError::BadTag {
                    byte: tag.ordinal(),
                    pos: header.pos,
                })
            }
        })
    }

    fn node(&mut self, buf: &mut Buffer, arena: &mut FoamArena) -> Result<FoamId, DecodeError> {
        ensure_sufficient_stack(|| {
            let header = self.header(buf)?;
            let shape = header.tag.shape();
            let outer_labels = self.label_format;
            let mut slots = Slots::with_capacity(header.argc);
            for i in 0..header.argc {
                let kind = shape.kind_at(i);
                let slot = if kind.is_child() {
                    self.node(buf, arena).map(Slot::Code)
                } else {
                    self.scalar(buf, &header, i, kind)
                };
                match slot {
                    Ok(slot) => slots.push(slot),
                    Err(err) => {
                        arena.free_slots(&slots);
                        return Err(err);
                    }
                }
            }
            if header.tag == FoamTag::Prog {
                self.label_format = outer_labels;
            }
            Ok(arena.push(header.tag, slots))
        })
    }

    fn skip(&mut self, buf: &mut Buffer) -> Result<(), DecodeError> {
        ensure_sufficient_stack(|| {
            let header = self.header(buf)?;
            if header.tag == FoamTag::Prog {
                let at = buf.position();
                let len = buf.get_u32()? as usize;
                if len < 4 || len > buf.len() - at {
                    return Err(DecodeError::UnexpectedEnd {
                        pos: at,
                        wanted: len,
                        len: buf.len(),
                    });
                }
                buf.set_position(at + len);
                return Ok(());
            }
            let shape = header.tag.shape();
            for i in 0..header.argc {
                let kind = shape.kind_at(i);
                if kind.is_child() {
                    self.skip(buf)?;
                } else {
                    self.scalar(buf, &header, i, kind)?;
                }
            }
            Ok(())
        })
    }
}

fn length(buf: &mut Buffer, format: IntFormat) -> Result<usize, DecodeError> {
    let pos = buf.position();
    let len = format.get(buf)?;
    usize::try_from(len).map_err(|_| DecodeError::BadLength { pos, len })
}
