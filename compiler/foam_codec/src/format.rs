//! Compressible integers and tag-byte folding.
//!
//! Extended tags (from [`FoamTag::VECTOR_START`]) fold an [`IntFormat`]
//! into the tag byte: `byte = tag + format * FOLD_SPAN`. The format fixes
//! how every compressible integer of the node (its argc, `i` slots, string
//! lengths and bignum place counts) is stored.
//!
//! | code | format | bytes |
//! |---|---|---|
//! | 0 | [`IntFormat::Word`] | 4 |
//! | 1 | [`IntFormat::Byte`] | 1 |
//! | 2..=4 | [`IntFormat::Immediate`] `0..=2` | 0 |

use foam_ir::{FieldKind, FoamArena, FoamId, FoamTag, Slot};

use crate::buffer::Buffer;
use crate::error::DecodeError;

/// Number of values that can be folded directly into the tag byte.
pub const IMMEDIATE_FORMS: u8 = 3;
/// Number of distinct format codes.
pub const FORMAT_COUNT: u8 = 2 + IMMEDIATE_FORMS;
/// Distance between two foldings of the same tag.
pub const FOLD_SPAN: u8 = (FoamTag::COUNT - FoamTag::VECTOR_START.ordinal() as usize) as u8;

const _: () = assert!(
    FoamTag::VECTOR_START.ordinal() as usize + FORMAT_COUNT as usize * FOLD_SPAN as usize <= 256
);

/// Storage of a compressible integer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum IntFormat {
    /// Signed 32-bit.
    Word,
    /// Unsigned byte.
    Byte,
    /// The value itself, stored in no bytes.
    Immediate(u8),
}

impl IntFormat {
    pub const fn code(self) -> u8 {
        match self {
            IntFormat::Word => 0,
            IntFormat::Byte => 1,
            IntFormat::Immediate(v) => 2 + v,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(IntFormat::Word),
            1 => Some(IntFormat::Byte),
            c if c < FORMAT_COUNT => Some(IntFormat::Immediate(c - 2)),
            _ => None,
        }
    }

    /// Smallest explicit format that holds `v`. Used for labels.
    pub fn explicit_for(v: i64) -> Self {
        if (0..=255).contains(&v) {
            IntFormat::Byte
        } else {
            IntFormat::Word
        }
    }

    /// Whether `v` can be stored in this format.
    pub fn holds(self, v: i64) -> bool {
        match self {
            IntFormat::Word => i32::try_from(v).is_ok(),
            IntFormat::Byte => (0..=255).contains(&v),
            IntFormat::Immediate(k) => v == i64::from(k),
        }
    }

    /// Write `v`, which [`IntFormat::holds`] must accept.
    pub fn put(self, buf: &mut Buffer, v: i64) {
        debug_assert!(self.holds(v), "{v} does not fit {self:?}");
        match self {
            IntFormat::Word => buf.put_i32(v as i32),
            IntFormat::Byte => buf.put_u8(v as u8),
            IntFormat::Immediate(_) => {}
        }
    }

    pub fn get(self, buf: &mut Buffer) -> Result<i64, DecodeError> {
        match self {
            IntFormat::Word => buf.get_i32().map(i64::from),
            IntFormat::Byte => buf.get_u8().map(i64::from),
            IntFormat::Immediate(k) => Ok(i64::from(k)),
        }
    }
}

/// Encoded tag byte for `tag` in `format`. Non-extended tags never fold.
pub fn fold(tag: FoamTag, format: IntFormat) -> u8 {
    if tag.is_extended() {
        tag.ordinal() + format.code() * FOLD_SPAN
    } else {
        tag.ordinal()
    }
}

/// Tag and format of an encoded tag byte.
pub fn unfold(byte: u8) -> Option<(FoamTag, IntFormat)> {
    let origin = FoamTag::VECTOR_START.ordinal();
    if byte < origin {
        return Some((FoamTag::from_u8(byte)?, IntFormat::Word));
    }
    let code = (byte - origin) / FOLD_SPAN;
    let format = IntFormat::from_code(code)?;
    Some((FoamTag::from_u8(byte - code * FOLD_SPAN)?, format))
}

/// Format the encoder uses for `id`.
///
/// Non-extended tags always use [`IntFormat::Word`]. Otherwise a single
/// compressible value below [`IMMEDIATE_FORMS`] is folded into the tag,
/// values all within a byte use [`IntFormat::Byte`], and anything else
/// uses [`IntFormat::Word`].
pub fn select_format(arena: &FoamArena, id: FoamId) -> IntFormat {
    let tag = arena.tag(id);
    if !tag.is_extended() {
        return IntFormat::Word;
    }
    let shape = tag.shape();
    let slots = arena.slots(id);
    let argc = shape.is_nary().then_some(slots.len() as i64);
    let values = slots
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| match (shape.kind_at(i), slot) {
            (FieldKind::Index, Slot::Int(v)) => Some(*v),
            (FieldKind::Str, Slot::Str(s)) => Some(s.len() as i64),
            (FieldKind::BInt, Slot::BInt(b)) => Some(b.places().len() as i64),
            _ => None,
        });
    let mut values = argc.into_iter().chain(values);

    let Some(first) = values.next() else {
        return IntFormat::Word;
    };
    let mut all_bytes = IntFormat::Byte.holds(first);
    let mut single = true;
    for v in values {
        single = false;
        all_bytes &= IntFormat::Byte.holds(v);
    }
    match u8::try_from(first) {
        Ok(k) if single && k < IMMEDIATE_FORMS => IntFormat::Immediate(k),
        _ if all_bytes => IntFormat::Byte,
        _ => IntFormat::Word,
    }
}
