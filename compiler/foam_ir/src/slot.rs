//! Slot payloads.
//!
//! A slot's meaning comes from its position in the tag's shape; the payload
//! variant only says how the value is stored. [`Slot::matches`] ties the two
//! together and the arena checks it on every write.

use std::fmt;

use crate::ids::FoamId;
use crate::shape::FieldKind;

/// Literal big integer: sign and magnitude as little-endian 16-bit places.
///
/// Only the literal form is modelled. Arithmetic belongs to the big-integer
/// library consuming these values.
#[derive(Clone, Eq, PartialEq, Hash, Default)]
pub struct BIntLit {
    negative: bool,
    places: Vec<u16>,
}

impl BIntLit {
    /// Build from sign and places; high zero places are dropped and zero is
    /// never negative.
    pub fn from_places(negative: bool, mut places: Vec<u16>) -> Self {
        while places.last() == Some(&0) {
            places.pop();
        }
        let negative = negative && !places.is_empty();
        BIntLit { negative, places }
    }

    pub fn from_i128(value: i128) -> Self {
        let mut magnitude = value.unsigned_abs();
        let mut places = Vec::new();
        while magnitude != 0 {
            places.push((magnitude & 0xFFFF) as u16);
            magnitude >>= 16;
        }
        Self::from_places(value < 0, places)
    }

    /// Value as `i128`, if it fits.
    pub fn to_i128(&self) -> Option<i128> {
        if self.places.len() > 8 {
            return None;
        }
        let mut magnitude: u128 = 0;
        for &place in self.places.iter().rev() {
            magnitude = (magnitude << 16) | u128::from(place);
        }
        if self.negative {
            0i128.checked_sub_unsigned(magnitude)
        } else {
            i128::try_from(magnitude).ok()
        }
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    #[inline]
    pub fn places(&self) -> &[u16] {
        &self.places
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.places.is_empty()
    }

    /// Hexadecimal magnitude, most significant digit first.
    pub fn to_hex(&self) -> String {
        if self.places.is_empty() {
            return "0".to_owned();
        }
        let mut out = String::with_capacity(self.places.len() * 4);
        for (i, place) in self.places.iter().rev().enumerate() {
            if i == 0 {
                out.push_str(&format!("{place:x}"));
            } else {
                out.push_str(&format!("{place:04x}"));
            }
        }
        out
    }

    /// Parse a hexadecimal magnitude.
    pub fn from_hex(negative: bool, digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let bytes = digits.as_bytes();
        let mut places = Vec::with_capacity(bytes.len() / 4 + 1);
        let mut end = bytes.len();
        while end > 0 {
            let start = end.saturating_sub(4);
            let chunk = std::str::from_utf8(&bytes[start..end]).ok()?;
            places.push(u16::from_str_radix(chunk, 16).ok()?);
            end = start;
        }
        Some(Self::from_places(negative, places))
    }
}

impl fmt::Debug for BIntLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-#x{}", self.to_hex())
        } else {
            write!(f, "#x{}", self.to_hex())
        }
    }
}

/// One node slot.
///
/// Floats compare and hash by bit pattern, so `Slot` is `Eq`.
#[derive(Clone, Debug)]
pub enum Slot {
    /// Every integral kind: tags, bytes, words, indices, labels.
    Int(i64),
    SFlo(f32),
    DFlo(f64),
    Str(String),
    BInt(BIntLit),
    Code(FoamId),
    Arb(u64),
}

impl Slot {
    /// Zero value for a slot of kind `kind`.
    pub fn zero(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Str => Slot::Str(String::new()),
            FieldKind::SFlo => Slot::SFlo(0.0),
            FieldKind::DFlo => Slot::DFlo(0.0),
            FieldKind::BInt => Slot::BInt(BIntLit::default()),
            FieldKind::Child => Slot::Code(FoamId::NONE),
            FieldKind::Arb => Slot::Arb(0),
            _ => Slot::Int(0),
        }
    }

    /// Whether this payload is the storage form of `kind`.
    pub fn matches(&self, kind: FieldKind) -> bool {
        match self {
            Slot::Int(_) => kind.is_integral(),
            Slot::SFlo(_) => kind == FieldKind::SFlo,
            Slot::DFlo(_) => kind == FieldKind::DFlo,
            Slot::Str(_) => kind == FieldKind::Str,
            Slot::BInt(_) => kind == FieldKind::BInt,
            Slot::Code(_) => kind == FieldKind::Child,
            Slot::Arb(_) => kind == FieldKind::Arb,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Slot::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_code(&self) -> Option<FoamId> {
        match self {
            Slot::Code(id) => Some(*id),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Slot::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Slot::Int(a), Slot::Int(b)) => a == b,
            (Slot::SFlo(a), Slot::SFlo(b)) => a.to_bits() == b.to_bits(),
            (Slot::DFlo(a), Slot::DFlo(b)) => a.to_bits() == b.to_bits(),
            (Slot::Str(a), Slot::Str(b)) => a == b,
            (Slot::BInt(a), Slot::BInt(b)) => a == b,
            (Slot::Code(a), Slot::Code(b)) => a == b,
            (Slot::Arb(a), Slot::Arb(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Slot {}

#[cfg(test)]
mod tests;
