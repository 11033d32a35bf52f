//! Shape strings: the per-tag slot layout.
//!
//! A shape has one character per fixed slot. N-ary shapes end in `*`, which
//! repeats the character before it for every remaining slot, so `"ptC*"`
//! describes a protocol, a type, then any number of children.

use std::fmt;

/// Semantic kind of one slot.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FieldKind {
    /// `t`: ordinal of a [`FoamTag`](crate::FoamTag) used as a type.
    TypeTag,
    /// `o`: ordinal of a [`BValTag`](crate::BValTag).
    Builtin,
    /// `p`: ordinal of a [`ProtoTag`](crate::ProtoTag).
    Protocol,
    /// `D`: ordinal of a [`DDeclUsage`](crate::DDeclUsage).
    DeclUsage,
    /// `b`
    Byte,
    /// `h`
    HalfWord,
    /// `w`
    Word,
    /// `i`: small index, compressed by the node's format.
    Index,
    /// `L`: label, compressed by the enclosing procedure's label format.
    Label,
    /// `X`: byte length of the encoded procedure.
    TreeLength,
    /// `F`: label count, which fixes the label format.
    LabelFormat,
    /// `s`
    Str,
    /// `f`
    SFlo,
    /// `d`
    DFlo,
    /// `n`
    BInt,
    /// `C`: owned child node.
    Child,
    /// `!`: host value that cannot be encoded.
    Arb,
}

impl FieldKind {
    pub const fn from_char(c: u8) -> Option<Self> {
        Some(match c {
            b't' => Self::TypeTag,
            b'o' => Self::Builtin,
            b'p' => Self::Protocol,
            b'D' => Self::DeclUsage,
            b'b' => Self::Byte,
            b'h' => Self::HalfWord,
            b'w' => Self::Word,
            b'i' => Self::Index,
            b'L' => Self::Label,
            b'X' => Self::TreeLength,
            b'F' => Self::LabelFormat,
            b's' => Self::Str,
            b'f' => Self::SFlo,
            b'd' => Self::DFlo,
            b'n' => Self::BInt,
            b'C' => Self::Child,
            b'!' => Self::Arb,
            _ => return None,
        })
    }

    pub const fn code(self) -> char {
        match self {
            Self::TypeTag => 't',
            Self::Builtin => 'o',
            Self::Protocol => 'p',
            Self::DeclUsage => 'D',
            Self::Byte => 'b',
            Self::HalfWord => 'h',
            Self::Word => 'w',
            Self::Index => 'i',
            Self::Label => 'L',
            Self::TreeLength => 'X',
            Self::LabelFormat => 'F',
            Self::Str => 's',
            Self::SFlo => 'f',
            Self::DFlo => 'd',
            Self::BInt => 'n',
            Self::Child => 'C',
            Self::Arb => '!',
        }
    }

    /// Kinds whose payload is stored as a plain integer.
    #[inline]
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            Self::TypeTag
                | Self::Builtin
                | Self::Protocol
                | Self::DeclUsage
                | Self::Byte
                | Self::HalfWord
                | Self::Word
                | Self::Index
                | Self::Label
                | Self::TreeLength
                | Self::LabelFormat
        )
    }

    #[inline]
    pub const fn is_child(self) -> bool {
        matches!(self, Self::Child)
    }

    /// Kinds a deep copy duplicates and a free releases.
    #[inline]
    pub const fn is_owned(self) -> bool {
        matches!(self, Self::Child | Self::Str | Self::BInt)
    }
}

/// A tag's shape string.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Shape(&'static str);

impl Shape {
    pub const fn new(s: &'static str) -> Self {
        Shape(s)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }

    /// Number of characters, including a trailing `*`.
    pub const fn len(self) -> usize {
        self.0.len()
    }

    pub const fn is_empty(self) -> bool {
        self.0.is_empty()
    }

    pub const fn is_nary(self) -> bool {
        let bytes = self.0.as_bytes();
        !bytes.is_empty() && bytes[bytes.len() - 1] == b'*'
    }

    /// Index of the first repeated slot of an n-ary shape, which is also the
    /// number of slots every instance has before the repeated tail.
    pub const fn nary_start(self) -> usize {
        if self.is_nary() {
            self.0.len() - 2
        } else {
            self.0.len()
        }
    }

    /// Smallest valid slot count.
    pub const fn min_argc(self) -> usize {
        self.nary_start()
    }

    /// Whether `argc` slots is a valid instance of this shape.
    pub const fn accepts_argc(self, argc: usize) -> bool {
        if self.is_nary() {
            argc >= self.nary_start()
        } else {
            argc == self.0.len()
        }
    }

    /// Kind of slot `slot`. Panics past the end of a fixed shape.
    pub fn kind_at(self, slot: usize) -> FieldKind {
        let bytes = self.0.as_bytes();
        let idx = if self.is_nary() && slot >= bytes.len() - 2 {
            bytes.len() - 2
        } else {
            slot
        };
        match bytes.get(idx).copied().and_then(FieldKind::from_char) {
            Some(kind) => kind,
            None => panic!("malformed shape string {:?}: no kind for slot {slot}", self.0),
        }
    }

    /// Slot kinds for a node with `argc` slots.
    pub fn kinds(self, argc: usize) -> impl Iterator<Item = FieldKind> {
        (0..argc).map(move |slot| self.kind_at(slot))
    }

    /// Every character is a known kind, and `*` appears only last with a
    /// character before it.
    pub const fn is_well_formed(self) -> bool {
        let bytes = self.0.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'*' {
                if i == 0 || i != bytes.len() - 1 {
                    return false;
                }
            } else if FieldKind::from_char(bytes[i]).is_none() {
                return false;
            }
            i += 1;
        }
        true
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({:?})", self.0)
    }
}

#[cfg(test)]
mod tests;
