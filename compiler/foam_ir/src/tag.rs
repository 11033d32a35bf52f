//! FOAM instruction tags and the static tag table.
//!
//! Every node carries a [`FoamTag`]. The tag's table entry gives its display
//! name, its arity and its [`Shape`]: one character per slot describing how
//! the slot is interpreted. All generic operations (copy, free, equality,
//! hash, encode, decode, audit) read the shape instead of matching on tags.
//!
//! # Tag Ranges
//!
//! The enumeration order is significant and fixed:
//! - `Nil..NOp`: data types (below [`FoamTag::DATA_LIMIT`])
//! - `NOp..Unimp`: fixed-format instructions
//! - `Unimp..Par`: extended tags with compressible strings/bignums
//!   ([`FoamTag::VECTOR_START`] is where tag-byte folding begins)
//! - `Par..Lex`: single-index references ([`FoamTag::INDEX_START`])
//! - `Lex..DDecl`: multi-index references ([`FoamTag::INDEX_LIMIT`])
//! - `DDecl..`: n-ary tags

use std::fmt;

use bitflags::bitflags;

use crate::shape::Shape;

macro_rules! foam_tags {
    ($( $(#[$doc:meta])* $variant:ident => $shape:literal, )*) => {
        /// FOAM instruction kind (u8, table order).
        #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u8)]
        pub enum FoamTag {
            $( $(#[$doc])* $variant, )*
        }

        impl FoamTag {
            /// Every tag, indexed by ordinal.
            pub const ALL: &'static [FoamTag] = &[ $( FoamTag::$variant, )* ];

            /// Canonical name, as used by the s-expression form.
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($variant), )*
                }
            }

            /// Slot shape string.
            pub const fn shape(self) -> Shape {
                match self {
                    $( Self::$variant => Shape::new($shape), )*
                }
            }
        }
    };
}

foam_tags! {
    // === Data types ===
    Nil => "",
    Char => "b",
    Bool => "b",
    Byte => "b",
    HInt => "h",
    SInt => "w",
    SFlo => "f",
    DFlo => "d",
    Word => "w",
    /// Host-only value; cannot be serialized.
    Arb => "!",
    Int8 => "b",
    Int16 => "b",
    Int32 => "b",
    Int64 => "b",
    Int128 => "b",

    // === Fixed-format instructions ===
    NOp => "",
    BVal => "o",
    Ptr => "C",
    CProg => "C",
    CEnv => "C",
    Loose => "C",
    EEnsure => "C",
    EInfo => "C",
    Kill => "C",
    Free => "C",
    Return => "C",
    Cast => "tC",
    ANew => "tC",
    RRNew => "iC",
    RRec => "CC",
    Clos => "CC",
    Set => "CC",
    Def => "CC",
    AElt => "tCC",
    If => "CL",
    Goto => "L",
    Throw => "CC",
    Catch => "CC",
    Protect => "CC",
    /// Compilation unit: format table and definitions.
    Unit => "CC",
    PushEnv => "iC",
    PopEnv => "",
    MFmt => "iC",
    RRFmt => "C",
    JavaObj => "",
    CObj => "",
    Gener => "iCC",
    Yield => "C",
    GenIter => "C",
    GenerValue => "C",
    GenerStep => "LC",

    // === Extended: compressible strings and bignums ===
    Unimp => "s",
    /// Global declaration: type, id, return type, format, direction, protocol.
    GDecl => "tswibp",
    /// Declaration: type, id, symbol index, format.
    Decl => "tswi",
    BInt => "n",

    // === Single-index references ===
    Par => "i",
    Loc => "i",
    Glo => "i",
    Fluid => "i",
    Const => "i",
    Env => "i",
    EEnv => "iC",
    RNew => "i",
    PRef => "iC",
    TRNew => "iC",
    RRElt => "iCC",
    Label => "i",

    // === Multi-index references ===
    Lex => "ii",
    RElt => "iCi",
    IRElt => "iCi",
    TRElt => "iCCi",
    EElt => "iCii",
    CFCall => "iiCC",
    OFCall => "iiCC",

    // === N-ary ===
    /// Declaration group: usage, then `Decl`/`GDecl` children.
    DDecl => "DC*",
    DFluid => "i*",
    /// Lexical level to format index map.
    DEnv => "i*",
    DDef => "C*",
    DFmt => "C*",
    Rec => "iC*",
    Arr => "tw*",
    TR => "iC*",
    Select => "CL*",
    PCall => "ptC*",
    BCall => "oC*",
    CCall => "tCC*",
    OCall => "tCCC*",
    Seq => "C*",
    Values => "C*",
    /// Procedure: tree length, label count, return type, format, info bits,
    /// size, time, body flags, then params, locals, fluids, levels and body.
    Prog => "XFtwwwwwC*",
}

/// Arity of a tag: fixed slot count or n-ary.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Arity {
    Fixed(u8),
    Nary,
}

bitflags! {
    /// Static per-tag properties.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TagProps: u8 {
        /// Control never falls through to the next statement of a `Seq`.
        const SEQ_EXIT = 1 << 0;
    }
}

/// One row of the tag table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TagInfo {
    pub name: &'static str,
    pub arity: Arity,
    pub shape: Shape,
    pub props: TagProps,
}

impl FoamTag {
    /// Number of tags.
    pub const COUNT: usize = Self::ALL.len();

    /// First non-data tag.
    pub const DATA_LIMIT: FoamTag = FoamTag::NOp;
    /// First tag whose encoded byte carries an integer format.
    pub const VECTOR_START: FoamTag = FoamTag::Unimp;
    /// First single-index reference tag.
    pub const INDEX_START: FoamTag = FoamTag::Par;
    /// First multi-index reference tag.
    pub const INDEX_LIMIT: FoamTag = FoamTag::Lex;

    /// Tag from its ordinal.
    #[inline]
    pub fn from_u8(v: u8) -> Option<Self> {
        Self::ALL.get(usize::from(v)).copied()
    }

    /// Tag from a stored slot value.
    #[inline]
    pub fn from_i64(v: i64) -> Option<Self> {
        u8::try_from(v).ok().and_then(Self::from_u8)
    }

    /// Ordinal of this tag.
    #[inline]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Arity derived from the shape string.
    #[inline]
    pub const fn arity(self) -> Arity {
        let shape = self.shape();
        if shape.is_nary() {
            Arity::Nary
        } else {
            Arity::Fixed(shape.len() as u8)
        }
    }

    #[inline]
    pub const fn is_nary(self) -> bool {
        self.shape().is_nary()
    }

    pub const fn props(self) -> TagProps {
        match self {
            Self::Return | Self::Throw => TagProps::SEQ_EXIT,
            _ => TagProps::empty(),
        }
    }

    /// Full table row for this tag.
    pub const fn info(self) -> TagInfo {
        TagInfo {
            name: self.name(),
            arity: self.arity(),
            shape: self.shape(),
            props: self.props(),
        }
    }

    /// Data type tags (valid as `Decl` types and array element types).
    #[inline]
    pub const fn is_data_type(self) -> bool {
        (self as u8) < (Self::DATA_LIMIT as u8)
    }

    /// Whether the encoded tag byte folds a format selector.
    #[inline]
    pub const fn is_extended(self) -> bool {
        (self as u8) >= (Self::VECTOR_START as u8)
    }

    /// The per-occurrence variable references whose optimizer info is never copied.
    #[inline]
    pub const fn is_var_ref(self) -> bool {
        matches!(self, Self::Loc | Self::Par | Self::Lex | Self::Glo)
    }
}

impl fmt::Debug for FoamTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FoamTag::{}", self.name())
    }
}

impl fmt::Display for FoamTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const _: () = assert!(std::mem::size_of::<FoamTag>() == 1);

// Every shape is well formed, and the folded tag space fits in a byte.
const _: () = {
    let mut i = 0;
    while i < FoamTag::ALL.len() {
        assert!(FoamTag::ALL[i].shape().is_well_formed());
        assert!(FoamTag::ALL[i] as usize == i);
        i += 1;
    }
};

#[cfg(test)]
mod tests;
