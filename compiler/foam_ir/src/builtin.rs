//! Builtin operations (`BVal`/`BCall` operators).
//!
//! Each builtin records whether it has side effects, its formal parameter
//! types, its return type, and for multi-value builtins (return type `NOp`)
//! the types of the returned values.

use std::fmt;

use crate::tag::FoamTag;

/// Static signature of a builtin.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct BuiltinInfo {
    pub name: &'static str,
    pub side_effects: bool,
    pub params: &'static [FoamTag],
    pub ret: FoamTag,
    /// Value types of a multi-value return; empty otherwise.
    pub multi: &'static [FoamTag],
}

macro_rules! builtins {
    (@fx pure) => { false };
    (@fx effect) => { true };
    ($( $name:ident : $fx:ident ( $($arg:ident),* ) -> $ret:ident $([ $($multi:ident),* ])? ; )*) => {
        /// Builtin operation, in table order.
        #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u16)]
        pub enum BValTag {
            $( $name, )*
        }

        impl BValTag {
            pub const ALL: &'static [BValTag] = &[ $( BValTag::$name, )* ];

            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$name => stringify!($name), )*
                }
            }

            pub const fn info(self) -> BuiltinInfo {
                match self {
                    $( Self::$name => BuiltinInfo {
                        name: stringify!($name),
                        side_effects: builtins!(@fx $fx),
                        params: &[ $( FoamTag::$arg ),* ],
                        ret: FoamTag::$ret,
                        multi: &[ $( $( FoamTag::$multi ),* )? ],
                    }, )*
                }
            }
        }
    };
}

builtins! {
    BoolFalse: pure () -> Bool;
    BoolTrue: pure () -> Bool;
    BoolNot: pure (Bool) -> Bool;
    BoolAnd: pure (Bool, Bool) -> Bool;
    BoolOr: pure (Bool, Bool) -> Bool;
    BoolEQ: pure (Bool, Bool) -> Bool;
    BoolNE: pure (Bool, Bool) -> Bool;
    CharSpace: pure () -> Char;
    CharNewline: pure () -> Char;
    CharTab: pure () -> Char;
    CharMin: pure () -> Char;
    CharMax: pure () -> Char;
    CharIsDigit: pure (Char) -> Bool;
    CharIsLetter: pure (Char) -> Bool;
    CharEQ: pure (Char, Char) -> Bool;
    CharNE: pure (Char, Char) -> Bool;
    CharLT: pure (Char, Char) -> Bool;
    CharLE: pure (Char, Char) -> Bool;
    CharLower: pure (Char) -> Char;
    CharUpper: pure (Char) -> Char;
    CharOrd: pure (Char) -> SInt;
    CharNum: pure (SInt) -> Char;
    SFlo0: pure () -> SFlo;
    SFlo1: pure () -> SFlo;
    SFloMin: pure () -> SFlo;
    SFloMax: pure () -> SFlo;
    SFloEpsilon: pure () -> SFlo;
    SFloIsZero: pure (SFlo) -> Bool;
    SFloIsNeg: pure (SFlo) -> Bool;
    SFloIsPos: pure (SFlo) -> Bool;
    SFloEQ: pure (SFlo, SFlo) -> Bool;
    SFloNE: pure (SFlo, SFlo) -> Bool;
    SFloLT: pure (SFlo, SFlo) -> Bool;
    SFloLE: pure (SFlo, SFlo) -> Bool;
    SFloNegate: pure (SFlo) -> SFlo;
    SFloPrev: pure (SFlo) -> SFlo;
    SFloNext: pure (SFlo) -> SFlo;
    SFloPlus: pure (SFlo, SFlo) -> SFlo;
    SFloMinus: pure (SFlo, SFlo) -> SFlo;
    SFloTimes: pure (SFlo, SFlo) -> SFlo;
    SFloTimesPlus: pure (SFlo, SFlo, SFlo) -> SFlo;
    SFloDivide: pure (SFlo, SFlo) -> SFlo;
    SFloRPlus: pure (SFlo, SFlo, SInt) -> SFlo;
    SFloRMinus: pure (SFlo, SFlo, SInt) -> SFlo;
    SFloRTimes: pure (SFlo, SFlo, SInt) -> SFlo;
    SFloRTimesPlus: pure (SFlo, SFlo, SFlo, SInt) -> SFlo;
    SFloRDivide: pure (SFlo, SFlo, SInt) -> SFlo;
    SFloDissemble: pure (SFlo) -> NOp [Bool, SInt, Word];
    SFloAssemble: pure (Bool, SInt, Word) -> SFlo;
    DFlo0: pure () -> DFlo;
    DFlo1: pure () -> DFlo;
    DFloMin: pure () -> DFlo;
    DFloMax: pure () -> DFlo;
    DFloEpsilon: pure () -> DFlo;
    DFloIsZero: pure (DFlo) -> Bool;
    DFloIsNeg: pure (DFlo) -> Bool;
    DFloIsPos: pure (DFlo) -> Bool;
    DFloEQ: pure (DFlo, DFlo) -> Bool;
    DFloNE: pure (DFlo, DFlo) -> Bool;
    DFloLT: pure (DFlo, DFlo) -> Bool;
    DFloLE: pure (DFlo, DFlo) -> Bool;
    DFloNegate: pure (DFlo) -> DFlo;
    DFloPrev: pure (DFlo) -> DFlo;
    DFloNext: pure (DFlo) -> DFlo;
    DFloPlus: pure (DFlo, DFlo) -> DFlo;
    DFloMinus: pure (DFlo, DFlo) -> DFlo;
    DFloTimes: pure (DFlo, DFlo) -> DFlo;
    DFloTimesPlus: pure (DFlo, DFlo, DFlo) -> DFlo;
    DFloDivide: pure (DFlo, DFlo) -> DFlo;
    DFloRPlus: pure (DFlo, DFlo, SInt) -> DFlo;
    DFloRMinus: pure (DFlo, DFlo, SInt) -> DFlo;
    DFloRTimes: pure (DFlo, DFlo, SInt) -> DFlo;
    DFloRTimesPlus: pure (DFlo, DFlo, DFlo, SInt) -> DFlo;
    DFloRDivide: pure (DFlo, DFlo, SInt) -> DFlo;
    DFloDissemble: pure (DFlo) -> NOp [Bool, SInt, Word, Word];
    DFloAssemble: pure (Bool, SInt, Word, Word) -> DFlo;
    Byte0: pure () -> Byte;
    Byte1: pure () -> Byte;
    ByteMin: pure () -> Byte;
    ByteMax: pure () -> Byte;
    HInt0: pure () -> HInt;
    HInt1: pure () -> HInt;
    HIntMin: pure () -> HInt;
    HIntMax: pure () -> HInt;
    SInt0: pure () -> SInt;
    SInt1: pure () -> SInt;
    SIntMin: pure () -> SInt;
    SIntMax: pure () -> SInt;
    SIntIsZero: pure (SInt) -> Bool;
    SIntIsNeg: pure (SInt) -> Bool;
    SIntIsPos: pure (SInt) -> Bool;
    SIntIsEven: pure (SInt) -> Bool;
    SIntIsOdd: pure (SInt) -> Bool;
    SIntEQ: pure (SInt, SInt) -> Bool;
    SIntNE: pure (SInt, SInt) -> Bool;
    SIntLT: pure (SInt, SInt) -> Bool;
    SIntLE: pure (SInt, SInt) -> Bool;
    SIntNegate: pure (SInt) -> SInt;
    SIntPrev: pure (SInt) -> SInt;
    SIntNext: pure (SInt) -> SInt;
    SIntPlus: pure (SInt, SInt) -> SInt;
    SIntMinus: pure (SInt, SInt) -> SInt;
    SIntTimes: pure (SInt, SInt) -> SInt;
    SIntTimesPlus: pure (SInt, SInt, SInt) -> SInt;
    SIntMod: pure (SInt, SInt) -> SInt;
    SIntQuo: pure (SInt, SInt) -> SInt;
    SIntRem: pure (SInt, SInt) -> SInt;
    SIntDivide: pure (SInt, SInt) -> NOp [SInt, SInt];
    SIntGcd: pure (SInt, SInt) -> SInt;
    SIntPlusMod: pure (SInt, SInt, SInt) -> SInt;
    SIntMinusMod: pure (SInt, SInt, SInt) -> SInt;
    SIntTimesMod: pure (SInt, SInt, SInt) -> SInt;
    SIntTimesModInv: pure (SInt, SInt, SInt, DFlo) -> SInt;
    SIntLength: pure (SInt) -> SInt;
    SIntShiftUp: pure (SInt, SInt) -> SInt;
    SIntShiftDn: pure (SInt, SInt) -> SInt;
    SIntBit: pure (SInt, SInt) -> Bool;
    SIntNot: pure (SInt) -> SInt;
    SIntAnd: pure (SInt, SInt) -> SInt;
    SIntOr: pure (SInt, SInt) -> SInt;
    SIntXOr: pure (SInt, SInt) -> SInt;
    SIntHashCombine: pure (SInt, SInt) -> SInt;
    WordTimesDouble: pure (Word, Word) -> NOp [Word, Word];
    WordDivideDouble: pure (Word, Word, Word) -> NOp [Word, Word, Word];
    WordPlusStep: pure (Word, Word, Word) -> NOp [Word, Word];
    WordTimesStep: pure (Word, Word, Word, Word) -> NOp [Word, Word];
    BInt0: pure () -> BInt;
    BInt1: pure () -> BInt;
    BIntIsZero: pure (BInt) -> Bool;
    BIntIsNeg: pure (BInt) -> Bool;
    BIntIsPos: pure (BInt) -> Bool;
    BIntIsEven: pure (BInt) -> Bool;
    BIntIsOdd: pure (BInt) -> Bool;
    BIntIsSingle: pure (BInt) -> Bool;
    BIntEQ: pure (BInt, BInt) -> Bool;
    BIntNE: pure (BInt, BInt) -> Bool;
    BIntLT: pure (BInt, BInt) -> Bool;
    BIntLE: pure (BInt, BInt) -> Bool;
    BIntNegate: pure (BInt) -> BInt;
    BIntPrev: pure (BInt) -> BInt;
    BIntNext: pure (BInt) -> BInt;
    BIntPlus: pure (BInt, BInt) -> BInt;
    BIntMinus: pure (BInt, BInt) -> BInt;
    BIntTimes: pure (BInt, BInt) -> BInt;
    BIntTimesPlus: pure (BInt, BInt, BInt) -> BInt;
    BIntMod: pure (BInt, BInt) -> BInt;
    BIntQuo: pure (BInt, BInt) -> BInt;
    BIntRem: pure (BInt, BInt) -> BInt;
    BIntDivide: pure (BInt, BInt) -> NOp [BInt, BInt];
    BIntGcd: pure (BInt, BInt) -> BInt;
    BIntSIPower: pure (BInt, SInt) -> BInt;
    BIntBIPower: pure (BInt, BInt) -> BInt;
    BIntPowerMod: pure (BInt, BInt, BInt) -> BInt;
    BIntLength: pure (BInt) -> SInt;
    BIntShiftUp: pure (BInt, SInt) -> BInt;
    BIntShiftDn: pure (BInt, SInt) -> BInt;
    BIntShiftRem: pure (BInt, SInt) -> BInt;
    BIntBit: pure (BInt, SInt) -> Bool;
    PtrNil: pure () -> Ptr;
    PtrIsNil: pure (Ptr) -> Bool;
    PtrMagicEQ: pure (Ptr, Ptr) -> Bool;
    PtrEQ: pure (Ptr, Ptr) -> Bool;
    PtrNE: pure (Ptr, Ptr) -> Bool;
    FormatSFlo: effect (SFlo, Arr, SInt) -> SInt;
    FormatDFlo: effect (DFlo, Arr, SInt) -> SInt;
    FormatSInt: effect (SInt, Arr, SInt) -> SInt;
    FormatBInt: effect (BInt, Arr, SInt) -> SInt;
    ScanSFlo: pure (Arr, SInt) -> NOp [SFlo, SInt];
    ScanDFlo: pure (Arr, SInt) -> NOp [DFlo, SInt];
    ScanSInt: pure (Arr, SInt) -> NOp [SInt, SInt];
    ScanBInt: pure (Arr, SInt) -> NOp [BInt, SInt];
    SFloToDFlo: pure (SFlo) -> DFlo;
    DFloToSFlo: pure (DFlo) -> SFlo;
    ByteToSInt: pure (Byte) -> SInt;
    SIntToByte: pure (SInt) -> Byte;
    HIntToSInt: pure (HInt) -> SInt;
    SIntToHInt: pure (SInt) -> HInt;
    SIntToBInt: pure (SInt) -> BInt;
    BIntToSInt: pure (BInt) -> SInt;
    SIntToSFlo: pure (SInt) -> SFlo;
    SIntToDFlo: pure (SInt) -> DFlo;
    BIntToSFlo: pure (BInt) -> SFlo;
    BIntToDFlo: pure (BInt) -> DFlo;
    PtrToSInt: pure (Ptr) -> SInt;
    SIntToPtr: pure (SInt) -> Ptr;
    ArrToSFlo: pure (Arr) -> SFlo;
    ArrToDFlo: pure (Arr) -> DFlo;
    ArrToSInt: pure (Arr) -> SInt;
    ArrToBInt: pure (Arr) -> BInt;
    PlatformRTE: pure () -> SInt;
    PlatformOS: pure () -> SInt;
    Halt: effect (SInt) -> Word;
    RoundZero: pure () -> SInt;
    RoundNearest: pure () -> SInt;
    RoundUp: pure () -> SInt;
    RoundDown: pure () -> SInt;
    RoundDontCare: pure () -> SInt;
    SFloTruncate: pure (SFlo) -> BInt;
    SFloFraction: pure (SFlo) -> SFlo;
    SFloRound: pure (SFlo, SInt) -> BInt;
    DFloTruncate: pure (DFlo) -> BInt;
    DFloFraction: pure (DFlo) -> DFlo;
    DFloRound: pure (DFlo, SInt) -> BInt;
    StoForceGC: effect () -> NOp;
    StoInHeap: effect (Ptr) -> Bool;
    StoIsWritable: effect (Ptr) -> SInt;
    StoMarkObject: effect (Ptr) -> SInt;
    StoRecode: effect (Ptr, SInt) -> Word;
    StoNewObject: effect (SInt, Bool) -> NOp;
    StoATracer: effect (SInt, Clos) -> NOp;
    StoCTracer: effect (SInt, Word) -> NOp;
    StoShow: effect (SInt) -> NOp;
    StoShowArgs: effect (Ptr) -> SInt;
    TypeInt8: pure () -> SInt;
    TypeInt16: pure () -> SInt;
    TypeInt32: pure () -> SInt;
    TypeInt64: pure () -> SInt;
    TypeInt128: pure () -> SInt;
    TypeNil: pure () -> SInt;
    TypeChar: pure () -> SInt;
    TypeBool: pure () -> SInt;
    TypeByte: pure () -> SInt;
    TypeHInt: pure () -> SInt;
    TypeSInt: pure () -> SInt;
    TypeBInt: pure () -> SInt;
    TypeSFlo: pure () -> SInt;
    TypeDFlo: pure () -> SInt;
    TypeWord: pure () -> SInt;
    TypeClos: pure () -> SInt;
    TypePtr: pure () -> SInt;
    TypeRec: pure () -> SInt;
    TypeArr: pure () -> SInt;
    TypeTR: pure () -> SInt;
    RawRepSize: pure (SInt) -> SInt;
    SizeOfInt8: pure () -> SInt;
    SizeOfInt16: pure () -> SInt;
    SizeOfInt32: pure () -> SInt;
    SizeOfInt64: pure () -> SInt;
    SizeOfInt128: pure () -> SInt;
    SizeOfNil: pure () -> SInt;
    SizeOfChar: pure () -> SInt;
    SizeOfBool: pure () -> SInt;
    SizeOfByte: pure () -> SInt;
    SizeOfHInt: pure () -> SInt;
    SizeOfSInt: pure () -> SInt;
    SizeOfBInt: pure () -> SInt;
    SizeOfSFlo: pure () -> SInt;
    SizeOfDFlo: pure () -> SInt;
    SizeOfWord: pure () -> SInt;
    SizeOfClos: pure () -> SInt;
    SizeOfPtr: pure () -> SInt;
    SizeOfRec: pure () -> SInt;
    SizeOfArr: pure () -> SInt;
    SizeOfTR: pure () -> SInt;
    ListNil: pure () -> Ptr;
    ListEmptyP: pure (Ptr) -> Bool;
    ListHead: pure (Ptr) -> Word;
    ListTail: pure (Ptr) -> Ptr;
    ListCons: pure (Word, Ptr) -> Ptr;
    NewExportTable: pure (Word, SInt) -> Word;
    AddToExportTable: effect (Word, SInt, SInt, Arr, Arr) -> Values;
    FreeExportTable: effect (Word) -> Values;
}

impl BValTag {
    pub const COUNT: usize = Self::ALL.len();

    #[inline]
    pub fn from_u16(v: u16) -> Option<Self> {
        Self::ALL.get(usize::from(v)).copied()
    }

    #[inline]
    pub fn from_i64(v: i64) -> Option<Self> {
        u16::try_from(v).ok().and_then(Self::from_u16)
    }

    #[inline]
    pub const fn ordinal(self) -> u16 {
        self as u16
    }

    #[inline]
    pub const fn has_side_effects(self) -> bool {
        self.info().side_effects
    }

    #[inline]
    pub const fn arg_count(self) -> usize {
        self.info().params.len()
    }

    #[inline]
    pub const fn ret_type(self) -> FoamTag {
        self.info().ret
    }
}

impl fmt::Debug for BValTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BValTag::{}", self.name())
    }
}

impl fmt::Display for BValTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const _: () = assert!(std::mem::size_of::<BValTag>() == 2);
