//! Calling-convention tags and declaration-group usages.

use std::fmt;

/// Calling convention of a `PCall` or `GDecl`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ProtoTag {
    Foam,
    Fortran,
    C,
    Java,
    JavaConstructor,
    JavaMethod,
    Lisp,
    Init,
    Include,
    Other,
}

impl ProtoTag {
    pub const ALL: &'static [ProtoTag] = &[
        Self::Foam,
        Self::Fortran,
        Self::C,
        Self::Java,
        Self::JavaConstructor,
        Self::JavaMethod,
        Self::Lisp,
        Self::Init,
        Self::Include,
        Self::Other,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Foam => "Foam",
            Self::Fortran => "Fortran",
            Self::C => "C",
            Self::Java => "Java",
            Self::JavaConstructor => "JavaConstructor",
            Self::JavaMethod => "JavaMethod",
            Self::Lisp => "Lisp",
            Self::Init => "Init",
            Self::Include => "Include",
            Self::Other => "Other",
        }
    }

    /// Protocol family: the Java variants share `Java`.
    pub const fn base(self) -> ProtoTag {
        match self {
            Self::JavaConstructor | Self::JavaMethod => Self::Java,
            other => other,
        }
    }

    #[inline]
    pub const fn is_java(self) -> bool {
        matches!(self.base(), Self::Java)
    }

    #[inline]
    pub fn from_i64(v: i64) -> Option<Self> {
        usize::try_from(v).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    #[inline]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }
}

impl fmt::Debug for ProtoTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProtoTag::{}", self.name())
    }
}

impl fmt::Display for ProtoTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a `DDecl` declaration group describes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum DDeclUsage {
    LocalEnv,
    NonLocalEnv,
    Param,
    Local,
    Fluid,
    Multi,
    Union,
    Record,
    /// Record with a trailing array. The first declaration's format holds
    /// the number of leading (non-array) fields.
    TrailingArray,
    Consts,
    Global,
    FortranSig,
    CSig,
    CType,
    /// Java method signature: the first declaration is the return type.
    JavaSig,
    JavaClass,
}

impl DDeclUsage {
    pub const ALL: &'static [DDeclUsage] = &[
        Self::LocalEnv,
        Self::NonLocalEnv,
        Self::Param,
        Self::Local,
        Self::Fluid,
        Self::Multi,
        Self::Union,
        Self::Record,
        Self::TrailingArray,
        Self::Consts,
        Self::Global,
        Self::FortranSig,
        Self::CSig,
        Self::CType,
        Self::JavaSig,
        Self::JavaClass,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::LocalEnv => "LocalEnv",
            Self::NonLocalEnv => "NonLocalEnv",
            Self::Param => "Params",
            Self::Local => "Locals",
            Self::Fluid => "Fluids",
            Self::Multi => "Multis",
            Self::Union => "Unions",
            Self::Record => "Records",
            Self::TrailingArray => "TrailingArray",
            Self::Consts => "Consts",
            Self::Global => "Globals",
            Self::FortranSig => "FortranSig",
            Self::CSig => "CSig",
            Self::CType => "CType",
            Self::JavaSig => "JavaSig",
            Self::JavaClass => "JavaClass",
        }
    }

    #[inline]
    pub const fn is_env(self) -> bool {
        matches!(self, Self::LocalEnv | Self::NonLocalEnv)
    }

    #[inline]
    pub fn from_i64(v: i64) -> Option<Self> {
        usize::try_from(v).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    #[inline]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }
}

impl fmt::Debug for DDeclUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DDeclUsage::{}", self.name())
    }
}

impl fmt::Display for DDeclUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const _: () = assert!(std::mem::size_of::<ProtoTag>() == 1);
const _: () = assert!(std::mem::size_of::<DDeclUsage>() == 1);
