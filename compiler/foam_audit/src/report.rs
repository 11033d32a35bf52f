//! Audit results.

use std::fmt;

use foam_ir::FoamId;
use thiserror::Error;

/// Category of an audit fault.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FaultKind {
    /// An index, level or format outside what its context declares.
    BadRef,
    /// One node reachable from two parents.
    BadSharing,
    /// A cast of a multi-value expression.
    BadCast,
    /// A declaration whose format does not suit its type.
    BadDecl,
    /// An ill-typed cast or protocol call.
    BadType,
    /// A `DEnv` with an out-of-range or repeated format.
    BadEnv,
}

impl FaultKind {
    pub const fn description(self) -> &'static str {
        match self {
            FaultKind::BadRef => "bad reference",
            FaultKind::BadSharing => "bad sharing",
            FaultKind::BadCast => "bad cast",
            FaultKind::BadDecl => "bad declaration",
            FaultKind::BadType => "bad type",
            FaultKind::BadEnv => "bad environment",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Constant number for messages; `-` outside any constant.
struct ConstNum<'a>(&'a Option<i64>);

impl fmt::Display for ConstNum<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self.0 {
            Some(n) => write!(f, "{n}"),
            None => f.write_str("-"),
        }
    }
}

/// A structural fault found by the auditor.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("{kind} in const {}: {rendered}", ConstNum(.const_num))]
pub struct AuditFault {
    pub kind: FaultKind,
    pub node: FoamId,
    /// Constant whose definition contains the node.
    pub const_num: Option<i64>,
    /// S-expression of the offending subtree.
    pub rendered: String,
}

/// A rule of the type-checking sub-pass that did not hold.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("type check failed in const {}: {message}\n  {rendered}", ConstNum(.const_num))]
pub struct TypeCheckFailure {
    pub node: FoamId,
    pub const_num: Option<i64>,
    pub message: String,
    pub rendered: String,
}

/// Everything one audit run found.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct AuditReport {
    pub faults: Vec<AuditFault>,
    pub type_failures: Vec<TypeCheckFailure>,
}

impl AuditReport {
    /// No faults and no type-check failures.
    pub fn is_ok(&self) -> bool {
        self.faults.is_empty() && self.type_failures.is_empty()
    }

    pub fn has_fault(&self, kind: FaultKind) -> bool {
        self.faults.iter().any(|f| f.kind == kind)
    }

    /// Faults of one kind, in the order they were found.
    pub fn faults_of(&self, kind: FaultKind) -> impl Iterator<Item = &AuditFault> {
        self.faults.iter().filter(move |f| f.kind == kind)
    }
}
