//! Semantic auditor for FOAM units.
//!
//! [`audit_unit`] walks the definitions of a `Unit` and reports, as an
//! [`AuditReport`], every structural fault it finds:
//! - references whose index, level or format is outside what the unit and
//!   the enclosing `Prog` declare
//! - nodes reachable from more than one parent
//! - declarations, environment maps and Java calls that are malformed
//!
//! With [`AuditConfig::type_checking`] set, a further set of local typing
//! rules runs over assignments, returns, conditionals, environments and
//! builtin calls; its failures are reported separately.
//!
//! Each run owns its state, so independent units can be audited
//! concurrently.

mod auditor;
mod config;
mod report;
mod type_check;

#[cfg(test)]
mod fixture;

pub use auditor::{audit, audit_unit};
pub use config::{AuditChecks, AuditConfig};
pub use report::{AuditFault, AuditReport, FaultKind, TypeCheckFailure};
