//! Which audit checks run.

use bitflags::bitflags;

bitflags! {
    /// Rule groups of the type-checking sub-pass.
    ///
    /// Reference, sharing, declaration and environment checks always run;
    /// these flags only select type-check rules.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct AuditChecks: u16 {
        /// Record-typed values must use a `Record` format.
        const RECORDS = 1 << 0;
        /// `PushEnv`/`EElt` formats must be environment formats.
        const ENVS = 1 << 1;
        /// `BCall` arguments against the builtin's parameter types.
        const BCALL = 1 << 2;
        /// `Values` arity and slot types against their format.
        const VALUES = 1 << 3;
        /// `If` tests are `Bool`.
        const IF = 1 << 4;
        /// `Return` values against the enclosing `Prog`'s return type.
        const RETURN = 1 << 5;
        const CAST = 1 << 6;

        const ALL = Self::RECORDS.bits()
            | Self::ENVS.bits()
            | Self::BCALL.bits()
            | Self::VALUES.bits()
            | Self::IF.bits()
            | Self::RETURN.bits()
            | Self::CAST.bits();
    }
}

/// Options for one audit run.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct AuditConfig {
    pub checks: AuditChecks,
    /// Run the type-checking sub-pass. Its rules are known to be
    /// incomplete, so it is off unless asked for.
    pub type_checking: bool,
}

impl AuditConfig {
    /// All checks, with the type-checking sub-pass enabled.
    pub fn with_type_checking() -> Self {
        AuditConfig {
            type_checking: true,
            ..Self::default()
        }
    }

    pub fn checks(mut self, checks: AuditChecks) -> Self {
        self.checks = checks;
        self
    }

    #[inline]
    pub(crate) fn enabled(&self, check: AuditChecks) -> bool {
        self.checks.contains(check)
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        AuditConfig {
            checks: AuditChecks::ALL,
            type_checking: false,
        }
    }
}
