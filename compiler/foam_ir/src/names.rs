//! Reverse name lookup for the four tag namespaces.
//!
//! The s-expression reader turns names back into tags. The tables are built
//! once, on first use or by an explicit [`init`]; repeated calls are no-ops.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::{BValTag, DDeclUsage, FoamTag, ProtoTag};

/// Name maps, one per namespace.
pub struct NameTable {
    foam: FxHashMap<&'static str, FoamTag>,
    builtins: FxHashMap<&'static str, BValTag>,
    protocols: FxHashMap<&'static str, ProtoTag>,
    usages: FxHashMap<&'static str, DDeclUsage>,
}

static NAMES: OnceLock<NameTable> = OnceLock::new();

/// Build the reverse maps. Idempotent.
pub fn init() -> &'static NameTable {
    NAMES.get_or_init(|| {
        tracing::debug!(
            tags = FoamTag::COUNT,
            builtins = BValTag::COUNT,
            "building FOAM name tables"
        );
        NameTable {
            foam: FoamTag::ALL.iter().map(|&t| (t.name(), t)).collect(),
            builtins: BValTag::ALL.iter().map(|&b| (b.name(), b)).collect(),
            protocols: ProtoTag::ALL.iter().map(|&p| (p.name(), p)).collect(),
            usages: DDeclUsage::ALL.iter().map(|&u| (u.name(), u)).collect(),
        }
    })
}

impl NameTable {
    pub fn foam_tag(&self, name: &str) -> Option<FoamTag> {
        self.foam.get(name).copied()
    }

    pub fn builtin(&self, name: &str) -> Option<BValTag> {
        self.builtins.get(name).copied()
    }

    pub fn protocol(&self, name: &str) -> Option<ProtoTag> {
        self.protocols.get(name).copied()
    }

    pub fn usage(&self, name: &str) -> Option<DDeclUsage> {
        self.usages.get(name).copied()
    }
}

/// Look up an instruction tag by name.
pub fn foam_tag_named(name: &str) -> Option<FoamTag> {
    init().foam_tag(name)
}

/// Look up a builtin by name.
pub fn builtin_named(name: &str) -> Option<BValTag> {
    init().builtin(name)
}
