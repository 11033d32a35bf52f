//! Node storage.
//!
//! [`FoamArena`] uses struct-of-arrays layout: the tag, slots, span, symbol
//! handle and optimizer handle of node `n` live at index `n` of parallel
//! vectors. Freed nodes go on a free list and are reused by later
//! allocations; touching a freed node panics.

use smallvec::SmallVec;

use crate::ids::{to_u32, FoamId, OptInfoId, SymeId};
use crate::shape::FieldKind;
use crate::slot::{BIntLit, Slot};
use crate::span::Span;
use crate::tag::FoamTag;

/// Inline slot storage; most nodes have at most three slots.
pub type Slots = SmallVec<[Slot; 3]>;

/// Arena of FOAM nodes.
#[derive(Clone, Debug, Default)]
pub struct FoamArena {
    tags: Vec<FoamTag>,
    slots: Vec<Slots>,
    spans: Vec<Span>,
    /// Weak symbol back-references; never followed by free.
    symes: Vec<Option<SymeId>>,
    opt_infos: Vec<Option<OptInfoId>>,
    live: Vec<bool>,
    free_list: Vec<FoamId>,
}

impl FoamArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            tags: Vec::with_capacity(nodes),
            slots: Vec::with_capacity(nodes),
            spans: Vec::with_capacity(nodes),
            symes: Vec::with_capacity(nodes),
            opt_infos: Vec::with_capacity(nodes),
            live: Vec::with_capacity(nodes),
            free_list: Vec::new(),
        }
    }

    /// Allocate a node with `argc` zeroed slots.
    ///
    /// The node is well formed immediately: integers are 0, strings empty
    /// and children [`FoamId::NONE`], so it can be freed before it is filled.
    pub fn alloc(&mut self, tag: FoamTag, argc: usize) -> FoamId {
        let shape = tag.shape();
        assert!(
            shape.accepts_argc(argc),
            "{tag} cannot have {argc} slots (shape {:?})",
            shape.as_str()
        );
        let slots: Slots = shape.kinds(argc).map(Slot::zero).collect();
        self.insert(tag, slots)
    }

    /// Allocate a node from fully built slots, checking them against the shape.
    pub fn push(&mut self, tag: FoamTag, slots: Slots) -> FoamId {
        let shape = tag.shape();
        assert!(
            shape.accepts_argc(slots.len()),
            "{tag} cannot have {} slots (shape {:?})",
            slots.len(),
            shape.as_str()
        );
        for (i, slot) in slots.iter().enumerate() {
            let kind = shape.kind_at(i);
            assert!(
                slot.matches(kind),
                "{tag} slot {i} expects kind '{}', got {slot:?}",
                kind.code()
            );
        }
        self.insert(tag, slots)
    }

    fn insert(&mut self, tag: FoamTag, slots: Slots) -> FoamId {
        if let Some(id) = self.free_list.pop() {
            let i = id.index();
            self.tags[i] = tag;
            self.slots[i] = slots;
            self.spans[i] = Span::NONE;
            self.symes[i] = None;
            self.opt_infos[i] = None;
            self.live[i] = true;
            return id;
        }
        let id = FoamId::new(to_u32(self.tags.len(), "FOAM nodes"));
        self.tags.push(tag);
        self.slots.push(slots);
        self.spans.push(Span::NONE);
        self.symes.push(None);
        self.opt_infos.push(None);
        self.live.push(true);
        id
    }

    /// Return a node's storage to the free list. Children are untouched.
    pub(crate) fn release(&mut self, id: FoamId) {
        let i = self.check(id);
        self.live[i] = false;
        self.slots[i] = Slots::new();
        self.symes[i] = None;
        self.opt_infos[i] = None;
        self.free_list.push(id);
    }

    #[inline]
    fn check(&self, id: FoamId) -> usize {
        let i = id.index();
        assert!(
            i < self.live.len() && self.live[i],
            "use of freed or foreign node {id:?}"
        );
        i
    }

    /// Whether `id` names a live node of this arena.
    #[inline]
    pub fn contains(&self, id: FoamId) -> bool {
        id.is_valid() && self.live.get(id.index()).copied().unwrap_or(false)
    }

    /// Number of live nodes.
    pub fn live_count(&self) -> usize {
        self.live.len() - self.free_list.len()
    }

    /// Number of allocated node slots, live or free.
    pub fn capacity(&self) -> usize {
        self.live.len()
    }

    #[inline]
    pub fn tag(&self, id: FoamId) -> FoamTag {
        self.tags[self.check(id)]
    }

    #[inline]
    pub fn argc(&self, id: FoamId) -> usize {
        self.slots[self.check(id)].len()
    }

    #[inline]
    pub fn slots(&self, id: FoamId) -> &[Slot] {
        &self.slots[self.check(id)]
    }

    #[inline]
    pub fn slot(&self, id: FoamId, i: usize) -> &Slot {
        &self.slots(id)[i]
    }

    /// Kind of slot `i` of `id`, read from the shape.
    #[inline]
    pub fn kind_at(&self, id: FoamId, i: usize) -> FieldKind {
        self.tag(id).shape().kind_at(i)
    }

    /// Integral slot value. Panics if the slot is not integral.
    pub fn int(&self, id: FoamId, i: usize) -> i64 {
        match self.slot(id, i) {
            Slot::Int(v) => *v,
            other => panic!("{} slot {i} is not an integer: {other:?}", self.tag(id)),
        }
    }

    /// Child slot value. Panics if the slot is not a child.
    pub fn child(&self, id: FoamId, i: usize) -> FoamId {
        match self.slot(id, i) {
            Slot::Code(c) => *c,
            other => panic!("{} slot {i} is not a child: {other:?}", self.tag(id)),
        }
    }

    pub fn str_at(&self, id: FoamId, i: usize) -> &str {
        match self.slot(id, i) {
            Slot::Str(s) => s,
            other => panic!("{} slot {i} is not a string: {other:?}", self.tag(id)),
        }
    }

    pub fn bint(&self, id: FoamId, i: usize) -> &BIntLit {
        match self.slot(id, i) {
            Slot::BInt(b) => b,
            other => panic!("{} slot {i} is not a bignum: {other:?}", self.tag(id)),
        }
    }

    pub fn sflo(&self, id: FoamId) -> f32 {
        match self.slot(id, 0) {
            Slot::SFlo(v) => *v,
            other => panic!("{} is not an SFlo: {other:?}", self.tag(id)),
        }
    }

    pub fn dflo(&self, id: FoamId) -> f64 {
        match self.slot(id, 0) {
            Slot::DFlo(v) => *v,
            other => panic!("{} is not a DFlo: {other:?}", self.tag(id)),
        }
    }

    /// Children in slots `from..`, for n-ary tails.
    pub fn children_from(&self, id: FoamId, from: usize) -> impl Iterator<Item = FoamId> + '_ {
        self.slots(id)[from..].iter().filter_map(Slot::as_code)
    }

    /// Integers in slots `from..`, for `DEnv`, `DFluid` and `Arr` tails.
    pub fn ints_from(&self, id: FoamId, from: usize) -> impl Iterator<Item = i64> + '_ {
        self.slots(id)[from..].iter().filter_map(Slot::as_int)
    }

    /// Overwrite slot `i`, checking the payload against the shape.
    pub fn set(&mut self, id: FoamId, i: usize, slot: Slot) {
        let tag = self.tag(id);
        let kind = tag.shape().kind_at(i);
        assert!(
            slot.matches(kind),
            "{tag} slot {i} expects kind '{}', got {slot:?}",
            kind.code()
        );
        let idx = self.check(id);
        self.slots[idx][i] = slot;
    }

    #[inline]
    pub fn set_int(&mut self, id: FoamId, i: usize, value: i64) {
        self.set(id, i, Slot::Int(value));
    }

    #[inline]
    pub fn set_child(&mut self, id: FoamId, i: usize, child: FoamId) {
        self.set(id, i, Slot::Code(child));
    }

    #[inline]
    pub fn span(&self, id: FoamId) -> Span {
        self.spans[self.check(id)]
    }

    #[inline]
    pub fn set_span(&mut self, id: FoamId, span: Span) {
        let i = self.check(id);
        self.spans[i] = span;
    }

    #[inline]
    pub fn syme(&self, id: FoamId) -> Option<SymeId> {
        self.symes[self.check(id)]
    }

    #[inline]
    pub fn set_syme(&mut self, id: FoamId, syme: Option<SymeId>) {
        let i = self.check(id);
        self.symes[i] = syme;
    }

    #[inline]
    pub fn opt_info(&self, id: FoamId) -> Option<OptInfoId> {
        self.opt_infos[self.check(id)]
    }

    #[inline]
    pub fn set_opt_info(&mut self, id: FoamId, info: Option<OptInfoId>) {
        let i = self.check(id);
        self.opt_infos[i] = info;
    }
}
