//! Shape-driven traversal: children, count, free, copy, equality, hash.
//!
//! None of these functions match on tags. Each reads the tag's shape once
//! and acts per slot kind, so a new tag only needs a table row.
//!
//! # Strategy
//!
//! - `children`, `node_count` and `free` use explicit work stacks.
//! - `copy`, `equal` and `hash_node` recurse through
//!   [`ensure_sufficient_stack`].
//! - Null children ([`FoamId::NONE`]) are skipped by walks, compare equal
//!   to each other, and hash as zero.

use std::hash::{Hash, Hasher};

use foam_stack::ensure_sufficient_stack;
use rustc_hash::FxHasher;

use crate::arena::{FoamArena, Slots};
use crate::ids::FoamId;
use crate::reduce::sint_literal_value;
use crate::shape::FieldKind;
use crate::slot::Slot;
use crate::tag::FoamTag;

/// Children of one node, in slot order.
pub struct Children<'a> {
    slots: std::iter::Enumerate<std::slice::Iter<'a, Slot>>,
    tag: FoamTag,
}

impl Iterator for Children<'_> {
    type Item = FoamId;

    fn next(&mut self) -> Option<FoamId> {
        let shape = self.tag.shape();
        for (i, slot) in self.slots.by_ref() {
            if !shape.kind_at(i).is_child() {
                continue;
            }
            if let Slot::Code(id) = slot {
                if id.is_valid() {
                    return Some(*id);
                }
            }
        }
        None
    }
}

const HASH_MASK: u32 = 0x3FFF_FFFF;
const HASH_STEP: u32 = 200_041;

impl FoamArena {
    /// Non-null children of `id`, in slot order.
    pub fn children(&self, id: FoamId) -> Children<'_> {
        Children {
            slots: self.slots(id).iter().enumerate(),
            tag: self.tag(id),
        }
    }

    /// Number of nodes in the tree rooted at `id` (zero for `NONE`).
    pub fn node_count(&self, id: FoamId) -> usize {
        if !id.is_valid() {
            return 0;
        }
        let mut count = 0;
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(self.children(node));
        }
        count
    }

    /// Free the tree rooted at `id`. Freeing `NONE` is a no-op.
    ///
    /// Only child slots are followed; symbol handles are weak and the
    /// symbols they name are untouched.
    pub fn free(&mut self, id: FoamId) {
        if !id.is_valid() {
            return;
        }
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            stack.extend(self.children(node));
            self.release(node);
        }
    }

    /// Free every child tree held in `slots`.
    ///
    /// Used to drop the children of a node that failed to build.
    pub fn free_slots(&mut self, slots: &[Slot]) {
        for slot in slots {
            if let Slot::Code(child) = slot {
                self.free(*child);
            }
        }
    }

    /// Shallow copy: a new node with the same slots, sharing children.
    ///
    /// Span and symbol are kept. Optimizer info is kept except on variable
    /// references, whose info describes one occurrence.
    pub fn copy_node(&mut self, id: FoamId) -> FoamId {
        let tag = self.tag(id);
        let slots: Slots = self.slots(id).iter().cloned().collect();
        self.copy_header(id, tag, slots)
    }

    fn copy_header(&mut self, id: FoamId, tag: FoamTag, slots: Slots) -> FoamId {
        let span = self.span(id);
        let syme = self.syme(id);
        let opt_info = self.opt_info(id);
        let new = self.push(tag, slots);
        self.set_span(new, span);
        self.set_syme(new, syme);
        if !tag.is_var_ref() {
            self.set_opt_info(new, opt_info);
        }
        new
    }

    /// Deep copy of the tree rooted at `id`. Copying `NONE` yields `NONE`.
    pub fn copy(&mut self, id: FoamId) -> FoamId {
        if !id.is_valid() {
            return FoamId::NONE;
        }
        ensure_sufficient_stack(|| {
            let tag = self.tag(id);
            let mut slots: Slots = self.slots(id).iter().cloned().collect();
            for slot in &mut slots {
                if let Slot::Code(child) = slot {
                    *child = self.copy(*child);
                }
            }
            self.copy_header(id, tag, slots)
        })
    }

    /// Deep copy of a tree from `self` into `dst`.
    pub fn copy_into(&self, id: FoamId, dst: &mut FoamArena) -> FoamId {
        if !id.is_valid() {
            return FoamId::NONE;
        }
        ensure_sufficient_stack(|| {
            let tag = self.tag(id);
            let mut slots: Slots = self.slots(id).iter().cloned().collect();
            for slot in &mut slots {
                if let Slot::Code(child) = slot {
                    *child = self.copy_into(*child, dst);
                }
            }
            let new = dst.push(tag, slots);
            dst.set_span(new, self.span(id));
            dst.set_syme(new, self.syme(id));
            new
        })
    }

    /// Order-sensitive structural hash, masked to 30 bits.
    pub fn hash_node(&self, id: FoamId) -> u32 {
        if !id.is_valid() {
            return 0;
        }
        ensure_sufficient_stack(|| {
            let tag = self.tag(id);
            let shape = tag.shape();
            let mut h = u32::from(tag.ordinal());
            for (i, slot) in self.slots(id).iter().enumerate() {
                h ^= h << 8;
                let part = match slot {
                    Slot::Code(child) => self.hash_node(*child),
                    Slot::Int(v) => *v as u32,
                    Slot::SFlo(f) => f.to_bits(),
                    Slot::DFlo(d) => fold64(d.to_bits()),
                    Slot::Arb(v) => fold64(*v),
                    Slot::Str(s) => fx_hash(s),
                    Slot::BInt(b) => fx_hash(b),
                };
                debug_assert!(slot.matches(shape.kind_at(i)));
                h = h.wrapping_add(part).wrapping_add(HASH_STEP) & HASH_MASK;
            }
            h
        })
    }
}

fn fold64(v: u64) -> u32 {
    (v ^ (v >> 32)) as u32
}

fn fx_hash<T: Hash + ?Sized>(value: &T) -> u32 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    fold64(hasher.finish())
}

/// Structural equality of `x` in `a` and `y` in `b`.
///
/// Same tag, same slot count, and slot-wise equality: scalars by value,
/// floats by bit pattern, strings and bignums by content, children
/// recursively. Spans, symbols and optimizer info are ignored.
pub fn equal(a: &FoamArena, x: FoamId, b: &FoamArena, y: FoamId) -> bool {
    equal_with(a, x, b, y, false)
}

/// [`equal`], except that an `SInt` literal also equals the 31-bit chunk
/// expression the encoder writes for it.
///
/// Use this to compare a tree with its decoded encoding.
pub fn equal_mod_buffer(a: &FoamArena, x: FoamId, b: &FoamArena, y: FoamId) -> bool {
    equal_with(a, x, b, y, true)
}

fn equal_with(a: &FoamArena, x: FoamId, b: &FoamArena, y: FoamId, reduce: bool) -> bool {
    match (x.is_valid(), y.is_valid()) {
        (false, false) => return true,
        (true, true) => {}
        _ => return false,
    }
    let (tx, ty) = (a.tag(x), b.tag(y));
    if reduce && (tx == FoamTag::SInt || ty == FoamTag::SInt) {
        return match (sint_literal_value(a, x), sint_literal_value(b, y)) {
            (Some(v), Some(w)) => v == w,
            _ => false,
        };
    }
    if tx != ty || a.argc(x) != b.argc(y) {
        return false;
    }
    ensure_sufficient_stack(|| {
        let shape = tx.shape();
        a.slots(x)
            .iter()
            .zip(b.slots(y))
            .enumerate()
            .all(|(i, (s, t))| match shape.kind_at(i) {
                FieldKind::Child => match (s, t) {
                    (Slot::Code(c), Slot::Code(d)) => equal_with(a, *c, b, *d, reduce),
                    _ => false,
                },
                _ => s == t,
            })
    })
}
