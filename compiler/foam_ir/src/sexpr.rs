//! S-expression text form of FOAM trees.
//!
//! A node prints as `(Tag field ...)`. Tag-valued fields (`t`, `o`, `p`,
//! `D`) print as table names, strings are double-quoted with `\"` and `\\`
//! escapes, bignums print as `#x<hex>` or `-#x<hex>`, floats print in their
//! shortest round-tripping decimal form and a null child prints as `()`.
//!
//! ```text
//! (Seq (Set (Loc 0) (SInt 0)) (Return (Values)))
//! ```
//!
//! The reader parses the same form back, resolving names through
//! [`crate::names`].

use std::fmt::Write as _;

use foam_stack::ensure_sufficient_stack;
use thiserror::Error;

use crate::arena::{FoamArena, Slots};
use crate::builtin::BValTag;
use crate::ids::FoamId;
use crate::names;
use crate::proto::{DDeclUsage, ProtoTag};
use crate::shape::FieldKind;
use crate::slot::{BIntLit, Slot};
use crate::tag::FoamTag;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SExprError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected {found:?} at byte {pos}")]
    Unexpected { found: char, pos: usize },
    #[error("unknown {namespace} name `{name}` at byte {pos}")]
    UnknownName {
        namespace: &'static str,
        name: String,
        pos: usize,
    },
    #[error("{tag} cannot have {argc} fields")]
    BadArity { tag: FoamTag, argc: usize },
    #[error("invalid {kind} literal `{text}` at byte {pos}")]
    BadLiteral {
        kind: &'static str,
        text: String,
        pos: usize,
    },
    #[error("trailing input at byte {0}")]
    TrailingInput(usize),
}

// === Printer ===

/// Render the tree rooted at `id` on one line.
pub fn to_sexpr(arena: &FoamArena, id: FoamId) -> String {
    let mut out = String::new();
    write_node(arena, id, &mut out);
    out
}

fn write_node(arena: &FoamArena, id: FoamId, out: &mut String) {
    if !id.is_valid() {
        out.push_str("()");
        return;
    }
    ensure_sufficient_stack(|| {
        let tag = arena.tag(id);
        let shape = tag.shape();
        out.push('(');
        out.push_str(tag.name());
        for (i, slot) in arena.slots(id).iter().enumerate() {
            out.push(' ');
            write_slot(arena, shape.kind_at(i), slot, out);
        }
        out.push(')');
    });
}

fn write_slot(arena: &FoamArena, kind: FieldKind, slot: &Slot, out: &mut String) {
    match slot {
        Slot::Code(child) => write_node(arena, *child, out),
        Slot::Int(v) => {
            let name = match kind {
                FieldKind::TypeTag => FoamTag::from_i64(*v).map(FoamTag::name),
                FieldKind::Builtin => BValTag::from_i64(*v).map(BValTag::name),
                FieldKind::Protocol => ProtoTag::from_i64(*v).map(ProtoTag::name),
                FieldKind::DeclUsage => DDeclUsage::from_i64(*v).map(DDeclUsage::name),
                _ => None,
            };
            match name {
                Some(name) => out.push_str(name),
                None => {
                    let _ = write!(out, "{v}");
                }
            }
        }
        Slot::SFlo(f) => {
            let _ = write!(out, "{f:?}");
        }
        Slot::DFlo(d) => {
            let _ = write!(out, "{d:?}");
        }
        Slot::Arb(v) => {
            let _ = write!(out, "{v}");
        }
        Slot::BInt(b) => {
            let _ = write!(out, "{b:?}");
        }
        Slot::Str(s) => {
            out.push('"');
            for c in s.chars() {
                if c == '"' || c == '\\' {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push('"');
        }
    }
}

// === Reader ===

/// Parse one tree from `text` into `arena`.
///
/// On error no nodes are left behind in `arena`.
pub fn from_sexpr(arena: &mut FoamArena, text: &str) -> Result<FoamId, SExprError> {
    let mut reader = Reader { text, pos: 0 };
    let id = reader.node(arena)?;
    reader.skip_ws();
    if reader.pos < text.len() {
        arena.free(id);
        return Err(SExprError::TrailingInput(reader.pos));
    }
    Ok(id)
}

struct Reader<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn skip_ws(&mut self) {
        let rest = &self.text[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.text[self.pos..].chars().next()
    }

    fn expect(&mut self, want: char) -> Result<(), SExprError> {
        match self.peek() {
            Some(c) if c == want => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(found) => Err(SExprError::Unexpected { found, pos: self.pos }),
            None => Err(SExprError::UnexpectedEnd),
        }
    }

    /// Next bare atom; stops at whitespace or a parenthesis.
    fn atom(&mut self) -> Result<(&'a str, usize), SExprError> {
        self.skip_ws();
        let start = self.pos;
        let rest = &self.text[start..];
        let len = rest
            .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
            .unwrap_or(rest.len());
        if len == 0 {
            return match rest.chars().next() {
                Some(found) => Err(SExprError::Unexpected { found, pos: start }),
                None => Err(SExprError::UnexpectedEnd),
            };
        }
        self.pos += len;
        Ok((&rest[..len], start))
    }

    fn node(&mut self, arena: &mut FoamArena) -> Result<FoamId, SExprError> {
        ensure_sufficient_stack(|| {
            self.expect('(')?;
            if self.peek() == Some(')') {
                self.pos += 1;
                return Ok(FoamId::NONE);
            }
            let (name, pos) = self.atom()?;
            let tag = names::foam_tag_named(name).ok_or_else(|| SExprError::UnknownName {
                namespace: "tag",
                name: name.to_owned(),
                pos,
            })?;
            let mut slots = Slots::new();
            match self.fields(arena, tag, &mut slots) {
                Ok(()) => Ok(arena.push(tag, slots)),
                Err(err) => {
                    arena.free_slots(&slots);
                    Err(err)
                }
            }
        })
    }

    /// Fields of a `tag` node up to and including its closing parenthesis.
    fn fields(
        &mut self,
        arena: &mut FoamArena,
        tag: FoamTag,
        slots: &mut Slots,
    ) -> Result<(), SExprError> {
        let shape = tag.shape();
        while self.peek() != Some(')') {
            if self.peek().is_none() {
                return Err(SExprError::UnexpectedEnd);
            }
            if !shape.is_nary() && slots.len() >= shape.len() {
                return Err(SExprError::BadArity { tag, argc: slots.len() + 1 });
            }
            let slot = self.slot(arena, shape.kind_at(slots.len()))?;
            slots.push(slot);
        }
        self.pos += 1;
        if !shape.accepts_argc(slots.len()) {
            return Err(SExprError::BadArity { tag, argc: slots.len() });
        }
        Ok(())
    }

    fn slot(&mut self, arena: &mut FoamArena, kind: FieldKind) -> Result<Slot, SExprError> {
        match kind {
            FieldKind::Child => self.node(arena).map(Slot::Code),
            FieldKind::Str => self.string().map(Slot::Str),
            FieldKind::TypeTag => self.named("type", |n| {
                names::init().foam_tag(n).map(|t| i64::from(t.ordinal()))
            }),
            FieldKind::Builtin => self.named("builtin", |n| {
                names::init().builtin(n).map(|b| i64::from(b.ordinal()))
            }),
            FieldKind::Protocol => self.named("protocol", |n| {
                names::init().protocol(n).map(|p| i64::from(p.ordinal()))
            }),
            FieldKind::DeclUsage => self.named("usage", |n| {
                names::init().usage(n).map(|u| i64::from(u.ordinal()))
            }),
            FieldKind::SFlo => self.parsed("float", |t| t.parse::<f32>().ok()).map(Slot::SFlo),
            FieldKind::DFlo => self.parsed("double", |t| t.parse::<f64>().ok()).map(Slot::DFlo),
            FieldKind::Arb => self.parsed("arb", |t| t.parse::<u64>().ok()).map(Slot::Arb),
            FieldKind::BInt => self.parsed("bignum", parse_bint).map(Slot::BInt),
            _ => self.parsed("integer", |t| t.parse::<i64>().ok()).map(Slot::Int),
        }
    }

    fn parsed<T>(
        &mut self,
        kind: &'static str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, SExprError> {
        let (text, pos) = self.atom()?;
        parse(text).ok_or_else(|| SExprError::BadLiteral {
            kind,
            text: text.to_owned(),
            pos,
        })
    }

    /// A table name, or a raw ordinal for values outside the table.
    fn named(
        &mut self,
        namespace: &'static str,
        lookup: impl FnOnce(&str) -> Option<i64>,
    ) -> Result<Slot, SExprError> {
        let (text, pos) = self.atom()?;
        if let Ok(v) = text.parse::<i64>() {
            return Ok(Slot::Int(v));
        }
        lookup(text).map(Slot::Int).ok_or_else(|| SExprError::UnknownName {
            namespace,
            name: text.to_owned(),
            pos,
        })
    }

    fn string(&mut self) -> Result<String, SExprError> {
        self.expect('"')?;
        let mut out = String::new();
        let mut chars = self.text[self.pos..].char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += i + 1;
                    return Ok(out);
                }
                '\\' => match chars.next() {
                    Some((_, escaped)) => out.push(escaped),
                    None => break,
                },
                c => out.push(c),
            }
        }
        Err(SExprError::UnexpectedEnd)
    }
}

fn parse_bint(text: &str) -> Option<BIntLit> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    BIntLit::from_hex(negative, rest.strip_prefix("#x")?)
}
