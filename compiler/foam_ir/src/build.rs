//! Typed constructors.
//!
//! Every constructor checks its slots against the tag's shape (through
//! [`FoamArena::push`]) and panics on a mismatch. Children are handed over
//! by id; the new node owns them from then on.
//!
//! Each n-ary family has a slice form (`new_seq(&[a, b])`) and an iterator
//! form (`new_seq_of(list)`). Both build identical trees.

use smallvec::smallvec;

use crate::arena::{FoamArena, Slots};
use crate::builtin::BValTag;
use crate::fields::{format_slot, gdecl, ProgHeader};
use crate::ids::FoamId;
use crate::proto::{DDeclUsage, ProtoTag};
use crate::slot::{BIntLit, Slot};
use crate::tag::FoamTag;

impl FoamArena {
    fn leaf_int(&mut self, tag: FoamTag, value: i64) -> FoamId {
        self.push(tag, smallvec![Slot::Int(value)])
    }

    fn unary(&mut self, tag: FoamTag, a: FoamId) -> FoamId {
        self.push(tag, smallvec![Slot::Code(a)])
    }

    fn int_child(&mut self, tag: FoamTag, n: i64, a: FoamId) -> FoamId {
        self.push(tag, smallvec![Slot::Int(n), Slot::Code(a)])
    }

    fn binary(&mut self, tag: FoamTag, a: FoamId, b: FoamId) -> FoamId {
        self.push(tag, smallvec![Slot::Code(a), Slot::Code(b)])
    }

    fn nullary(&mut self, tag: FoamTag) -> FoamId {
        self.push(tag, Slots::new())
    }

    // === Generic ===

    /// A node of an all-children tag (`Seq`, `Values`, `DDef`, `DFmt`, ...).
    pub fn new_of_list(&mut self, tag: FoamTag, children: impl IntoIterator<Item = FoamId>) -> FoamId {
        let slots: Slots = children.into_iter().map(Slot::Code).collect();
        self.push(tag, slots)
    }

    /// A node with one leading integer and then children (`Rec`, `TR`).
    pub fn new_of_list1(
        &mut self,
        tag: FoamTag,
        sub: i64,
        children: impl IntoIterator<Item = FoamId>,
    ) -> FoamId {
        let mut slots: Slots = smallvec![Slot::Int(sub)];
        slots.extend(children.into_iter().map(Slot::Code));
        self.push(tag, slots)
    }

    /// A node of `argc` zeroed slots. Alias of [`FoamArena::alloc`].
    #[inline]
    pub fn new_empty(&mut self, tag: FoamTag, argc: usize) -> FoamId {
        self.alloc(tag, argc)
    }

    // === Literals ===

    pub fn new_nil(&mut self) -> FoamId {
        self.nullary(FoamTag::Nil)
    }

    pub fn new_char(&mut self, c: u8) -> FoamId {
        self.leaf_int(FoamTag::Char, i64::from(c))
    }

    pub fn new_bool(&mut self, b: bool) -> FoamId {
        self.leaf_int(FoamTag::Bool, i64::from(b))
    }

    pub fn new_byte(&mut self, b: u8) -> FoamId {
        self.leaf_int(FoamTag::Byte, i64::from(b))
    }

    pub fn new_hint(&mut self, h: i16) -> FoamId {
        self.leaf_int(FoamTag::HInt, i64::from(h))
    }

    /// Machine integer literal. Values outside 32 bits are split into
    /// 31-bit chunks when encoded.
    pub fn new_sint(&mut self, v: i64) -> FoamId {
        self.leaf_int(FoamTag::SInt, v)
    }

    pub fn new_word(&mut self, w: i64) -> FoamId {
        self.leaf_int(FoamTag::Word, w)
    }

    pub fn new_sflo(&mut self, f: f32) -> FoamId {
        self.push(FoamTag::SFlo, smallvec![Slot::SFlo(f)])
    }

    pub fn new_dflo(&mut self, d: f64) -> FoamId {
        self.push(FoamTag::DFlo, smallvec![Slot::DFlo(d)])
    }

    pub fn new_arb(&mut self, v: u64) -> FoamId {
        self.push(FoamTag::Arb, smallvec![Slot::Arb(v)])
    }

    pub fn new_bint(&mut self, b: BIntLit) -> FoamId {
        self.push(FoamTag::BInt, smallvec![Slot::BInt(b)])
    }

    pub fn new_unimp(&mut self, msg: &str) -> FoamId {
        self.push(FoamTag::Unimp, smallvec![Slot::Str(msg.to_owned())])
    }

    pub fn new_nop(&mut self) -> FoamId {
        self.nullary(FoamTag::NOp)
    }

    pub fn new_bval(&mut self, op: BValTag) -> FoamId {
        self.leaf_int(FoamTag::BVal, i64::from(op.ordinal()))
    }

    pub fn new_pop_env(&mut self) -> FoamId {
        self.nullary(FoamTag::PopEnv)
    }

    pub fn new_java_obj(&mut self) -> FoamId {
        self.nullary(FoamTag::JavaObj)
    }

    pub fn new_cobj(&mut self) -> FoamId {
        self.nullary(FoamTag::CObj)
    }

    /// `Arr` of characters holding `s` plus a terminating NUL.
    pub fn new_arr_of_str(&mut self, s: &str) -> FoamId {
        let mut slots: Slots = smallvec![Slot::Int(i64::from(FoamTag::Char.ordinal()))];
        slots.extend(s.bytes().map(|b| Slot::Int(i64::from(b))));
        slots.push(Slot::Int(0));
        self.push(FoamTag::Arr, slots)
    }

    pub fn new_arr(&mut self, base: FoamTag, elts: &[i64]) -> FoamId {
        let mut slots: Slots = smallvec![Slot::Int(i64::from(base.ordinal()))];
        slots.extend(elts.iter().map(|&e| Slot::Int(e)));
        self.push(FoamTag::Arr, slots)
    }

    // === References ===

    pub fn new_par(&mut self, index: i64) -> FoamId {
        self.leaf_int(FoamTag::Par, index)
    }

    pub fn new_loc(&mut self, index: i64) -> FoamId {
        self.leaf_int(FoamTag::Loc, index)
    }

    pub fn new_glo(&mut self, index: i64) -> FoamId {
        self.leaf_int(FoamTag::Glo, index)
    }

    pub fn new_fluid(&mut self, index: i64) -> FoamId {
        self.leaf_int(FoamTag::Fluid, index)
    }

    pub fn new_const(&mut self, index: i64) -> FoamId {
        self.leaf_int(FoamTag::Const, index)
    }

    pub fn new_env(&mut self, level: i64) -> FoamId {
        self.leaf_int(FoamTag::Env, level)
    }

    pub fn new_label(&mut self, label: i64) -> FoamId {
        self.leaf_int(FoamTag::Label, label)
    }

    pub fn new_rnew(&mut self, format: i64) -> FoamId {
        self.leaf_int(FoamTag::RNew, format)
    }

    pub fn new_lex(&mut self, level: i64, index: i64) -> FoamId {
        self.push(FoamTag::Lex, smallvec![Slot::Int(level), Slot::Int(index)])
    }

    pub fn new_eenv(&mut self, level: i64, env: FoamId) -> FoamId {
        self.int_child(FoamTag::EEnv, level, env)
    }

    pub fn new_pref(&mut self, index: i64, prog: FoamId) -> FoamId {
        self.int_child(FoamTag::PRef, index, prog)
    }

    pub fn new_trnew(&mut self, format: i64, size: FoamId) -> FoamId {
        self.int_child(FoamTag::TRNew, format, size)
    }

    pub fn new_rrelt(&mut self, field: i64, data: FoamId, fmt: FoamId) -> FoamId {
        self.push(
            FoamTag::RRElt,
            smallvec![Slot::Int(field), Slot::Code(data), Slot::Code(fmt)],
        )
    }

    pub fn new_relt(&mut self, format: i64, rec: FoamId, field: i64) -> FoamId {
        self.push(
            FoamTag::RElt,
            smallvec![Slot::Int(format), Slot::Code(rec), Slot::Int(field)],
        )
    }

    pub fn new_irelt(&mut self, format: i64, rec: FoamId, field: i64) -> FoamId {
        self.push(
            FoamTag::IRElt,
            smallvec![Slot::Int(format), Slot::Code(rec), Slot::Int(field)],
        )
    }

    pub fn new_trelt(&mut self, format: i64, rec: FoamId, index: FoamId, field: i64) -> FoamId {
        self.push(
            FoamTag::TRElt,
            smallvec![
                Slot::Int(format),
                Slot::Code(rec),
                Slot::Code(index),
                Slot::Int(field)
            ],
        )
    }

    pub fn new_eelt(&mut self, format: i64, env: FoamId, level: i64, lex: i64) -> FoamId {
        self.push(
            FoamTag::EElt,
            smallvec![
                Slot::Int(format),
                Slot::Code(env),
                Slot::Int(level),
                Slot::Int(lex)
            ],
        )
    }

    pub fn new_cfcall(&mut self, a: i64, b: i64, op: FoamId, env: FoamId) -> FoamId {
        self.push(
            FoamTag::CFCall,
            smallvec![Slot::Int(a), Slot::Int(b), Slot::Code(op), Slot::Code(env)],
        )
    }

    pub fn new_ofcall(&mut self, a: i64, b: i64, op: FoamId, env: FoamId) -> FoamId {
        self.push(
            FoamTag::OFCall,
            smallvec![Slot::Int(a), Slot::Int(b), Slot::Code(op), Slot::Code(env)],
        )
    }

    // === Single child ===

    pub fn new_ptr(&mut self, e: FoamId) -> FoamId {
        self.unary(FoamTag::Ptr, e)
    }

    pub fn new_cprog(&mut self, e: FoamId) -> FoamId {
        self.unary(FoamTag::CProg, e)
    }

    pub fn new_cenv(&mut self, e: FoamId) -> FoamId {
        self.unary(FoamTag::CEnv, e)
    }

    pub fn new_loose(&mut self, e: FoamId) -> FoamId {
        self.unary(FoamTag::Loose, e)
    }

    pub fn new_eensure(&mut self, e: FoamId) -> FoamId {
        self.unary(FoamTag::EEnsure, e)
    }

    pub fn new_einfo(&mut self, e: FoamId) -> FoamId {
        self.unary(FoamTag::EInfo, e)
    }

    pub fn new_kill(&mut self, e: FoamId) -> FoamId {
        self.unary(FoamTag::Kill, e)
    }

    pub fn new_free(&mut self, e: FoamId) -> FoamId {
        self.unary(FoamTag::Free, e)
    }

    pub fn new_return(&mut self, e: FoamId) -> FoamId {
        self.unary(FoamTag::Return, e)
    }

    pub fn new_rrfmt(&mut self, e: FoamId) -> FoamId {
        self.unary(FoamTag::RRFmt, e)
    }

    pub fn new_yield(&mut self, e: FoamId) -> FoamId {
        self.unary(FoamTag::Yield, e)
    }

    pub fn new_gen_iter(&mut self, e: FoamId) -> FoamId {
        self.unary(FoamTag::GenIter, e)
    }

    pub fn new_gener_value(&mut self, e: FoamId) -> FoamId {
        self.unary(FoamTag::GenerValue, e)
    }

    // === Binary and fixed ===

    pub fn new_cast(&mut self, ty: FoamTag, e: FoamId) -> FoamId {
        self.push(FoamTag::Cast, smallvec![Slot::Int(i64::from(ty.ordinal())), Slot::Code(e)])
    }

    pub fn new_anew(&mut self, elt: FoamTag, size: FoamId) -> FoamId {
        self.push(FoamTag::ANew, smallvec![Slot::Int(i64::from(elt.ordinal())), Slot::Code(size)])
    }

    pub fn new_aelt(&mut self, base: FoamTag, index: FoamId, arr: FoamId) -> FoamId {
        self.push(
            FoamTag::AElt,
            smallvec![Slot::Int(i64::from(base.ordinal())), Slot::Code(index), Slot::Code(arr)],
        )
    }

    pub fn new_rrnew(&mut self, argc: i64, fmt: FoamId) -> FoamId {
        self.int_child(FoamTag::RRNew, argc, fmt)
    }

    pub fn new_rrec(&mut self, data: FoamId, fmt: FoamId) -> FoamId {
        self.binary(FoamTag::RRec, data, fmt)
    }

    pub fn new_clos(&mut self, env: FoamId, prog: FoamId) -> FoamId {
        self.binary(FoamTag::Clos, env, prog)
    }

    pub fn new_set(&mut self, lhs: FoamId, rhs: FoamId) -> FoamId {
        self.binary(FoamTag::Set, lhs, rhs)
    }

    pub fn new_def(&mut self, lhs: FoamId, rhs: FoamId) -> FoamId {
        self.binary(FoamTag::Def, lhs, rhs)
    }

    pub fn new_if(&mut self, test: FoamId, label: i64) -> FoamId {
        self.push(FoamTag::If, smallvec![Slot::Code(test), Slot::Int(label)])
    }

    pub fn new_goto(&mut self, label: i64) -> FoamId {
        self.leaf_int(FoamTag::Goto, label)
    }

    pub fn new_throw(&mut self, tag: FoamId, value: FoamId) -> FoamId {
        self.binary(FoamTag::Throw, tag, value)
    }

    pub fn new_catch(&mut self, reference: FoamId, expr: FoamId) -> FoamId {
        self.binary(FoamTag::Catch, reference, expr)
    }

    pub fn new_protect(&mut self, expr: FoamId, after: FoamId) -> FoamId {
        self.binary(FoamTag::Protect, expr, after)
    }

    pub fn new_unit(&mut self, formats: FoamId, defs: FoamId) -> FoamId {
        self.binary(FoamTag::Unit, formats, defs)
    }

    pub fn new_push_env(&mut self, format: i64, parent: FoamId) -> FoamId {
        self.int_child(FoamTag::PushEnv, format, parent)
    }

    pub fn new_mfmt(&mut self, format: i64, value: FoamId) -> FoamId {
        self.int_child(FoamTag::MFmt, format, value)
    }

    pub fn new_gener(&mut self, n_labels: i64, env: FoamId, prog: FoamId) -> FoamId {
        self.push(
            FoamTag::Gener,
            smallvec![Slot::Int(n_labels), Slot::Code(env), Slot::Code(prog)],
        )
    }

    pub fn new_gener_step(&mut self, label: i64, gener: FoamId) -> FoamId {
        self.push(FoamTag::GenerStep, smallvec![Slot::Int(label), Slot::Code(gener)])
    }

    // === Declarations ===

    pub fn new_decl(&mut self, ty: FoamTag, id: &str, syme_index: i64, format: i64) -> FoamId {
        self.push(
            FoamTag::Decl,
            smallvec![
                Slot::Int(i64::from(ty.ordinal())),
                Slot::Str(id.to_owned()),
                Slot::Int(syme_index),
                Slot::Int(format)
            ],
        )
    }

    /// `Decl` with no format, as used for scalars.
    pub fn new_scalar_decl(&mut self, ty: FoamTag, id: &str) -> FoamId {
        self.new_decl(ty, id, -1, format_slot::EMPTY as i64)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new_gdecl(
        &mut self,
        ty: FoamTag,
        id: &str,
        ret_type: i64,
        format: i64,
        export: bool,
        protocol: ProtoTag,
    ) -> FoamId {
        let dir = if export { gdecl::EXPORT } else { gdecl::IMPORT };
        self.push(
            FoamTag::GDecl,
            smallvec![
                Slot::Int(i64::from(ty.ordinal())),
                Slot::Str(id.to_owned()),
                Slot::Int(ret_type),
                Slot::Int(format),
                Slot::Int(dir),
                Slot::Int(i64::from(protocol.ordinal()))
            ],
        )
    }

    pub fn new_ddecl(&mut self, usage: DDeclUsage, decls: &[FoamId]) -> FoamId {
        self.new_ddecl_of(usage, decls.iter().copied())
    }

    pub fn new_ddecl_of(&mut self, usage: DDeclUsage, decls: impl IntoIterator<Item = FoamId>) -> FoamId {
        self.new_of_list1(FoamTag::DDecl, i64::from(usage.ordinal()), decls)
    }

    /// `DDecl` with `n` unfilled declaration slots.
    pub fn new_ddecl_empty(&mut self, n: usize, usage: DDeclUsage) -> FoamId {
        let id = self.alloc(FoamTag::DDecl, 1 + n);
        self.set_int(id, 0, i64::from(usage.ordinal()));
        id
    }

    pub fn new_dfmt(&mut self, ddecls: &[FoamId]) -> FoamId {
        self.new_of_list(FoamTag::DFmt, ddecls.iter().copied())
    }

    pub fn new_ddef(&mut self, defs: &[FoamId]) -> FoamId {
        self.new_of_list(FoamTag::DDef, defs.iter().copied())
    }

    pub fn new_ddef_of(&mut self, defs: impl IntoIterator<Item = FoamId>) -> FoamId {
        self.new_of_list(FoamTag::DDef, defs)
    }

    pub fn new_denv(&mut self, formats: &[i64]) -> FoamId {
        let slots: Slots = formats.iter().map(|&f| Slot::Int(f)).collect();
        self.push(FoamTag::DEnv, slots)
    }

    /// `DEnv` of `n` levels, all with the empty format.
    pub fn new_denv_unused(&mut self, n: usize) -> FoamId {
        let slots: Slots = (0..n).map(|_| Slot::Int(format_slot::EMPTY as i64)).collect();
        self.push(FoamTag::DEnv, slots)
    }

    pub fn new_dfluid(&mut self, fluids: &[i64]) -> FoamId {
        let slots: Slots = fluids.iter().map(|&f| Slot::Int(f)).collect();
        self.push(FoamTag::DFluid, slots)
    }

    // === N-ary ===

    pub fn new_seq(&mut self, stmts: &[FoamId]) -> FoamId {
        self.new_seq_of(stmts.iter().copied())
    }

    pub fn new_seq_of(&mut self, stmts: impl IntoIterator<Item = FoamId>) -> FoamId {
        self.new_of_list(FoamTag::Seq, stmts)
    }

    pub fn new_values(&mut self, values: &[FoamId]) -> FoamId {
        self.new_values_of(values.iter().copied())
    }

    pub fn new_values_of(&mut self, values: impl IntoIterator<Item = FoamId>) -> FoamId {
        self.new_of_list(FoamTag::Values, values)
    }

    pub fn new_rec(&mut self, format: i64, fields: &[FoamId]) -> FoamId {
        self.new_of_list1(FoamTag::Rec, format, fields.iter().copied())
    }

    pub fn new_tr(&mut self, format: i64, elts: &[FoamId]) -> FoamId {
        self.new_of_list1(FoamTag::TR, format, elts.iter().copied())
    }

    pub fn new_select(&mut self, op: FoamId, labels: &[i64]) -> FoamId {
        let mut slots: Slots = smallvec![Slot::Code(op)];
        slots.extend(labels.iter().map(|&l| Slot::Int(l)));
        self.push(FoamTag::Select, slots)
    }

    /// `Select` with `n` branches, all label 0, to be filled in later.
    pub fn new_select_empty(&mut self, op: FoamId, n: usize) -> FoamId {
        let id = self.alloc(FoamTag::Select, 1 + n);
        self.set_child(id, 0, op);
        id
    }

    /// `Select` over the consecutive labels `lo..lo + count`.
    pub fn new_select_range(&mut self, op: FoamId, lo: i64, count: i64) -> FoamId {
        let labels: Vec<i64> = (lo..lo + count).collect();
        self.new_select(op, &labels)
    }

    pub fn new_bcall(&mut self, op: BValTag, args: &[FoamId]) -> FoamId {
        self.new_bcall_of(op, args.iter().copied())
    }

    pub fn new_bcall_of(&mut self, op: BValTag, args: impl IntoIterator<Item = FoamId>) -> FoamId {
        self.new_of_list1(FoamTag::BCall, i64::from(op.ordinal()), args)
    }

    pub fn new_pcall(&mut self, proto: ProtoTag, ty: FoamTag, op: FoamId, args: &[FoamId]) -> FoamId {
        self.new_pcall_of(proto, ty, op, args.iter().copied())
    }

    pub fn new_pcall_of(
        &mut self,
        proto: ProtoTag,
        ty: FoamTag,
        op: FoamId,
        args: impl IntoIterator<Item = FoamId>,
    ) -> FoamId {
        let mut slots: Slots = smallvec![
            Slot::Int(i64::from(proto.ordinal())),
            Slot::Int(i64::from(ty.ordinal())),
            Slot::Code(op)
        ];
        slots.extend(args.into_iter().map(Slot::Code));
        self.push(FoamTag::PCall, slots)
    }

    pub fn new_ccall(&mut self, ty: FoamTag, op: FoamId, args: &[FoamId]) -> FoamId {
        self.new_ccall_of(ty, op, args.iter().copied())
    }

    pub fn new_ccall_of(&mut self, ty: FoamTag, op: FoamId, args: impl IntoIterator<Item = FoamId>) -> FoamId {
        let mut slots: Slots = smallvec![Slot::Int(i64::from(ty.ordinal())), Slot::Code(op)];
        slots.extend(args.into_iter().map(Slot::Code));
        self.push(FoamTag::CCall, slots)
    }

    pub fn new_ocall(&mut self, ty: FoamTag, op: FoamId, env: FoamId, args: &[FoamId]) -> FoamId {
        let mut slots: Slots = smallvec![
            Slot::Int(i64::from(ty.ordinal())),
            Slot::Code(op),
            Slot::Code(env)
        ];
        slots.extend(args.iter().map(|&a| Slot::Code(a)));
        self.push(FoamTag::OCall, slots)
    }

    /// `Prog` from a header and its five child groups.
    pub fn new_prog(
        &mut self,
        header: ProgHeader,
        params: FoamId,
        locals: FoamId,
        fluids: FoamId,
        levels: FoamId,
        body: FoamId,
    ) -> FoamId {
        self.push(
            FoamTag::Prog,
            smallvec![
                Slot::Int(0),
                Slot::Int(header.n_labels),
                Slot::Int(i64::from(header.ret_type.ordinal())),
                Slot::Int(header.format),
                Slot::Int(i64::from(header.info.bits())),
                Slot::Int(header.size),
                Slot::Int(header.time),
                Slot::Int(header.body_flags),
                Slot::Code(params),
                Slot::Code(locals),
                Slot::Code(fluids),
                Slot::Code(levels),
                Slot::Code(body)
            ],
        )
    }

    /// `Prog` with a zero header and no children.
    pub fn new_prog_empty(&mut self) -> FoamId {
        self.new_prog(
            ProgHeader::default(),
            FoamId::NONE,
            FoamId::NONE,
            FoamId::NONE,
            FoamId::NONE,
            FoamId::NONE,
        )
    }
}
