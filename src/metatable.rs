//! Metamethod dispatch (C5, spec §4.5). Grounded on the teacher's
//! `lua_vm/execute/metamethod.rs` (`TmKind`, `equalobj`,
//! `lookup_index_from_metatable_value`) and `lua_vm/execute/helper.rs`
//! (`lookup_from_metatable`), reworked against `Rc<RefCell<LuaTable>>`
//! instead of the teacher's object-pool/GC-id indirection.

use crate::context::LuaContext;
use crate::error::{LuaError, LuaResult};
use crate::value::LuaValue;

/// The fixed set of metamethod tags (spec §3 "Metatable"), in the order
/// the teacher's `ConstString::tm_names` table lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TmKind {
    Index,
    NewIndex,
    Gc,
    Mode,
    Len,
    Eq,
    Add,
    Sub,
    Mul,
    Mod,
    Pow,
    Div,
    Unm,
    Lt,
    Le,
    Concat,
    Call,
    Close,
    ToString,
}

impl TmKind {
    pub fn name(self) -> &'static str {
        match self {
            TmKind::Index => "__index",
            TmKind::NewIndex => "__newindex",
            TmKind::Gc => "__gc",
            TmKind::Mode => "__mode",
            TmKind::Len => "__len",
            TmKind::Eq => "__eq",
            TmKind::Add => "__add",
            TmKind::Sub => "__sub",
            TmKind::Mul => "__mul",
            TmKind::Mod => "__mod",
            TmKind::Pow => "__pow",
            TmKind::Div => "__div",
            TmKind::Unm => "__unm",
            TmKind::Lt => "__lt",
            TmKind::Le => "__le",
            TmKind::Concat => "__concat",
            TmKind::Call => "__call",
            TmKind::Close => "__close",
            TmKind::ToString => "__tostring",
        }
    }
}

/// Bound on `__index`/`__newindex` chain hops (spec §4.4/§6 "loop in
/// gettable/settable"), matching reference Lua's `MAXTAGLOOP`.
pub const MAX_TAG_LOOP: usize = 100;

/// Looks up `tag` on `value`'s resolved metatable, if any.
pub fn get_metamethod(ctx: &LuaContext, value: &LuaValue, tag: TmKind) -> Option<LuaValue> {
    let mt = ctx.metatable_for(value)?;
    let mm = mt.borrow().raw_get_str(tag.name());
    if mm.is_nil() {
        None
    } else {
        Some(mm)
    }
}

/// `t[k]` with full `__index` fall-through (§4.5): raw hit short-
/// circuits; otherwise a table `__index` re-enters as a key, a
/// function `__index` is called with `(t, k)`; anything else errors.
/// Chains beyond [`MAX_TAG_LOOP`] hops signal `"loop in gettable"`.
pub fn index_get(
    ctx: &LuaContext,
    mut target: LuaValue,
    key: &LuaValue,
    call: impl Fn(&LuaValue, &[LuaValue]) -> LuaResult<Vec<LuaValue>>,
) -> LuaResult<LuaValue> {
    for _ in 0..MAX_TAG_LOOP {
        if let LuaValue::Table(t) = &target {
            let raw = t.borrow().raw_get(key);
            if !raw.is_nil() {
                return Ok(raw);
            }
            match get_metamethod(ctx, &target, TmKind::Index) {
                None => return Ok(LuaValue::Nil),
                Some(mm) if mm.is_function() => {
                    let results = call(&mm, &[target.clone(), key.clone()])?;
                    return Ok(results.into_iter().next().unwrap_or(LuaValue::Nil));
                }
                Some(next) => {
                    target = next;
                    continue;
                }
            }
        }
        match get_metamethod(ctx, &target, TmKind::Index) {
            None => {
                return Err(LuaError::index(target.type_name(), &key.to_debug_string()));
            }
            Some(mm) if mm.is_function() => {
                let results = call(&mm, &[target.clone(), key.clone()])?;
                return Ok(results.into_iter().next().unwrap_or(LuaValue::Nil));
            }
            Some(next) => {
                target = next;
                continue;
            }
        }
    }
    Err(LuaError::Loop("gettable"))
}

/// `t[k] = v` with full `__newindex` fall-through (§4.5).
pub fn index_set(
    ctx: &LuaContext,
    mut target: LuaValue,
    key: LuaValue,
    value: LuaValue,
    call: impl Fn(&LuaValue, &[LuaValue]) -> LuaResult<Vec<LuaValue>>,
) -> LuaResult<()> {
    for _ in 0..MAX_TAG_LOOP {
        if let LuaValue::Table(t) = &target {
            let has_raw = !t.borrow().raw_get(&key).is_nil();
            if has_raw {
                return t.borrow_mut().raw_set(key, value);
            }
            match get_metamethod(ctx, &target, TmKind::NewIndex) {
                None => return t.borrow_mut().raw_set(key, value),
                Some(mm) if mm.is_function() => {
                    call(&mm, &[target.clone(), key, value])?;
                    return Ok(());
                }
                Some(next) => {
                    target = next;
                    continue;
                }
            }
        }
        match get_metamethod(ctx, &target, TmKind::NewIndex) {
            None => return Err(LuaError::index(target.type_name(), &key.to_debug_string())),
            Some(mm) if mm.is_function() => {
                call(&mm, &[target.clone(), key, value])?;
                return Ok(());
            }
            Some(next) => {
                target = next;
                continue;
            }
        }
    }
    Err(LuaError::Loop("settable"))
}

/// `==` (§4.1/§4.5), direct port of the teacher's `equalobj`: identity/
/// raw equality first, `__eq` consulted only for two same-type
/// reference values (table/userdata) whose raw comparison failed *and*
/// which both define `__eq` as the identical function object (§4.5
/// "present on BOTH and identical").
pub fn equals(
    ctx: &LuaContext,
    a: &LuaValue,
    b: &LuaValue,
    call: impl Fn(&LuaValue, &[LuaValue]) -> LuaResult<Vec<LuaValue>>,
) -> LuaResult<bool> {
    if a.raw_eq(b) {
        return Ok(true);
    }
    let both_tables = matches!((a, b), (LuaValue::Table(_), LuaValue::Table(_)));
    let both_userdata = matches!((a, b), (LuaValue::Userdata(_), LuaValue::Userdata(_)));
    if !both_tables && !both_userdata {
        return Ok(false);
    }
    let mm_a = get_metamethod(ctx, a, TmKind::Eq);
    let mm_b = get_metamethod(ctx, b, TmKind::Eq);
    match (mm_a, mm_b) {
        (Some(fa), Some(fb)) if fa.raw_eq(&fb) => {
            let results = call(&fa, &[a.clone(), b.clone()])?;
            Ok(results.first().map(LuaValue::is_truthy).unwrap_or(false))
        }
        _ => Ok(false),
    }
}
