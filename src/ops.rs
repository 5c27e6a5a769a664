//! The operator surface (C6, spec §4.6): the single entry point a
//! bytecode interpreter or embedder uses for every Lua operator. Each
//! function is total over the value universe: it computes directly,
//! falls through to a metamethod, or returns a typed `LuaError` — never
//! panics.

use crate::context::LuaContext;
use crate::error::{LuaError, LuaResult};
use crate::metatable::{self, TmKind};
use crate::number::{self, Num};
use crate::string_kernel::{compare_strings, ConcatBuffer};
use crate::trampoline;
use crate::value::LuaValue;

fn call_metamethod(
    ctx: &LuaContext,
    f: &LuaValue,
    args: &[LuaValue],
) -> LuaResult<Vec<LuaValue>> {
    trampoline::drive(ctx, f.clone(), args.to_vec())
}

fn arith_fallback(
    ctx: &LuaContext,
    tag: TmKind,
    op_name: &str,
    a: &LuaValue,
    b: &LuaValue,
) -> LuaResult<LuaValue> {
    let mm = metatable::get_metamethod(ctx, a, tag).or_else(|| metatable::get_metamethod(ctx, b, tag));
    match mm {
        Some(f) => Ok(call_metamethod(ctx, &f, &[a.clone(), b.clone()])?
            .into_iter()
            .next()
            .unwrap_or(LuaValue::Nil)),
        None => Err(LuaError::arithmetic2(op_name, a.type_name(), b.type_name())),
    }
}

macro_rules! arith_op {
    ($name:ident, $tag:expr, $op_name:literal, $kernel:path) => {
        pub fn $name(ctx: &LuaContext, a: &LuaValue, b: &LuaValue) -> LuaResult<LuaValue> {
            match (Num::coerce(a), Num::coerce(b)) {
                (Some(x), Some(y)) => Ok($kernel(x, y).into_value()),
                _ => arith_fallback(ctx, $tag, $op_name, a, b),
            }
        }
    };
}

arith_op!(add, TmKind::Add, "add", number::add);
arith_op!(sub, TmKind::Sub, "sub", number::sub);
arith_op!(mul, TmKind::Mul, "mul", number::mul);
arith_op!(div, TmKind::Div, "div", number::div);
arith_op!(modulo, TmKind::Mod, "mod", number::modulo);
arith_op!(pow, TmKind::Pow, "pow", number::pow);

/// Unary minus (§4.6 "unm"/"neg").
pub fn unm(ctx: &LuaContext, a: &LuaValue) -> LuaResult<LuaValue> {
    if let Some(n) = Num::coerce(a) {
        return Ok(number::unm(n).into_value());
    }
    match metatable::get_metamethod(ctx, a, TmKind::Unm) {
        Some(f) => Ok(call_metamethod(ctx, &f, &[a.clone(), a.clone()])?
            .into_iter()
            .next()
            .unwrap_or(LuaValue::Nil)),
        None => Err(LuaError::arithmetic("unm", a.type_name())),
    }
}

/// Alias kept for callers that spell it `neg` rather than `unm` (§4.6).
#[inline]
pub fn neg(ctx: &LuaContext, a: &LuaValue) -> LuaResult<LuaValue> {
    unm(ctx, a)
}

/// `..` (§4.3/§4.6): numbers and strings concatenate directly through a
/// [`ConcatBuffer`]; anything else falls to `__concat`.
pub fn concat(ctx: &LuaContext, a: &LuaValue, b: &LuaValue) -> LuaResult<LuaValue> {
    if is_concat_primitive(a) && is_concat_primitive(b) {
        let mut buf = ConcatBuffer::new();
        push_primitive(&mut buf, a);
        push_primitive(&mut buf, b);
        return Ok(LuaValue::Str(buf.value()));
    }
    match metatable::get_metamethod(ctx, a, TmKind::Concat)
        .or_else(|| metatable::get_metamethod(ctx, b, TmKind::Concat))
    {
        Some(f) => Ok(call_metamethod(ctx, &f, &[a.clone(), b.clone()])?
            .into_iter()
            .next()
            .unwrap_or(LuaValue::Nil)),
        None => {
            let bad_ty = if is_concat_primitive(a) { b.type_name() } else { a.type_name() };
            if is_concat_primitive(a) || is_concat_primitive(b) {
                Err(LuaError::concatenate(bad_ty, None))
            } else {
                Err(LuaError::concatenate(a.type_name(), Some(b.type_name())))
            }
        }
    }
}

fn is_concat_primitive(v: &LuaValue) -> bool {
    v.is_number() || v.is_string()
}

/// Appends `v`'s concat representation: a string contributes its raw
/// bytes verbatim (§3 "not Unicode" — no UTF-8 round trip), a number its
/// formatted digits.
fn push_primitive(buf: &mut ConcatBuffer, v: &LuaValue) {
    match v {
        LuaValue::Str(s) => buf.append_bytes(s.as_bytes()),
        _ => buf.append(&v.to_debug_string()),
    }
}

/// `#v` (§4.4/§4.6): string byte length, table border (unless `__len`
/// overrides it), else `__len` or a type error.
pub fn len(ctx: &LuaContext, v: &LuaValue) -> LuaResult<LuaValue> {
    if let LuaValue::Str(s) = v {
        return Ok(LuaValue::Int(s.len() as i64));
    }
    if let Some(mm) = metatable::get_metamethod(ctx, v, TmKind::Len) {
        return Ok(call_metamethod(ctx, &mm, &[v.clone()])?
            .into_iter()
            .next()
            .unwrap_or(LuaValue::Nil));
    }
    if let LuaValue::Table(t) = v {
        return Ok(LuaValue::Int(t.borrow().length()));
    }
    Err(LuaError::type_error(format!(
        "attempt to get length of a {} value",
        v.type_name()
    )))
}

/// `==` (§4.1/§4.6): see `metatable::equals` for the exact fall-through
/// rule (only same-kind reference types ever consult `__eq`).
pub fn eq(ctx: &LuaContext, a: &LuaValue, b: &LuaValue) -> LuaResult<bool> {
    metatable::equals(ctx, a, b, |f, args| call_metamethod(ctx, f, args))
}

#[inline]
pub fn neq(ctx: &LuaContext, a: &LuaValue, b: &LuaValue) -> LuaResult<bool> {
    Ok(!eq(ctx, a, b)?)
}

/// `<` (§4.6): numeric operands compare by value, strings compare
/// lexicographically (§4.3), everything else needs `__lt`. Unlike
/// arithmetic, comparison never coerces numeric strings.
pub fn lt(ctx: &LuaContext, a: &LuaValue, b: &LuaValue) -> LuaResult<bool> {
    compare(ctx, a, b, TmKind::Lt, number::num_lt, |x, y| {
        compare_strings(x, y) == std::cmp::Ordering::Less
    })
}

/// `<=` (§4.5): tries `__le` first; if neither operand defines it, falls
/// back to `not (b < a)` — Lua 5.2's documented `__lt`-reversed-and-
/// negated rule for `<=`.
pub fn le(ctx: &LuaContext, a: &LuaValue, b: &LuaValue) -> LuaResult<bool> {
    match compare(ctx, a, b, TmKind::Le, number::num_le, |x, y| {
        compare_strings(x, y) != std::cmp::Ordering::Greater
    }) {
        Ok(result) => Ok(result),
        Err(_) if metatable::get_metamethod(ctx, a, TmKind::Lt).is_some()
            || metatable::get_metamethod(ctx, b, TmKind::Lt).is_some() =>
        {
            Ok(!lt(ctx, b, a)?)
        }
        Err(e) => Err(e),
    }
}

/// `a > b` is `b < a`; `a >= b` is `b <= a` (reference Lua 5.2 compiles
/// these directly, with no separate `__gt`/`__ge` tag).
#[inline]
pub fn gt(ctx: &LuaContext, a: &LuaValue, b: &LuaValue) -> LuaResult<bool> {
    lt(ctx, b, a)
}

#[inline]
pub fn ge(ctx: &LuaContext, a: &LuaValue, b: &LuaValue) -> LuaResult<bool> {
    le(ctx, b, a)
}

fn compare(
    ctx: &LuaContext,
    a: &LuaValue,
    b: &LuaValue,
    tag: TmKind,
    num_cmp: impl Fn(Num, Num) -> bool,
    str_cmp: impl Fn(&[u8], &[u8]) -> bool,
) -> LuaResult<bool> {
    if let (LuaValue::Int(_) | LuaValue::Float(_), LuaValue::Int(_) | LuaValue::Float(_)) = (a, b) {
        let (x, y) = (Num::coerce(a).unwrap(), Num::coerce(b).unwrap());
        return Ok(num_cmp(x, y));
    }
    if let (LuaValue::Str(x), LuaValue::Str(y)) = (a, b) {
        return Ok(str_cmp(x.as_bytes(), y.as_bytes()));
    }
    match metatable::get_metamethod(ctx, a, tag).or_else(|| metatable::get_metamethod(ctx, b, tag)) {
        Some(f) => {
            let results = call_metamethod(ctx, &f, &[a.clone(), b.clone()])?;
            Ok(results.first().map(LuaValue::is_truthy).unwrap_or(false))
        }
        None => Err(LuaError::compare(a.type_name(), b.type_name())),
    }
}

/// `and` (§4.6): Lua's `and` yields the first falsy operand or the
/// second operand, never a coerced boolean.
#[inline]
pub fn and(a: &LuaValue, b: &LuaValue) -> LuaValue {
    if a.is_falsy() {
        a.clone()
    } else {
        b.clone()
    }
}

/// `or` (§4.6): yields the first truthy operand or the second operand.
#[inline]
pub fn or(a: &LuaValue, b: &LuaValue) -> LuaValue {
    if a.is_truthy() {
        a.clone()
    } else {
        b.clone()
    }
}

#[inline]
pub fn not(a: &LuaValue) -> LuaValue {
    LuaValue::Bool(a.is_falsy())
}

/// `t[k]` (§4.4/§4.6), full `__index` fall-through.
pub fn get(ctx: &LuaContext, target: &LuaValue, key: &LuaValue) -> LuaResult<LuaValue> {
    metatable::index_get(ctx, target.clone(), key, |f, args| call_metamethod(ctx, f, args))
}

/// `t[k] = v` (§4.4/§4.6), full `__newindex` fall-through.
pub fn set(ctx: &LuaContext, target: &LuaValue, key: LuaValue, value: LuaValue) -> LuaResult<()> {
    metatable::index_set(ctx, target.clone(), key, value, |f, args| {
        call_metamethod(ctx, f, args)
    })
}

/// `f(args...)` (§4.6/§4.8): trampolines tail calls via C8.
pub fn call(ctx: &LuaContext, func: &LuaValue, args: &[LuaValue]) -> LuaResult<Vec<LuaValue>> {
    trampoline::drive(ctx, func.clone(), args.to_vec())
}

/// `obj:method(args...)` sugar (§4.6 "invoke"): resolves `method` via
/// `get`, then calls it with `obj` prepended.
pub fn invoke(
    ctx: &LuaContext,
    obj: &LuaValue,
    method: &str,
    args: &[LuaValue],
) -> LuaResult<Vec<LuaValue>> {
    let f = get(ctx, obj, &LuaValue::string(method))?;
    let mut full_args = Vec::with_capacity(args.len() + 1);
    full_args.push(obj.clone());
    full_args.extend_from_slice(args);
    call(ctx, &f, &full_args)
}

/// `tostring(v)` (§4.6/§4.9): consults `__tostring`, else falls back to
/// the debug rendering every value has (§4.1).
pub fn tostring(ctx: &LuaContext, v: &LuaValue) -> LuaResult<String> {
    if let Some(mm) = metatable::get_metamethod(ctx, v, TmKind::ToString) {
        let results = call_metamethod(ctx, &mm, &[v.clone()])?;
        return Ok(results
            .into_iter()
            .next()
            .map(|r| r.to_debug_string())
            .unwrap_or_default());
    }
    Ok(v.to_debug_string())
}
