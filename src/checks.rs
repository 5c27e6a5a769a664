//! Argument check/optional API (C9, spec §4.9): the boundary between
//! loosely-typed Lua call arguments and strongly-typed Rust host
//! functions. `check_*` is fatal (raises a `bad argument` `LuaError`);
//! `optional_*` substitutes a default for a missing (`nil`/absent)
//! argument and is otherwise just as fatal on a type mismatch.

use crate::error::{LuaError, LuaResult};
use crate::number::Num;
use crate::value::{FunctionRef, LuaValue, TableRef, ThreadRef, UserdataRef};

fn arg_at(args: &[LuaValue], index: usize) -> LuaValue {
    args.get(index - 1).cloned().unwrap_or(LuaValue::Nil)
}

/// `check_integer(i)` (§4.9): also accepts floats with no fractional
/// part and numeric strings, per reference Lua's `luaL_checkinteger`.
pub fn check_integer(args: &[LuaValue], index: usize) -> LuaResult<i64> {
    let v = arg_at(args, index);
    match Num::coerce(&v) {
        Some(Num::Int(i)) => Ok(i),
        Some(Num::Float(f)) if f.fract() == 0.0 && f.is_finite() => Ok(f as i64),
        Some(Num::Float(_)) => Err(LuaError::bad_argument(index, "number has no integer representation", v.type_name())),
        None => Err(LuaError::bad_argument(index, "number", v.type_name())),
    }
}

pub fn check_number(args: &[LuaValue], index: usize) -> LuaResult<f64> {
    let v = arg_at(args, index);
    Num::coerce(&v)
        .map(Num::as_f64)
        .ok_or_else(|| LuaError::bad_argument(index, "number", v.type_name()))
}

pub fn check_string(args: &[LuaValue], index: usize) -> LuaResult<String> {
    let v = arg_at(args, index);
    match &v {
        LuaValue::Str(s) => Ok(s.to_string_lossy()),
        LuaValue::Int(_) | LuaValue::Float(_) => Ok(v.to_debug_string()),
        _ => Err(LuaError::bad_argument(index, "string", v.type_name())),
    }
}

pub fn check_boolean(args: &[LuaValue], index: usize) -> LuaResult<bool> {
    let v = arg_at(args, index);
    match v {
        LuaValue::Bool(b) => Ok(b),
        _ => Err(LuaError::bad_argument(index, "boolean", v.type_name())),
    }
}

pub fn check_table(args: &[LuaValue], index: usize) -> LuaResult<TableRef> {
    let v = arg_at(args, index);
    match v {
        LuaValue::Table(t) => Ok(t),
        _ => Err(LuaError::bad_argument(index, "table", v.type_name())),
    }
}

pub fn check_function(args: &[LuaValue], index: usize) -> LuaResult<FunctionRef> {
    let v = arg_at(args, index);
    match v {
        LuaValue::Function(f) => Ok(f),
        _ => Err(LuaError::bad_argument(index, "function", v.type_name())),
    }
}

pub fn check_thread(args: &[LuaValue], index: usize) -> LuaResult<ThreadRef> {
    let v = arg_at(args, index);
    match v {
        LuaValue::Thread(t) => Ok(t),
        _ => Err(LuaError::bad_argument(index, "thread", v.type_name())),
    }
}

pub fn check_userdata(args: &[LuaValue], index: usize) -> LuaResult<UserdataRef> {
    let v = arg_at(args, index);
    match v {
        LuaValue::Userdata(u) => Ok(u),
        _ => Err(LuaError::bad_argument(index, "userdata", v.type_name())),
    }
}

/// `optional_integer(i, default)` (§4.9): `nil`/absent yields `default`.
pub fn optional_integer(args: &[LuaValue], index: usize, default: i64) -> LuaResult<i64> {
    if arg_at(args, index).is_nil() {
        Ok(default)
    } else {
        check_integer(args, index)
    }
}

pub fn optional_number(args: &[LuaValue], index: usize, default: f64) -> LuaResult<f64> {
    if arg_at(args, index).is_nil() {
        Ok(default)
    } else {
        check_number(args, index)
    }
}

pub fn optional_string(args: &[LuaValue], index: usize, default: &str) -> LuaResult<String> {
    if arg_at(args, index).is_nil() {
        Ok(default.to_string())
    } else {
        check_string(args, index)
    }
}

pub fn optional_boolean(args: &[LuaValue], index: usize, default: bool) -> LuaResult<bool> {
    if arg_at(args, index).is_nil() {
        Ok(default)
    } else {
        check_boolean(args, index)
    }
}

pub fn optional_table(args: &[LuaValue], index: usize, default: Option<TableRef>) -> LuaResult<Option<TableRef>> {
    if arg_at(args, index).is_nil() {
        Ok(default)
    } else {
        check_table(args, index).map(Some)
    }
}
