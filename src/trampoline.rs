//! Tail-call trampoline (C8, spec §4.8). A `LuaCallable` impl that wants
//! to tail-call another value returns `CallOutcome::TailCall` instead of
//! calling back into `drive` recursively; `drive` loops instead of
//! growing the Rust call stack, giving genuine Lua tail calls O(1) host
//! stack usage regardless of Lua-level recursion depth.

use crate::context::LuaContext;
use crate::error::{LuaError, LuaResult};
use crate::metatable::{get_metamethod, TmKind, MAX_TAG_LOOP};
use crate::value::{CallOutcome, FunctionRef, LuaValue};

/// Resolves `value` to a directly-callable function, walking `__call`
/// metamethods (§4.5 "Call") the same bounded number of hops as
/// `__index`/`__newindex`. `__call`'s receiver is prepended to the
/// argument list, matching reference Lua's `luaD_precall`.
fn resolve_callable(
    ctx: &LuaContext,
    mut value: LuaValue,
    args: &mut Vec<LuaValue>,
) -> LuaResult<FunctionRef> {
    for _ in 0..MAX_TAG_LOOP {
        if let LuaValue::Function(f) = value {
            return Ok(f);
        }
        match get_metamethod(ctx, &value, TmKind::Call) {
            Some(mm) => {
                args.insert(0, value);
                value = mm;
            }
            None => return Err(LuaError::call(value.type_name())),
        }
    }
    Err(LuaError::Loop("call"))
}

/// Runs `func(args)` to completion, trampolining any tail calls it
/// returns instead of recursing through Rust stack frames.
pub fn drive(ctx: &LuaContext, func: LuaValue, mut args: Vec<LuaValue>) -> LuaResult<Vec<LuaValue>> {
    let mut callable = resolve_callable(ctx, func, &mut args)?;
    loop {
        match callable.call(&args)? {
            CallOutcome::Return(values) => return Ok(values),
            CallOutcome::TailCall(next_func, next_args) => {
                args = next_args;
                callable = resolve_callable(ctx, next_func, &mut args)?;
            }
        }
    }
}
