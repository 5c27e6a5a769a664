//! Callable values (§4.6 call protocol, §4.8 tail calls).

use super::LuaValue;
use crate::error::LuaResult;
use smol_str::SmolStr;
use std::rc::Rc;

/// What a call produces: either a final result, or a tail call to be
/// trampolined by the caller (C8) instead of recursing.
pub enum CallOutcome {
    Return(Vec<LuaValue>),
    TailCall(LuaValue, Vec<LuaValue>),
}

/// Anything invocable through the `call`/`invoke` operators (C6). Plain
/// Rust closures and host-registered functions both implement this; a
/// future bytecode interpreter would add a `Closure` impl over compiled
/// prototypes, out of scope here.
pub trait LuaCallable {
    fn call(&self, args: &[LuaValue]) -> LuaResult<CallOutcome>;

    /// Name used in error messages and debug info; `"?"` for anonymous
    /// functions, matching reference Lua's `function: 0x...` fallback.
    fn name(&self) -> &str {
        "?"
    }
}

pub type FunctionRef = Rc<dyn LuaCallable>;

/// A host function with no captured state, the common case for library
/// entry points (grounded on the teacher's `CFunction` alias).
pub struct NativeFunction<F> {
    name: SmolStr,
    func: F,
}

impl<F> NativeFunction<F>
where
    F: Fn(&[LuaValue]) -> LuaResult<CallOutcome> + 'static,
{
    pub fn new(name: impl Into<SmolStr>, func: F) -> FunctionRef {
        Rc::new(NativeFunction {
            name: name.into(),
            func,
        })
    }
}

impl<F> LuaCallable for NativeFunction<F>
where
    F: Fn(&[LuaValue]) -> LuaResult<CallOutcome>,
{
    fn call(&self, args: &[LuaValue]) -> LuaResult<CallOutcome> {
        (self.func)(args)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Plain `extern "Rust" fn` entry point, for functions with no closure
/// state at all — the direct analogue of the teacher's `CFunction`.
pub type CFunction = fn(&[LuaValue]) -> LuaResult<CallOutcome>;

impl LuaCallable for CFunction {
    fn call(&self, args: &[LuaValue]) -> LuaResult<CallOutcome> {
        (self)(args)
    }
}
