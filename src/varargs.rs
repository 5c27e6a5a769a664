//! Varargs (C7, spec §4.7): an immutable view over a call's extra
//! arguments/multiple return values.

use crate::value::LuaValue;
use std::fmt;

#[derive(Clone, Default)]
pub struct Varargs {
    values: Vec<LuaValue>,
}

impl Varargs {
    pub fn new(values: Vec<LuaValue>) -> Self {
        Varargs { values }
    }

    pub fn empty() -> Self {
        Varargs { values: Vec::new() }
    }

    /// Number of values carried (§4.7 "narg").
    pub fn narg(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 1-based accessor; out-of-range reads as `nil` (Lua varargs never
    /// index-error — missing trailing arguments are simply absent).
    pub fn arg(&self, i: usize) -> LuaValue {
        if i == 0 {
            return LuaValue::Nil;
        }
        self.values.get(i - 1).cloned().unwrap_or(LuaValue::Nil)
    }

    /// First value, or `nil` if empty (§4.7 "arg1").
    pub fn arg1(&self) -> LuaValue {
        self.arg(1)
    }

    /// The tail starting at 1-based index `k` (§4.7 "subArgs"), used by
    /// `select(k, ...)` and manual vararg forwarding.
    pub fn sub_args(&self, k: usize) -> Varargs {
        if k == 0 || k > self.values.len() {
            return Varargs::empty();
        }
        Varargs::new(self.values[k - 1..].to_vec())
    }

    pub fn as_slice(&self) -> &[LuaValue] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<LuaValue> {
        self.values
    }
}

impl fmt::Display for Varargs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", v.to_debug_string())?;
        }
        write!(f, ")")
    }
}

impl From<Vec<LuaValue>> for Varargs {
    fn from(values: Vec<LuaValue>) -> Self {
        Varargs::new(values)
    }
}
