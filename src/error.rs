//! Error kinds for the core (§7). One enum, not a kind+message split,
//! since this crate has no VM-side out-of-band message slot to split into.

use crate::value::LuaValue;
use std::fmt;

/// A single recoverable error. Every error raised by the core is
/// recoverable by a protected call at a higher layer (§7 "Fatal errors
/// do not exist in the core").
#[derive(Debug, Clone)]
pub enum LuaError {
    /// Operator applied to a type with no applicable metamethod.
    Type(String),
    /// Positional argument type mismatch at a `check_*` boundary.
    Arg { index: usize, message: String },
    /// `set_metatable` attempted on a table whose `__metatable` is non-nil.
    ProtectedMetatable,
    /// `__index`/`__newindex` chain exceeded the hop bound.
    Loop(&'static str),
    /// `error(v)` with an arbitrary carried value.
    Runtime(LuaValue),
}

impl LuaError {
    #[inline]
    pub fn type_error(message: impl Into<String>) -> Self {
        LuaError::Type(message.into())
    }

    #[inline]
    pub fn arg_error(index: usize, message: impl Into<String>) -> Self {
        LuaError::Arg {
            index,
            message: message.into(),
        }
    }

    /// `"attempt to perform arithmetic <op> on <type>"` (§6).
    pub fn arithmetic(op: &str, lhs_ty: &str) -> Self {
        LuaError::Type(format!("attempt to perform arithmetic {} on {}", op, lhs_ty))
    }

    /// `"attempt to perform arithmetic <op> on <type> and <type>"` (§6).
    pub fn arithmetic2(op: &str, lhs_ty: &str, rhs_ty: &str) -> Self {
        LuaError::Type(format!(
            "attempt to perform arithmetic {} on {} and {}",
            op, lhs_ty, rhs_ty
        ))
    }

    /// `"attempt to compare <tA> with <tB>"` / `"... two <t> values"` (§6).
    pub fn compare(lhs_ty: &str, rhs_ty: &str) -> Self {
        if lhs_ty == rhs_ty {
            LuaError::Type(format!("attempt to compare two {} values", lhs_ty))
        } else {
            LuaError::Type(format!("attempt to compare {} with {}", lhs_ty, rhs_ty))
        }
    }

    /// `"attempt to concatenate <type>"` / `"... and <type>"` (§6).
    pub fn concatenate(lhs_ty: &str, rhs_ty: Option<&str>) -> Self {
        match rhs_ty {
            Some(rhs) => LuaError::Type(format!(
                "attempt to concatenate {} and {}",
                lhs_ty, rhs
            )),
            None => LuaError::Type(format!("attempt to concatenate {}", lhs_ty)),
        }
    }

    /// `"attempt to index ? (a <type> value) with key '<k>'"` (§6).
    pub fn index(ty: &str, key: &str) -> Self {
        LuaError::Type(format!(
            "attempt to index ? (a {} value) with key '{}'",
            ty, key
        ))
    }

    /// `"attempt to call a <type> value"` (§6).
    pub fn call(ty: &str) -> Self {
        LuaError::Type(format!("attempt to call a {} value", ty))
    }

    /// `"bad argument #<i> (<expected> expected, got <type>)"` (§6).
    pub fn bad_argument(index: usize, expected: &str, got: &str) -> Self {
        LuaError::Arg {
            index,
            message: format!("bad argument #{} ({} expected, got {})", index, expected, got),
        }
    }
}

impl fmt::Display for LuaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LuaError::Type(msg) => write!(f, "{}", msg),
            LuaError::Arg { message, .. } => write!(f, "{}", message),
            LuaError::ProtectedMetatable => write!(f, "cannot change a protected metatable"),
            LuaError::Loop(what) => write!(f, "loop in {}", what),
            LuaError::Runtime(v) => write!(f, "{}", v),
        }
    }
}

impl std::error::Error for LuaError {}

pub type LuaResult<T> = Result<T, LuaError>;
