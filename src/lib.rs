//! Core value model and operator semantics for a Lua 5.2 runtime:
//! tagged values, arithmetic/comparison/metamethod dispatch, tables,
//! and the call protocol. No bytecode interpreter, stdlib, parser, or
//! GC lives here — see each module's doc comment for its exact scope.

pub mod checks;
pub mod context;
pub mod convert;
pub mod error;
pub mod metatable;
pub mod number;
pub mod ops;
#[cfg(feature = "serde")]
mod serde_support;
pub mod string_kernel;
pub mod table;
pub mod trampoline;
pub mod value;
pub mod varargs;

#[cfg(test)]
mod test;

pub use context::LuaContext;
pub use convert::{FromLua, IntoLua};
pub use error::{LuaError, LuaResult};
pub use table::{LuaTable, WeakMode};
pub use value::{LuaValue, LuaValueKind};
pub use varargs::Varargs;
