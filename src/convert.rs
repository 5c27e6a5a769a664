//! `FromLua`/`IntoLua` (A3): thin convenience conversions between native
//! Rust types and `LuaValue`, for embedders. Grounded on the teacher's
//! `lua_value/lua_convert.rs`; not part of spec.md's required surface,
//! but ambient scaffolding every crate in this family ships.

use crate::value::LuaValue;

pub trait IntoLua {
    fn into_lua(self) -> LuaValue;
}

pub trait FromLua: Sized {
    fn from_lua(value: &LuaValue) -> Option<Self>;
}

impl IntoLua for LuaValue {
    fn into_lua(self) -> LuaValue {
        self
    }
}

impl FromLua for LuaValue {
    fn from_lua(value: &LuaValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl IntoLua for () {
    fn into_lua(self) -> LuaValue {
        LuaValue::Nil
    }
}

impl IntoLua for bool {
    fn into_lua(self) -> LuaValue {
        LuaValue::Bool(self)
    }
}

impl FromLua for bool {
    fn from_lua(value: &LuaValue) -> Option<Self> {
        Some(value.is_truthy())
    }
}

macro_rules! int_conv {
    ($($t:ty),*) => {
        $(
            impl IntoLua for $t {
                fn into_lua(self) -> LuaValue {
                    LuaValue::Int(self as i64)
                }
            }
            impl FromLua for $t {
                fn from_lua(value: &LuaValue) -> Option<Self> {
                    value.as_integer().map(|i| i as $t)
                }
            }
        )*
    };
}
int_conv!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_conv {
    ($($t:ty),*) => {
        $(
            impl IntoLua for $t {
                fn into_lua(self) -> LuaValue {
                    LuaValue::Float(self as f64)
                }
            }
            impl FromLua for $t {
                fn from_lua(value: &LuaValue) -> Option<Self> {
                    value.as_float().map(|f| f as $t)
                }
            }
        )*
    };
}
float_conv!(f32, f64);

impl IntoLua for String {
    fn into_lua(self) -> LuaValue {
        LuaValue::string(self)
    }
}

impl IntoLua for &str {
    fn into_lua(self) -> LuaValue {
        LuaValue::string(self)
    }
}

impl FromLua for String {
    fn from_lua(value: &LuaValue) -> Option<Self> {
        value.as_str().map(|s| s.to_string())
    }
}

impl<T: IntoLua> IntoLua for Option<T> {
    fn into_lua(self) -> LuaValue {
        match self {
            Some(v) => v.into_lua(),
            None => LuaValue::Nil,
        }
    }
}

impl<T: FromLua> FromLua for Option<T> {
    fn from_lua(value: &LuaValue) -> Option<Self> {
        if value.is_nil() {
            Some(None)
        } else {
            T::from_lua(value).map(Some)
        }
    }
}

/// Multiple return values (§4.7): a `Vec<T>` spreads into/gathers from
/// the call's full result list rather than a single `LuaValue`.
impl<T: IntoLua> IntoLua for Vec<T> {
    fn into_lua(self) -> LuaValue {
        // A Vec collapses to its first value when used as a single
        // LuaValue; callers that want true multi-return should use
        // the Vec<LuaValue> directly as a call result list instead.
        self.into_iter()
            .next()
            .map(IntoLua::into_lua)
            .unwrap_or(LuaValue::Nil)
    }
}
