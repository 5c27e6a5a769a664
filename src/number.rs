//! Arithmetic kernel (C2, spec §4.2): `+ - * / % ^` and unary minus over
//! the `Int`/`Float` numeric subtypes, with Lua's int/float promotion
//! and coercion rules. Grounded on the teacher's
//! `lua_vm/execute/arithmetic_instructions.rs` (`exec_add`/`exec_div`/
//! `exec_mod`/`exec_pow`/`exec_unm`), reworked as total functions over
//! an extracted `Num` pair instead of register-file opcodes.

use crate::value::LuaValue;

/// A value known to be numeric, after coercion (including numeric
/// strings, which Lua's arithmetic operators accept — §4.2 "Coercion").
#[derive(Debug, Clone, Copy)]
pub enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    pub fn coerce(v: &LuaValue) -> Option<Num> {
        match v {
            LuaValue::Int(i) => Some(Num::Int(*i)),
            LuaValue::Float(f) => Some(Num::Float(*f)),
            LuaValue::Str(s) => match crate::string_kernel::parse_number(s.as_str()?)? {
                crate::string_kernel::NumberToken::Int(i) => Some(Num::Int(i)),
                crate::string_kernel::NumberToken::Float(f) => Some(Num::Float(f)),
            },
            _ => None,
        }
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }

    #[inline]
    pub fn into_value(self) -> LuaValue {
        match self {
            Num::Int(i) => LuaValue::Int(i),
            Num::Float(f) => LuaValue::Float(f),
        }
    }
}

/// `a + b`. Int/int overflow widens to float (§4.2 "widening") rather
/// than wrapping, unlike the teacher's register VM which wraps for
/// speed and relies on Lua's defined wraparound semantics — here we
/// follow spec.md's explicit widening rule instead.
pub fn add(a: Num, b: Num) -> Num {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => match x.checked_add(y) {
            Some(r) => Num::Int(r),
            None => Num::Float(x as f64 + y as f64),
        },
        _ => Num::Float(a.as_f64() + b.as_f64()),
    }
}

pub fn sub(a: Num, b: Num) -> Num {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => match x.checked_sub(y) {
            Some(r) => Num::Int(r),
            None => Num::Float(x as f64 - y as f64),
        },
        _ => Num::Float(a.as_f64() - b.as_f64()),
    }
}

pub fn mul(a: Num, b: Num) -> Num {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => match x.checked_mul(y) {
            Some(r) => Num::Int(r),
            None => Num::Float(x as f64 * y as f64),
        },
        _ => Num::Float(a.as_f64() * b.as_f64()),
    }
}

/// `/` always produces a float, even for `Int`/`Int` operands (§4.2 —
/// reference Lua 5.2's single `/` is float division; `//` does not
/// exist until 5.3, so this is the only division operator in scope).
pub fn div(a: Num, b: Num) -> Num {
    Num::Float(a.as_f64() / b.as_f64())
}

/// `%`, Lua's floored modulo: the result has the same sign as the
/// divisor (or is zero), unlike Rust's `%`/`f64::rem` which follows the
/// dividend's sign. §8 scenario: `mod(5,3)==2`, `mod(-5,3)==1`,
/// `mod(5,-3)==-1`.
pub fn modulo(a: Num, b: Num) -> Num {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => {
            if y == 0 {
                return Num::Float(f64::NAN); // caller turns div-by-zero into an error before this is reached
            }
            // `i64::MIN % -1` overflows the corresponding division and
            // panics under Rust's checked remainder; widen to float like
            // every other operator in this module does on overflow.
            match x.checked_rem(y) {
                Some(r) => Num::Int(if r != 0 && (r < 0) != (y < 0) { r + y } else { r }),
                None => {
                    let (xf, yf) = (x as f64, y as f64);
                    let r = xf % yf;
                    Num::Float(if r != 0.0 && (r < 0.0) != (yf < 0.0) { r + yf } else { r })
                }
            }
        }
        _ => {
            let (x, y) = (a.as_f64(), b.as_f64());
            if y.is_infinite() && x.is_finite() {
                // Lua: `a % inf` is `a` if signs match, else `inf`'s sign.
                return Num::Float(if (x >= 0.0) == (y > 0.0) { x } else { y });
            }
            let r = x % y;
            Num::Float(if r != 0.0 && (r < 0.0) != (y < 0.0) { r + y } else { r })
        }
    }
}

/// Floor division as used internally by [`modulo`]'s int path and
/// exposed for completeness; spec.md's operator surface does not expose
/// `//` directly (5.2 has no floor-division operator), this backs `%`.
pub fn floor_div_int(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// `^` is always float exponentiation (§4.2), matching reference Lua.
pub fn pow(a: Num, b: Num) -> Num {
    Num::Float(a.as_f64().powf(b.as_f64()))
}

/// Unary minus. `Int::MIN` negates to itself under two's complement, so
/// it promotes to float (§4.2 "INT_MIN negation promotes to double").
pub fn unm(a: Num) -> Num {
    match a {
        Num::Int(i) => match i.checked_neg() {
            Some(r) => Num::Int(r),
            None => Num::Float(-(i as f64)),
        },
        Num::Float(f) => Num::Float(-f),
    }
}

/// Numeric equality across `Int`/`Float` (§4.1): compares mathematical
/// value, not representation.
pub fn num_eq(a: Num, b: Num) -> bool {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => x == y,
        _ => a.as_f64() == b.as_f64(),
    }
}

pub fn num_lt(a: Num, b: Num) -> bool {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => x < y,
        _ => a.as_f64() < b.as_f64(),
    }
}

pub fn num_le(a: Num, b: Num) -> bool {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => x <= y,
        _ => a.as_f64() <= b.as_f64(),
    }
}
