//! String kernel (C3): the `LuaStr` handle, short-string interning,
//! number/string coercion, lexicographic comparison, and the
//! concatenation buffer used by the `..` operator for O(n) amortized
//! chains.
//!
//! Grounded on the teacher's `gc/string_interner.rs` (`StringInterner`)
//! and `lua_value/mod.rs` (`LuaString`, `StringPool`) — simplified to
//! drop the tri-color mark-sweep bookkeeping, since GC tuning is out of
//! scope (spec.md §1).

use ahash::RandomState;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// An immutable Lua string: an arbitrary byte sequence, not necessarily
/// valid UTF-8 (spec §3 "Lua strings are not Unicode"). `as_str` is the
/// only fallible accessor; everything else works directly on bytes.
#[derive(Clone)]
pub struct LuaStr(Rc<[u8]>);

impl LuaStr {
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl From<&str> for LuaStr {
    fn from(s: &str) -> Self {
        LuaStr(Rc::from(s.as_bytes()))
    }
}

impl From<String> for LuaStr {
    fn from(s: String) -> Self {
        LuaStr(Rc::from(s.into_bytes().into_boxed_slice()))
    }
}

impl From<&[u8]> for LuaStr {
    fn from(b: &[u8]) -> Self {
        LuaStr(Rc::from(b))
    }
}

impl From<Vec<u8>> for LuaStr {
    fn from(b: Vec<u8>) -> Self {
        LuaStr(Rc::from(b.into_boxed_slice()))
    }
}

impl From<Rc<[u8]>> for LuaStr {
    fn from(b: Rc<[u8]>) -> Self {
        LuaStr(b)
    }
}

impl PartialEq for LuaStr {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}
impl Eq for LuaStr {}

impl fmt::Display for LuaStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_lossy())
    }
}

impl fmt::Debug for LuaStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

/// Lexicographic comparison (byte-wise, per spec §4.3 — no locale
/// collation, matching reference Lua's default `strcoll`-free build).
pub fn compare_strings(a: &[u8], b: &[u8]) -> std::cmp::Ordering {
    a.cmp(b)
}

/// Strings up to this length are interned; longer strings are cheap
/// enough to allocate individually and not worth hashing on every
/// construction (mirrors the teacher's `short_string_limit`).
const SHORT_STRING_LIMIT: usize = 40;

/// Per-context short-string interner (§3 "Str", A2). Long strings are
/// never interned.
pub struct StringInterner {
    table: RefCell<HashMap<Box<str>, LuaStr, RandomState>>,
}

impl StringInterner {
    pub fn new() -> Self {
        StringInterner {
            table: RefCell::new(HashMap::with_hasher(RandomState::new())),
        }
    }

    pub fn intern(&self, s: &str) -> LuaStr {
        if s.len() > SHORT_STRING_LIMIT {
            return LuaStr::from(s);
        }
        if let Some(existing) = self.table.borrow().get(s) {
            return existing.clone();
        }
        let interned = LuaStr::from(s);
        self.table
            .borrow_mut()
            .insert(s.into(), interned.clone());
        interned
    }

    pub fn len(&self) -> usize {
        self.table.borrow().len()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a float the way reference Lua's `tostring`/`LUAI_NUMFFORMAT`
/// does (`"%.14g"`), with the special `nan`/`inf`/`-inf` spellings and
/// always printing a trailing `.0` for integral-valued floats so that
/// `tostring(1.0)` is distinguishable from `tostring(1)`.
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    let mut s = format!("{:.14e}", f);
    // Rust's `{:.14e}` always uses scientific notation; reformat through
    // `%.14g`-equivalent trimming for the common non-exponential range.
    if f == 0.0 {
        return if f.is_sign_negative() {
            "-0.0".to_string()
        } else {
            "0.0".to_string()
        };
    }
    let abs = f.abs();
    if (1e-4..1e15).contains(&abs) {
        s = format!("{}", f);
        if !s.contains('.') && !s.contains('e') && !s.contains("inf") && !s.contains("nan") {
            s.push_str(".0");
        }
        s
    } else {
        s
    }
}

/// Formats an integer the way reference Lua's `tostring` does (`"%d"`).
pub fn format_integer(i: i64) -> String {
    let mut buf = itoa::Buffer::new();
    buf.format(i).to_string()
}

/// Lua 5.2 string→number coercion (§4.2/§4.9): optional leading/trailing
/// whitespace, optional sign, decimal or `0x`-hex (integer or float),
/// case-insensitive. Returns `None` for anything else — coercion never
/// panics or errors, it simply fails (the caller decides whether that's
/// fatal, e.g. `check_number` vs. the debug `to_f64`/`to_i64` helpers).
pub fn parse_number(s: &str) -> Option<NumberToken> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let (sign, rest) = match s.as_bytes()[0] {
        b'+' => (1i64, &s[1..]),
        b'-' => (-1i64, &s[1..]),
        _ => (1i64, s),
    };
    if rest.is_empty() {
        return None;
    }
    if let Some(hex) = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
    {
        return parse_hex(hex, sign);
    }
    if let Ok(i) = rest.parse::<i64>() {
        return Some(NumberToken::Int(sign * i));
    }
    if let Ok(f) = rest.parse::<f64>() {
        if rest.chars().all(|c| c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || c == '+' || c == '-') {
            return Some(NumberToken::Float(sign as f64 * f));
        }
    }
    None
}

fn parse_hex(rest: &str, sign: i64) -> Option<NumberToken> {
    if rest.contains('.') || rest.to_ascii_lowercase().contains('p') {
        // Hex float: parse mantissa/exponent manually (Rust's f64::from_str
        // doesn't accept hex floats).
        return parse_hex_float(rest).map(|f| NumberToken::Float(sign as f64 * f));
    }
    u64::from_str_radix(rest, 16)
        .ok()
        .map(|u| NumberToken::Int(sign.wrapping_mul(u as i64)))
}

fn parse_hex_float(rest: &str) -> Option<f64> {
    let lower = rest.to_ascii_lowercase();
    let (mantissa_str, exp_str) = match lower.split_once('p') {
        Some((m, e)) => (m, Some(e)),
        None => (lower.as_str(), None),
    };
    let (int_part, frac_part) = match mantissa_str.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa_str, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let mut value = 0.0f64;
    for c in int_part.chars() {
        value = value * 16.0 + c.to_digit(16)? as f64;
    }
    let mut scale = 1.0 / 16.0;
    for c in frac_part.chars() {
        value += c.to_digit(16)? as f64 * scale;
        scale /= 16.0;
    }
    let exp: i32 = match exp_str {
        Some(e) => e.parse().ok()?,
        None => 0,
    };
    Some(value * 2f64.powi(exp))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberToken {
    Int(i64),
    Float(f64),
}

pub fn parse_number_int(s: &str) -> Option<i64> {
    match parse_number(s)? {
        NumberToken::Int(i) => Some(i),
        NumberToken::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(f as i64),
        NumberToken::Float(_) => None,
    }
}

pub fn parse_number_float(s: &str) -> Option<f64> {
    match parse_number(s)? {
        NumberToken::Int(i) => Some(i as f64),
        NumberToken::Float(f) => Some(f),
    }
}

/// Accumulates an O(n) amortized `..` chain (§4.3 "ConcatBuffer") before
/// the operator surface folds it down to a single `LuaValue`.
pub struct ConcatBuffer {
    parts: Vec<u8>,
}

impl ConcatBuffer {
    pub fn new() -> Self {
        ConcatBuffer { parts: Vec::new() }
    }

    pub fn append(&mut self, s: &str) {
        self.parts.extend_from_slice(s.as_bytes());
    }

    pub fn append_bytes(&mut self, b: &[u8]) {
        self.parts.extend_from_slice(b);
    }

    pub fn prepend(&mut self, s: &str) {
        let mut buf = Vec::with_capacity(s.len() + self.parts.len());
        buf.extend_from_slice(s.as_bytes());
        buf.extend_from_slice(&self.parts);
        self.parts = buf;
    }

    pub fn value(&self) -> LuaStr {
        LuaStr::from(self.parts.clone())
    }

    pub fn clear(&mut self) {
        self.parts.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl Default for ConcatBuffer {
    fn default() -> Self {
        Self::new()
    }
}
