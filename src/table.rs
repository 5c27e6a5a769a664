//! Table kernel (C4, spec §4.4): the hybrid array/hash aggregate.
//!
//! Grounded on the teacher's `lua_value/lua_table.rs` (`LuaTable`'s
//! array-then-hash layout, `get_int` fast path, `insert_array_at`/
//! `remove_array_at` fast-path append/pop) — the hash part uses
//! `hashbrown::HashMap` exactly as the teacher does (declared explicitly
//! in `Cargo.toml` here; see `DESIGN.md`).

use crate::error::{LuaError, LuaResult};
use crate::string_kernel::{ConcatBuffer, LuaStr};
use crate::value::{LuaValue, TableRef};
use hashbrown::HashMap;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

/// Declared reclamation intent for a table used as a weak-keyed/valued
/// collection (§4.4 "Weak mode"). Reclamation itself is a host GC's
/// job — out of scope (spec.md §1) — so this is an interface contract,
/// not an implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeakMode {
    #[default]
    None,
    Keys,
    Values,
    Both,
}

pub struct LuaTable {
    array: Vec<LuaValue>,
    hash: HashMap<LuaValue, LuaValue>,
    metatable: Option<TableRef>,
    weak_mode: WeakMode,
}

impl LuaTable {
    pub fn new() -> TableRef {
        Rc::new(RefCell::new(LuaTable {
            array: Vec::new(),
            hash: HashMap::new(),
            metatable: None,
            weak_mode: WeakMode::None,
        }))
    }

    pub fn with_capacity(array_cap: usize, hash_cap: usize) -> TableRef {
        Rc::new(RefCell::new(LuaTable {
            array: Vec::with_capacity(array_cap),
            hash: HashMap::with_capacity(hash_cap),
            metatable: None,
            weak_mode: WeakMode::None,
        }))
    }

    // ============ Metatable ============

    pub fn metatable(&self) -> Option<TableRef> {
        self.metatable.clone()
    }

    /// `set_metatable` (§4.4): refuses when the current metatable has a
    /// non-nil `__metatable` field (§6 "cannot change a protected
    /// metatable").
    pub fn set_metatable(&mut self, metatable: Option<TableRef>) -> LuaResult<()> {
        if let Some(current) = &self.metatable {
            let protect = current
                .borrow()
                .raw_get(&LuaValue::string("__metatable"));
            if !protect.is_nil() {
                return Err(LuaError::ProtectedMetatable);
            }
        }
        self.metatable = metatable;
        Ok(())
    }

    pub fn weak_mode(&self) -> WeakMode {
        self.weak_mode
    }

    pub fn set_weak_mode(&mut self, mode: WeakMode) {
        self.weak_mode = mode;
    }

    // ============ Raw access (no metamethods) ============

    fn array_index(&self, i: i64) -> Option<usize> {
        if i >= 1 && (i as usize) <= self.array.len() {
            Some((i - 1) as usize)
        } else {
            None
        }
    }

    pub fn raw_get(&self, key: &LuaValue) -> LuaValue {
        if let Some(i) = key.as_integer() {
            if let Some(idx) = self.array_index(i) {
                return self.array[idx].clone();
            }
        }
        self.hash
            .get(&key.normalized_key())
            .cloned()
            .unwrap_or(LuaValue::Nil)
    }

    pub fn raw_get_str(&self, key: &str) -> LuaValue {
        self.raw_get(&LuaValue::string(key))
    }

    pub fn raw_get_int(&self, i: i64) -> LuaValue {
        self.raw_get(&LuaValue::Int(i))
    }

    /// `rawset` (§4.4): `nil` and `NaN` keys are rejected with the exact
    /// reference-Lua error messages.
    pub fn raw_set(&mut self, key: LuaValue, value: LuaValue) -> LuaResult<()> {
        if key.is_nil() {
            return Err(LuaError::type_error("table index is nil"));
        }
        if let LuaValue::Float(f) = &key {
            if f.is_nan() {
                return Err(LuaError::type_error("table index is NaN"));
            }
        }
        if let Some(i) = key.as_integer() {
            self.set_int(i, value);
            return Ok(());
        }
        self.set_in_hash(key.normalized_key(), value);
        Ok(())
    }

    fn set_int(&mut self, i: i64, value: LuaValue) {
        if let Some(idx) = self.array_index(i) {
            if value.is_nil() && idx == self.array.len() - 1 {
                self.array.pop();
                while matches!(self.array.last(), Some(v) if v.is_nil()) {
                    self.array.pop();
                }
            } else {
                self.array[idx] = value;
            }
            return;
        }
        if i >= 1 && (i as usize) == self.array.len() + 1 && !value.is_nil() {
            self.array.push(value);
            // Migrate any contiguous successors already sitting in the hash part.
            let mut next = self.array.len() as i64 + 1;
            while let Some(v) = self.hash.remove(&LuaValue::Int(next)) {
                self.array.push(v);
                next += 1;
            }
            return;
        }
        self.set_in_hash(LuaValue::Int(i), value);
    }

    fn set_in_hash(&mut self, key: LuaValue, value: LuaValue) {
        if value.is_nil() {
            self.hash.remove(&key);
        } else {
            self.hash.insert(key, value);
        }
    }

    /// `#t` (§4.4 "Length"/"border"): any index `n` such that `t[n]` is
    /// non-nil and `t[n+1]` is nil. With a dense array part this is
    /// simply its length.
    pub fn length(&self) -> i64 {
        if !self.array.is_empty() {
            return self.array.len() as i64;
        }
        if self.hash.is_empty() {
            return 0;
        }
        // Sparse/hash-only table: binary search for a border (§4.4).
        let mut i: i64 = 0;
        let mut j: i64 = 1;
        while !self.raw_get_int(j).is_nil() {
            i = j;
            if j > i64::MAX / 2 {
                // degrade to linear scan to avoid overflow
                let mut n = i;
                while !self.raw_get_int(n + 1).is_nil() {
                    n += 1;
                }
                return n;
            }
            j *= 2;
        }
        while j - i > 1 {
            let m = (i + j) / 2;
            if self.raw_get_int(m).is_nil() {
                j = m;
            } else {
                i = m;
            }
        }
        i
    }

    /// `next(t, key)` (§4.4): iterates the array part in order, then the
    /// hash part in unspecified-but-stable order. `key == nil` starts
    /// iteration; `Ok(None)` signals exhaustion.
    pub fn next(&self, key: &LuaValue) -> LuaResult<Option<(LuaValue, LuaValue)>> {
        if key.is_nil() {
            if let Some((idx, v)) = first_non_nil(&self.array) {
                return Ok(Some((LuaValue::Int(idx as i64 + 1), v.clone())));
            }
            return Ok(self.first_hash_entry());
        }
        if let Some(i) = key.as_integer() {
            if let Some(idx) = self.array_index(i) {
                if let Some((off, v)) = first_non_nil(&self.array[idx + 1..]) {
                    return Ok(Some((LuaValue::Int((idx + 1 + off) as i64 + 1), v.clone())));
                }
                return Ok(self.first_hash_entry());
            }
        }
        self.next_hash_entry(&key.normalized_key())
    }

    fn first_hash_entry(&self) -> Option<(LuaValue, LuaValue)> {
        self.hash.iter().next().map(|(k, v)| (k.clone(), v.clone()))
    }

    fn next_hash_entry(&self, key: &LuaValue) -> LuaResult<Option<(LuaValue, LuaValue)>> {
        let mut iter = self.hash.iter();
        for (k, _) in iter.by_ref() {
            if k == key {
                return Ok(iter.next().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        Err(LuaError::type_error("invalid key to 'next'"))
    }

    pub fn array_len(&self) -> usize {
        self.array.len()
    }

    pub fn iter_array(&self) -> impl Iterator<Item = &LuaValue> {
        self.array.iter()
    }

    /// `table.insert(list, [pos,] value)` (§4.4): default `pos` is
    /// `#list + 1` (append). Shifts `[pos, #list]` up by one.
    pub fn insert(&mut self, pos: Option<i64>, value: LuaValue) -> LuaResult<()> {
        let len = self.length();
        let pos = pos.unwrap_or(len + 1);
        if pos < 1 || pos > len + 1 {
            return Err(LuaError::type_error("bad argument #2 to 'insert' (position out of bounds)"));
        }
        let mut i = len + 1;
        while i > pos {
            let v = self.raw_get_int(i - 1);
            self.raw_set(LuaValue::Int(i), v)?;
            i -= 1;
        }
        self.raw_set(LuaValue::Int(pos), value)
    }

    /// `table.remove(list, [pos])` (§4.4): default `pos` is `#list`.
    /// Shifts `[pos+1, #list]` down by one and returns the removed value
    /// (`nil` for an empty list).
    pub fn remove(&mut self, pos: Option<i64>) -> LuaResult<LuaValue> {
        let len = self.length();
        if len == 0 {
            return Ok(LuaValue::Nil);
        }
        let pos = pos.unwrap_or(len);
        if pos < 1 || pos > len + 1 {
            return Err(LuaError::type_error("bad argument #2 to 'remove' (position out of bounds)"));
        }
        if pos == len + 1 {
            return Ok(LuaValue::Nil);
        }
        let removed = self.raw_get_int(pos);
        let mut i = pos;
        while i < len {
            let v = self.raw_get_int(i + 1);
            self.raw_set(LuaValue::Int(i), v)?;
            i += 1;
        }
        self.raw_set(LuaValue::Int(len), LuaValue::Nil)?;
        Ok(removed)
    }

    /// `table.sort(list, [comp])` (§4.4): sorts the dense `[1, #list]`
    /// range in place with `less_than(a, b)` standing in for `comp` (or
    /// `<` with metamethod, from the caller). A `less_than` that errors
    /// mid-sort (or that isn't a strict weak order) never panics: the
    /// first error short-circuits the rest of the comparisons and is
    /// returned once sorting finishes; a non-strict-weak-order
    /// comparator simply yields an unspecified (but not incorrect) final
    /// order, matching spec.md's "must not panic" contract.
    pub fn sort(
        &mut self,
        mut less_than: impl FnMut(&LuaValue, &LuaValue) -> LuaResult<bool>,
    ) -> LuaResult<()> {
        let len = self.length().max(0) as usize;
        if len > self.array.len() {
            // Sparse/hash-backed sequence: not supported without a materialized
            // array part (spec.md scopes sort to dense sequences, §4.4 "border").
            return Err(LuaError::type_error("table.sort requires a dense array part"));
        }
        let mut err = None;
        self.array[..len].sort_by(|a, b| {
            if err.is_some() {
                return Ordering::Equal;
            }
            match less_than(a, b) {
                Ok(true) => Ordering::Less,
                Ok(false) => Ordering::Greater,
                Err(e) => {
                    err = Some(e);
                    Ordering::Equal
                }
            }
        });
        match err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// `table.concat(list, sep, i, j)` (§4.4/§4.3): joins `list[i..=j]`
    /// with `sep` between elements. Every element in range must be a
    /// string or number (§6 "invalid value ... in table for 'concat'").
    pub fn concat(&self, sep: &str, i: i64, j: i64) -> LuaResult<LuaStr> {
        let mut buf = ConcatBuffer::new();
        let mut k = i;
        let mut first = true;
        while k <= j {
            if !first {
                buf.append(sep);
            }
            first = false;
            match self.raw_get_int(k) {
                LuaValue::Str(s) => buf.append_bytes(s.as_bytes()),
                v @ (LuaValue::Int(_) | LuaValue::Float(_)) => buf.append(&v.to_debug_string()),
                other => {
                    return Err(LuaError::type_error(format!(
                        "invalid value ({}) at index {} in table for 'concat'",
                        other.type_name(),
                        k
                    )));
                }
            }
            k += 1;
        }
        Ok(buf.value())
    }

    /// `table.unpack(list, i, j)` (§4.4/C7): `list[i..=j]` as a plain
    /// `Vec`, the varargs-producing shape the operator surface's `call`
    /// expects for a multi-return.
    pub fn unpack(&self, i: i64, j: i64) -> Vec<LuaValue> {
        if i > j {
            return Vec::new();
        }
        let mut out = Vec::with_capacity((j - i + 1) as usize);
        let mut k = i;
        while k <= j {
            out.push(self.raw_get_int(k));
            k += 1;
        }
        out
    }
}

fn first_non_nil(slice: &[LuaValue]) -> Option<(usize, &LuaValue)> {
    slice.iter().enumerate().find(|(_, v)| !v.is_nil())
}

impl Default for LuaTable {
    fn default() -> Self {
        LuaTable {
            array: Vec::new(),
            hash: HashMap::new(),
            metatable: None,
            weak_mode: WeakMode::None,
        }
    }
}
