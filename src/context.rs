//! Execution context (A2): per-type metatable slots and the string
//! interner. One `LuaContext` is one isolated "universe" of metatable
//! state (spec.md §5, §9) — the Rust realization of the teacher's
//! process-wide globals, scoped down so two contexts never interfere.

use crate::string_kernel::{LuaStr, StringInterner};
use crate::value::{LuaValue, LuaValueKind, TableRef};

/// `LuaContext` is intentionally `!Sync`: its `Rc`/`RefCell` state must
/// never be touched from two threads at once (spec.md §5).
pub struct LuaContext {
    nil_mt: Option<TableRef>,
    boolean_mt: Option<TableRef>,
    number_mt: Option<TableRef>,
    string_mt: Option<TableRef>,
    function_mt: Option<TableRef>,
    thread_mt: Option<TableRef>,
    interner: StringInterner,
}

impl LuaContext {
    pub fn new() -> Self {
        LuaContext {
            nil_mt: None,
            boolean_mt: None,
            number_mt: None,
            string_mt: None,
            function_mt: None,
            thread_mt: None,
            interner: StringInterner::new(),
        }
    }

    pub fn intern(&self, s: &str) -> LuaStr {
        self.interner.intern(s)
    }

    /// Resolves the metatable that would govern operators on `value`:
    /// per-instance for `Table`/`Userdata`, per-context per-type slot
    /// for every other kind (§3 "Metatable").
    pub fn metatable_for(&self, value: &LuaValue) -> Option<TableRef> {
        match value {
            LuaValue::Table(t) => t.borrow().metatable(),
            LuaValue::Userdata(u) => u.metatable(),
            _ => self.type_metatable(value.kind()).clone(),
        }
    }

    pub fn type_metatable(&self, kind: LuaValueKind) -> &Option<TableRef> {
        match kind {
            LuaValueKind::Nil => &self.nil_mt,
            LuaValueKind::Boolean => &self.boolean_mt,
            LuaValueKind::Integer | LuaValueKind::Float => &self.number_mt,
            LuaValueKind::String => &self.string_mt,
            LuaValueKind::Function => &self.function_mt,
            LuaValueKind::Thread => &self.thread_mt,
            LuaValueKind::Table | LuaValueKind::Userdata => {
                unreachable!("table/userdata carry per-instance metatables, not a type slot")
            }
        }
    }

    pub fn set_type_metatable(&mut self, kind: LuaValueKind, mt: Option<TableRef>) {
        match kind {
            LuaValueKind::Nil => self.nil_mt = mt,
            LuaValueKind::Boolean => self.boolean_mt = mt,
            LuaValueKind::Integer | LuaValueKind::Float => self.number_mt = mt,
            LuaValueKind::String => self.string_mt = mt,
            LuaValueKind::Function => self.function_mt = mt,
            LuaValueKind::Thread => self.thread_mt = mt,
            LuaValueKind::Table | LuaValueKind::Userdata => {
                panic!("table/userdata carry per-instance metatables, not a type slot")
            }
        }
    }
}

impl Default for LuaContext {
    fn default() -> Self {
        Self::new()
    }
}
