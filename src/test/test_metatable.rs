use crate::context::LuaContext;
use crate::error::LuaResult;
use crate::metatable::{equals, get_metamethod, index_get, index_set, TmKind};
use crate::table::LuaTable;
use crate::value::{CallOutcome, LuaValue, NativeFunction};

fn call_identity(f: &LuaValue, args: &[LuaValue]) -> LuaResult<Vec<LuaValue>> {
    let LuaValue::Function(callable) = f else {
        panic!("expected a function metamethod");
    };
    match callable.call(args)? {
        CallOutcome::Return(v) => Ok(v),
        CallOutcome::TailCall(..) => panic!("test metamethods never tail-call"),
    }
}

#[test]
fn index_falls_through_a_table_metatable_chain() {
    let base = LuaTable::new();
    base.borrow_mut()
        .raw_set(LuaValue::string("greeting"), LuaValue::string("hi"))
        .unwrap();

    let mt = LuaTable::new();
    mt.borrow_mut()
        .raw_set(LuaValue::string("__index"), LuaValue::Table(base))
        .unwrap();

    let child = LuaTable::new();
    child.borrow_mut().set_metatable(Some(mt)).unwrap();

    let ctx = LuaContext::new();
    let result = index_get(
        &ctx,
        LuaValue::Table(child),
        &LuaValue::string("greeting"),
        call_identity,
    )
    .unwrap();
    assert_eq!(result.as_str(), Some("hi"));
}

#[test]
fn index_calls_a_function_metamethod() {
    let mt = LuaTable::new();
    let handler = NativeFunction::new("__index", |args: &[LuaValue]| {
        Ok(CallOutcome::Return(vec![LuaValue::string(format!(
            "computed:{}",
            args[1].to_debug_string()
        ))]))
    });
    mt.borrow_mut()
        .raw_set(LuaValue::string("__index"), LuaValue::Function(handler))
        .unwrap();
    let t = LuaTable::new();
    t.borrow_mut().set_metatable(Some(mt)).unwrap();

    let ctx = LuaContext::new();
    let result = index_get(&ctx, LuaValue::Table(t), &LuaValue::string("x"), call_identity).unwrap();
    assert_eq!(result.as_str(), Some("computed:x"));
}

#[test]
fn newindex_function_metamethod_intercepts_raw_set() {
    let log = LuaTable::new();
    let mt = LuaTable::new();
    let log_for_closure = log.clone();
    let handler = NativeFunction::new("__newindex", move |args: &[LuaValue]| {
        log_for_closure
            .borrow_mut()
            .raw_set(args[1].clone(), args[2].clone())
            .unwrap();
        Ok(CallOutcome::Return(vec![]))
    });
    mt.borrow_mut()
        .raw_set(LuaValue::string("__newindex"), LuaValue::Function(handler))
        .unwrap();
    let t = LuaTable::new();
    t.borrow_mut().set_metatable(Some(mt)).unwrap();

    let ctx = LuaContext::new();
    index_set(
        &ctx,
        LuaValue::Table(t.clone()),
        LuaValue::string("k"),
        LuaValue::Int(7),
        call_identity,
    )
    .unwrap();

    assert!(t.borrow().raw_get_str("k").is_nil());
    assert_eq!(log.borrow().raw_get_str("k").to_i64(), 7);
}

#[test]
fn eq_only_consults_metamethod_for_same_kind_reference_values() {
    let mt = LuaTable::new();
    let handler = NativeFunction::new("__eq", |_args: &[LuaValue]| {
        Ok(CallOutcome::Return(vec![LuaValue::Bool(true)]))
    });
    mt.borrow_mut()
        .raw_set(LuaValue::string("__eq"), LuaValue::Function(handler))
        .unwrap();

    let a = LuaTable::new();
    a.borrow_mut().set_metatable(Some(mt.clone())).unwrap();
    let b = LuaTable::new();
    b.borrow_mut().set_metatable(Some(mt)).unwrap();

    let ctx = LuaContext::new();
    assert!(equals(&ctx, &LuaValue::Table(a), &LuaValue::Table(b), call_identity).unwrap());
    assert!(!equals(&ctx, &LuaValue::Int(1), &LuaValue::string("1"), call_identity).unwrap());
}

#[test]
fn eq_requires_eq_on_both_operands_and_the_same_function() {
    let handler_a = NativeFunction::new("__eq", |_args: &[LuaValue]| {
        Ok(CallOutcome::Return(vec![LuaValue::Bool(true)]))
    });
    let handler_b = NativeFunction::new("__eq", |_args: &[LuaValue]| {
        Ok(CallOutcome::Return(vec![LuaValue::Bool(true)]))
    });

    // `a` defines `__eq`, `b` has no metatable at all: must not consult it.
    let mt_a = LuaTable::new();
    mt_a.borrow_mut()
        .raw_set(LuaValue::string("__eq"), LuaValue::Function(handler_a.clone()))
        .unwrap();
    let a = LuaTable::new();
    a.borrow_mut().set_metatable(Some(mt_a.clone())).unwrap();
    let b = LuaTable::new();

    let ctx = LuaContext::new();
    assert!(!equals(&ctx, &LuaValue::Table(a.clone()), &LuaValue::Table(b.clone()), call_identity).unwrap());

    // Both define `__eq`, but as two distinct function objects: still false.
    let mt_b = LuaTable::new();
    mt_b.borrow_mut()
        .raw_set(LuaValue::string("__eq"), LuaValue::Function(handler_b))
        .unwrap();
    b.borrow_mut().set_metatable(Some(mt_b)).unwrap();
    assert!(!equals(&ctx, &LuaValue::Table(a.clone()), &LuaValue::Table(b.clone()), call_identity).unwrap());

    // Both share the identical function object: now it's consulted.
    b.borrow_mut().set_metatable(Some(mt_a)).unwrap();
    assert!(equals(&ctx, &LuaValue::Table(a), &LuaValue::Table(b), call_identity).unwrap());
}

#[test]
fn get_metamethod_returns_none_without_a_metatable() {
    let ctx = LuaContext::new();
    let t = LuaTable::new();
    assert!(get_metamethod(&ctx, &LuaValue::Table(t), TmKind::Index).is_none());
}
