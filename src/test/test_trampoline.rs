use crate::context::LuaContext;
use crate::error::LuaResult;
use crate::table::LuaTable;
use crate::trampoline::drive;
use crate::value::{CallOutcome, LuaCallable, LuaValue, NativeFunction};

struct CountDown;

impl LuaCallable for CountDown {
    fn call(&self, args: &[LuaValue]) -> LuaResult<CallOutcome> {
        let n = args[0].to_i64();
        if n <= 0 {
            return Ok(CallOutcome::Return(vec![LuaValue::Int(0)]));
        }
        Ok(CallOutcome::TailCall(
            LuaValue::Function(std::rc::Rc::new(CountDown)),
            vec![LuaValue::Int(n - 1)],
        ))
    }
}

#[test]
fn deep_tail_call_chains_resolve_without_recursing() {
    let ctx = LuaContext::new();
    let f = LuaValue::Function(std::rc::Rc::new(CountDown));
    let result = drive(&ctx, f, vec![LuaValue::Int(200_000)]).unwrap();
    assert_eq!(result[0].to_i64(), 0);
}

#[test]
fn plain_return_short_circuits_the_loop() {
    let ctx = LuaContext::new();
    let f = NativeFunction::new("id", |args: &[LuaValue]| {
        Ok(CallOutcome::Return(args.to_vec()))
    });
    let result = drive(&ctx, LuaValue::Function(f), vec![LuaValue::Int(9)]).unwrap();
    assert_eq!(result[0].to_i64(), 9);
}

#[test]
fn call_metamethod_resolves_a_callable_table() {
    let ctx = LuaContext::new();
    let mt = LuaTable::new();
    let handler = NativeFunction::new("__call", |args: &[LuaValue]| {
        // args[0] is the table itself (the receiver); echo the rest.
        Ok(CallOutcome::Return(vec![args[1].clone()]))
    });
    mt.borrow_mut()
        .raw_set(LuaValue::string("__call"), LuaValue::Function(handler))
        .unwrap();
    let callable_table = LuaTable::new();
    callable_table.borrow_mut().set_metatable(Some(mt)).unwrap();

    let result = drive(
        &ctx,
        LuaValue::Table(callable_table),
        vec![LuaValue::string("payload")],
    )
    .unwrap();
    assert_eq!(result[0].as_str(), Some("payload"));
}

#[test]
fn calling_a_non_callable_value_errors() {
    let ctx = LuaContext::new();
    let err = drive(&ctx, LuaValue::Int(5), vec![]).unwrap_err();
    assert_eq!(err.to_string(), "attempt to call a number value");
}
