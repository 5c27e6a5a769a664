use crate::value::LuaValue;
use crate::varargs::Varargs;

#[test]
fn arg_is_one_indexed_and_nil_past_the_end() {
    let va = Varargs::new(vec![LuaValue::Int(1), LuaValue::Int(2)]);
    assert_eq!(va.arg(1).to_i64(), 1);
    assert_eq!(va.arg(2).to_i64(), 2);
    assert!(va.arg(3).is_nil());
    assert!(va.arg(0).is_nil());
}

#[test]
fn narg_counts_the_full_list() {
    let va = Varargs::new(vec![LuaValue::Nil, LuaValue::Nil]);
    assert_eq!(va.narg(), 2);
}

#[test]
fn sub_args_returns_the_tail_from_k() {
    let va = Varargs::new(vec![LuaValue::Int(1), LuaValue::Int(2), LuaValue::Int(3)]);
    let tail = va.sub_args(2);
    assert_eq!(tail.narg(), 2);
    assert_eq!(tail.arg(1).to_i64(), 2);
    assert_eq!(tail.arg(2).to_i64(), 3);
}

#[test]
fn sub_args_past_the_end_is_empty() {
    let va = Varargs::new(vec![LuaValue::Int(1)]);
    assert!(va.sub_args(5).is_empty());
}

#[test]
fn display_renders_as_a_parenthesized_list() {
    let va = Varargs::new(vec![LuaValue::Int(1), LuaValue::string("x")]);
    assert_eq!(va.to_string(), "(1,x)");
}
