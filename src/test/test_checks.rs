use crate::checks;
use crate::value::LuaValue;

#[test]
fn check_integer_accepts_integral_floats_and_numeric_strings() {
    let args = vec![LuaValue::Float(3.0), LuaValue::string("42")];
    assert_eq!(checks::check_integer(&args, 1).unwrap(), 3);
    assert_eq!(checks::check_integer(&args, 2).unwrap(), 42);
}

#[test]
fn check_integer_rejects_fractional_floats() {
    let args = vec![LuaValue::Float(3.5)];
    assert!(checks::check_integer(&args, 1).is_err());
}

#[test]
fn check_integer_error_message_names_the_argument_index() {
    let args = vec![LuaValue::string("not a number")];
    let err = checks::check_integer(&args, 1).unwrap_err();
    assert_eq!(err.to_string(), "bad argument #1 (number expected, got string)");
}

#[test]
fn optional_integer_falls_back_to_the_default_on_nil() {
    let args = vec![LuaValue::Nil];
    assert_eq!(checks::optional_integer(&args, 1, 7).unwrap(), 7);
}

#[test]
fn optional_integer_still_type_checks_a_present_argument() {
    let args = vec![LuaValue::string("oops")];
    assert!(checks::optional_integer(&args, 1, 7).is_err());
}

#[test]
fn check_string_coerces_numbers() {
    let args = vec![LuaValue::Int(42)];
    assert_eq!(checks::check_string(&args, 1).unwrap(), "42");
}

#[test]
fn check_table_rejects_non_tables() {
    let args = vec![LuaValue::Int(1)];
    let err = checks::check_table(&args, 1).unwrap_err();
    assert_eq!(err.to_string(), "bad argument #1 (table expected, got number)");
}

#[test]
fn missing_trailing_argument_reads_as_nil() {
    let args: Vec<LuaValue> = vec![];
    let err = checks::check_string(&args, 1).unwrap_err();
    assert_eq!(err.to_string(), "bad argument #1 (string expected, got nil)");
}
