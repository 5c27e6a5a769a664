use crate::table::LuaTable;
use crate::value::LuaValue;

#[test]
fn array_part_fast_path_append_and_length() {
    let t = LuaTable::new();
    for i in 1..=5 {
        t.borrow_mut().raw_set(LuaValue::Int(i), LuaValue::Int(i * 10)).unwrap();
    }
    assert_eq!(t.borrow().length(), 5);
    assert_eq!(t.borrow().raw_get_int(3).to_i64(), 30);
}

#[test]
fn nil_key_is_rejected() {
    let t = LuaTable::new();
    let err = t.borrow_mut().raw_set(LuaValue::Nil, LuaValue::Int(1));
    assert!(err.is_err());
}

#[test]
fn nan_key_is_rejected() {
    let t = LuaTable::new();
    let err = t
        .borrow_mut()
        .raw_set(LuaValue::Float(f64::NAN), LuaValue::Int(1));
    assert!(err.is_err());
}

#[test]
fn setting_nil_at_the_array_tail_shrinks_it() {
    let t = LuaTable::new();
    t.borrow_mut().raw_set(LuaValue::Int(1), LuaValue::Int(1)).unwrap();
    t.borrow_mut().raw_set(LuaValue::Int(2), LuaValue::Int(2)).unwrap();
    t.borrow_mut().raw_set(LuaValue::Int(2), LuaValue::Nil).unwrap();
    assert_eq!(t.borrow().length(), 1);
}

#[test]
fn hash_part_stores_non_sequential_keys() {
    let t = LuaTable::new();
    t.borrow_mut()
        .raw_set(LuaValue::string("name"), LuaValue::string("lua"))
        .unwrap();
    assert_eq!(t.borrow().raw_get_str("name").as_str(), Some("lua"));
}

#[test]
fn protected_metatable_blocks_replacement() {
    let t = LuaTable::new();
    let mt = LuaTable::new();
    mt.borrow_mut()
        .raw_set(LuaValue::string("__metatable"), LuaValue::Bool(true))
        .unwrap();
    t.borrow_mut().set_metatable(Some(mt)).unwrap();
    let err = t.borrow_mut().set_metatable(None);
    assert!(err.is_err());
}

#[test]
fn insert_appends_by_default_and_shifts_at_a_position() {
    let t = LuaTable::new();
    t.borrow_mut().insert(None, LuaValue::Int(1)).unwrap();
    t.borrow_mut().insert(None, LuaValue::Int(2)).unwrap();
    t.borrow_mut().insert(Some(1), LuaValue::Int(0)).unwrap();
    assert_eq!(t.borrow().length(), 3);
    assert_eq!(t.borrow().raw_get_int(1).to_i64(), 0);
    assert_eq!(t.borrow().raw_get_int(2).to_i64(), 1);
    assert_eq!(t.borrow().raw_get_int(3).to_i64(), 2);
}

#[test]
fn remove_shifts_down_and_returns_the_removed_value() {
    let t = LuaTable::new();
    for i in 1..=3 {
        t.borrow_mut().raw_set(LuaValue::Int(i), LuaValue::Int(i * 10)).unwrap();
    }
    let removed = t.borrow_mut().remove(Some(1)).unwrap();
    assert_eq!(removed.to_i64(), 10);
    assert_eq!(t.borrow().length(), 2);
    assert_eq!(t.borrow().raw_get_int(1).to_i64(), 20);
    assert_eq!(t.borrow().raw_get_int(2).to_i64(), 30);
}

#[test]
fn remove_on_an_empty_table_returns_nil() {
    let t = LuaTable::new();
    assert!(t.borrow_mut().remove(None).unwrap().is_nil());
}

#[test]
fn sort_orders_the_array_part_with_a_custom_comparator() {
    let t = LuaTable::new();
    for v in [3, 1, 2] {
        t.borrow_mut().insert(None, LuaValue::Int(v)).unwrap();
    }
    t.borrow_mut()
        .sort(|a, b| Ok(a.to_i64() < b.to_i64()))
        .unwrap();
    assert_eq!(t.borrow().raw_get_int(1).to_i64(), 1);
    assert_eq!(t.borrow().raw_get_int(2).to_i64(), 2);
    assert_eq!(t.borrow().raw_get_int(3).to_i64(), 3);
}

#[test]
fn sort_propagates_a_comparator_error_without_panicking() {
    use crate::error::LuaError;
    let t = LuaTable::new();
    for v in [3, 1, 2] {
        t.borrow_mut().insert(None, LuaValue::Int(v)).unwrap();
    }
    let err = t
        .borrow_mut()
        .sort(|_, _| Err(LuaError::type_error("boom")))
        .unwrap_err();
    assert_eq!(err.to_string(), "boom");
}

#[test]
fn concat_joins_the_range_with_a_separator() {
    let t = LuaTable::new();
    t.borrow_mut().raw_set(LuaValue::Int(1), LuaValue::string("a")).unwrap();
    t.borrow_mut().raw_set(LuaValue::Int(2), LuaValue::Int(2)).unwrap();
    t.borrow_mut().raw_set(LuaValue::Int(3), LuaValue::string("c")).unwrap();
    let joined = t.borrow().concat(",", 1, 3).unwrap();
    assert_eq!(joined.to_string_lossy(), "a,2,c");
}

#[test]
fn concat_rejects_a_non_primitive_element() {
    let t = LuaTable::new();
    t.borrow_mut()
        .raw_set(LuaValue::Int(1), LuaValue::Table(LuaTable::new()))
        .unwrap();
    assert!(t.borrow().concat(",", 1, 1).is_err());
}

#[test]
fn unpack_returns_the_requested_range() {
    let t = LuaTable::new();
    for i in 1..=4 {
        t.borrow_mut().raw_set(LuaValue::Int(i), LuaValue::Int(i * 10)).unwrap();
    }
    let values = t.borrow().unpack(2, 3);
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].to_i64(), 20);
    assert_eq!(values[1].to_i64(), 30);
}

#[test]
fn next_walks_array_then_hash() {
    let t = LuaTable::new();
    t.borrow_mut().raw_set(LuaValue::Int(1), LuaValue::string("a")).unwrap();
    t.borrow_mut()
        .raw_set(LuaValue::string("k"), LuaValue::string("v"))
        .unwrap();

    let (k1, v1) = t.borrow().next(&LuaValue::Nil).unwrap().unwrap();
    assert_eq!(k1, LuaValue::Int(1));
    assert_eq!(v1.as_str(), Some("a"));

    let (k2, _v2) = t.borrow().next(&k1).unwrap().unwrap();
    assert_eq!(k2.as_str(), Some("k"));

    assert!(t.borrow().next(&k2).unwrap().is_none());
}
