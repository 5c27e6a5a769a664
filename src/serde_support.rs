//! Optional `serde::Serialize` for `LuaValue` (feature `serde`), for
//! embedders that want to hand a result table to `serde_json` or
//! similar. Not part of spec.md's required surface — ambient, matching
//! the teacher's own optional `serde`/`serde_json` features — and only
//! one-directional: functions/threads/userdata have no JSON shape, so
//! only `Serialize` is provided.

use crate::value::LuaValue;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

impl Serialize for LuaValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LuaValue::Nil => serializer.serialize_none(),
            LuaValue::Bool(b) => serializer.serialize_bool(*b),
            LuaValue::Int(i) => serializer.serialize_i64(*i),
            LuaValue::Float(f) => serializer.serialize_f64(*f),
            LuaValue::Str(s) => serializer.serialize_str(&s.to_string_lossy()),
            LuaValue::Table(t) => {
                let table = t.borrow();
                if table.array_len() > 0 && table.length() as usize == table.array_len() {
                    let mut seq = serializer.serialize_seq(Some(table.array_len()))?;
                    for v in table.iter_array() {
                        seq.serialize_element(v)?;
                    }
                    seq.end()
                } else {
                    let mut map = serializer.serialize_map(None)?;
                    let mut key = LuaValue::Nil;
                    while let Some((k, v)) = table.next(&key).ok().flatten() {
                        map.serialize_entry(&k.to_debug_string(), &v)?;
                        key = k;
                    }
                    map.end()
                }
            }
            LuaValue::Function(_) | LuaValue::Thread(_) | LuaValue::Userdata(_) => {
                serializer.serialize_str(&self.to_debug_string())
            }
        }
    }
}
