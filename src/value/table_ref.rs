use crate::table::LuaTable;
use std::cell::RefCell;
use std::rc::Rc;

pub type TableRef = Rc<RefCell<LuaTable>>;
