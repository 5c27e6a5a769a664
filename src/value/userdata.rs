//! Host userdata values (§3 "Userdata"): opaque Rust state the core
//! never inspects, carrying an optional metatable for operator dispatch.

use super::TableRef;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

pub struct LuaUserdata {
    data: RefCell<Box<dyn Any>>,
    metatable: RefCell<Option<TableRef>>,
}

impl LuaUserdata {
    pub fn new(data: impl Any) -> UserdataRef {
        Rc::new(LuaUserdata {
            data: RefCell::new(Box::new(data)),
            metatable: RefCell::new(None),
        })
    }

    pub fn with_metatable(data: impl Any, metatable: TableRef) -> UserdataRef {
        Rc::new(LuaUserdata {
            data: RefCell::new(Box::new(data)),
            metatable: RefCell::new(Some(metatable)),
        })
    }

    pub fn metatable(&self) -> Option<TableRef> {
        self.metatable.borrow().clone()
    }

    pub fn set_metatable(&self, metatable: Option<TableRef>) {
        *self.metatable.borrow_mut() = metatable;
    }

    pub fn borrow(&self) -> std::cell::Ref<'_, Box<dyn Any>> {
        self.data.borrow()
    }

    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, Box<dyn Any>> {
        self.data.borrow_mut()
    }
}

pub type UserdataRef = Rc<LuaUserdata>;
