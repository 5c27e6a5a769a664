//! Coroutine values (§3 "Thread"). Scheduling and yield/resume live
//! outside the core (§1 Non-goals: "multi-threaded concurrency"); this
//! is the minimal first-class handle the value universe needs so that
//! `type(coroutine.create(f))` has something to point at.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadStatus {
    Suspended,
    Running,
    Normal,
    Dead,
}

pub struct LuaThread {
    status: Cell<ThreadStatus>,
}

impl LuaThread {
    pub fn new() -> ThreadRef {
        Rc::new(LuaThread {
            status: Cell::new(ThreadStatus::Suspended),
        })
    }

    pub fn status(&self) -> ThreadStatus {
        self.status.get()
    }

    pub fn set_status(&self, status: ThreadStatus) {
        self.status.set(status);
    }
}

pub type ThreadRef = Rc<LuaThread>;
