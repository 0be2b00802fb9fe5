//! Nested program activation.
//!
//! GL contexts are current on one thread at a time, so the stack of active programs is kept per
//! thread. Deactivating a program rebinds the one that was active before it.

use std::cell::RefCell;

use gl::types::GLuint;

#[derive(Debug, Default, Clone)]
pub struct ActivationStack {
    ids: Vec<GLuint>,
}

impl ActivationStack {
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    pub fn push(&mut self, id: GLuint) {
        self.ids.push(id);
    }

    /// Removes the innermost activation of `id` and returns the program to bind in its place,
    /// 0 when nothing is left active.
    pub fn release(&mut self, id: GLuint) -> GLuint {
        match self.ids.iter().rposition(|&active| active == id) {
            Some(pos) => {
                if pos + 1 != self.ids.len() {
                    log::warn!("program {id} released before programs activated after it");
                }
                self.ids.remove(pos);
            }
            None => log::warn!("program {id} released but it is not active"),
        }

        self.current()
    }

    /// The program that should be bound, 0 when none.
    pub fn current(&self) -> GLuint {
        self.ids.last().copied().unwrap_or(0)
    }

    pub fn depth(&self) -> usize {
        self.ids.len()
    }
}

thread_local! {
    static ACTIVE_PROGRAMS: RefCell<ActivationStack> = RefCell::new(ActivationStack::new());
}

pub(crate) fn activate(id: GLuint) {
    ACTIVE_PROGRAMS.with(|stack| stack.borrow_mut().push(id));

    unsafe { gl::UseProgram(id) }
}

pub(crate) fn deactivate(id: GLuint) {
    let next = ACTIVE_PROGRAMS.with(|stack| stack.borrow_mut().release(id));

    unsafe { gl::UseProgram(next) }
}

/// Program at the top of this thread's activation stack, 0 when none.
pub fn current_program() -> GLuint {
    ACTIVE_PROGRAMS.with(|stack| stack.borrow().current())
}
