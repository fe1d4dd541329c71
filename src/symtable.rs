//! Generic lexical scope chain.
//!
//! A parent-linked chain of frames, each a `Rc<RefCell<HashMap<...>>>`. Used
//! twice: once holding [`crate::ast::Type`] in the type checker, once holding
//! `IrVar` in the IR generator, so it is written once, generically, and
//! instantiated for each value type a walker needs.
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

struct Frame<V> {
    symbols: HashMap<String, V>,
    parent: Option<SymTable<V>>,
}

/// A scope frame with an optional parent. `lookup` searches upward from the
/// current frame; `define` always writes to the current frame only.
pub struct SymTable<V>(Rc<RefCell<Frame<V>>>);

impl<V> Clone for SymTable<V> {
    fn clone(&self) -> Self {
        SymTable(Rc::clone(&self.0))
    }
}

impl<V: Clone> SymTable<V> {
    pub fn root() -> Self {
        SymTable(Rc::new(RefCell::new(Frame {
            symbols: HashMap::new(),
            parent: None,
        })))
    }

    /// A fresh child scope whose parent is `self`.
    pub fn new_child(&self) -> Self {
        SymTable(Rc::new(RefCell::new(Frame {
            symbols: HashMap::new(),
            parent: Some(self.clone()),
        })))
    }

    /// Define `name` in the current frame, shadowing any outer binding.
    pub fn define(&self, name: impl Into<String>, value: V) {
        self.0.borrow_mut().symbols.insert(name.into(), value);
    }

    /// Search this frame, then its ancestors, for `name`.
    pub fn lookup(&self, name: &str) -> Option<V> {
        let frame = self.0.borrow();
        if let Some(value) = frame.symbols.get(name) {
            return Some(value.clone());
        }
        frame.parent.as_ref().and_then(|parent| parent.lookup(name))
    }

    /// Define `name` in whichever frame already binds it (nearest first);
    /// if no frame does, define it in the current frame. Used by `=`, which
    /// must update an outer binding rather than shadow it.
    pub fn update_or_define(&self, name: impl Into<String>, value: V) {
        let name = name.into();
        if self.update(&name, value.clone()) {
            return;
        }
        self.define(name, value);
    }

    fn update(&self, name: &str, value: V) -> bool {
        let mut frame = self.0.borrow_mut();
        if frame.symbols.contains_key(name) {
            frame.symbols.insert(name.to_owned(), value);
            return true;
        }
        match &frame.parent {
            Some(parent) => parent.update(name, value),
            None => false,
        }
    }
}
