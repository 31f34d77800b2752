//! The lexical-scope chain a render walks through nested loop iterations.

use crate::Value;
use std::rc::Rc;

/// A stack frame holding the current scope's value, the document root, and
/// the enclosing frame.
///
/// Modeled as a linked stack of `Rc`-shared frames rather than a `Vec`, so
/// pushing a loop iteration's scope is O(1) and never clones the tree above
/// it — only the one item a loop iteration binds as `current` is owned here.
#[derive(Clone)]
pub struct TemplateContext {
    current: Rc<Value>,
    root: Rc<Value>,
    parent: Option<Rc<TemplateContext>>,
}

impl TemplateContext {
    /// The root frame created on engine entry: `current` and `root` are the
    /// same value, there is no parent.
    pub fn root(root: Value) -> Self {
        let root = Rc::new(root);
        Self {
            current: root.clone(),
            root,
            parent: None,
        }
    }

    /// A child frame for one loop iteration: `current` is the bound item,
    /// `root` is inherited, `parent` is the enclosing frame.
    pub fn child(&self, item: Value) -> Self {
        Self {
            current: Rc::new(item),
            root: self.root.clone(),
            parent: Some(Rc::new(self.clone())),
        }
    }

    pub fn current(&self) -> &Value {
        &self.current
    }

    pub fn root_value(&self) -> &Value {
        &self.root
    }

    pub fn parent(&self) -> Option<&TemplateContext> {
        self.parent.as_deref()
    }
}
