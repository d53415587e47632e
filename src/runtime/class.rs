use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::Statement;

/// A named, parameterized body owned by a class.
#[derive(Debug, PartialEq)]
pub struct Method {
    pub name: String,
    /// Formal parameter names, excluding the receiver.
    pub formal_params: Vec<String>,
    pub body: Vec<Statement>,
}

/// User-defined class: an ordered method table with an optional base class.
/// Classes are created by the parser and shared (`Rc`) by every statement,
/// value and instance that names them.
#[derive(Debug, PartialEq)]
pub struct Class {
    name: String,
    methods: Vec<Method>,
    by_name: HashMap<String, usize>,
    parent: Option<Rc<Class>>,
}

impl Class {
    pub fn new(name: String, methods: Vec<Method>, parent: Option<Rc<Class>>) -> Self {
        let by_name = methods
            .iter()
            .enumerate()
            .map(|(index, method)| (method.name.clone(), index))
            .collect();
        Self {
            name,
            methods,
            by_name,
            parent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks a method up by name, searching the parent chain. A method in a
    /// subclass shadows its parent's method of the same name.
    pub fn method(&self, name: &str) -> Option<&Method> {
        if let Some(&index) = self.by_name.get(name) {
            return Some(&self.methods[index]);
        }
        self.parent.as_deref().and_then(|parent| parent.method(name))
    }

    /// A method is callable only at its exact arity; a mismatch is the same
    /// as the method not existing.
    pub fn method_with_arity(&self, name: &str, argc: usize) -> Option<&Method> {
        self.method(name)
            .filter(|method| method.formal_params.len() == argc)
    }
}
