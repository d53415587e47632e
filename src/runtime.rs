//! Runtime object model: values, classes, instances, scopes and the typed
//! errors evaluation can raise.

mod class;
mod error;
mod value;

pub use class::{Class, Method};
pub use error::RuntimeError;
pub use value::{InstanceObject, Value};

use std::collections::HashMap;

/// Symbol table tying names to values. Module-top locals, method locals and
/// instance fields all share this shape.
pub type Scope = HashMap<String, Value>;
