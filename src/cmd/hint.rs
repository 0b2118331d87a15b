/*!
Type hints attached to handler parameters.

Variants:
  str / bytes           text types (never multi-value)
  int / float           built-in scalar conversions
  bool                  toggle flags
  list / tuple / set    multi-value containers (append semantics)
  Named(..)             scalar with a user-registered converter

Helpers:
  - builtins()
  - from_str_ci()
  - is_text() / is_multi() / is_bool()
*/

use std::fmt;

/// Declared type of a parameter, resolved once at registration.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeHint {
    Str,
    Bytes,
    Int,
    Float,
    Bool,
    List,
    Tuple,
    Set,
    /// Any other scalar type, looked up by name in the converter registry.
    Named(String),
}

impl TypeHint {
    /// All built-in hints (order matters for help display).
    pub fn builtins() -> [TypeHint; 8] {
        [
            TypeHint::Str,
            TypeHint::Bytes,
            TypeHint::Int,
            TypeHint::Float,
            TypeHint::Bool,
            TypeHint::List,
            TypeHint::Tuple,
            TypeHint::Set,
        ]
    }

    /// Case-insensitive parse; unknown names become `Named`.
    pub fn from_str_ci(s: &str) -> Self {
        let norm = s.trim().to_ascii_lowercase();
        match norm.as_str() {
            "str" | "string" => TypeHint::Str,
            "bytes" => TypeHint::Bytes,
            "int" | "integer" => TypeHint::Int,
            "float" | "number" => TypeHint::Float,
            "bool" | "boolean" => TypeHint::Bool,
            "list" | "array" => TypeHint::List,
            "tuple" => TypeHint::Tuple,
            "set" => TypeHint::Set,
            _ => TypeHint::Named(s.trim().to_string()),
        }
    }

    /// Name used in help text and as the converter registry key.
    pub fn name(&self) -> &str {
        match self {
            TypeHint::Str => "str",
            TypeHint::Bytes => "bytes",
            TypeHint::Int => "int",
            TypeHint::Float => "float",
            TypeHint::Bool => "bool",
            TypeHint::List => "list",
            TypeHint::Tuple => "tuple",
            TypeHint::Set => "set",
            TypeHint::Named(n) => n,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, TypeHint::Str | TypeHint::Bytes)
    }

    /// Container types collected by repetition. Only this allow-list counts;
    /// a named type is always a scalar even if it happens to be iterable.
    pub fn is_multi(&self) -> bool {
        !self.is_text() && matches!(self, TypeHint::List | TypeHint::Tuple | TypeHint::Set)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, TypeHint::Bool)
    }
}

impl From<&str> for TypeHint {
    fn from(s: &str) -> Self {
        TypeHint::from_str_ci(s)
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/* --------------------------------- Tests ---------------------------------- */
