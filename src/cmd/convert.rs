/*!
convert.rs - string token to value converters, keyed by type name.

Built-ins:
  str   -> JSON string (unchanged)
  bytes -> JSON array of byte values
  int   -> JSON integer (i64)
  float -> JSON number (finite f64)

Custom scalar types are added with `Converters::register` before any
parameter that names them is registered. A converter reports failure as a
plain message; clap turns it into an `invalid value` usage error.
*/

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::hint::TypeHint;

type ConvertFn = dyn Fn(&str) -> Result<Value, String> + Send + Sync;

/// A named conversion function from one command-line token to a value.
#[derive(Clone)]
pub struct Converter {
    name: String,
    func: Arc<ConvertFn>,
}

impl Converter {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn convert(&self, raw: &str) -> Result<Value, String> {
        (self.func)(raw)
    }

    /// Wrap as a clap value parser producing `Value`.
    pub fn value_parser(&self) -> clap::builder::ValueParser {
        let func = Arc::clone(&self.func);
        clap::builder::ValueParser::new(move |raw: &str| func(raw))
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter").field("name", &self.name).finish()
    }
}

/// Parser for untyped parameters: every token stays a string.
pub fn passthrough_parser() -> clap::builder::ValueParser {
    clap::builder::ValueParser::new(|raw: &str| -> Result<Value, String> {
        Ok(Value::String(raw.to_string()))
    })
}

/// Converter registry.
#[derive(Debug, Clone)]
pub struct Converters {
    by_name: HashMap<String, Converter>,
}

impl Default for Converters {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Converters {
    /// Registry holding the `str`, `bytes`, `int` and `float` converters.
    pub fn builtin() -> Self {
        let mut c = Self {
            by_name: HashMap::new(),
        };
        c.register("str", |raw| Ok(Value::String(raw.to_string())));
        c.register("bytes", |raw| {
            Ok(Value::Array(
                raw.bytes().map(|b| Value::Number(b.into())).collect(),
            ))
        });
        c.register("int", coerce_int);
        c.register("float", coerce_float);
        c
    }

    /// Add or replace the converter for `name`. Type names are matched
    /// ASCII case-insensitively, the same way built-in hints are read.
    pub fn register<F>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        let name = name.into();
        self.by_name
            .insert(name.to_ascii_lowercase(), Converter::new(name, func));
    }

    pub fn get(&self, name: &str) -> Option<&Converter> {
        self.by_name.get(&name.to_ascii_lowercase())
    }

    /// Converter for a scalar hint. Multi-value and bool hints have none.
    pub fn for_hint(&self, hint: &TypeHint) -> Option<&Converter> {
        if hint.is_multi() || hint.is_bool() {
            return None;
        }
        self.get(hint.name())
    }
}

/// Parse an integer token (surrounding whitespace allowed).
pub fn coerce_int(raw: &str) -> Result<Value, String> {
    raw.trim()
        .parse::<i64>()
        .map(|n| Value::Number(n.into()))
        .map_err(|_| format!("invalid int value: {raw:?}"))
}

/// Parse a float token; NaN and infinities are rejected since JSON cannot hold them.
pub fn coerce_float(raw: &str) -> Result<Value, String> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| format!("invalid float value: {raw:?}"))
}

/* ---- Tests ---- */
