/*!
Handler signatures.

A `Signature` is the declared parameter list of a handler: positional-or-keyword
parameters in declaration order, then keyword-only parameters. Each parameter
carries an optional default (`None` = no default; `Some(Value::Null)` is a real
null default) and an optional type hint.

Two ways to build one:
  - fluent: `Signature::new("add").arg(Param::new("a").typed(TypeHint::Int))`
  - argspec: `FullArgSpec { args, defaults, .. }.into_signature("add")`, where
    `defaults` fill the trailing run of `args`.
*/

use serde_json::Value;
use std::collections::{HashMap, HashSet};

use super::descriptor::flag_form;
use super::hint::TypeHint;
use crate::error::RegistrationError;

/// Whether a parameter can be supplied positionally or only by keyword.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParamKind {
    PositionalOrKeyword,
    KeywordOnly,
}

/// One declared parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<Value>,
    pub hint: Option<TypeHint>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            hint: None,
        }
    }

    pub fn typed(mut self, hint: impl Into<TypeHint>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Declared parameter list of a handler.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Signature {
    name: String,
    doc: Option<String>,
    args: Vec<Param>,
    kwonly: Vec<Param>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Doc text; used as the subcommand description when none is given.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Append a positional-or-keyword parameter.
    pub fn arg(mut self, param: Param) -> Self {
        self.args.push(param);
        self
    }

    /// Append a keyword-only parameter.
    pub fn kwarg(mut self, param: Param) -> Self {
        self.kwonly.push(param);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc_text(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn args(&self) -> &[Param] {
        &self.args
    }

    pub fn kwonly(&self) -> &[Param] {
        &self.kwonly
    }

    /// All parameters in derivation order: positional-or-keyword first, then
    /// keyword-only.
    pub fn parameters(&self) -> impl Iterator<Item = (ParamKind, &Param)> {
        self.args
            .iter()
            .map(|p| (ParamKind::PositionalOrKeyword, p))
            .chain(self.kwonly.iter().map(|p| (ParamKind::KeywordOnly, p)))
    }

    /// Check the shape rules: non-empty names that stay unique once spelled
    /// as flags (`a_b` and `a-b` both become `--a-b`), and defaults on the
    /// positional-or-keyword list form a trailing run.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        let mut seen = HashSet::new();
        for (_, p) in self.parameters() {
            if p.name.trim().is_empty() {
                return Err(RegistrationError::EmptyName);
            }
            if !seen.insert(flag_form(&p.name)) {
                return Err(RegistrationError::DuplicateParameter(p.name.clone()));
            }
        }
        let mut defaulted = false;
        for p in &self.args {
            if p.has_default() {
                defaulted = true;
            } else if defaulted {
                return Err(RegistrationError::NonDefaultAfterDefault(p.name.clone()));
            }
        }
        Ok(())
    }
}

/// Argspec-shaped description of a handler: positional names with a trailing
/// run of defaults, keyword-only names with per-name defaults, and hints by name.
#[derive(Clone, Debug, Default)]
pub struct FullArgSpec {
    pub args: Vec<String>,
    pub defaults: Vec<Value>,
    pub kwonlyargs: Vec<String>,
    pub kwonlydefaults: HashMap<String, Value>,
    pub annotations: HashMap<String, TypeHint>,
    pub doc: Option<String>,
}

impl FullArgSpec {
    /// Resolve into a `Signature`, aligning `defaults` with the end of `args`.
    pub fn into_signature(
        mut self,
        name: impl Into<String>,
    ) -> Result<Signature, RegistrationError> {
        if self.defaults.len() > self.args.len() {
            return Err(RegistrationError::TooManyDefaults {
                params: self.args.len(),
                defaults: self.defaults.len(),
            });
        }
        let first_default = self.args.len() - self.defaults.len();
        let mut defaults = self.defaults.into_iter();

        let mut sig = Signature::new(name);
        sig.doc = self.doc;
        for (index, arg) in self.args.into_iter().enumerate() {
            let default = if index >= first_default {
                defaults.next()
            } else {
                None
            };
            let hint = self.annotations.remove(&arg);
            sig.args.push(Param {
                name: arg,
                default,
                hint,
            });
        }
        for kw in self.kwonlyargs {
            let default = self.kwonlydefaults.remove(&kw);
            let hint = self.annotations.remove(&kw);
            sig.kwonly.push(Param {
                name: kw,
                default,
                hint,
            });
        }
        Ok(sig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fluent_builder_keeps_order() {
        let sig = Signature::new("greet")
            .arg(Param::new("name").typed("str"))
            .kwarg(Param::new("times").typed(TypeHint::Int).default(1))
            .arg(Param::new("greeting").default("hi"));
        let names: Vec<_> = sig.parameters().map(|(_, p)| p.name.as_str()).collect();
        assert_eq!(names, ["name", "greeting", "times"]);
        assert_eq!(sig.parameters().last().unwrap().0, ParamKind::KeywordOnly);
    }

    #[test]
    fn null_default_is_a_default() {
        let p = Param::new("x").default(Value::Null);
        assert!(p.has_default());
        assert!(!Param::new("y").has_default());
    }

    #[test]
    fn trailing_defaults_align_from_end() {
        let spec = FullArgSpec {
            args: vec!["a".into(), "b".into(), "c".into()],
            defaults: vec![json!(2), json!(3)],
            annotations: HashMap::from([("a".to_string(), TypeHint::Int)]),
            ..Default::default()
        };
        let sig = spec.into_signature("f").unwrap();
        assert_eq!(sig.args()[0].default, None);
        assert_eq!(sig.args()[0].hint, Some(TypeHint::Int));
        assert_eq!(sig.args()[1].default, Some(json!(2)));
        assert_eq!(sig.args()[2].default, Some(json!(3)));
    }

    #[test]
    fn kwonly_defaults_checked_independently() {
        let spec = FullArgSpec {
            kwonlyargs: vec!["x".into(), "y".into()],
            kwonlydefaults: HashMap::from([("y".to_string(), json!(null))]),
            ..Default::default()
        };
        let sig = spec.into_signature("f").unwrap();
        assert_eq!(sig.kwonly()[0].default, None);
        assert_eq!(sig.kwonly()[1].default, Some(Value::Null));
    }

    #[test]
    fn too_many_defaults() {
        let spec = FullArgSpec {
            args: vec!["a".into()],
            defaults: vec![json!(1), json!(2)],
            ..Default::default()
        };
        assert_eq!(
            spec.into_signature("f").unwrap_err(),
            RegistrationError::TooManyDefaults {
                params: 1,
                defaults: 2
            }
        );
    }

    #[test]
    fn validate_rejects_gap_and_duplicates() {
        let gap = Signature::new("f")
            .arg(Param::new("a").default(1))
            .arg(Param::new("b"));
        assert_eq!(
            gap.validate(),
            Err(RegistrationError::NonDefaultAfterDefault("b".into()))
        );

        let dup = Signature::new("f")
            .arg(Param::new("a"))
            .kwarg(Param::new("a").default(1));
        assert_eq!(
            dup.validate(),
            Err(RegistrationError::DuplicateParameter("a".into()))
        );

        let spelled = Signature::new("c")
            .arg(Param::new("x"))
            .kwarg(Param::new("a_b").default(1))
            .kwarg(Param::new("a-b").default(2));
        assert_eq!(
            spelled.validate(),
            Err(RegistrationError::DuplicateParameter("a-b".into()))
        );

        let blank = Signature::new("f").arg(Param::new(" "));
        assert_eq!(blank.validate(), Err(RegistrationError::EmptyName));

        // keyword-only parameters may lack defaults after defaulted positionals
        let ok = Signature::new("f")
            .arg(Param::new("a").default(1))
            .kwarg(Param::new("b"));
        assert!(ok.validate().is_ok());
    }
}
