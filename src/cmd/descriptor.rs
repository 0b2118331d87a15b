/*!
descriptor.rs - derive one command-line argument from one parameter.

Decision table (first match wins):
  1. multi-value container hint  -> Append, optional `--flag`, help "type: <multi>"
  2. bool hint                    -> StoreTrue / StoreFalse, needs a bool default
  3. anything else                -> Store; positional without default,
                                     optional `--flag` with one; scalar hints
                                     pick a converter and help "type: <name>"

`ArgumentDescriptor::to_arg` translates the result into a `clap::Arg` whose id
is the source parameter name, so parsed values come back under that name.
*/

use clap::{Arg, ArgAction};
use serde_json::Value;

use super::convert::{Converter, Converters, passthrough_parser};
use super::hint::TypeHint;
use super::signature::Param;
use crate::error::RegistrationError;
use crate::utils::output::display_value;

/// Value-acceptance mode of a derived argument.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArgKind {
    /// Single value.
    Store,
    /// Repeated flag, values collected in order.
    Append,
    /// Flag without value; presence yields `true`.
    StoreTrue,
    /// Flag without value; presence yields `false`.
    StoreFalse,
}

/// Derived command-line shape of one handler parameter.
#[derive(Clone, Debug)]
pub struct ArgumentDescriptor {
    pub source_param_name: String,
    /// `--foo-bar` for flags, the bare parameter name for positionals.
    pub display_flag: String,
    pub kind: ArgKind,
    pub required: bool,
    pub conversion_type: Option<TypeHint>,
    pub help_text: String,
    pub default_value: Option<Value>,
    converter: Option<Converter>,
}

/// `foo_bar` -> `--foo-bar`
pub fn flag_form(name: &str) -> String {
    format!("--{}", name.replace('_', "-"))
}

impl ArgumentDescriptor {
    /// Apply the derivation rules to `param`, resolving scalar converters from
    /// `converters`.
    pub fn derive(param: &Param, converters: &Converters) -> Result<Self, RegistrationError> {
        let name = param.name.as_str();
        let default = param.default.clone();

        let descriptor = match &param.hint {
            Some(hint) if hint.is_multi() => Self {
                source_param_name: name.to_string(),
                display_flag: flag_form(name),
                kind: ArgKind::Append,
                required: false,
                conversion_type: None,
                help_text: "type: <multi>".to_string(),
                default_value: default,
                converter: None,
            },
            Some(hint) if hint.is_bool() => {
                let kind = match default {
                    Some(Value::Bool(true)) => ArgKind::StoreFalse,
                    Some(Value::Bool(false)) => ArgKind::StoreTrue,
                    _ => return Err(RegistrationError::BoolWithoutDefault(name.to_string())),
                };
                Self {
                    source_param_name: name.to_string(),
                    display_flag: flag_form(name),
                    kind,
                    required: false,
                    conversion_type: None,
                    help_text: format!("type: <{hint}>"),
                    default_value: default,
                    converter: None,
                }
            }
            hint => {
                let converter = match hint {
                    Some(h) => Some(converters.for_hint(h).cloned().ok_or_else(|| {
                        RegistrationError::UnknownType {
                            param: name.to_string(),
                            type_name: h.name().to_string(),
                        }
                    })?),
                    None => None,
                };
                // String defaults go through the converter, like a value typed on the command line.
                let default = match (&converter, default) {
                    (Some(conv), Some(Value::String(raw))) => {
                        Some(conv.convert(&raw).map_err(|message| {
                            RegistrationError::InvalidDefault {
                                param: name.to_string(),
                                message,
                            }
                        })?)
                    }
                    (_, default) => default,
                };
                let display_flag = if default.is_some() {
                    flag_form(name)
                } else {
                    name.to_string()
                };
                Self {
                    source_param_name: name.to_string(),
                    display_flag,
                    kind: ArgKind::Store,
                    required: default.is_none(),
                    conversion_type: hint.clone(),
                    help_text: hint
                        .as_ref()
                        .map(|h| format!("type: <{h}>"))
                        .unwrap_or_default(),
                    default_value: default,
                    converter,
                }
            }
        };

        tracing::trace!(
            param = name,
            flag = %descriptor.display_flag,
            kind = ?descriptor.kind,
            required = descriptor.required,
            "derived argument"
        );
        Ok(descriptor)
    }

    /// True for `--flag` arguments, false for bare positionals.
    pub fn is_flag(&self) -> bool {
        self.display_flag.starts_with("--")
    }

    /// Help line as shown by clap, with the default appended when there is one.
    pub fn rendered_help(&self) -> String {
        match &self.default_value {
            Some(v) if self.is_flag() => {
                let suffix = format!("(default: {})", display_value(v));
                if self.help_text.is_empty() {
                    suffix
                } else {
                    format!("{} {suffix}", self.help_text)
                }
            }
            _ => self.help_text.clone(),
        }
    }

    /// Translate into the clap argument this descriptor stands for.
    pub fn to_arg(&self) -> Arg {
        let id = self.source_param_name.clone();
        let mut arg = Arg::new(id).help(self.rendered_help());
        if self.is_flag() {
            arg = arg.long(self.display_flag.trim_start_matches('-').to_string());
        }

        match self.kind {
            ArgKind::StoreTrue => arg.action(ArgAction::SetTrue),
            ArgKind::StoreFalse => arg.action(ArgAction::SetFalse),
            ArgKind::Append => arg
                .action(ArgAction::Append)
                .value_parser(passthrough_parser())
                .value_name(self.source_param_name.to_ascii_uppercase()),
            ArgKind::Store => {
                let parser = self
                    .converter
                    .as_ref()
                    .map(Converter::value_parser)
                    .unwrap_or_else(passthrough_parser);
                arg = arg.action(ArgAction::Set).value_parser(parser);
                if self.is_flag() {
                    arg.required(false)
                        .value_name(self.source_param_name.to_ascii_uppercase())
                } else {
                    arg.required(self.required)
                        .value_name(self.source_param_name.clone())
                }
            }
        }
    }
}

/* --------------------------------- Tests ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn derive(param: Param) -> Result<ArgumentDescriptor, RegistrationError> {
        ArgumentDescriptor::derive(&param, &Converters::builtin())
    }

    #[test]
    fn untyped_without_default_is_positional() {
        let d = derive(Param::new("a")).unwrap();
        assert_eq!(d.display_flag, "a");
        assert_eq!(d.kind, ArgKind::Store);
        assert!(d.required);
        assert!(d.conversion_type.is_none());
        assert_eq!(d.help_text, "");
    }

    #[test]
    fn typed_default_becomes_optional_flag() {
        let d = derive(Param::new("max_count").typed(TypeHint::Int).default(3)).unwrap();
        assert_eq!(d.display_flag, "--max-count");
        assert!(!d.required);
        assert_eq!(d.conversion_type, Some(TypeHint::Int));
        assert_eq!(d.help_text, "type: <int>");
        assert_eq!(d.rendered_help(), "type: <int> (default: 3)");
    }

    #[test]
    fn list_hint_appends() {
        let d = derive(Param::new("b").typed(TypeHint::List)).unwrap();
        assert_eq!(d.kind, ArgKind::Append);
        assert_eq!(d.display_flag, "--b");
        assert!(!d.required);
        assert_eq!(d.help_text, "type: <multi>");
    }

    #[test]
    fn text_hints_are_scalars() {
        let d = derive(Param::new("s").typed(TypeHint::Str)).unwrap();
        assert_eq!(d.kind, ArgKind::Store);
        assert_eq!(d.help_text, "type: <str>");
        let d = derive(Param::new("raw").typed(TypeHint::Bytes)).unwrap();
        assert_eq!(d.kind, ArgKind::Store);
    }

    #[test]
    fn bool_default_picks_toggle_direction() {
        let on = derive(Param::new("switch").typed(TypeHint::Bool).default(true)).unwrap();
        assert_eq!(on.kind, ArgKind::StoreFalse);
        let off = derive(Param::new("switch").typed(TypeHint::Bool).default(false)).unwrap();
        assert_eq!(off.kind, ArgKind::StoreTrue);
        assert_eq!(off.display_flag, "--switch");
        assert_eq!(off.rendered_help(), "type: <bool> (default: false)");
    }

    #[test]
    fn bool_needs_bool_default() {
        assert_eq!(
            derive(Param::new("switch").typed(TypeHint::Bool)).unwrap_err(),
            RegistrationError::BoolWithoutDefault("switch".into())
        );
        assert!(derive(Param::new("switch").typed(TypeHint::Bool).default(json!(null))).is_err());
        assert!(derive(Param::new("switch").typed(TypeHint::Bool).default("yes")).is_err());
    }

    #[test]
    fn unknown_named_type_fails() {
        let err = derive(Param::new("p").typed(TypeHint::Named("port".into()))).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::UnknownType {
                param: "p".into(),
                type_name: "port".into()
            }
        );
    }

    #[test]
    fn untyped_default_keeps_raw_value() {
        let d = derive(Param::new("label").default(json!(null))).unwrap();
        assert_eq!(d.display_flag, "--label");
        assert_eq!(d.default_value, Some(Value::Null));
        assert_eq!(d.rendered_help(), "(default: null)");
    }

    #[test]
    fn string_default_is_converted() {
        let d = derive(Param::new("n").typed(TypeHint::Int).default("7")).unwrap();
        assert_eq!(d.default_value, Some(json!(7)));
        assert_eq!(d.rendered_help(), "type: <int> (default: 7)");

        let err = derive(Param::new("n").typed(TypeHint::Int).default("abc")).unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidDefault { ref param, .. } if param == "n"));

        // non-string defaults are kept as given
        let d = derive(Param::new("n").typed(TypeHint::Int).default(json!(null))).unwrap();
        assert_eq!(d.default_value, Some(Value::Null));
    }

    #[test]
    fn clap_arg_shape() {
        let pos = derive(Param::new("a").typed(TypeHint::Int)).unwrap().to_arg();
        assert_eq!(pos.get_id().as_str(), "a");
        assert!(pos.is_positional());
        assert!(pos.is_required_set());

        let flag = derive(Param::new("dry_run").typed(TypeHint::Bool).default(false))
            .unwrap()
            .to_arg();
        assert_eq!(flag.get_long(), Some("dry-run"));
        assert!(matches!(flag.get_action(), ArgAction::SetTrue));
    }
}
