/*!
`dispatch.rs`

The top-level `Cli`: registration entry points, clap parser assembly, and the
argv -> handler dispatch.

Flow:
  setup     Cli::command / command_with_args / add_argument   (&mut self)
  dispatch  parse_args -> Namespace -> invoke -> handler       (&self)

Entry points:
  - parse_args(argv)   parse only; usage errors come back as DispatchError::Usage
  - invoke(namespace)  run the selected handler (None when no command selected)
  - try_run(argv)      parse_args + invoke
  - run(argv)          like try_run, but usage / help / version go through clap's exit
  - run_line("...")    shell-style split, then try_run
  - run_from_env()     run over the process arguments

`argv` never includes the program name; it is prepended from the config.
*/

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches};
use serde::Serialize;
use serde_json::Value;
use std::ffi::OsString;

use super::convert::Converters;
use super::descriptor::{ArgKind, ArgumentDescriptor, flag_form};
use super::kwargs::{Kwargs, Namespace};
use super::registry::{Command, CommandRegistry, Handler};
use super::signature::{Param, Signature};
use crate::config::CliConfig;
use crate::error::{DispatchError, RegistrationError};

/// Parameter names clap claims for itself.
const RESERVED_COMMAND_PARAMS: &[&str] = &["help"];
const RESERVED_TOP_LEVEL_PARAMS: &[&str] = &["help", "version"];

/// Optional overrides for a registered command.
#[derive(Clone, Debug, Default)]
pub struct CommandInfo {
    /// Subcommand name; defaults to the signature name.
    pub title: Option<String>,
    /// One-line text in the subcommand listing.
    pub help: Option<String>,
    /// Text on the subcommand's own help page; defaults to the signature doc.
    pub description: Option<String>,
}

impl CommandInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Command-line front end built from handler signatures.
#[derive(Debug, Default)]
pub struct Cli {
    config: CliConfig,
    registry: CommandRegistry,
    converters: Converters,
    globals: Vec<ArgumentDescriptor>,
}

impl Cli {
    pub fn new() -> Self {
        Self::with_config(CliConfig::default())
    }

    pub fn with_config(config: CliConfig) -> Self {
        let registry = CommandRegistry::new(config.group_name.clone());
        Self {
            config,
            registry,
            converters: Converters::builtin(),
            globals: Vec::new(),
        }
    }

    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn converters(&self) -> &Converters {
        &self.converters
    }

    /// Make `TypeHint::Named(name)` usable by later registrations.
    pub fn register_type<F>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.converters.register(name, func);
    }

    /* ---- Registration ---- */

    /// Register `handler` under the signature's own name.
    pub fn command<F, R>(
        &mut self,
        signature: Signature,
        handler: F,
    ) -> Result<&Command, RegistrationError>
    where
        F: Fn(Kwargs) -> Result<R> + 'static,
        R: Serialize,
    {
        self.command_with_args(CommandInfo::default(), signature, handler)
    }

    /// Register `handler` with an explicit title, help and description.
    ///
    /// Everything is validated before the registry is touched, so a failed
    /// registration leaves no partial command behind.
    pub fn command_with_args<F, R>(
        &mut self,
        info: CommandInfo,
        signature: Signature,
        handler: F,
    ) -> Result<&Command, RegistrationError>
    where
        F: Fn(Kwargs) -> Result<R> + 'static,
        R: Serialize,
    {
        let title = info
            .title
            .unwrap_or_else(|| signature.name().to_string());
        if self.registry.contains(&title) {
            return Err(RegistrationError::DuplicateCommand(title));
        }
        signature.validate()?;

        let arguments = signature
            .parameters()
            .map(|(_, param)| {
                if RESERVED_COMMAND_PARAMS.contains(&param.name.as_str()) {
                    return Err(RegistrationError::ReservedName(param.name.clone()));
                }
                ArgumentDescriptor::derive(param, &self.converters)
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let description = info
            .description
            .or_else(|| signature.doc_text().map(str::to_string));

        let handler: Handler = Box::new(move |kwargs: Kwargs| -> Result<Value> {
            let out = handler(kwargs)?;
            serde_json::to_value(out).context("handler result is not serializable")
        });
        self.registry
            .register(title, info.help, description, handler, arguments)
    }

    /// Add a top-level argument derived from `param`. Its value is part of every
    /// namespace and is passed to whichever handler runs.
    pub fn add_argument(&mut self, param: Param) -> Result<&ArgumentDescriptor, RegistrationError> {
        if param.name.trim().is_empty() {
            return Err(RegistrationError::EmptyName);
        }
        if RESERVED_TOP_LEVEL_PARAMS.contains(&param.name.as_str()) {
            return Err(RegistrationError::ReservedName(param.name));
        }
        let flag = flag_form(&param.name);
        if self
            .globals
            .iter()
            .any(|g| flag_form(&g.source_param_name) == flag)
        {
            return Err(RegistrationError::DuplicateParameter(param.name));
        }
        let descriptor = ArgumentDescriptor::derive(&param, &self.converters)?;
        tracing::debug!(argument = %descriptor.display_flag, "registered top-level argument");
        self.globals.push(descriptor);
        Ok(&self.globals[self.globals.len() - 1])
    }

    /* ---- Parser assembly ---- */

    /// Build the clap parser for the current set of commands.
    pub fn build_parser(&self) -> clap::Command {
        let mut parser =
            clap::Command::new(self.config.prog_name()).disable_help_subcommand(true);

        if let Some(version) = &self.config.version {
            parser = parser.version(version.clone()).disable_version_flag(true).arg(
                Arg::new("version")
                    .short('v')
                    .long("version")
                    .action(ArgAction::Version)
                    .help("Print version"),
            );
        }
        if let Some(usage) = &self.config.usage {
            parser = parser.override_usage(usage.clone());
        }
        if let Some(description) = &self.config.description {
            parser = parser.about(description.clone());
        }
        if let Some(epilog) = &self.config.epilog {
            parser = parser.after_help(epilog.clone());
        }
        if !self.config.add_help {
            parser = parser.disable_help_flag(true);
        }
        if self.config.require_command {
            parser = parser.subcommand_required(true);
        }
        for global in &self.globals {
            parser = parser.arg(global.to_arg());
        }
        self.registry.configure(parser)
    }

    /// Top-level help text as clap renders it.
    pub fn render_help(&self) -> String {
        self.build_parser().render_help().to_string()
    }

    /* ---- Dispatch ---- */

    /// Parse `args` into a namespace without calling anything.
    pub fn parse_args<I, T>(&self, args: I) -> Result<Namespace, DispatchError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let argv = std::iter::once(OsString::from(self.config.prog_name()))
            .chain(args.into_iter().map(Into::into));
        let matches = self.build_parser().try_get_matches_from(argv)?;

        let mut values = Kwargs::new();
        collect_values(&self.globals, &matches, &mut values)?;

        let command = match matches.subcommand() {
            Some((name, sub_matches)) => {
                let command = self
                    .registry
                    .lookup(name)
                    .ok_or_else(|| DispatchError::UnknownCommand(name.to_string()))?;
                collect_values(command.arguments(), sub_matches, &mut values)?;
                Some(name.to_string())
            }
            None => None,
        };

        tracing::debug!(command = ?command, values = values.len(), "parsed arguments");
        Ok(Namespace { command, values })
    }

    /// Call the handler selected in `namespace`. `Ok(None)` when no command was
    /// selected; the handler's own error is returned as is.
    pub fn invoke(&self, namespace: Namespace) -> Result<Option<Value>> {
        let Some(name) = namespace.command else {
            tracing::debug!("no subcommand selected");
            return Ok(None);
        };
        let command = self
            .registry
            .lookup(&name)
            .ok_or(DispatchError::UnknownCommand(name.clone()))?;
        tracing::debug!(command = %name, "dispatching");
        command.call(namespace.values).map(Some)
    }

    /// Parse and dispatch. Usage errors (help and version requests included)
    /// are returned as `DispatchError::Usage` inside the error.
    pub fn try_run<I, T>(&self, args: I) -> Result<Option<Value>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let namespace = self.parse_args(args)?;
        self.invoke(namespace)
    }

    /// Parse and dispatch; usage, help and version outcomes print and exit the
    /// process the way clap does.
    pub fn run<I, T>(&self, args: I) -> Result<Option<Value>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let namespace = match self.parse_args(args) {
            Ok(namespace) => namespace,
            Err(DispatchError::Usage(e)) => e.exit(),
            Err(e) => return Err(e.into()),
        };
        self.invoke(namespace)
    }

    /// Split a shell-style command line and dispatch it.
    pub fn run_line(&self, line: &str) -> Result<Option<Value>> {
        let args = shell_words::split(line)
            .with_context(|| format!("failed to split command line: {line}"))?;
        self.try_run(args)
    }

    /// `run` over the process arguments (program name skipped).
    pub fn run_from_env(&self) -> Result<Option<Value>> {
        self.run(std::env::args_os().skip(1))
    }
}

/// Read every descriptor's value from `matches` into `into`, keyed by
/// parameter name.
fn collect_values(
    descriptors: &[ArgumentDescriptor],
    matches: &ArgMatches,
    into: &mut Kwargs,
) -> Result<(), DispatchError> {
    for d in descriptors {
        let id = d.source_param_name.as_str();
        let value = match d.kind {
            ArgKind::StoreTrue | ArgKind::StoreFalse => match matches.try_get_one::<bool>(id)? {
                Some(flag) => Value::Bool(*flag),
                None => d.default_value.clone().unwrap_or(Value::Null),
            },
            ArgKind::Append => match matches.try_get_many::<Value>(id)? {
                Some(values) => Value::Array(values.cloned().collect()),
                None => d
                    .default_value
                    .clone()
                    .unwrap_or_else(|| Value::Array(Vec::new())),
            },
            ArgKind::Store => match (matches.try_get_one::<Value>(id)?, &d.default_value) {
                (Some(v), _) => v.clone(),
                (None, Some(default)) => default.clone(),
                (None, None) => continue,
            },
        };
        into.insert(id, value);
    }
    Ok(())
}

/* --------------------------------- Tests ---------------------------------- */
