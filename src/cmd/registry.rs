/*!
registry.rs - named commands and their clap subcommands.

A `Command` is created once by `CommandRegistry::register` and never changes
afterwards. Names are unique: registering a name twice fails and keeps the
first command. Commands are listed in registration order.
*/

use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use super::descriptor::ArgumentDescriptor;
use super::kwargs::Kwargs;
use crate::error::RegistrationError;

/// Handler bound to a command: keyword arguments in, JSON value out.
pub type Handler = Box<dyn Fn(Kwargs) -> Result<Value>>;

/// Default heading of the subcommand listing.
pub const DEFAULT_GROUP_TITLE: &str = "subcommands";

/// A registered subcommand.
pub struct Command {
    name: String,
    help: Option<String>,
    description: Option<String>,
    handler: Handler,
    arguments: Vec<ArgumentDescriptor>,
}

impl Command {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn arguments(&self) -> &[ArgumentDescriptor] {
        &self.arguments
    }

    /// Call the handler. Whatever it returns, error included, is passed back as is.
    pub fn call(&self, kwargs: Kwargs) -> Result<Value> {
        (self.handler)(kwargs)
    }

    /// Build the clap subcommand for this command.
    pub fn to_subcommand(&self) -> clap::Command {
        let mut sub = clap::Command::new(self.name.clone());
        if let Some(help) = &self.help {
            sub = sub.about(help.clone());
        }
        if let Some(description) = &self.description {
            // usage, then description, then arguments
            sub = sub
                .before_help(description.clone())
                .help_template("{usage-heading} {usage}\n\n{before-help}\n\n{all-args}{after-help}");
        }
        for descriptor in &self.arguments {
            sub = sub.arg(descriptor.to_arg());
        }
        sub
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("description", &self.description)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Name -> command mapping.
pub struct CommandRegistry {
    commands: Vec<Command>,
    index: HashMap<String, usize>,
    group_title: String,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_GROUP_TITLE)
    }
}

impl CommandRegistry {
    pub fn new(group_title: impl Into<String>) -> Self {
        Self {
            commands: Vec::new(),
            index: HashMap::new(),
            group_title: group_title.into(),
        }
    }

    pub fn group_title(&self) -> &str {
        &self.group_title
    }

    /// Add a command. Fails with `DuplicateCommand` if `name` is taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        help: Option<String>,
        description: Option<String>,
        handler: Handler,
        arguments: Vec<ArgumentDescriptor>,
    ) -> Result<&Command, RegistrationError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(RegistrationError::DuplicateCommand(name));
        }
        tracing::debug!(
            command = %name,
            arguments = arguments.len(),
            "registered command"
        );
        let slot = self.commands.len();
        self.index.insert(name.clone(), slot);
        self.commands.push(Command {
            name,
            help,
            description,
            handler,
            arguments,
        });
        Ok(&self.commands[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn lookup(&self, name: &str) -> Option<&Command> {
        self.index.get(name).map(|&i| &self.commands[i])
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Attach one subcommand per registered command to `parser`.
    pub fn configure(&self, parser: clap::Command) -> clap::Command {
        if self.commands.is_empty() {
            return parser;
        }
        parser
            .subcommand_help_heading(self.group_title.clone())
            .subcommands(self.commands.iter().map(Command::to_subcommand))
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("group_title", &self.group_title)
            .field("commands", &self.commands)
            .finish()
    }
}

/* --------------------------------- Tests ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::convert::Converters;
    use crate::cmd::hint::TypeHint;
    use crate::cmd::signature::Param;
    use serde_json::json;

    fn handler(v: Value) -> Handler {
        Box::new(move |_: Kwargs| -> Result<Value> { Ok(v.clone()) })
    }

    #[test]
    fn duplicate_name_keeps_first() {
        let mut reg = CommandRegistry::default();
        reg.register("test1", Some("first".into()), None, handler(json!(1)), vec![])
            .unwrap();
        let err = reg
            .register("test1", Some("second".into()), None, handler(json!(2)), vec![])
            .unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateCommand("test1".into()));
        assert_eq!(reg.len(), 1);
        let cmd = reg.lookup("test1").unwrap();
        assert_eq!(cmd.help(), Some("first"));
        assert_eq!(cmd.call(Kwargs::new()).unwrap(), json!(1));
    }

    #[test]
    fn lookup_absent() {
        let reg = CommandRegistry::default();
        assert!(reg.lookup("nope").is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn configure_adds_subcommands_in_order() {
        let mut reg = CommandRegistry::new("actions");
        let conv = Converters::builtin();
        let a = ArgumentDescriptor::derive(&Param::new("a").typed(TypeHint::Int), &conv).unwrap();
        reg.register("zeta", None, None, handler(json!(null)), vec![a])
            .unwrap();
        reg.register("alpha", None, Some("does alpha".into()), handler(json!(null)), vec![])
            .unwrap();

        let parser = reg.configure(clap::Command::new("app"));
        let names: Vec<_> = parser.get_subcommands().map(|s| s.get_name()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
        let zeta = parser.find_subcommand("zeta").unwrap();
        assert_eq!(zeta.get_arguments().filter(|a| a.get_id().as_str() == "a").count(), 1);
        assert_eq!(reg.group_title(), "actions");
    }
}
