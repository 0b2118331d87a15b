//! Top-level settings of a `Cli`: program name, version, help texts and the
//! behavior switches handed to clap.

use std::path::Path;

use crate::cmd::registry::DEFAULT_GROUP_TITLE;

/// Settings for the top-level parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliConfig {
    /// Program name shown in usage and `--version`. Defaults to the basename
    /// of argv[0].
    pub prog: Option<String>,
    /// Enables `-v` / `--version` printing `<prog> <version>`.
    pub version: Option<String>,
    /// Replaces the generated usage line.
    pub usage: Option<String>,
    pub description: Option<String>,
    /// Text printed after the argument help.
    pub epilog: Option<String>,
    /// Heading of the subcommand listing.
    pub group_name: String,
    /// Adds `-h` / `--help` to the top-level parser.
    pub add_help: bool,
    /// Makes a missing subcommand a usage error instead of a no-op.
    pub require_command: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            prog: None,
            version: None,
            usage: None,
            description: None,
            epilog: None,
            group_name: DEFAULT_GROUP_TITLE.to_string(),
            add_help: true,
            require_command: false,
        }
    }
}

impl CliConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prog(mut self, prog: impl Into<String>) -> Self {
        self.prog = Some(prog.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn epilog(mut self, epilog: impl Into<String>) -> Self {
        self.epilog = Some(epilog.into());
        self
    }

    pub fn group_name(mut self, name: impl Into<String>) -> Self {
        self.group_name = name.into();
        self
    }

    pub fn add_help(mut self, enabled: bool) -> Self {
        self.add_help = enabled;
        self
    }

    pub fn require_command(mut self, required: bool) -> Self {
        self.require_command = required;
        self
    }

    /// Effective program name.
    pub fn prog_name(&self) -> String {
        self.prog.clone().unwrap_or_else(default_prog)
    }
}

fn default_prog() -> String {
    std::env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "cli".to_string())
}
