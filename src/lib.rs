//! sigcli - expose plain handlers as clap subcommands.
//!
//! Declare a handler's parameters (name, optional default, optional type
//! hint); sigcli derives the matching positionals and flags, parses argv with
//! clap and calls the handler with keyword arguments.
//!
//! ```no_run
//! use sigcli::{Cli, CliConfig, Param, Signature, TypeHint};
//!
//! let mut cli = Cli::with_config(CliConfig::new().prog("app").version("v1.0.0"));
//! cli.command(
//!     Signature::new("add")
//!         .arg(Param::new("a").typed(TypeHint::Int))
//!         .arg(Param::new("b").typed(TypeHint::Int).default(3)),
//!     |kw| Ok(kw.get::<i64>("a")? + kw.get::<i64>("b")?),
//! )?;
//! let result = cli.run(["add", "1"])?;
//! assert_eq!(result, Some(serde_json::json!(4)));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cmd;
pub mod config;
pub mod error;
pub mod utils;

pub use cmd::{
    ArgKind, ArgumentDescriptor, Cli, Command, CommandInfo, CommandRegistry, Converter,
    Converters, FullArgSpec, Kwargs, Namespace, Param, ParamKind, Signature, TypeHint,
};
pub use config::CliConfig;
pub use error::{DispatchError, RegistrationError};
