use anyhow::{Context, Result};
use std::ffi::OsString;
use serde_json::json;

use sigcli::utils::{self, output::render_result};
use sigcli::{Cli, CliConfig, CommandInfo, DispatchError, Param, RegistrationError, Signature, TypeHint};

/// sigcli demo - every subcommand below is derived from a declared parameter list.
///
/// Command layout:
///   sigcli add    <a:int> [--b <int>=3]
///   sigcli concat <a> <b>
///   sigcli multi  <a> [--b <value> ...]
///   sigcli close  [--switch]                 (switch defaults to true; flag turns it off)
///   sigcli greet  <name> [--greeting <str>] [--shout] [--times <int>]
///   sigcli serve  [--port <port>] [--host <str>]
///   sigcli ping
///
/// Global flags / env:
///   --debug        Debug logging
///   --quiet        Errors only
///   -v/--version   Print "sigcli <version>"
///   RUST_LOG       Overrides the level chosen by the flags
///
/// Output: string results are printed raw, other results as pretty JSON.
fn build_cli() -> Result<Cli, RegistrationError> {
    let mut cli = Cli::with_config(
        CliConfig::new()
            .prog("sigcli")
            .version(env!("CARGO_PKG_VERSION"))
            .description("Demo of handlers exposed as subcommands from their signatures")
            .group_name("commands"),
    );

    cli.register_type("port", |raw| {
        raw.parse::<u16>()
            .ok()
            .filter(|p| *p != 0)
            .map(|p| json!(p))
            .ok_or_else(|| format!("invalid port value: {raw:?}"))
    });

    cli.add_argument(Param::new("debug").typed(TypeHint::Bool).default(false))?;
    cli.add_argument(Param::new("quiet").typed(TypeHint::Bool).default(false))?;

    cli.command_with_args(
        CommandInfo::new().help("Add two integers"),
        Signature::new("add")
            .arg(Param::new("a").typed(TypeHint::Int))
            .arg(Param::new("b").typed(TypeHint::Int).default(3)),
        |kw| {
            let a: i64 = kw.get("a")?;
            let b: i64 = kw.get("b")?;
            a.checked_add(b).context("integer overflow")
        },
    )?;

    cli.command_with_args(
        CommandInfo::new().help("Join two untyped values"),
        Signature::new("concat")
            .doc("Untyped parameters arrive as the strings given on the command line.")
            .arg(Param::new("a"))
            .arg(Param::new("b")),
        |kw| Ok(format!("{}{}", kw.get::<String>("a")?, kw.get::<String>("b")?)),
    )?;

    cli.command_with_args(
        CommandInfo::new().help("Collect a repeated flag"),
        Signature::new("multi")
            .arg(Param::new("a"))
            .arg(Param::new("b").typed(TypeHint::List)),
        |kw| kw.get::<Vec<String>>("b"),
    )?;

    cli.command_with_args(
        CommandInfo::new().help("Toggle a switch that defaults to on"),
        Signature::new("close").arg(Param::new("switch").typed(TypeHint::Bool).default(true)),
        |kw| kw.get::<bool>("switch"),
    )?;

    cli.command_with_args(
        CommandInfo::new().help("Greet someone"),
        Signature::new("greet")
            .doc("Greet NAME, optionally louder and more than once.")
            .arg(Param::new("name").typed(TypeHint::Str))
            .kwarg(Param::new("greeting").typed(TypeHint::Str).default("Hello"))
            .kwarg(Param::new("shout").typed(TypeHint::Bool).default(false))
            .kwarg(Param::new("times").typed(TypeHint::Int).default(1)),
        |kw| {
            let mut line = format!("{}, {}!", kw.get::<String>("greeting")?, kw.get::<String>("name")?);
            if kw.get::<bool>("shout")? {
                line = line.to_uppercase();
            }
            let times = usize::try_from(kw.get::<i64>("times")?).context("times must not be negative")?;
            Ok(vec![line; times].join("\n"))
        },
    )?;

    cli.command_with_args(
        CommandInfo::new().help("Show the listen address that would be used"),
        Signature::new("serve")
            .arg(Param::new("port").typed(TypeHint::Named("port".into())).default(8080))
            .kwarg(Param::new("host").typed(TypeHint::Str).default("127.0.0.1")),
        |kw| {
            Ok(json!({
                "host": kw.get::<String>("host")?,
                "port": kw.get::<u16>("port")?,
            }))
        },
    )?;

    cli.command_with_args(
        CommandInfo::new().help("Reply with pong"),
        Signature::new("ping"),
        |_| Ok("pong"),
    )?;

    Ok(cli)
}

fn main() -> Result<()> {
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();

    // Initialize logging before registration so its events are kept
    utils::init_logging(utils::level_from_args(&args));

    let cli = build_cli().context("failed to register commands")?;

    let namespace = match cli.parse_args(args) {
        Ok(namespace) => namespace,
        Err(DispatchError::Usage(e)) => e.exit(),
        Err(e) => return Err(e.into()),
    };

    if let Some(value) = cli.invoke(namespace)?
        && !value.is_null()
    {
        println!("{}", render_result(&value));
    }
    Ok(())
}
