/*!
Signature-driven subcommands.

Layout:
  src/cmd/
    mod.rs          (this file: module declarations + re-exports)
    hint.rs         (TypeHint: declared parameter types)
    convert.rs      (Converters: token -> value functions keyed by type name)
    signature.rs    (Param / Signature / FullArgSpec: declared parameter lists)
    descriptor.rs   (ArgumentDescriptor: derivation rules + clap::Arg translation)
    registry.rs     (CommandRegistry: unique named commands, clap subcommands)
    kwargs.rs       (Kwargs / Namespace: parsed values handed to handlers)
    dispatch.rs     (Cli: registration entry points, argv -> handler dispatch)

Conventions:
  - Registration returns `Result<_, RegistrationError>` and never leaves a
    half-registered command behind.
  - Handlers are `Fn(Kwargs) -> anyhow::Result<impl Serialize>`; their errors
    are passed back unchanged.
  - Parsing, help and usage errors belong to clap.
*/

pub mod convert;
pub mod descriptor;
pub mod dispatch;
pub mod hint;
pub mod kwargs;
pub mod registry;
pub mod signature;

pub use convert::{Converter, Converters};
pub use descriptor::{ArgKind, ArgumentDescriptor};
pub use dispatch::{Cli, CommandInfo};
pub use hint::TypeHint;
pub use kwargs::{Kwargs, Namespace};
pub use registry::{Command, CommandRegistry, Handler};
pub use signature::{FullArgSpec, Param, ParamKind, Signature};
