//! Slash command toolkit
//!
//! Declares commands from parameter lists and documentation blocks, keeps a
//! remote command registry in step with the local declarations, and routes
//! inbound interactions back to the matching handler.
//!
//! - `command`: arguments, schema builder, commands and groups
//! - `registry`: per-scope command storage
//! - `sync`: reconciliation against the remote registry
//! - `interaction`: option resolution and dispatch
//! - `transport`: collaborator seams and the in-memory implementation

pub mod client; // Facade tying the pieces together
pub mod command; // Declaration model
pub mod config; // TOML configuration
pub mod error; // Error taxonomy
pub mod interaction; // Inbound payloads and routing
pub mod model; // Wire entities
pub mod registry; // Per-scope command registry
pub mod sync; // Remote reconciliation
pub mod transport; // Collaborator seams
pub mod utils; // Logging and anyhow helpers

pub use client::SlashClient;
pub use command::{
    Argument, ArgumentKind, ArgumentValue, Arguments, ChoiceValue, CommandGroup, CommandNode,
    CommandSchema, Parameter, SlashCommand,
};
pub use config::SlashConfig;
pub use error::{ErrorKind, SlashError, SlashResult};
pub use interaction::{
    DispatchOutcome, InteractionPayload, InteractionResponse, InvocationContext, OptionMap,
    OptionValue,
};
pub use model::Snowflake;
pub use registry::{CommandRegistry, CommandScope};
pub use sync::{Reconciler, SyncReport};
pub use transport::MemoryRemote;
