// Inbound side: payloads, option resolution, invocation context, responses and routing

pub mod context;
pub mod options;
pub mod resolved;
pub mod response;
pub mod router;
pub mod types;

pub use context::InvocationContext;
pub use options::{OptionMap, OptionValue};
pub use resolved::{resolve_options, resolve_payload, ResolvedTables};
pub use response::{InteractionResponse, ResponseHandle};
pub use router::{DispatchOutcome, InteractionRouter};
pub use types::{CommandData, InteractionKind, InteractionPayload, RawOption, ResolvedData};
