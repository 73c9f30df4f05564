/*!
 * Error taxonomy
 *
 * Declaration and registration errors surface synchronously while commands are
 * being built. Resolution, conversion and invocation errors abort a single
 * interaction. Transport errors come from the remote collaborator.
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A command, group or argument violates a structural invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("invalid {what} name '{name}'")]
    InvalidName { what: &'static str, name: String },

    #[error("invalid description for {what} '{owner}': must be 1-100 characters")]
    InvalidDescription { what: &'static str, owner: String },

    #[error("command '{command}' needs at least one parameter for the invocation context")]
    MissingContextParameter { command: String },

    #[error("command '{command}' cannot capture unbounded positional values ('{parameter}')")]
    VariadicParameter { command: String, parameter: String },

    #[error("argument '{argument}' has unsupported type '{annotation}'")]
    UnknownType { argument: String, annotation: String },

    #[error("command '{command}' declares argument '{argument}' more than once")]
    DuplicateArgument { command: String, argument: String },

    #[error("command '{command}' has {count} arguments, the limit is {limit}")]
    TooManyArguments {
        command: String,
        count: usize,
        limit: usize,
    },

    #[error("argument '{argument}' has {count} choices, the limit is {limit}")]
    TooManyChoices {
        argument: String,
        count: usize,
        limit: usize,
    },

    #[error("argument '{argument}' has an invalid choice name '{choice}'")]
    InvalidChoiceName { argument: String, choice: String },

    #[error("argument '{argument}' choice '{choice}' has an invalid value '{value}'")]
    InvalidChoiceValue {
        argument: String,
        choice: String,
        value: String,
    },

    #[error("argument '{argument}' of kind {kind} cannot restrict its values to choices")]
    ChoicesNotSupported { argument: String, kind: String },

    #[error("group '{group}' already contains '{child}'")]
    DuplicateChild { group: String, child: String },

    #[error("group '{group}' already holds {limit} commands")]
    GroupFull { group: String, limit: usize },

    #[error("command '{command}' has no handler")]
    MissingHandler { command: String },
}

/// Adding a top-level command to the registry failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("a command named '{name}' already exists in scope {scope}")]
    DuplicateCommand { name: String, scope: String },

    #[error("scope {scope} already holds {limit} commands")]
    ScopeFull { scope: String, limit: usize },
}

/// An inbound option tree could not be turned into values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("interaction carries no command data")]
    MissingData,

    #[error("option '{option}' has unknown kind {kind}")]
    UnknownOptionKind { option: String, kind: u8 },

    #[error("option '{option}' is not a valid {expected}")]
    MalformedValue {
        option: String,
        expected: &'static str,
    },

    #[error("option '{option}' references unknown user {id}")]
    UnknownUser { option: String, id: String },

    #[error("option '{option}' references unknown channel {id}")]
    UnknownChannel { option: String, id: String },

    #[error("option '{option}' references unknown role {id}")]
    UnknownRole { option: String, id: String },
}

/// A present value could not be converted to its argument's type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("argument '{argument}': '{value}' is not a whole number")]
    NotAnInteger { argument: String, value: String },

    #[error("argument '{argument}': '{value}' is not a boolean")]
    NotABoolean { argument: String, value: String },

    #[error("argument '{argument}' expected {expected}")]
    UnexpectedValue {
        argument: String,
        expected: &'static str,
    },

    #[error("argument '{argument}' needs a guild to resolve a {entity}")]
    MissingGuild {
        argument: String,
        entity: &'static str,
    },

    #[error("argument '{argument}': {entity} {id} not found")]
    NotFound {
        argument: String,
        entity: &'static str,
        id: String,
    },

    #[error("argument '{argument}': channel {id} is not a {expected}")]
    WrongChannelType {
        argument: String,
        expected: &'static str,
        id: String,
    },

    #[error("argument '{argument}': lookup failed: {source}")]
    Lookup {
        argument: String,
        #[source]
        source: TransportError,
    },
}

/// A command could not be run with the given options, or a response was
/// emitted twice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    #[error("command '{command}' is missing required argument '{argument}'")]
    MissingArgument { command: String, argument: String },

    #[error("interaction {interaction} was already responded to")]
    AlreadyResponded { interaction: String },

    #[error("handler for '{command}' failed: {message}")]
    Handler { command: String, message: String },
}

/// Failures reported by the remote collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("{operation} failed: {message}")]
    Request { operation: String, message: String },

    #[error("remote entry not found: {0}")]
    NotFound(String),

    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Umbrella error for every fallible operation in the crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlashError {
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type SlashResult<T> = Result<T, SlashError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Declaration,
    Registration,
    Resolution,
    Conversion,
    Invocation,
    Transport,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Declaration => "declaration",
            ErrorKind::Registration => "registration",
            ErrorKind::Resolution => "resolution",
            ErrorKind::Conversion => "conversion",
            ErrorKind::Invocation => "invocation",
            ErrorKind::Transport => "transport",
        }
    }

    /// Whether a requester should see a failure acknowledgement for this kind.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            ErrorKind::Resolution | ErrorKind::Conversion | ErrorKind::Invocation
        )
    }
}

impl SlashError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SlashError::Declaration(_) => ErrorKind::Declaration,
            SlashError::Registration(_) => ErrorKind::Registration,
            SlashError::Resolution(_) => ErrorKind::Resolution,
            SlashError::Conversion(_) => ErrorKind::Conversion,
            SlashError::Invocation(_) => ErrorKind::Invocation,
            SlashError::Transport(_) => ErrorKind::Transport,
        }
    }
}
