/*!
 * Command model
 *
 * Declaration side of the crate: arguments, the schema builder and its
 * documentation grammar, leaf commands, groups and the schema fragments they
 * project to.
 */

pub mod argument;
#[allow(clippy::module_inception)]
pub mod command;
pub mod docstring;
pub mod group;
pub mod handler;
pub mod named_map;
pub mod node;
pub mod option;
pub mod schema;
pub mod validate;

pub use argument::{Argument, ArgumentKind, ArgumentValue};
pub use command::{SlashCommand, SlashCommandBuilder};
pub use docstring::{parse_doc, ParsedDoc};
pub use group::CommandGroup;
pub use handler::{Arguments, CommandHandler, FnHandler, HandlerResult};
pub use named_map::NamedMap;
pub use node::CommandNode;
pub use option::{ChoiceValue, CommandOption, CommandSchema, OptionChoice, OptionKind};
pub use schema::{build_schema, Parameter, ParameterKind, Schema, SchemaOverrides};
pub use validate::{
    ARGUMENT_LIMIT, COMMAND_CHOICE_LIMIT, COMMAND_GROUP_LIMIT, COMMAND_LIMIT,
};
