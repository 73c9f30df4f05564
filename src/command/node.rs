use futures::future::{BoxFuture, FutureExt};

use super::command::SlashCommand;
use super::group::CommandGroup;
use super::option::{CommandOption, CommandSchema};
use crate::error::SlashResult;
use crate::interaction::{InvocationContext, OptionMap};

/// A registered entry: either a leaf command or a group of further nodes.
#[derive(Debug, Clone)]
pub enum CommandNode {
    Command(SlashCommand),
    Group(CommandGroup),
}

impl CommandNode {
    pub fn name(&self) -> &str {
        match self {
            CommandNode::Command(c) => c.name(),
            CommandNode::Group(g) => g.name(),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            CommandNode::Command(c) => c.description(),
            CommandNode::Group(g) => g.description(),
        }
    }

    pub fn qualified_name(&self) -> String {
        match self {
            CommandNode::Command(c) => c.qualified_name(),
            CommandNode::Group(g) => g.qualified_name(),
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<String>) {
        match self {
            CommandNode::Command(c) => c.set_parent(parent),
            CommandNode::Group(g) => g.set_parent(parent),
        }
    }

    pub fn to_option(&self) -> CommandOption {
        match self {
            CommandNode::Command(c) => c.to_option(),
            CommandNode::Group(g) => g.to_option(),
        }
    }

    pub fn to_schema(&self) -> CommandSchema {
        match self {
            CommandNode::Command(c) => c.to_schema(),
            CommandNode::Group(g) => g.to_schema(),
        }
    }

    /// Boxed so groups can recurse into their children.
    pub fn invoke<'a>(
        &'a self,
        ctx: InvocationContext,
        options: &'a OptionMap,
    ) -> BoxFuture<'a, SlashResult<Option<String>>> {
        match self {
            CommandNode::Command(c) => c.invoke(ctx, options).boxed(),
            CommandNode::Group(g) => g.invoke(ctx, options).boxed(),
        }
    }
}

impl From<SlashCommand> for CommandNode {
    fn from(command: SlashCommand) -> Self {
        CommandNode::Command(command)
    }
}

impl From<CommandGroup> for CommandNode {
    fn from(group: CommandGroup) -> Self {
        CommandNode::Group(group)
    }
}
