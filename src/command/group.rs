use tracing::debug;

use super::named_map::NamedMap;
use super::node::CommandNode;
use super::option::{CommandOption, CommandSchema, OptionKind};
use super::validate::{is_valid_description, is_valid_name, COMMAND_GROUP_LIMIT};
use crate::error::{DeclarationError, SlashResult};
use crate::interaction::{InvocationContext, OptionMap, OptionValue};

/// Named container of sub-commands and sub-groups.
///
/// At the top level a group is what the remote registry calls a command; one
/// level down it renders as a sub-command group.
#[derive(Debug, Clone)]
pub struct CommandGroup {
    name: String,
    description: String,
    children: NamedMap<CommandNode>,
    parent: Option<String>,
}

impl CommandGroup {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, DeclarationError> {
        let name = name.into();
        let description = description.into();
        if !is_valid_name(&name) {
            return Err(DeclarationError::InvalidName { what: "group", name });
        }
        if !is_valid_description(&description) {
            return Err(DeclarationError::InvalidDescription {
                what: "group",
                owner: name,
            });
        }

        Ok(Self {
            name,
            description,
            children: NamedMap::new(),
            parent: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn qualified_name(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{parent} {}", self.name),
            None => self.name.clone(),
        }
    }

    /// Re-roots this group and every descendant under `parent`.
    pub(crate) fn set_parent(&mut self, parent: Option<String>) {
        self.parent = parent;
        let path = self.qualified_name();
        for child in self.children.values_mut() {
            child.set_parent(Some(path.clone()));
        }
    }

    pub fn add_command(&mut self, child: impl Into<CommandNode>) -> Result<(), DeclarationError> {
        let mut child = child.into();
        if self.children.contains_key(child.name()) {
            return Err(DeclarationError::DuplicateChild {
                group: self.qualified_name(),
                child: child.name().to_string(),
            });
        }
        if self.children.len() >= COMMAND_GROUP_LIMIT {
            return Err(DeclarationError::GroupFull {
                group: self.qualified_name(),
                limit: COMMAND_GROUP_LIMIT,
            });
        }

        child.set_parent(Some(self.qualified_name()));
        self.children.insert(child.name().to_string(), child);
        Ok(())
    }

    pub fn remove_command(&mut self, name: &str) -> Option<CommandNode> {
        let mut child = self.children.remove(name)?;
        child.set_parent(None);
        Some(child)
    }

    pub fn get_command(&self, name: &str) -> Option<&CommandNode> {
        self.children.get(name)
    }

    pub fn commands(&self) -> impl Iterator<Item = &CommandNode> {
        self.children.iter().map(|(_, child)| child)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn options(&self) -> Vec<CommandOption> {
        self.commands().map(CommandNode::to_option).collect()
    }

    pub fn to_option(&self) -> CommandOption {
        CommandOption {
            kind: OptionKind::SubCommandGroup,
            name: self.name.clone(),
            description: self.description.clone(),
            required: false,
            choices: Vec::new(),
            options: self.options(),
        }
    }

    pub fn to_schema(&self) -> CommandSchema {
        CommandSchema {
            name: self.name.clone(),
            description: self.description.clone(),
            options: self.options(),
        }
    }

    /// Routes to the child whose name appears as a key of `options`.
    ///
    /// No matching key is not an error: the group simply produces nothing.
    pub async fn invoke(
        &self,
        ctx: InvocationContext,
        options: &OptionMap,
    ) -> SlashResult<Option<String>> {
        for (name, child) in self.children.iter() {
            if let Some(OptionValue::Nested(inner)) = options.get(name) {
                return child.invoke(ctx, inner).await;
            }
        }

        debug!(group = %self.qualified_name(), "no sub-command selected");
        Ok(None)
    }
}
