/*!
 * Leaf commands
 *
 * A `SlashCommand` owns its argument schema and an async handler. It is built
 * once through `SlashCommandBuilder` and is immutable in shape afterwards.
 */

use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use super::argument::Argument;
use super::handler::{Arguments, CommandHandler, FnHandler, HandlerResult};
use super::option::{ChoiceValue, CommandOption, CommandSchema, OptionKind};
use super::schema::{build_schema, Parameter, SchemaOverrides};
use super::validate::{is_valid_description, is_valid_name};
use crate::error::{DeclarationError, InvocationError, SlashResult};
use crate::interaction::{InvocationContext, OptionMap};

#[derive(Clone)]
pub struct SlashCommand {
    name: String,
    description: String,
    arguments: Vec<Argument>,
    handler: Arc<dyn CommandHandler>,
    parent: Option<String>,
}

impl SlashCommand {
    pub fn builder(name: impl Into<String>) -> SlashCommandBuilder {
        SlashCommandBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name() == name)
    }

    /// Space-separated path of the groups above this command, if any.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Full invocation path, e.g. `settings notifications enabled`.
    pub fn qualified_name(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{parent} {}", self.name),
            None => self.name.clone(),
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<String>) {
        self.parent = parent;
    }

    pub fn options(&self) -> Vec<CommandOption> {
        self.arguments.iter().map(Argument::to_option).collect()
    }

    /// Projection as a sub-command node inside a group.
    pub fn to_option(&self) -> CommandOption {
        CommandOption {
            kind: OptionKind::SubCommand,
            name: self.name.clone(),
            description: self.description.clone(),
            required: false,
            choices: Vec::new(),
            options: self.options(),
        }
    }

    /// Projection as a top-level registration payload.
    pub fn to_schema(&self) -> CommandSchema {
        CommandSchema {
            name: self.name.clone(),
            description: self.description.clone(),
            options: self.options(),
        }
    }

    /// Converts every supplied option and runs the handler.
    pub async fn invoke(
        &self,
        ctx: InvocationContext,
        options: &OptionMap,
    ) -> SlashResult<Option<String>> {
        let mut args = Arguments::new();
        for argument in &self.arguments {
            match options.get(argument.name()) {
                Some(value) => {
                    let converted = argument.convert(value, &ctx).await?;
                    args.insert(argument.name(), converted);
                }
                None if argument.required() => {
                    return Err(InvocationError::MissingArgument {
                        command: self.qualified_name(),
                        argument: argument.name().to_string(),
                    }
                    .into());
                }
                None => {}
            }
        }

        debug!(command = %self.qualified_name(), arguments = args.len(), "invoking handler");
        self.handler.call(ctx, args).await.map_err(|e| {
            InvocationError::Handler {
                command: self.qualified_name(),
                message: format!("{e:#}"),
            }
            .into()
        })
    }
}

impl std::fmt::Debug for SlashCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlashCommand")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("arguments", &self.arguments)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

/// Declares a command from a parameter list, a documentation block and
/// explicit overrides.
pub struct SlashCommandBuilder {
    name: String,
    doc: Option<String>,
    parameters: Vec<Parameter>,
    overrides: SchemaOverrides,
    handler: Option<Arc<dyn CommandHandler>>,
}

impl SlashCommandBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            parameters: Vec::new(),
            overrides: SchemaOverrides::default(),
            handler: None,
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// The reserved first parameter that receives the invocation context.
    pub fn context(mut self, name: impl Into<String>) -> Self {
        self.parameters.insert(0, Parameter::named(name));
        self
    }

    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn rest(self, name: impl Into<String>) -> Self {
        self.param(Parameter::rest(name))
    }

    pub fn variadic(self, name: impl Into<String>) -> Self {
        self.param(Parameter::variadic(name))
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.overrides.description = Some(description.into());
        self
    }

    pub fn arg_type(mut self, argument: impl Into<String>, token: impl Into<String>) -> Self {
        self.overrides.arg_types.insert(argument, token.into());
        self
    }

    pub fn arg_description(
        mut self,
        argument: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.overrides
            .arg_descriptions
            .insert(argument, description.into());
        self
    }

    pub fn arg_choices<I, N, V>(mut self, argument: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<ChoiceValue>,
    {
        let choices = choices
            .into_iter()
            .map(|(n, v)| (n.into(), v.into()))
            .collect();
        self.overrides.arg_choices.insert(argument, choices);
        self
    }

    pub fn handler<F, Fut>(mut self, func: F) -> Self
    where
        F: Fn(InvocationContext, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.handler = Some(Arc::new(FnHandler::new(func)));
        self
    }

    pub fn handler_arc(mut self, handler: Arc<dyn CommandHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn build(self) -> Result<SlashCommand, DeclarationError> {
        if !is_valid_name(&self.name) {
            return Err(DeclarationError::InvalidName {
                what: "command",
                name: self.name,
            });
        }

        let schema = build_schema(
            &self.name,
            &self.parameters,
            self.doc.as_deref(),
            &self.overrides,
        )?;
        if !is_valid_description(&schema.description) {
            return Err(DeclarationError::InvalidDescription {
                what: "command",
                owner: self.name,
            });
        }

        let handler = self
            .handler
            .ok_or_else(|| DeclarationError::MissingHandler {
                command: self.name.clone(),
            })?;

        Ok(SlashCommand {
            name: self.name,
            description: schema.description,
            arguments: schema.arguments,
            handler,
            parent: None,
        })
    }
}
