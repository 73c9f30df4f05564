/*!
 * Command arguments
 *
 * An argument is a typed, named, described input slot. Its kind is a closed
 * enumeration: every kind knows its wire option type and how to turn an
 * inbound value into a typed `ArgumentValue`.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use super::option::{ChoiceValue, CommandOption, OptionChoice, OptionKind};
use super::validate::{
    is_valid_choice_name, is_valid_choice_text, is_valid_description, is_valid_name,
    COMMAND_CHOICE_LIMIT,
};
use crate::error::{ConversionError, DeclarationError};
use crate::interaction::{InvocationContext, OptionValue};
use crate::model::{Channel, ChannelKind, Member, Role, Snowflake, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentKind {
    String,
    Integer,
    Boolean,
    User,
    Member,
    Channel,
    TextChannel,
    VoiceChannel,
    CategoryChannel,
    Role,
}

impl ArgumentKind {
    /// Maps a declared type token to a kind, e.g. `int`, `TextChannel`,
    /// `discord.Member`. Matching is case-insensitive.
    pub fn from_annotation(token: &str) -> Option<Self> {
        let token = token.trim();
        let last = token
            .rsplit(|c| c == '.' || c == ':')
            .next()
            .unwrap_or(token);
        let normalized: String = last
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        let kind = match normalized.as_str() {
            "str" | "string" => ArgumentKind::String,
            "int" | "integer" | "i64" => ArgumentKind::Integer,
            "bool" | "boolean" => ArgumentKind::Boolean,
            "user" => ArgumentKind::User,
            "member" => ArgumentKind::Member,
            "channel" | "guildchannel" => ArgumentKind::Channel,
            "textchannel" => ArgumentKind::TextChannel,
            "voicechannel" => ArgumentKind::VoiceChannel,
            "categorychannel" => ArgumentKind::CategoryChannel,
            "role" => ArgumentKind::Role,
            _ => return None,
        };
        Some(kind)
    }

    pub fn option_kind(&self) -> OptionKind {
        match self {
            ArgumentKind::String => OptionKind::String,
            ArgumentKind::Integer => OptionKind::Integer,
            ArgumentKind::Boolean => OptionKind::Boolean,
            ArgumentKind::User | ArgumentKind::Member => OptionKind::User,
            ArgumentKind::Channel
            | ArgumentKind::TextChannel
            | ArgumentKind::VoiceChannel
            | ArgumentKind::CategoryChannel => OptionKind::Channel,
            ArgumentKind::Role => OptionKind::Role,
        }
    }

    pub fn supports_choices(&self) -> bool {
        matches!(self, ArgumentKind::String | ArgumentKind::Integer)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArgumentKind::String => "string",
            ArgumentKind::Integer => "integer",
            ArgumentKind::Boolean => "boolean",
            ArgumentKind::User => "user",
            ArgumentKind::Member => "member",
            ArgumentKind::Channel => "channel",
            ArgumentKind::TextChannel => "text-channel",
            ArgumentKind::VoiceChannel => "voice-channel",
            ArgumentKind::CategoryChannel => "category-channel",
            ArgumentKind::Role => "role",
        }
    }

    fn required_channel_kind(&self) -> Option<ChannelKind> {
        match self {
            ArgumentKind::TextChannel => Some(ChannelKind::Text),
            ArgumentKind::VoiceChannel => Some(ChannelKind::Voice),
            ArgumentKind::CategoryChannel => Some(ChannelKind::Category),
            _ => None,
        }
    }
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A converted argument value handed to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    User(User),
    Member(Member),
    Channel(Channel),
    Role(Role),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    name: String,
    description: String,
    required: bool,
    kind: ArgumentKind,
    choices: Vec<OptionChoice>,
}

impl Argument {
    pub fn new(
        name: impl Into<String>,
        kind: ArgumentKind,
        description: impl Into<String>,
        required: bool,
    ) -> Result<Self, DeclarationError> {
        let name = name.into();
        let description = description.into();
        if !is_valid_name(&name) {
            return Err(DeclarationError::InvalidName {
                what: "argument",
                name,
            });
        }
        if !is_valid_description(&description) {
            return Err(DeclarationError::InvalidDescription {
                what: "argument",
                owner: name,
            });
        }

        Ok(Self {
            name,
            description,
            required,
            kind,
            choices: Vec::new(),
        })
    }

    /// Restricts the argument to the given ordered choices.
    pub fn with_choices<I, N>(mut self, choices: I) -> Result<Self, DeclarationError>
    where
        I: IntoIterator<Item = (N, ChoiceValue)>,
        N: Into<String>,
    {
        let choices: Vec<(String, ChoiceValue)> =
            choices.into_iter().map(|(n, v)| (n.into(), v)).collect();
        if choices.is_empty() {
            return Ok(self);
        }
        if !self.kind.supports_choices() {
            return Err(DeclarationError::ChoicesNotSupported {
                argument: self.name,
                kind: self.kind.to_string(),
            });
        }
        if choices.len() > COMMAND_CHOICE_LIMIT {
            return Err(DeclarationError::TooManyChoices {
                argument: self.name,
                count: choices.len(),
                limit: COMMAND_CHOICE_LIMIT,
            });
        }

        let mut out: Vec<OptionChoice> = Vec::with_capacity(choices.len());
        for (choice, value) in choices {
            if !is_valid_choice_name(&choice) || out.iter().any(|c| c.name == choice) {
                return Err(DeclarationError::InvalidChoiceName {
                    argument: self.name,
                    choice,
                });
            }
            let value = self.coerce_choice_value(&choice, value)?;
            out.push(OptionChoice {
                name: choice,
                value,
            });
        }

        self.choices = out;
        Ok(self)
    }

    fn coerce_choice_value(
        &self,
        choice: &str,
        value: ChoiceValue,
    ) -> Result<ChoiceValue, DeclarationError> {
        let invalid = |value: &ChoiceValue| DeclarationError::InvalidChoiceValue {
            argument: self.name.clone(),
            choice: choice.to_string(),
            value: value.to_string(),
        };

        match (self.kind, value) {
            (ArgumentKind::Integer, ChoiceValue::Integer(v)) => Ok(ChoiceValue::Integer(v)),
            (ArgumentKind::Integer, ChoiceValue::String(text)) => text
                .trim()
                .parse::<i64>()
                .map(ChoiceValue::Integer)
                .map_err(|_| invalid(&ChoiceValue::String(text))),
            (_, ChoiceValue::Integer(v)) => Ok(ChoiceValue::String(v.to_string())),
            (_, ChoiceValue::String(text)) if is_valid_choice_text(&text) => {
                Ok(ChoiceValue::String(text))
            }
            (_, other) => Err(invalid(&other)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn kind(&self) -> ArgumentKind {
        self.kind
    }

    pub fn choices(&self) -> &[OptionChoice] {
        &self.choices
    }

    pub fn to_option(&self) -> CommandOption {
        CommandOption {
            kind: self.kind.option_kind(),
            name: self.name.clone(),
            description: self.description.clone(),
            required: self.required,
            choices: self.choices.clone(),
            options: Vec::new(),
        }
    }

    /// Converts an inbound value to this argument's type.
    ///
    /// Entity kinds accept already-resolved entities or raw ids; raw ids are
    /// looked up through the context's entity provider.
    pub async fn convert(
        &self,
        value: &OptionValue,
        ctx: &InvocationContext,
    ) -> Result<ArgumentValue, ConversionError> {
        match self.kind {
            ArgumentKind::String => self.convert_string(value),
            ArgumentKind::Integer => self.convert_integer(value),
            ArgumentKind::Boolean => self.convert_boolean(value),
            ArgumentKind::User => self.convert_user(value, ctx).await,
            ArgumentKind::Member => self.convert_member(value, ctx).await.map(ArgumentValue::Member),
            ArgumentKind::Channel
            | ArgumentKind::TextChannel
            | ArgumentKind::VoiceChannel
            | ArgumentKind::CategoryChannel => {
                let channel = self.convert_channel(value, ctx).await?;
                match self.kind.required_channel_kind() {
                    Some(expected) if channel.kind != expected => {
                        Err(ConversionError::WrongChannelType {
                            argument: self.name.clone(),
                            expected: expected.as_str(),
                            id: channel.id.to_string(),
                        })
                    }
                    _ => Ok(ArgumentValue::Channel(channel)),
                }
            }
            ArgumentKind::Role => self.convert_role(value, ctx).await.map(ArgumentValue::Role),
        }
    }

    fn unexpected(&self, expected: &'static str) -> ConversionError {
        ConversionError::UnexpectedValue {
            argument: self.name.clone(),
            expected,
        }
    }

    fn not_found(&self, entity: &'static str, id: Snowflake) -> ConversionError {
        ConversionError::NotFound {
            argument: self.name.clone(),
            entity,
            id: id.to_string(),
        }
    }

    fn lookup_failed(&self) -> impl FnOnce(crate::error::TransportError) -> ConversionError + '_ {
        move |source| ConversionError::Lookup {
            argument: self.name.clone(),
            source,
        }
    }

    fn raw_id(&self, value: &OptionValue) -> Result<Snowflake, ConversionError> {
        match value {
            OptionValue::String(text) => text.parse().map_err(|_| self.unexpected("an id")),
            OptionValue::Integer(v) => u64::try_from(*v)
                .map(Snowflake)
                .map_err(|_| self.unexpected("an id")),
            _ => Err(self.unexpected("an id")),
        }
    }

    fn convert_string(&self, value: &OptionValue) -> Result<ArgumentValue, ConversionError> {
        match value {
            OptionValue::String(text) => Ok(ArgumentValue::String(text.clone())),
            OptionValue::Integer(v) => Ok(ArgumentValue::String(v.to_string())),
            OptionValue::Boolean(v) => Ok(ArgumentValue::String(v.to_string())),
            _ => Err(self.unexpected("text")),
        }
    }

    fn convert_integer(&self, value: &OptionValue) -> Result<ArgumentValue, ConversionError> {
        match value {
            OptionValue::Integer(v) => Ok(ArgumentValue::Integer(*v)),
            OptionValue::String(text) => text
                .trim()
                .parse::<i64>()
                .map(ArgumentValue::Integer)
                .map_err(|_| ConversionError::NotAnInteger {
                    argument: self.name.clone(),
                    value: text.clone(),
                }),
            _ => Err(self.unexpected("a whole number")),
        }
    }

    fn convert_boolean(&self, value: &OptionValue) -> Result<ArgumentValue, ConversionError> {
        match value {
            OptionValue::Boolean(v) => Ok(ArgumentValue::Boolean(*v)),
            OptionValue::Integer(v) => Ok(ArgumentValue::Boolean(*v != 0)),
            OptionValue::String(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(ArgumentValue::Boolean(true)),
                "false" => Ok(ArgumentValue::Boolean(false)),
                _ => Err(ConversionError::NotABoolean {
                    argument: self.name.clone(),
                    value: text.clone(),
                }),
            },
            _ => Err(self.unexpected("a boolean")),
        }
    }

    async fn convert_user(
        &self,
        value: &OptionValue,
        ctx: &InvocationContext,
    ) -> Result<ArgumentValue, ConversionError> {
        match value {
            OptionValue::User(user) => return Ok(ArgumentValue::User(user.clone())),
            OptionValue::Member(member) => return Ok(ArgumentValue::Member(member.clone())),
            _ => {}
        }

        let id = self.raw_id(value)?;
        if let Some(guild) = ctx.guild_id {
            let member = ctx
                .entities()
                .member(guild, id)
                .await
                .map_err(self.lookup_failed())?;
            return member
                .map(ArgumentValue::Member)
                .ok_or_else(|| self.not_found("member", id));
        }

        let user = ctx.entities().user(id).await.map_err(self.lookup_failed())?;
        user.map(ArgumentValue::User)
            .ok_or_else(|| self.not_found("user", id))
    }

    async fn convert_member(
        &self,
        value: &OptionValue,
        ctx: &InvocationContext,
    ) -> Result<Member, ConversionError> {
        let id = match value {
            OptionValue::Member(member) => return Ok(member.clone()),
            OptionValue::User(user) => user.id,
            other => self.raw_id(other)?,
        };

        let guild = ctx.guild_id.ok_or_else(|| ConversionError::MissingGuild {
            argument: self.name.clone(),
            entity: "member",
        })?;
        ctx.entities()
            .member(guild, id)
            .await
            .map_err(self.lookup_failed())?
            .ok_or_else(|| self.not_found("member", id))
    }

    async fn convert_channel(
        &self,
        value: &OptionValue,
        ctx: &InvocationContext,
    ) -> Result<Channel, ConversionError> {
        if let OptionValue::Channel(channel) = value {
            return Ok(channel.clone());
        }

        let id = self.raw_id(value)?;
        ctx.entities()
            .channel(ctx.guild_id, id)
            .await
            .map_err(self.lookup_failed())?
            .ok_or_else(|| self.not_found("channel", id))
    }

    async fn convert_role(
        &self,
        value: &OptionValue,
        ctx: &InvocationContext,
    ) -> Result<Role, ConversionError> {
        if let OptionValue::Role(role) = value {
            return Ok(role.clone());
        }

        let id = self.raw_id(value)?;
        let guild = ctx.guild_id.ok_or_else(|| ConversionError::MissingGuild {
            argument: self.name.clone(),
            entity: "role",
        })?;
        ctx.entities()
            .role(guild, id)
            .await
            .map_err(self.lookup_failed())?
            .ok_or_else(|| self.not_found("role", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::ResponseHandle;
    use crate::transport::MemoryRemote;
    use std::sync::Arc;

    fn context(remote: &Arc<MemoryRemote>, guild: Option<u64>) -> InvocationContext {
        InvocationContext::new(
            Snowflake(1),
            guild.map(Snowflake),
            remote.clone(),
            ResponseHandle::new(Snowflake(1), "token", remote.clone()),
        )
    }

    #[test]
    fn annotation_table() {
        assert_eq!(ArgumentKind::from_annotation("str"), Some(ArgumentKind::String));
        assert_eq!(ArgumentKind::from_annotation(" int "), Some(ArgumentKind::Integer));
        assert_eq!(
            ArgumentKind::from_annotation("discord.TextChannel"),
            Some(ArgumentKind::TextChannel)
        );
        assert_eq!(
            ArgumentKind::from_annotation("GuildChannel"),
            Some(ArgumentKind::Channel)
        );
        assert_eq!(
            ArgumentKind::from_annotation("category_channel"),
            Some(ArgumentKind::CategoryChannel)
        );
        assert_eq!(ArgumentKind::from_annotation("float"), None);
    }

    #[test]
    fn twenty_sixth_choice_is_rejected() {
        let arg = Argument::new("pick", ArgumentKind::String, "Pick one.", true).unwrap();
        let choices: Vec<(String, ChoiceValue)> = (0..26)
            .map(|i| (format!("c{i}"), ChoiceValue::from(format!("v{i}"))))
            .collect();
        let err = arg.clone().with_choices(choices.clone()).unwrap_err();
        assert!(matches!(err, DeclarationError::TooManyChoices { count: 26, .. }));

        let ok = arg.with_choices(choices.into_iter().take(25)).unwrap();
        assert_eq!(ok.choices().len(), 25);
    }

    #[test]
    fn choices_are_typed_by_kind() {
        let arg = Argument::new("n", ArgumentKind::Integer, "A number.", false)
            .unwrap()
            .with_choices([("one", ChoiceValue::from("1"))])
            .unwrap();
        assert_eq!(arg.choices()[0].value, ChoiceValue::Integer(1));

        let err = Argument::new("n", ArgumentKind::Integer, "A number.", false)
            .unwrap()
            .with_choices([("one", ChoiceValue::from("uno"))])
            .unwrap_err();
        assert!(matches!(err, DeclarationError::InvalidChoiceValue { .. }));

        let err = Argument::new("who", ArgumentKind::User, "Someone.", false)
            .unwrap()
            .with_choices([("me", ChoiceValue::from("1"))])
            .unwrap_err();
        assert!(matches!(err, DeclarationError::ChoicesNotSupported { .. }));
    }

    #[test]
    fn invalid_names_and_descriptions() {
        assert!(matches!(
            Argument::new("bad name", ArgumentKind::String, "x", true),
            Err(DeclarationError::InvalidName { .. })
        ));
        assert!(matches!(
            Argument::new("ok", ArgumentKind::String, "", true),
            Err(DeclarationError::InvalidDescription { .. })
        ));
    }

    #[test]
    fn scalar_conversions() {
        let remote = Arc::new(MemoryRemote::new());
        let ctx = context(&remote, None);
        let int = Argument::new("count", ArgumentKind::Integer, "How many.", true).unwrap();

        let converted = tokio_test::block_on(int.convert(&OptionValue::String("42".into()), &ctx));
        assert_eq!(converted, Ok(ArgumentValue::Integer(42)));

        let err = tokio_test::block_on(int.convert(&OptionValue::String("ten".into()), &ctx));
        assert!(matches!(err, Err(ConversionError::NotAnInteger { .. })));

        let flag = Argument::new("on", ArgumentKind::Boolean, "Toggle.", true).unwrap();
        let converted = tokio_test::block_on(flag.convert(&OptionValue::String("TRUE".into()), &ctx));
        assert_eq!(converted, Ok(ArgumentValue::Boolean(true)));
    }

    #[tokio::test]
    async fn entity_lookups_use_guild_context() {
        let remote = Arc::new(MemoryRemote::new());
        let guild = Snowflake(500);
        remote.insert_member(guild, Member::from_parts(User::new(7u64, "bob"), Default::default()));
        remote.insert_channel(Channel::new(11u64, "lobby", ChannelKind::Voice));

        let member = Argument::new("who", ArgumentKind::Member, "Someone.", true).unwrap();
        let value = OptionValue::String("7".into());

        let converted = member.convert(&value, &context(&remote, Some(500))).await.unwrap();
        assert!(matches!(converted, ArgumentValue::Member(m) if m.user.username == "bob"));

        let err = member.convert(&value, &context(&remote, None)).await.unwrap_err();
        assert!(matches!(err, ConversionError::MissingGuild { .. }));

        let text = Argument::new("where", ArgumentKind::TextChannel, "A channel.", true).unwrap();
        let err = text
            .convert(&OptionValue::String("11".into()), &context(&remote, Some(500)))
            .await
            .unwrap_err();
        assert!(matches!(err, ConversionError::WrongChannelType { .. }));

        let voice = Argument::new("where", ArgumentKind::VoiceChannel, "A channel.", true).unwrap();
        assert!(voice
            .convert(&OptionValue::String("11".into()), &context(&remote, Some(500)))
            .await
            .is_ok());
    }
}
