// Wire-level entity types shared by conversion and resolution

pub mod entities;
pub mod snowflake;

pub use entities::{Channel, ChannelKind, Member, PartialMember, Role, User};
pub use snowflake::Snowflake;
