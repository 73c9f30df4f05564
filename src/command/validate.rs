/*!
 * Structural limits and validators for names, descriptions and choices
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Top-level commands per scope
pub const COMMAND_LIMIT: usize = 100;
/// Children per group
pub const COMMAND_GROUP_LIMIT: usize = 25;
/// Choices per argument
pub const COMMAND_CHOICE_LIMIT: usize = 25;
/// Arguments per command
pub const ARGUMENT_LIMIT: usize = 25;

pub const NAME_MAX_LEN: usize = 32;
pub const DESCRIPTION_MAX_LEN: usize = 100;
pub const CHOICE_NAME_MAX_LEN: usize = 100;
pub const CHOICE_VALUE_MAX_LEN: usize = 100;

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w-]{1,32}$").expect("name pattern is a valid regex"));

pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

pub fn is_valid_description(description: &str) -> bool {
    let len = description.chars().count();
    !description.trim().is_empty() && len <= DESCRIPTION_MAX_LEN
}

pub fn is_valid_choice_name(name: &str) -> bool {
    let len = name.chars().count();
    len > 0 && len <= CHOICE_NAME_MAX_LEN
}

pub fn is_valid_choice_text(value: &str) -> bool {
    let len = value.chars().count();
    len > 0 && len <= CHOICE_VALUE_MAX_LEN
}
