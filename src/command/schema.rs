/*!
 * Schema builder
 *
 * Turns a declared parameter list plus an optional documentation block into an
 * ordered argument list and a top-level description. Explicit overrides win
 * over the documentation block, which wins over parameter annotations.
 */

use tracing::debug;

use super::argument::{Argument, ArgumentKind};
use super::docstring::parse_doc;
use super::named_map::NamedMap;
use super::option::ChoiceValue;
use super::validate::ARGUMENT_LIMIT;
use crate::error::DeclarationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// A single named value.
    Named,
    /// Captures unbounded positional values; never accepted.
    Variadic,
    /// Captures arbitrary extra named values; enables extra-argument mode.
    Rest,
}

/// One parameter of a handler's declared signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
    pub annotation: Option<String>,
    pub has_default: bool,
}

impl Parameter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParameterKind::Named,
            annotation: None,
            has_default: false,
        }
    }

    pub fn variadic(name: impl Into<String>) -> Self {
        Self {
            kind: ParameterKind::Variadic,
            ..Self::named(name)
        }
    }

    pub fn rest(name: impl Into<String>) -> Self {
        Self {
            kind: ParameterKind::Rest,
            ..Self::named(name)
        }
    }

    /// Sets the type token, e.g. `int` or `TextChannel`.
    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// Marks the parameter as having a default value, which makes it optional.
    pub fn optional(mut self) -> Self {
        self.has_default = true;
        self
    }
}

/// Caller-supplied metadata that takes precedence over the documentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaOverrides {
    pub description: Option<String>,
    pub arg_types: NamedMap<String>,
    pub arg_descriptions: NamedMap<String>,
    pub arg_choices: NamedMap<Vec<(String, ChoiceValue)>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub description: String,
    pub arguments: Vec<Argument>,
}

pub fn build_schema(
    command: &str,
    parameters: &[Parameter],
    doc: Option<&str>,
    overrides: &SchemaOverrides,
) -> Result<Schema, DeclarationError> {
    let Some((context, parameters)) = parameters.split_first() else {
        return Err(DeclarationError::MissingContextParameter {
            command: command.to_string(),
        });
    };
    match context.kind {
        ParameterKind::Named => {}
        ParameterKind::Variadic => {
            return Err(DeclarationError::VariadicParameter {
                command: command.to_string(),
                parameter: context.name.clone(),
            })
        }
        ParameterKind::Rest => {
            return Err(DeclarationError::MissingContextParameter {
                command: command.to_string(),
            })
        }
    }

    let parsed = doc.map(parse_doc).unwrap_or_default();
    let description = overrides
        .description
        .clone()
        .unwrap_or_else(|| parsed.description.clone());

    let mut arg_types = parsed.arg_types;
    arg_types.overlay(overrides.arg_types.clone());
    let mut arg_descriptions = parsed.arg_descriptions;
    arg_descriptions.overlay(overrides.arg_descriptions.clone());
    let mut arg_choices: NamedMap<Vec<(String, ChoiceValue)>> = parsed
        .arg_choices
        .into_iter()
        .map(|(name, choices)| {
            let choices = choices
                .into_iter()
                .map(|(choice, value)| (choice, ChoiceValue::String(value)))
                .collect();
            (name, choices)
        })
        .collect();
    arg_choices.overlay(overrides.arg_choices.clone());

    let mut arguments: Vec<Argument> = Vec::new();
    let mut extra_mode = false;

    for param in parameters {
        match param.kind {
            ParameterKind::Variadic => {
                return Err(DeclarationError::VariadicParameter {
                    command: command.to_string(),
                    parameter: param.name.clone(),
                })
            }
            ParameterKind::Rest => {
                extra_mode = true;
                continue;
            }
            ParameterKind::Named => {}
        }

        // before make_argument: the first occurrence already consumed the metadata
        if arguments.iter().any(|a| a.name() == param.name) {
            return Err(DeclarationError::DuplicateArgument {
                command: command.to_string(),
                argument: param.name.clone(),
            });
        }

        let type_token = arg_types.remove(&param.name).or_else(|| param.annotation.clone());
        let argument = make_argument(
            &param.name,
            type_token.as_deref(),
            arg_descriptions.remove(&param.name),
            arg_choices.remove(&param.name),
            !param.has_default,
        )?;
        arguments.push(argument);
    }

    let mut leftover: Vec<String> = Vec::new();
    for name in arg_types
        .keys()
        .chain(arg_descriptions.keys())
        .chain(arg_choices.keys())
    {
        if !leftover.iter().any(|n| n == name) {
            leftover.push(name.to_string());
        }
    }

    if extra_mode {
        for name in leftover {
            let argument = make_argument(
                &name,
                arg_types.get(&name).map(String::as_str),
                arg_descriptions.remove(&name),
                arg_choices.remove(&name),
                false,
            )?;
            arguments.push(argument);
        }
    } else if !leftover.is_empty() {
        debug!(
            command = %command,
            ignored = ?leftover,
            "documented arguments without a matching parameter"
        );
    }

    if arguments.len() > ARGUMENT_LIMIT {
        return Err(DeclarationError::TooManyArguments {
            command: command.to_string(),
            count: arguments.len(),
            limit: ARGUMENT_LIMIT,
        });
    }

    Ok(Schema {
        description,
        arguments,
    })
}

fn make_argument(
    name: &str,
    type_token: Option<&str>,
    description: Option<String>,
    choices: Option<Vec<(String, ChoiceValue)>>,
    required: bool,
) -> Result<Argument, DeclarationError> {
    let kind = match type_token {
        None => ArgumentKind::String,
        Some(token) => {
            ArgumentKind::from_annotation(token).ok_or_else(|| DeclarationError::UnknownType {
                argument: name.to_string(),
                annotation: token.to_string(),
            })?
        }
    };

    let argument = Argument::new(name, kind, description.unwrap_or_default(), required)?;
    match choices {
        Some(choices) => argument.with_choices(choices),
        None => Ok(argument),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Parameter {
        Parameter::named("ctx")
    }

    #[test]
    fn greets_someone() {
        let schema = build_schema(
            "test",
            &[ctx(), Parameter::named("name").annotated("str")],
            Some("Greets someone.\n\nname\n    Who to greet."),
            &SchemaOverrides::default(),
        )
        .unwrap();

        assert_eq!(schema.description, "Greets someone.");
        assert_eq!(schema.arguments.len(), 1);
        let arg = &schema.arguments[0];
        assert_eq!(arg.name(), "name");
        assert_eq!(arg.description(), "Who to greet.");
        assert_eq!(arg.kind(), ArgumentKind::String);
        assert!(arg.required());
    }

    #[test]
    fn overrides_beat_documentation() {
        let mut overrides = SchemaOverrides::default();
        overrides.description = Some("Counts.".into());
        overrides.arg_types.insert("n", "int".to_string());
        overrides.arg_descriptions.insert("n", "How far.".to_string());

        let schema = build_schema(
            "count",
            &[ctx(), Parameter::named("n").annotated("bool").optional()],
            Some("Documented.\n\nn : str\n    Documented n."),
            &overrides,
        )
        .unwrap();

        assert_eq!(schema.description, "Counts.");
        let arg = &schema.arguments[0];
        assert_eq!(arg.kind(), ArgumentKind::Integer);
        assert_eq!(arg.description(), "How far.");
        assert!(!arg.required());
    }

    #[test]
    fn documentation_type_beats_annotation() {
        let schema = build_schema(
            "count",
            &[ctx(), Parameter::named("n").annotated("bool")],
            Some("Counts.\n\nn : int\n    How far."),
            &SchemaOverrides::default(),
        )
        .unwrap();
        assert_eq!(schema.arguments[0].kind(), ArgumentKind::Integer);
    }

    #[test]
    fn rejects_bad_signatures() {
        let overrides = SchemaOverrides::default();
        assert!(matches!(
            build_schema("x", &[], Some("X."), &overrides),
            Err(DeclarationError::MissingContextParameter { .. })
        ));
        assert!(matches!(
            build_schema("x", &[Parameter::variadic("args")], Some("X."), &overrides),
            Err(DeclarationError::VariadicParameter { .. })
        ));
        assert!(matches!(
            build_schema("x", &[ctx(), Parameter::variadic("args")], Some("X."), &overrides),
            Err(DeclarationError::VariadicParameter { .. })
        ));
        assert!(matches!(
            build_schema(
                "x",
                &[ctx(), Parameter::named("n").annotated("float")],
                Some("X.\n\nn\n    A number."),
                &overrides
            ),
            Err(DeclarationError::UnknownType { .. })
        ));
    }

    #[test]
    fn repeated_parameter_is_a_duplicate() {
        let err = build_schema(
            "x",
            &[ctx(), Parameter::named("a"), Parameter::named("a")],
            Some("X.\n\na\n    A."),
            &SchemaOverrides::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DeclarationError::DuplicateArgument {
                command: "x".into(),
                argument: "a".into()
            }
        );
    }

    #[test]
    fn undocumented_argument_is_rejected() {
        let err = build_schema(
            "x",
            &[ctx(), Parameter::named("n")],
            Some("X."),
            &SchemaOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DeclarationError::InvalidDescription { .. }));
    }

    #[test]
    fn extra_mode_appends_leftovers_in_order() {
        let mut overrides = SchemaOverrides::default();
        overrides.arg_descriptions.insert("zeta", "Last one.".to_string());
        overrides.arg_types.insert("alpha", "int".to_string());
        overrides.arg_descriptions.insert("alpha", "First one.".to_string());

        let doc = "Extra.\n\nfixed\n    A fixed argument.";
        let schema = build_schema(
            "extra",
            &[ctx(), Parameter::named("fixed"), Parameter::rest("kwargs")],
            Some(doc),
            &overrides,
        )
        .unwrap();

        let names: Vec<&str> = schema.arguments.iter().map(Argument::name).collect();
        assert_eq!(names, vec!["fixed", "alpha", "zeta"]);
        assert_eq!(schema.arguments[1].kind(), ArgumentKind::Integer);
        assert!(schema.arguments[1..].iter().all(|a| !a.required()));

        let without_rest = build_schema(
            "extra",
            &[ctx(), Parameter::named("fixed")],
            Some(doc),
            &overrides,
        )
        .unwrap();
        assert_eq!(without_rest.arguments.len(), 1);
    }

    #[test]
    fn too_many_arguments() {
        let mut doc = String::from("Many.\n");
        let mut params = vec![ctx()];
        for i in 0..26 {
            doc.push_str(&format!("\na{i}\n    Argument {i}."));
            params.push(Parameter::named(format!("a{i}")));
        }
        let err = build_schema("many", &params, Some(&doc), &SchemaOverrides::default())
            .unwrap_err();
        assert!(matches!(err, DeclarationError::TooManyArguments { count: 26, .. }));
    }
}
