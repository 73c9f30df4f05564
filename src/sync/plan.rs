use serde::Serialize;
use std::collections::HashMap;

use crate::command::CommandSchema;
use crate::model::Snowflake;
use crate::transport::RemoteCommand;

/// A single remote call the reconciler has to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOperation {
    Create(CommandSchema),
    Update { id: Snowflake, schema: CommandSchema },
    Delete { id: Snowflake, name: String },
}

impl SyncOperation {
    pub fn name(&self) -> &str {
        match self {
            SyncOperation::Create(schema) | SyncOperation::Update { schema, .. } => &schema.name,
            SyncOperation::Delete { name, .. } => name,
        }
    }

    pub fn kind(&self) -> SyncOperationKind {
        match self {
            SyncOperation::Create(_) => SyncOperationKind::Create,
            SyncOperation::Update { .. } => SyncOperationKind::Update,
            SyncOperation::Delete { .. } => SyncOperationKind::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOperationKind {
    Fetch,
    Create,
    Update,
    Delete,
}

impl SyncOperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncOperationKind::Fetch => "fetch",
            SyncOperationKind::Create => "create",
            SyncOperationKind::Update => "update",
            SyncOperationKind::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub operations: Vec<SyncOperation>,
    /// Names whose remote entry already matches.
    pub unchanged: Vec<String>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn count(&self, kind: SyncOperationKind) -> usize {
        self.operations.iter().filter(|op| op.kind() == kind).count()
    }
}

/// Diffs the desired schemas of one scope against its remote entries.
///
/// Remote entries are visited in order: a matching local name is consumed and
/// compared structurally, an unknown name is deleted. Whatever is left of the
/// desired set is created, in name order.
pub fn plan_sync(desired: HashMap<String, CommandSchema>, remote: &[RemoteCommand]) -> SyncPlan {
    let mut working = desired;
    let mut plan = SyncPlan::default();

    for entry in remote {
        match working.remove(entry.name()) {
            Some(schema) if schema.structurally_eq(&entry.schema) => {
                plan.unchanged.push(schema.name);
            }
            Some(schema) => plan.operations.push(SyncOperation::Update {
                id: entry.id,
                schema,
            }),
            None => plan.operations.push(SyncOperation::Delete {
                id: entry.id,
                name: entry.name().to_string(),
            }),
        }
    }

    let mut creates: Vec<CommandSchema> = working.into_values().collect();
    creates.sort_by(|a, b| a.name.cmp(&b.name));
    plan.operations
        .extend(creates.into_iter().map(SyncOperation::Create));
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandOption, OptionKind};

    fn schema(name: &str, description: &str) -> CommandSchema {
        CommandSchema {
            name: name.into(),
            description: description.into(),
            options: vec![],
        }
    }

    fn remote(id: u64, schema: CommandSchema) -> RemoteCommand {
        RemoteCommand {
            id: Snowflake(id),
            application_id: None,
            schema,
        }
    }

    #[test]
    fn stale_description_and_orphan() {
        let desired = HashMap::from([("ping".to_string(), schema("ping", "Pong."))]);
        let actual = vec![
            remote(1, schema("ping", "Old text.")),
            remote(2, schema("old", "Gone.")),
        ];

        let plan = plan_sync(desired, &actual);
        assert_eq!(
            plan.operations,
            vec![
                SyncOperation::Update {
                    id: Snowflake(1),
                    schema: schema("ping", "Pong.")
                },
                SyncOperation::Delete {
                    id: Snowflake(2),
                    name: "old".into()
                },
            ]
        );
        assert!(plan.unchanged.is_empty());
    }

    #[test]
    fn reordered_options_are_unchanged() {
        let option = |name: &str| CommandOption {
            kind: OptionKind::String,
            name: name.into(),
            description: "x".into(),
            required: false,
            choices: vec![],
            options: vec![],
        };
        let mut local = schema("say", "Says.");
        local.options = vec![option("a"), option("b")];
        let mut stored = local.clone();
        stored.options.reverse();

        let plan = plan_sync(
            HashMap::from([("say".to_string(), local)]),
            &[remote(3, stored)],
        );
        assert!(plan.is_empty());
        assert_eq!(plan.unchanged, vec!["say".to_string()]);
    }

    #[test]
    fn creates_are_sorted() {
        let desired = HashMap::from([
            ("b".to_string(), schema("b", "B.")),
            ("a".to_string(), schema("a", "A.")),
        ]);
        let plan = plan_sync(desired, &[]);
        let names: Vec<&str> = plan.operations.iter().map(SyncOperation::name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(plan.count(SyncOperationKind::Create), 2);
    }
}
