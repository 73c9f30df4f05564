/*!
 * Invocation router
 *
 * Answers health-checks, resolves the option tree, finds the target node in
 * the registry and runs it. Every command interaction gets exactly one
 * response: the handler's own, the handler's result, a "no implementation"
 * notice, or a failure acknowledgement.
 */

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::context::InvocationContext;
use super::options::OptionMap;
use super::resolved::resolve_payload;
use super::response::{InteractionResponse, ResponseHandle};
use super::types::{InteractionKind, InteractionPayload};
use crate::config::ResponseConfig;
use crate::error::{InvocationError, ResolutionError, SlashError, SlashResult};
use crate::registry::CommandRegistry;
use crate::transport::{EntityProvider, InteractionResponder};

/// How an interaction was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Health-check acknowledged.
    Acknowledged,
    /// The command ran; carries its textual result, if any.
    Responded(Option<String>),
    /// No command registered under that name and scope.
    NoImplementation,
    /// Resolution, conversion or the handler failed; carries the error text.
    Failed(String),
}

pub struct InteractionRouter {
    registry: Arc<CommandRegistry>,
    entities: Arc<dyn EntityProvider>,
    responder: Arc<dyn InteractionResponder>,
    responses: ResponseConfig,
}

impl InteractionRouter {
    pub fn new(
        registry: Arc<CommandRegistry>,
        entities: Arc<dyn EntityProvider>,
        responder: Arc<dyn InteractionResponder>,
        responses: ResponseConfig,
    ) -> Self {
        Self {
            registry,
            entities,
            responder,
            responses,
        }
    }

    /// Errors only when a response itself cannot be delivered.
    pub async fn dispatch(&self, payload: InteractionPayload) -> SlashResult<DispatchOutcome> {
        let handle = ResponseHandle::new(payload.id, payload.token.clone(), self.responder.clone());

        if payload.kind == InteractionKind::Ping {
            debug!(interaction = %payload.id, "health-check");
            handle.send(InteractionResponse::Pong).await?;
            return Ok(DispatchOutcome::Acknowledged);
        }

        let Some(data) = payload.data.as_ref() else {
            return self
                .fail(&handle, ResolutionError::MissingData.into())
                .await;
        };

        let options = match resolve_payload(data, payload.guild_id) {
            Ok(options) => options,
            Err(e) => return self.fail(&handle, e.into()).await,
        };

        let scope = data.scope();
        let Some(node) = self.registry.get_command(&data.name, scope) else {
            info!(command = %data.name, scope = %scope, "no implementation registered");
            handle
                .send(InteractionResponse::message(&self.responses.no_implementation))
                .await?;
            return Ok(DispatchOutcome::NoImplementation);
        };

        let ctx = InvocationContext::new(
            payload.id,
            payload.guild_id,
            self.entities.clone(),
            handle.clone(),
        )
        .with_channel(payload.channel_id)
        .with_invoker(payload.user.clone(), payload.member.clone());

        let empty = OptionMap::new();
        let inner = options
            .get(&data.name)
            .and_then(|v| v.as_nested())
            .unwrap_or(&empty);

        match node.invoke(ctx, inner).await {
            Ok(result) => {
                if handle.is_responded() {
                    debug!(command = %data.name, "handler responded itself");
                } else {
                    let response = match &result {
                        Some(text) => InteractionResponse::message(text.clone()),
                        None => InteractionResponse::Deferred,
                    };
                    handle.send(response).await?;
                }
                Ok(DispatchOutcome::Responded(result))
            }
            Err(e) => self.fail(&handle, e).await,
        }
    }

    async fn fail(&self, handle: &ResponseHandle, err: SlashError) -> SlashResult<DispatchOutcome> {
        let detail = err.to_string();
        match &err {
            SlashError::Invocation(InvocationError::Handler { command, message }) => {
                error!(command = %command, error = %message, "handler failed");
            }
            _ => warn!(kind = err.kind().as_str(), error = %detail, "invocation aborted"),
        }

        if !handle.is_responded() {
            handle
                .send(InteractionResponse::message(self.failure_text(&err)))
                .await?;
        }
        Ok(DispatchOutcome::Failed(detail))
    }

    fn failure_text(&self, err: &SlashError) -> String {
        let hide_detail = matches!(
            err,
            SlashError::Invocation(InvocationError::Handler { .. })
        );
        if err.kind().is_user_visible() && !hide_detail {
            format!("{}: {}", self.responses.failure, err)
        } else {
            self.responses.failure.clone()
        }
    }
}
