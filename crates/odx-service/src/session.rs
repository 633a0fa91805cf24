//! # Till Session Lifecycle
//!
//! Discovers, opens and closes the till session of the active POS config.
//!
//! ## State Machine
//! ```text
//!                 open_store (create)
//!   ┌────────┐ ─────────────────────► ┌────────────────┐
//!   │ Closed │                        │ OpeningControl │
//!   └────────┘                        └───────┬────────┘
//!       ▲                                     │ action_pos_session_open
//!       │                                     ▼  (open_store, or auto-advance
//!       │                              ┌────────────┐  in get_open_session_id)
//!       │                              │   Opened   │
//!       │                              └─────┬──────┘
//!       │                                    │ close_store: write state,
//!       │                                    ▼ then closing-control action
//!       │                           ┌────────────────┐
//!       └─────── (remote side) ──── │ ClosingControl │
//!                                   └────────────────┘
//! ```
//!
//! Nothing is cached: every call re-reads the config and the session from
//! the ERP. Every transition is a direct result of a call made here.

use std::sync::Arc;

use odx_core::{Record, SessionState, SessionStatus};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::client::RecordClient;
use crate::error::{ServiceError, ServiceResult};
use crate::protocol::{
    extract_created_id, Condition, Domain, KeywordRequest, RequestContext,
    METHOD_SESSION_CLOSING_CONTROL, METHOD_SESSION_OPEN, MODEL_POS_CONFIG, MODEL_POS_SESSION,
};

/// Session operations over a shared record client.
pub struct SessionManager<C> {
    client: Arc<C>,
    session_name: String,
}

impl<C: RecordClient> SessionManager<C> {
    pub fn new(client: Arc<C>, session_name: impl Into<String>) -> Self {
        SessionManager {
            client,
            session_name: session_name.into(),
        }
    }

    /// Id of the first active POS config.
    ///
    /// Fails with [`ServiceError::NoActiveConfig`] when there is none.
    pub async fn active_config_id(&self, ctx: &RequestContext) -> ServiceResult<i64> {
        let domain = Domain::all_of(vec![Condition::eq("active", true)]);
        let keywords = KeywordRequest::new(ctx.clone()).fields(&["id"]).limit(1);

        let records = self
            .client
            .search_read(MODEL_POS_CONFIG, &domain, &keywords)
            .await?
            .into_result()?
            .unwrap_or_default();

        match records.first().map(Record::id) {
            Some(id) if id > 0 => {
                debug!(config_id = id, "Resolved active POS config");
                Ok(id)
            }
            _ => Err(ServiceError::NoActiveConfig),
        }
    }

    /// Most recent session of the active config that is opened or opening.
    async fn find_session(&self, ctx: &RequestContext) -> ServiceResult<Option<(i64, SessionState)>> {
        let config_id = self.active_config_id(ctx).await?;

        let domain = Domain::all_of(vec![
            Condition::eq("config_id", config_id),
            Condition::is_in(
                "state",
                SessionState::DISCOVERABLE.iter().map(SessionState::as_remote),
            ),
        ]);
        let keywords = KeywordRequest::new(ctx.clone())
            .fields(&["id", "state"])
            .order("id desc")
            .limit(1);

        let records = self
            .client
            .search_read(MODEL_POS_SESSION, &domain, &keywords)
            .await?
            .into_result()?
            .unwrap_or_default();

        let Some(record) = records.first() else {
            debug!(config_id, "No open session");
            return Ok(None);
        };

        let id = record.id();
        let raw_state = record.field("state").text();
        match SessionState::from_remote(&raw_state) {
            Some(state) if id > 0 => Ok(Some((id, state))),
            _ => Err(ServiceError::UnexpectedResponse(format!(
                "session record id={} state={:?}",
                id, raw_state
            ))),
        }
    }

    /// Reports the current session without changing it.
    pub async fn session_status(&self, ctx: &RequestContext) -> ServiceResult<SessionStatus> {
        Ok(match self.find_session(ctx).await? {
            Some((id, state)) => SessionStatus {
                session_id: Some(id),
                state,
            },
            None => SessionStatus::closed(),
        })
    }

    /// Id of the session orders can be recorded against, if any.
    ///
    /// A session still in `opening_control` is opened before its id is
    /// returned, so callers only ever see `None` or an opened session.
    pub async fn get_open_session_id(&self, ctx: &RequestContext) -> ServiceResult<Option<i64>> {
        match self.find_session(ctx).await? {
            Some((id, SessionState::OpeningControl)) => {
                self.trigger_open(id, ctx).await?;
                Ok(Some(id))
            }
            Some((id, _)) => Ok(Some(id)),
            None => Ok(None),
        }
    }

    /// Returns the open session, creating and opening one when needed.
    ///
    /// If the open action fails after the create succeeded, the created
    /// session stays in `opening_control`; the next discovery advances it.
    pub async fn open_store(&self, ctx: &RequestContext) -> ServiceResult<i64> {
        if let Some(id) = self.get_open_session_id(ctx).await? {
            debug!(session_id = id, "Store already open");
            return Ok(id);
        }

        let config_id = self.active_config_id(ctx).await?;

        let mut values = Map::new();
        values.insert("config_id".into(), json!(config_id));
        values.insert("name".into(), json!(self.session_name));

        let keywords = KeywordRequest::new(ctx.clone());
        let result = self
            .client
            .create(MODEL_POS_SESSION, vec![values], &keywords)
            .await?
            .into_required("pos.session create")?;
        let session_id = extract_created_id(&result)?;

        self.trigger_open(session_id, ctx).await?;

        info!(session_id, config_id, "Store opened");
        Ok(session_id)
    }

    /// Moves the open session to closing control.
    ///
    /// Fails with [`ServiceError::NoOpenSession`] before any write when no
    /// session is open.
    pub async fn close_store(&self, ctx: &RequestContext) -> ServiceResult<()> {
        let session_id = self
            .get_open_session_id(ctx)
            .await?
            .ok_or(ServiceError::NoOpenSession)?;

        let mut values = Map::new();
        values.insert(
            "state".into(),
            json!(SessionState::ClosingControl.as_remote()),
        );

        let keywords = KeywordRequest::new(ctx.clone());
        self.client
            .write(MODEL_POS_SESSION, &[session_id], values, &keywords)
            .await?
            .into_result()?;

        self.client
            .call_method(
                MODEL_POS_SESSION,
                METHOD_SESSION_CLOSING_CONTROL,
                vec![Value::from(session_id)],
                &keywords,
            )
            .await?
            .into_result()?;

        info!(session_id, "Store closed");
        Ok(())
    }

    async fn trigger_open(&self, session_id: i64, ctx: &RequestContext) -> ServiceResult<()> {
        let keywords = KeywordRequest::new(ctx.clone());
        self.client
            .call_method(
                MODEL_POS_SESSION,
                METHOD_SESSION_OPEN,
                vec![Value::from(session_id)],
                &keywords,
            )
            .await?
            .into_result()?;

        debug!(session_id, "Session advanced to opened");
        Ok(())
    }
}
