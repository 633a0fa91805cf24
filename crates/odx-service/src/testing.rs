//! In-memory [`RecordClient`] used by the service tests.
//!
//! Keeps one table per model, answers `search_read` with a small domain
//! evaluator (`=` and `in`), applies the two session actions, and records
//! every call so tests can assert what was (and was not) sent.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use odx_core::Record;
use serde_json::{json, Map, Value};

use crate::client::{Connect, RecordClient};
use crate::config::ConnectionSettings;
use crate::error::{ServiceError, ServiceResult};
use crate::protocol::{
    Condition, Domain, KeywordRequest, RemoteError, ServerResponse, METHOD_SESSION_CLOSING_CONTROL,
    METHOD_SESSION_OPEN, MODEL_POS_CONFIG, MODEL_POS_SESSION,
};

/// Which remote primitive a call used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    SearchRead,
    Create,
    Write,
    CallMethod,
}

/// One recorded call.
#[derive(Debug, Clone)]
pub(crate) enum Call {
    SearchRead {
        model: String,
        domain: Domain,
        keywords: KeywordRequest,
    },
    Create {
        model: String,
        values: Vec<Map<String, Value>>,
    },
    Write {
        model: String,
        ids: Vec<i64>,
        values: Map<String, Value>,
    },
    CallMethod {
        model: String,
        method: String,
        args: Vec<Value>,
    },
}

impl Call {
    pub(crate) fn op(&self) -> Op {
        match self {
            Call::SearchRead { .. } => Op::SearchRead,
            Call::Create { .. } => Op::Create,
            Call::Write { .. } => Op::Write,
            Call::CallMethod { .. } => Op::CallMethod,
        }
    }

    /// Model name, or the method name for [`Call::CallMethod`].
    pub(crate) fn target(&self) -> &str {
        match self {
            Call::SearchRead { model, .. }
            | Call::Create { model, .. }
            | Call::Write { model, .. } => model,
            Call::CallMethod { method, .. } => method,
        }
    }
}

#[derive(Default)]
struct State {
    tables: HashMap<String, Vec<Map<String, Value>>>,
    next_id: i64,
    calls: Vec<Call>,
    remote_errors: HashMap<(Op, String), String>,
    create_results: HashMap<String, Value>,
    transport_down: bool,
    bare_created_ids: bool,
}

pub(crate) struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub(crate) fn new() -> Self {
        MemoryBackend {
            state: Mutex::new(State {
                next_id: 1000,
                ..State::default()
            }),
        }
    }

    /// Backend holding one active `pos.config`.
    pub(crate) fn with_active_config(config_id: i64) -> Self {
        let backend = Self::new();
        backend.seed(MODEL_POS_CONFIG, json!({"id": config_id, "active": true}));
        backend
    }

    /// Inserts a row as-is.
    pub(crate) fn seed(&self, model: &str, row: Value) {
        let row = match row {
            Value::Object(map) => map,
            other => panic!("seed row must be an object, got {}", other),
        };
        self.lock()
            .tables
            .entry(model.to_string())
            .or_default()
            .push(row);
    }

    pub(crate) fn rows(&self, model: &str) -> Vec<Map<String, Value>> {
        self.lock().tables.get(model).cloned().unwrap_or_default()
    }

    /// Current `state` of a `pos.session` row.
    pub(crate) fn session_state(&self, session_id: i64) -> Option<String> {
        self.rows(MODEL_POS_SESSION)
            .into_iter()
            .find(|row| row.get("id").and_then(Value::as_i64) == Some(session_id))
            .and_then(|row| row.get("state").and_then(Value::as_str).map(str::to_string))
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub(crate) fn count(&self, op: Op, target: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.op() == op && call.target() == target)
            .count()
    }

    pub(crate) fn count_op(&self, op: Op) -> usize {
        self.lock().calls.iter().filter(|call| call.op() == op).count()
    }

    /// Makes every `op` on `target` answer with a remote error envelope.
    pub(crate) fn fail_remote(&self, op: Op, target: &str, message: &str) {
        self.lock()
            .remote_errors
            .insert((op, target.to_string()), message.to_string());
    }

    /// Replaces the result envelope of `create` on `model`.
    pub(crate) fn override_create_result(&self, model: &str, result: Value) {
        self.lock()
            .create_results
            .insert(model.to_string(), result);
    }

    pub(crate) fn set_transport_down(&self, down: bool) {
        self.lock().transport_down = down;
    }

    /// Return created ids bare (`42`) instead of wrapped (`[42]`).
    pub(crate) fn set_bare_created_ids(&self, bare: bool) {
        self.lock().bare_created_ids = bare;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("memory backend lock poisoned")
    }
}

impl State {
    fn record(&mut self, call: Call) -> ServiceResult<Option<RemoteError>> {
        let key = (call.op(), call.target().to_string());
        self.calls.push(call);

        if self.transport_down {
            return Err(ServiceError::Transport("connection refused".into()));
        }
        Ok(self.remote_errors.get(&key).map(RemoteError::new))
    }

    fn set_state(&mut self, model: &str, ids: &[i64], state: &str) {
        if let Some(rows) = self.tables.get_mut(model) {
            for row in rows.iter_mut() {
                if row_id(row).map_or(false, |id| ids.contains(&id)) {
                    row.insert("state".into(), json!(state));
                }
            }
        }
    }
}

fn row_id(row: &Map<String, Value>) -> Option<i64> {
    row.get("id").and_then(Value::as_i64)
}

fn matches_condition(row: &Map<String, Value>, condition: &Condition) -> bool {
    let Some(actual) = row.get(condition.field()) else {
        return false;
    };
    match condition.operator() {
        "=" => actual == condition.value(),
        "in" => condition
            .value()
            .as_array()
            .map_or(false, |values| values.contains(actual)),
        _ => false,
    }
}

fn matches_domain(row: &Map<String, Value>, domain: &Domain) -> bool {
    domain.is_empty()
        || domain
            .groups()
            .iter()
            .any(|group| group.iter().all(|c| matches_condition(row, c)))
}

fn project(row: &Map<String, Value>, fields: Option<&Vec<String>>) -> Map<String, Value> {
    match fields {
        None => row.clone(),
        Some(fields) => {
            let wanted: HashSet<&str> = fields.iter().map(String::as_str).chain(["id"]).collect();
            row.iter()
                .filter(|(key, _)| wanted.contains(key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        }
    }
}

fn arg_ids(args: &[Value]) -> Vec<i64> {
    args.iter()
        .flat_map(|arg| match arg {
            Value::Array(items) => items.iter().filter_map(Value::as_i64).collect::<Vec<_>>(),
            other => other.as_i64().into_iter().collect::<Vec<_>>(),
        })
        .collect()
}

#[async_trait]
impl RecordClient for MemoryBackend {
    async fn search_read(
        &self,
        model: &str,
        domain: &Domain,
        keywords: &KeywordRequest,
    ) -> ServiceResult<ServerResponse<Vec<Record>>> {
        let mut state = self.lock();
        if let Some(error) = state.record(Call::SearchRead {
            model: model.to_string(),
            domain: domain.clone(),
            keywords: keywords.clone(),
        })? {
            return Ok(ServerResponse::err(error));
        }

        let mut rows: Vec<&Map<String, Value>> = state
            .tables
            .get(model)
            .map(|rows| rows.iter().filter(|row| matches_domain(row, domain)).collect())
            .unwrap_or_default();

        rows.sort_by_key(|row| row_id(row).unwrap_or(0));
        if keywords.order.as_deref() == Some("id desc") {
            rows.reverse();
        }

        let offset = keywords.offset.unwrap_or(0) as usize;
        let limit = keywords.limit.map_or(usize::MAX, |l| l as usize);
        let records = rows
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|row| Record::new(project(row, keywords.fields.as_ref())))
            .collect();

        Ok(ServerResponse::ok(records))
    }

    async fn create(
        &self,
        model: &str,
        values: Vec<Map<String, Value>>,
        _keywords: &KeywordRequest,
    ) -> ServiceResult<ServerResponse<Value>> {
        let mut state = self.lock();
        if let Some(error) = state.record(Call::Create {
            model: model.to_string(),
            values: values.clone(),
        })? {
            return Ok(ServerResponse::err(error));
        }

        let mut ids = Vec::with_capacity(values.len());
        for mut row in values {
            state.next_id += 1;
            let id = state.next_id;
            row.insert("id".into(), json!(id));
            if model == MODEL_POS_SESSION && !row.contains_key("state") {
                row.insert("state".into(), json!("opening_control"));
            }
            state.tables.entry(model.to_string()).or_default().push(row);
            ids.push(id);
        }

        if let Some(result) = state.create_results.get(model) {
            return Ok(ServerResponse::ok(result.clone()));
        }
        let result = match ids.as_slice() {
            [id] if state.bare_created_ids => json!(id),
            _ => json!(ids),
        };
        Ok(ServerResponse::ok(result))
    }

    async fn write(
        &self,
        model: &str,
        ids: &[i64],
        values: Map<String, Value>,
        _keywords: &KeywordRequest,
    ) -> ServiceResult<ServerResponse<bool>> {
        let mut state = self.lock();
        if let Some(error) = state.record(Call::Write {
            model: model.to_string(),
            ids: ids.to_vec(),
            values: values.clone(),
        })? {
            return Ok(ServerResponse::err(error));
        }

        if let Some(rows) = state.tables.get_mut(model) {
            for row in rows.iter_mut().filter(|row| row_id(row).map_or(false, |id| ids.contains(&id))) {
                for (key, value) in &values {
                    row.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(ServerResponse::ok(true))
    }

    async fn call_method(
        &self,
        model: &str,
        method: &str,
        args: Vec<Value>,
        _keywords: &KeywordRequest,
    ) -> ServiceResult<ServerResponse<Value>> {
        let mut state = self.lock();
        if let Some(error) = state.record(Call::CallMethod {
            model: model.to_string(),
            method: method.to_string(),
            args: args.clone(),
        })? {
            return Ok(ServerResponse::err(error));
        }

        let ids = arg_ids(&args);
        match method {
            METHOD_SESSION_OPEN => state.set_state(model, &ids, "opened"),
            METHOD_SESSION_CLOSING_CONTROL => state.set_state(model, &ids, "closing_control"),
            _ => {}
        }
        Ok(ServerResponse::ok(json!(true)))
    }
}

impl Connect for MemoryBackend {
    fn connect(settings: &ConnectionSettings) -> ServiceResult<Self> {
        if settings.proxy_api_key == "rejected" {
            return Err(ServiceError::ClientInit("proxy rejected the API key".into()));
        }
        Ok(MemoryBackend::with_active_config(1))
    }
}
