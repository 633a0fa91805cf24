//! # Service Facade
//!
//! Composition root handed to the presentation layer.
//!
//! ## Wiring
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │ ServiceFacade<C>                                              │
//! │                                                               │
//! │   config ──► Arc<C> ──┬──► SessionManager<C>                  │
//! │                       ├──► OrderSubmitter<C>                  │
//! │                       └──► list_partners / list_products      │
//! │                                                               │
//! │   every operation: RequestContext::default() ─► delegate ─► ? │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The facade holds no remote state. Errors come back unchanged, so a
//! rejected remote call surfaces with the ERP's own message.

use std::future::Future;
use std::sync::Arc;

use odx_core::record::{PARTNER_FIELDS, PRODUCT_FIELDS};
use odx_core::{Cart, CoreError, Partner, Product, Record, RecordMapper, SessionStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::{Connect, RecordClient};
use crate::config::ConnectionConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::order::OrderSubmitter;
use crate::protocol::{Domain, KeywordRequest, RequestContext, MODEL_PARTNER, MODEL_PRODUCT};
use crate::session::SessionManager;

/// A window into a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    pub const fn first(limit: u32) -> Self {
        Page { limit, offset: 0 }
    }

    /// The page right after this one.
    pub const fn next(&self) -> Self {
        Page {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }
}

pub struct ServiceFacade<C> {
    config: ConnectionConfig,
    client: Arc<C>,
    sessions: SessionManager<C>,
    orders: OrderSubmitter<C>,
    mapper: RecordMapper,
}

impl<C: Connect> ServiceFacade<C> {
    /// Validates `config` and constructs the record client once.
    pub fn connect(config: ConnectionConfig) -> ServiceResult<Self> {
        config.validate()?;
        let client = C::connect(&config.connection)?;
        Ok(Self::wire(config, client))
    }
}

impl<C: RecordClient> ServiceFacade<C> {
    /// Wires the facade around an already constructed client.
    pub fn with_client(config: ConnectionConfig, client: C) -> ServiceResult<Self> {
        config.validate()?;
        Ok(Self::wire(config, client))
    }

    fn wire(config: ConnectionConfig, client: C) -> Self {
        debug!(connection = ?config.connection, "Service facade initialized");

        let client = Arc::new(client);
        let sessions = SessionManager::new(Arc::clone(&client), config.pos.session_name.clone());
        let orders = OrderSubmitter::new(
            Arc::clone(&client),
            config.pos.order_name.clone(),
            config.pos.payment_method_id,
        );

        ServiceFacade {
            config,
            client,
            sessions,
            orders,
            mapper: RecordMapper,
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// First page of partners.
    pub async fn list_partners(&self) -> ServiceResult<Vec<Partner>> {
        self.list_partners_page(Page::first(self.config.query.partner_page_size))
            .await
    }

    pub async fn list_partners_page(&self, page: Page) -> ServiceResult<Vec<Partner>> {
        let records = observe(
            "list_partners",
            self.search(MODEL_PARTNER, PARTNER_FIELDS, page),
        )
        .await?;
        Ok(self.mapper.map_partners(&records))
    }

    /// First page of products.
    pub async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        self.list_products_page(Page::first(self.config.query.product_page_size))
            .await
    }

    pub async fn list_products_page(&self, page: Page) -> ServiceResult<Vec<Product>> {
        let records = observe(
            "list_products",
            self.search(MODEL_PRODUCT, PRODUCT_FIELDS, page),
        )
        .await?;
        Ok(self.mapper.map_products(&records))
    }

    /// See [`SessionManager::get_open_session_id`]; may advance an opening
    /// session.
    pub async fn get_open_session_id(&self) -> ServiceResult<Option<i64>> {
        observe(
            "get_open_session_id",
            self.sessions.get_open_session_id(&RequestContext::default()),
        )
        .await
    }

    pub async fn session_status(&self) -> ServiceResult<SessionStatus> {
        observe(
            "session_status",
            self.sessions.session_status(&RequestContext::default()),
        )
        .await
    }

    pub async fn open_store(&self) -> ServiceResult<i64> {
        observe(
            "open_store",
            self.sessions.open_store(&RequestContext::default()),
        )
        .await
    }

    pub async fn close_store(&self) -> ServiceResult<()> {
        observe(
            "close_store",
            self.sessions.close_store(&RequestContext::default()),
        )
        .await
    }

    /// Submits `cart` against the open session and returns the order id.
    ///
    /// An empty cart fails before any remote call; a missing session fails
    /// with [`ServiceError::NoOpenSession`] before the order is sent.
    pub async fn submit_order(&self, cart: &Cart) -> ServiceResult<i64> {
        observe("submit_order", self.submit(cart)).await
    }

    async fn submit(&self, cart: &Cart) -> ServiceResult<i64> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        let ctx = RequestContext::default();
        let session_id = self
            .sessions
            .get_open_session_id(&ctx)
            .await?
            .ok_or(ServiceError::NoOpenSession)?;
        self.orders.submit_order(session_id, cart, &ctx).await
    }

    async fn search(
        &self,
        model: &str,
        fields: &[&str],
        page: Page,
    ) -> ServiceResult<Vec<Record>> {
        let keywords = KeywordRequest::new(RequestContext::default())
            .fields(fields)
            .limit(page.limit)
            .offset(page.offset);
        Ok(self
            .client
            .search_read(model, &Domain::empty(), &keywords)
            .await?
            .into_result()?
            .unwrap_or_default())
    }
}

/// Logs a failed operation once, at the facade boundary.
async fn observe<T>(
    operation: &'static str,
    fut: impl Future<Output = ServiceResult<T>>,
) -> ServiceResult<T> {
    let result = fut.await;
    if let Err(err) = &result {
        if err.is_remote() {
            warn!(operation, error = %err, "Remote call failed");
        } else {
            debug!(operation, error = %err, "Operation rejected");
        }
    }
    result
}
