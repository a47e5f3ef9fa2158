//! SurrealDB implementation of [`TenantConfigRepository`].
//!
//! The configuration document lives inline on the tenant record, so each
//! operation is a single-row write keyed by the tenant id.

use authx_core::error::AuthxResult;
use authx_core::models::tenant_config::{TenantConfig, TenantConfigPatch};
use authx_core::repository::TenantConfigRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::tenant::{decode_config, encode};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ConfigRow {
    config: serde_json::Value,
}

/// SurrealDB implementation of the tenant configuration store.
#[derive(Clone)]
pub struct SurrealTenantConfigRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantConfigRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Runs a one-row statement against the tenant record and decodes the
    /// returned `config` column.
    async fn single(
        &self,
        query: &str,
        tenant_id: Uuid,
        value: Option<serde_json::Value>,
    ) -> AuthxResult<TenantConfig> {
        let id_str = tenant_id.to_string();

        let mut builder = self.db.query(query).bind(("id", id_str.clone()));
        if let Some(value) = value {
            builder = builder.bind(("value", value));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement(e, "tenant"))?;

        let rows: Vec<ConfigRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("tenant", &id_str))?;

        Ok(decode_config(row.config)?)
    }
}

impl<C: Connection> TenantConfigRepository for SurrealTenantConfigRepository<C> {
    async fn get(&self, tenant_id: Uuid) -> AuthxResult<TenantConfig> {
        self.single(
            "SELECT config FROM type::record('tenant', $id)",
            tenant_id,
            None,
        )
        .await
    }

    async fn merge(&self, tenant_id: Uuid, patch: TenantConfigPatch) -> AuthxResult<TenantConfig> {
        // The patch serializes only present fields; MERGE deep-merges
        // nested objects, so absent sections and fields keep their values.
        let patch = encode(&patch)?;
        self.single(
            "UPDATE type::record('tenant', $id) MERGE { config: $value }",
            tenant_id,
            Some(patch),
        )
        .await
    }

    async fn replace(&self, tenant_id: Uuid, config: TenantConfig) -> AuthxResult<TenantConfig> {
        let config = encode(&config)?;
        self.single(
            "UPDATE type::record('tenant', $id) SET config = $value",
            tenant_id,
            Some(config),
        )
        .await
    }
}
