//! SurrealDB implementation of [`TenantRepository`].

use authx_core::error::AuthxResult;
use authx_core::models::tenant::{CreateTenant, Tenant, TenantSummary, UpdateTenant};
use authx_core::models::tenant_config::TenantConfig;
use authx_core::repository::{PaginatedResult, Pagination, TenantRepository};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::CountRow;
use crate::error::{DbError, parse_uuid};

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TenantRow {
    owner_id: String,
    name: String,
    app_type: String,
    domain: Option<String>,
    secret: String,
    config: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn into_tenant(self, id: Uuid) -> Result<Tenant, DbError> {
        Ok(Tenant {
            id,
            owner_id: parse_uuid(&self.owner_id, "owner")?,
            name: self.name,
            app_type: self.app_type,
            domain: self.domain,
            secret: self.secret,
            config: decode_config(self.config)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Listing projection. The secret column is never selected.
#[derive(Debug, SurrealValue)]
struct TenantSummaryRow {
    record_id: String,
    owner_id: String,
    name: String,
    app_type: String,
    domain: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantSummaryRow {
    fn try_into_summary(self) -> Result<TenantSummary, DbError> {
        Ok(TenantSummary {
            id: parse_uuid(&self.record_id, "tenant")?,
            owner_id: parse_uuid(&self.owner_id, "owner")?,
            name: self.name,
            app_type: self.app_type,
            domain: self.domain,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub(crate) fn decode_config(value: serde_json::Value) -> Result<TenantConfig, DbError> {
    serde_json::from_value(value).map_err(|e| DbError::Decode(format!("tenant config: {e}")))
}

pub(crate) fn encode<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DbError> {
    serde_json::to_value(value).map_err(|e| DbError::Decode(format!("encode: {e}")))
}

/// SurrealDB implementation of the Tenant repository.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn create(&self, input: CreateTenant) -> AuthxResult<Tenant> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let config = encode(&input.config)?;

        let result = self
            .db
            .query(
                "CREATE type::record('tenant', $id) SET \
                 owner_id = $owner_id, \
                 name = $name, app_type = $app_type, \
                 domain = $domain, secret = $secret, \
                 config = $config",
            )
            .bind(("id", id_str.clone()))
            .bind(("owner_id", input.owner_id.to_string()))
            .bind(("name", input.name))
            .bind(("app_type", input.app_type))
            .bind(("domain", input.domain))
            .bind(("secret", input.secret))
            .bind(("config", config))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement(e, "tenant"))?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("tenant", &id_str))?;

        Ok(row.into_tenant(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> AuthxResult<Tenant> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('tenant', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("tenant", &id_str))?;

        Ok(row.into_tenant(id)?)
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        pagination: Pagination,
    ) -> AuthxResult<PaginatedResult<TenantSummary>> {
        let owner_id_str = owner_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM tenant \
                 WHERE owner_id = $owner_id GROUP ALL",
            )
            .bind(("owner_id", owner_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, owner_id, name, \
                 app_type, domain, created_at, updated_at \
                 FROM tenant \
                 WHERE owner_id = $owner_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("owner_id", owner_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantSummaryRow> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(TenantSummaryRow::try_into_summary)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn update(&self, id: Uuid, input: UpdateTenant) -> AuthxResult<Tenant> {
        let id_str = id.to_string();
        // UpdateTenant serializes only the allow-listed fields that are
        // present, so the merge document can never touch other columns.
        let patch = encode(&input)?;

        let result = self
            .db
            .query("UPDATE type::record('tenant', $id) MERGE $patch")
            .bind(("id", id_str.clone()))
            .bind(("patch", patch))
            .await
            .map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement(e, "tenant"))?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("tenant", &id_str))?;

        Ok(row.into_tenant(id)?)
    }

    async fn set_secret(&self, id: Uuid, secret: String) -> AuthxResult<()> {
        let id_str = id.to_string();

        let result = self
            .db
            .query("UPDATE type::record('tenant', $id) SET secret = $secret")
            .bind(("id", id_str.clone()))
            .bind(("secret", secret))
            .await
            .map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement(e, "tenant"))?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::not_found("tenant", id_str).into());
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AuthxResult<()> {
        // Existence check first so a missing tenant is reported, not
        // silently "deleted".
        self.get_by_id(id).await?;

        self.db
            .query(
                "BEGIN TRANSACTION; \
                 DELETE password_reset_token WHERE tenant_id = $id; \
                 DELETE user WHERE tenant_id = $id; \
                 DELETE type::record('tenant', $id); \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_statement(e, "tenant"))?;

        Ok(())
    }
}
