//! Tenant reads shared by the tenant, domain, ID card and Razorpay screens.

use serde_json::Value;
use tracing::warn;

use crate::api::{ApiClient, ApiRequest};
use crate::error::{AdminError, AdminResult};
use crate::resources::{tenant_path, Domain, Tenant, TenantEntity, TENANTS};

/// All tenants with their domains and entity embedded.
///
/// Some deployments reject `full=true`; any failure there falls back to the
/// plain listing, whose records may lack domains.
pub async fn list_tenants(client: &ApiClient) -> AdminResult<Vec<Tenant>> {
    let full = ApiRequest::get(TENANTS.path).query("full", true);
    let page = match client.fetch_list(full).await {
        Ok(page) => page,
        Err(err) => {
            warn!("full tenant listing failed ({}), retrying plain listing", err);
            client.fetch_list(ApiRequest::get(TENANTS.path)).await?
        }
    };
    Ok(page.typed::<Tenant>()?.rows)
}

pub async fn find_tenant(client: &ApiClient, tenant_id: &str) -> AdminResult<Tenant> {
    list_tenants(client)
        .await?
        .into_iter()
        .find(|t| t.id == tenant_id)
        .ok_or_else(|| AdminError::validation(format!("Tenant {} not found", tenant_id)))
}

pub async fn tenant_domains(client: &ApiClient, tenant_id: &str) -> AdminResult<Vec<Domain>> {
    Ok(find_tenant(client, tenant_id).await?.domains)
}

/// Publisher entity details, `None` when the tenant has none recorded.
pub async fn load_entity(client: &ApiClient, tenant_id: &str) -> AdminResult<Option<TenantEntity>> {
    let record = client.fetch_record(ApiRequest::get(tenant_path(tenant_id, "/entity"))).await?;
    match record {
        Some(Value::Null) | None => Ok(None),
        Some(record) => Ok(Some(serde_json::from_value(record)?)),
    }
}

/// Categories enabled for a tenant's domains.
pub async fn tenant_categories(client: &ApiClient, tenant_id: &str) -> AdminResult<Vec<Value>> {
    let page = client
        .fetch_list(ApiRequest::get(tenant_path(tenant_id, "/categories")))
        .await?;
    Ok(page.rows)
}
