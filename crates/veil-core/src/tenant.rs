//! # Tenant Context
//!
//! The caller's tenant is an explicit collaborator, not ambient state.
//! Orchestration components receive a [`TenantContext`] by dependency and
//! consult it on every guarded operation — the cross-tenant ownership check
//! can therefore never be skipped by connection or context reuse, because
//! there is no cached "current tenant" anywhere else to go stale.

use std::sync::Arc;

use crate::identity::TenantId;

/// Accessor for the tenant on whose behalf the current operation runs.
///
/// In a served deployment this is backed by the authenticated request
/// context; in tests it is a [`StaticTenantContext`].
pub trait TenantContext: Send + Sync {
    /// The tenant of the current caller.
    fn current_tenant(&self) -> TenantId;
}

/// A fixed tenant context, for tests and single-tenant embeddings.
#[derive(Debug, Clone)]
pub struct StaticTenantContext {
    tenant: TenantId,
}

impl StaticTenantContext {
    /// Create a context that always reports the given tenant.
    pub fn new(tenant: TenantId) -> Self {
        Self { tenant }
    }

    /// Convenience constructor returning an `Arc`ed trait object.
    pub fn shared(tenant: TenantId) -> Arc<dyn TenantContext> {
        Arc::new(Self::new(tenant))
    }
}

impl TenantContext for StaticTenantContext {
    fn current_tenant(&self) -> TenantId {
        self.tenant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_context_reports_its_tenant() {
        let tenant = TenantId::new();
        let ctx = StaticTenantContext::new(tenant);
        assert_eq!(ctx.current_tenant(), tenant);
        assert_eq!(ctx.current_tenant(), tenant);
    }

    #[test]
    fn shared_context_is_object_safe() {
        let tenant = TenantId::new();
        let ctx: Arc<dyn TenantContext> = StaticTenantContext::shared(tenant);
        assert_eq!(ctx.current_tenant(), tenant);
    }
}
