//! Out-of-band delivery of password reset tokens.

use authx_core::error::AuthxResult;
use authx_core::models::tenant::Tenant;
use authx_core::models::user::User;
use tracing::info;

use crate::reset::IssuedResetToken;

/// Hands a raw reset token to its owner (email, SMS, ...).
///
/// This is the only place a raw token leaves the service. It is never
/// part of an HTTP response.
pub trait ResetTokenDelivery: Send + Sync {
    fn deliver(
        &self,
        tenant: &Tenant,
        user: &User,
        token: &IssuedResetToken,
    ) -> impl Future<Output = AuthxResult<()>> + Send;
}

/// Delivery for development deployments: records that a token was issued
/// and to whom, without the token itself.
#[derive(Debug, Clone, Default)]
pub struct LogDelivery;

impl ResetTokenDelivery for LogDelivery {
    async fn deliver(
        &self,
        tenant: &Tenant,
        user: &User,
        token: &IssuedResetToken,
    ) -> AuthxResult<()> {
        info!(
            tenant_id = %tenant.id,
            user_id = %user.id,
            expires_at = %token.expires_at,
            "password reset token ready for delivery"
        );
        Ok(())
    }
}
