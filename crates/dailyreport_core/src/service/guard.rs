//! Self-protection for account deletion.

use super::error::{ServiceError, ServiceResult};
use crate::model::actor::Actor;

/// Rejects `target_code == actor.code` before anything is loaded or written.
pub fn ensure_not_self(target_code: &str, actor: &Actor) -> ServiceResult<()> {
    if target_code == actor.code {
        return Err(ServiceError::SelfDeleteForbidden(target_code.to_string()));
    }
    Ok(())
}
