//! Context-budget configuration endpoints.
//!
//! Configuration has no local persistence: it is fetched per role, edited
//! in memory, and written back explicitly. A failed save surfaces as
//! [`GatewayError::Persistence`] and does not roll anything back; the
//! caller re-fetches to discard unsaved edits.

use tracing::debug;

use tandem_types::error::GatewayError;
use tandem_types::role::AiRole;
use tandem_types::wire::{ContextConfigPayload, ContextConfigUpdate, ContextConfigV2Update};

use crate::client::GatewayClient;

impl GatewayClient {
    /// Fetch the per-role context configuration, including the gateway's
    /// precomputed layer tokens.
    pub async fn fetch_context_config(
        &self,
        role: AiRole,
    ) -> Result<ContextConfigPayload, GatewayError> {
        debug!(role = %role, "GET /workflow/context-config");
        let response = self
            .authed_get(&format!("/workflow/context-config/{role}"))
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(GatewayError::Http {
                status: response.status().as_u16(),
            });
        }
        response
            .json()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))
    }

    /// Persist a legacy five-layer configuration upstream.
    pub async fn save_context_config(
        &self,
        update: &ContextConfigUpdate,
    ) -> Result<(), GatewayError> {
        debug!(role = %update.role, "PUT /workflow/context-config");
        let response = self
            .authed_put("/workflow/context-config")
            .json(update)
            .send()
            .await
            .map_err(|e| GatewayError::Persistence(e.to_string()))?;
        if !response.status().is_success() {
            return Err(GatewayError::Persistence(format!(
                "save rejected with HTTP {}",
                response.status().as_u16()
            )));
        }
        Ok(())
    }

    /// Persist a v2 dynamic-budget configuration upstream.
    pub async fn save_context_config_v2(
        &self,
        update: &ContextConfigV2Update,
    ) -> Result<(), GatewayError> {
        debug!(role = %update.role, "POST /workflow/context/config");
        let response = self
            .authed_post("/workflow/context/config")
            .json(update)
            .send()
            .await
            .map_err(|e| GatewayError::Persistence(e.to_string()))?;
        if !response.status().is_success() {
            return Err(GatewayError::Persistence(format!(
                "save rejected with HTTP {}",
                response.status().as_u16()
            )));
        }
        Ok(())
    }
}
