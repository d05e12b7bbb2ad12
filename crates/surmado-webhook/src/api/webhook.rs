use axum::{body::Bytes, extract::State, Extension, Json};
use serde::Serialize;
use surmado_core::{ReportStatus, WebhookPayload};

use super::AppState;
use crate::error::WebhookError;
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub(super) struct Received {
    received: bool,
}

/// Acknowledges one delivery.
///
/// The body is parsed by hand rather than through the `Json` extractor so
/// malformed input answers 500 (redelivery) instead of axum's 4xx rejections.
pub(super) async fn receive_webhook(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<Received>, WebhookError> {
    let payload = WebhookPayload::from_slice(&body)?;

    tracing::info!(
        request_id = %req_id.0,
        report_id = %payload.report_id,
        status = payload.status.as_str(),
        product = payload.product_label(),
        "webhook received"
    );

    match payload.status {
        ReportStatus::Completed => state.handler.on_completed(&payload)?,
        ReportStatus::Failed => state.handler.on_failed(&payload.failure())?,
        _ => {
            tracing::info!(
                request_id = %req_id.0,
                report_id = %payload.report_id,
                status = payload.status.as_str(),
                "non-terminal status acknowledged without action"
            );
        }
    }

    Ok(Json(Received { received: true }))
}
