use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use kernel::model::{
    id::ReservationId, reservation::event::ConfirmCashReceipt, role::Capability,
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::gate::{CashPendingResponse, PatrolEntryResponse, PatrolResponse},
};

/// 場内の有効な予約の一覧。ゲート側のクライアントは定期的に再取得する。
pub async fn show_patrol(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PatrolResponse>> {
    user.require(Capability::PatrolActive)?;

    let active = registry.reservation_repository().find_active_all().await?;

    let now = Local::now();
    Ok(Json(PatrolResponse {
        items: active
            .into_iter()
            .map(|r| PatrolEntryResponse::evaluated_at(r, now))
            .collect(),
    }))
}

pub async fn show_cash_pending(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<CashPendingResponse>> {
    user.require(Capability::ViewCashPending)?;

    registry
        .reservation_repository()
        .find_cash_pending_all()
        .await
        .map(|items| CashPendingResponse {
            items: items.into_iter().map(Into::into).collect(),
        })
        .map(Json)
}

pub async fn confirm_cash_receipt(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    user.require(Capability::ConfirmCashReceipt)?;

    registry
        .reservation_repository()
        .confirm_cash_receipt(ConfirmCashReceipt::new(reservation_id, Local::now()))
        .await
        .map(|_| StatusCode::OK)
}
