use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Local, Timelike};
use garde::Validate;
use kernel::model::{
    id::{ReservationId, SlotId},
    reservation::event::{CreateReservation, RequestCashSettlement, SettleElectronic},
    role::Capability,
};
use kernel::pricing;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::reservation::{
        CreateReservationRequest, ReservationCreatedResponse, ReservationResponse,
        ReservationsResponse,
    },
};

// 予約時刻は秒精度で記録する
fn now_seconds() -> DateTime<Local> {
    let now = Local::now();
    now.with_nanosecond(0).unwrap_or(now)
}

pub async fn reserve_slot(
    user: AuthorizedUser,
    Path(slot_id): Path<SlotId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationCreatedResponse>)> {
    req.validate(&())?;
    user.require(Capability::BookSlot)?;

    // 車種によって料金表が変わるため、先に対象の枠を引く
    let slot = registry
        .slot_repository()
        .find_by_id(slot_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("枠（{slot_id}）が見つかりませんでした"))
        })?;

    let rate = pricing::hourly_rate(user.user.role, slot.vehicle_class, user.user.is_member);
    let fare = pricing::compute_fare(rate, req.duration_hours)?;

    let event = CreateReservation::new(
        user.id(),
        slot_id,
        req.vehicle_number,
        now_seconds(),
        req.duration_hours,
        fare,
    );
    let reservation_id = registry.reservation_repository().create(event).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReservationCreatedResponse {
            reservation_id,
            fare,
        }),
    ))
}

pub async fn show_my_reservations(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    user.require(Capability::ViewOwnHistory)?;

    let reservations = registry
        .reservation_repository()
        .find_history_by_user_id(user.id())
        .await?;

    let now = Local::now();
    Ok(Json(ReservationsResponse {
        items: reservations
            .into_iter()
            .map(|r| ReservationResponse::evaluated_at(r, now))
            .collect(),
    }))
}

// 自分の予約でなければ精算操作をさせない
async fn ensure_owned(
    registry: &AppRegistry,
    user: &AuthorizedUser,
    reservation_id: ReservationId,
) -> AppResult<()> {
    let reservation = registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await?;
    if reservation.reserved_by != user.id() {
        return Err(AppError::AuthorizationDenied(
            "他の利用者の予約は精算できません".into(),
        ));
    }
    Ok(())
}

pub async fn settle_electronic(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    user.require(Capability::SettleOwnReservation)?;
    ensure_owned(&registry, &user, reservation_id).await?;

    registry
        .reservation_repository()
        .settle_electronic(SettleElectronic::new(reservation_id, Local::now()))
        .await
        .map(|_| StatusCode::OK)
}

pub async fn request_cash_settlement(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    user.require(Capability::SettleOwnReservation)?;
    ensure_owned(&registry, &user, reservation_id).await?;

    registry
        .reservation_repository()
        .request_cash_settlement(RequestCashSettlement::new(reservation_id, Local::now()))
        .await
        .map(|_| StatusCode::ACCEPTED)
}
