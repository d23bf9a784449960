use axum::{
    extract::{Query, State},
    Json,
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::slot::{SlotListQuery, SlotsResponse},
};

pub async fn show_slot_list(
    _user: AuthorizedUser,
    Query(query): Query<SlotListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<SlotsResponse>> {
    registry
        .slot_repository()
        .find_with_occupant_by_class(query.class)
        .await
        .map(SlotsResponse::from)
        .map(Json)
}
