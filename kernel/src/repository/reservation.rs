use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::{ReservationId, UserId},
    reservation::{
        event::{ConfirmCashReceipt, CreateReservation, RequestCashSettlement, SettleElectronic},
        Reservation, ReservationWithOwner,
    },
};

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // 予約を作成する。枠の確保と同一トランザクションで行う。
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId>;
    // reservation_id から Reservation を引く
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Reservation>;
    // 利用者の予約履歴を新しい順に取得する
    async fn find_history_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>>;
    // 有効な予約の全件を所有者情報付きで取得する（巡回画面）
    async fn find_active_all(&self) -> AppResult<Vec<ReservationWithOwner>>;
    // 現金回収待ちの予約一覧を取得する（ゲート画面）
    async fn find_cash_pending_all(&self) -> AppResult<Vec<ReservationWithOwner>>;
    // 電子決済で精算し、予約を完了して枠を解放する
    async fn settle_electronic(&self, event: SettleElectronic) -> AppResult<()>;
    // 現金精算を申請する。枠は解放しない。
    async fn request_cash_settlement(&self, event: RequestCashSettlement) -> AppResult<()>;
    // Staff が現金の受領を確認し、予約を完了して枠を解放する
    async fn confirm_cash_receipt(&self, event: ConfirmCashReceipt) -> AppResult<()>;
}
