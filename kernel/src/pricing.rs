//! 料金と延滞金の計算。すべて純関数で、評価は呼び出し時点の時刻に対して行う。

use chrono::{DateTime, Duration, Local};
use shared::error::{AppError, AppResult};

use crate::model::{role::Role, slot::VehicleClass};

/// 予定終了からこの猶予を超えた精算に延滞金を課す
pub const FINE_THRESHOLD_MINUTES: i64 = 45;
/// 延滞金は定額
pub const FINE_AMOUNT: f64 = 500.0;

const RATE_BIKE: f64 = 10.0;
const RATE_STUDENT: f64 = 20.0;
const RATE_FACULTY: f64 = 0.0;
const RATE_GUEST: f64 = 50.0;

/// 時間単価。二輪は車種で一律、四輪は役割で決まり、会員は半額。
pub fn hourly_rate(role: Role, vehicle_class: VehicleClass, is_member: bool) -> f64 {
    let rate = match vehicle_class {
        VehicleClass::Bike => RATE_BIKE,
        VehicleClass::Car => match role {
            Role::Faculty => RATE_FACULTY,
            Role::Guest => RATE_GUEST,
            // Staff は予約画面を持たないが、料金表上は学生料金に合流する
            Role::Student | Role::Staff => RATE_STUDENT,
        },
    };
    if is_member {
        rate * 0.5
    } else {
        rate
    }
}

pub fn compute_fare(rate: f64, duration_hours: f64) -> AppResult<f64> {
    if !duration_hours.is_finite() || duration_hours <= 0.0 {
        return Err(AppError::InvalidInput(
            "予約時間は正の値で指定してください".into(),
        ));
    }
    Ok(rate * duration_hours)
}

/// 予約の予定終了時刻（秒精度）
pub fn planned_end(reserved_at: DateTime<Local>, duration_hours: f64) -> DateTime<Local> {
    reserved_at + Duration::seconds((duration_hours * 3600.0) as i64)
}

/// 評価時点での延滞金。キャッシュせず、表示・精算の双方で毎回呼び出すこと。
pub fn evaluate_fine(
    reserved_at: DateTime<Local>,
    duration_hours: f64,
    at: DateTime<Local>,
) -> f64 {
    let deadline = planned_end(reserved_at, duration_hours) + Duration::minutes(FINE_THRESHOLD_MINUTES);
    if at > deadline {
        FINE_AMOUNT
    } else {
        0.0
    }
}

/// 予定終了までの残り分数。負値は超過分。巡回画面の表示に使う。
pub fn minutes_remaining(
    reserved_at: DateTime<Local>,
    duration_hours: f64,
    at: DateTime<Local>,
) -> i64 {
    (planned_end(reserved_at, duration_hours) - at).num_minutes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
    }

    #[test]
    fn rate_table_matches_role_and_class() {
        assert_eq!(hourly_rate(Role::Student, VehicleClass::Car, false), 20.0);
        assert_eq!(hourly_rate(Role::Faculty, VehicleClass::Car, false), 0.0);
        assert_eq!(hourly_rate(Role::Guest, VehicleClass::Car, false), 50.0);
        assert_eq!(hourly_rate(Role::Staff, VehicleClass::Car, false), 20.0);
        // 二輪は役割によらない
        assert_eq!(hourly_rate(Role::Guest, VehicleClass::Bike, false), 10.0);
    }

    #[test]
    fn membership_halves_the_rate() {
        assert_eq!(hourly_rate(Role::Student, VehicleClass::Car, true), 10.0);
        assert_eq!(hourly_rate(Role::Student, VehicleClass::Bike, true), 5.0);
    }

    #[test]
    fn fare_is_rate_times_duration() {
        assert_eq!(compute_fare(20.0, 2.0).unwrap(), 40.0);
        assert_eq!(compute_fare(20.0, 0.5).unwrap(), 10.0);
    }

    #[test]
    fn fare_grows_with_duration() {
        let short = compute_fare(20.0, 1.0).unwrap();
        let long = compute_fare(20.0, 1.5).unwrap();
        assert!(long > short);
    }

    #[test]
    fn non_positive_duration_is_rejected() {
        assert!(matches!(
            compute_fare(20.0, 0.0),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            compute_fare(20.0, -1.0),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            compute_fare(20.0, f64::NAN),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn fine_is_zero_before_grace_elapses() {
        let start = at(10, 0);
        // 2 時間の予約。予定終了 12:00、猶予 45 分
        assert_eq!(evaluate_fine(start, 2.0, at(11, 0)), 0.0);
        assert_eq!(evaluate_fine(start, 2.0, at(12, 30)), 0.0);
        assert_eq!(evaluate_fine(start, 2.0, at(12, 45)), 0.0);
    }

    #[test]
    fn fine_is_flat_amount_after_grace() {
        let start = at(10, 0);
        assert_eq!(evaluate_fine(start, 2.0, at(12, 46)), FINE_AMOUNT);
        assert_eq!(evaluate_fine(start, 2.0, at(15, 0)), FINE_AMOUNT);
    }

    #[test]
    fn fine_evaluation_is_idempotent() {
        let start = at(9, 0);
        let now = at(13, 0);
        assert_eq!(
            evaluate_fine(start, 1.0, now),
            evaluate_fine(start, 1.0, now)
        );
    }

    #[test]
    fn fractional_durations_shift_planned_end() {
        let start = at(10, 0);
        assert_eq!(planned_end(start, 1.5), at(11, 30));
        assert_eq!(minutes_remaining(start, 1.5, at(11, 0)), 30);
        assert_eq!(minutes_remaining(start, 1.5, at(12, 0)), -30);
    }
}
