use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use tracing::info;

use super::dto::{AttendanceCode, AttendanceRecord};
use crate::domain::form::entity::form;
use crate::domain::registration::entity::form_registration;
use crate::domain::registration::membership;
use crate::utils::auth::CurrentUser;
use crate::utils::error::AppError;

const NO_REGISTRATION: &str = "No registration found for this user in the specified form";
const INVALID_CODE: &str = "Invalid attendance code";

const ATTENDANCE_CODE_ERROR: &str = "Error fetching attendance code";
const MARK_ATTENDANCE_ERROR: &str = "Error marking attendance";
const EXPORT_ATTENDANCE_ERROR: &str = "Error exporting attendance";

/// 출석 코드 충돌 시 재생성 횟수
const MAX_ATTENDANCE_CODE_ATTEMPTS: usize = 5;

pub struct AttendanceService;

impl AttendanceService {
    /// 호출자 등록의 출석 코드를 반환합니다. 아직 없으면 이번 호출에서 발급합니다.
    pub async fn get_attendance_code(
        db: &DatabaseConnection,
        form_id: &str,
        caller: &CurrentUser,
    ) -> Result<AttendanceCode, AppError> {
        let form_id = form_id.trim();
        if form_id.is_empty() {
            return Err(AppError::invalid_input("Form ID is required"));
        }
        let db_err = |e: DbErr| AppError::internal(ATTENDANCE_CODE_ERROR, e);

        // 같은 등록에 대한 동시 발급은 행 잠금으로 직렬화
        let txn = db.begin().await.map_err(db_err)?;

        let registration = form_registration::Entity::find()
            .filter(form_registration::Column::FormId.eq(form_id))
            .filter(form_registration::has_member(&caller.email))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::not_found(NO_REGISTRATION))?;

        let attendance_code = match registration.attendance_code {
            Some(code) => code,
            None => {
                let code = allocate_attendance_code(&txn).await?;
                set_attendance_code(&txn, &registration.id, &code)
                    .await
                    .map_err(db_err)?;
                info!(
                    form_id = %form_id,
                    registration_id = %registration.id,
                    "attendance code issued"
                );
                code
            }
        };

        txn.commit().await.map_err(db_err)?;

        Ok(AttendanceCode {
            attendance_code,
            attended: registration.attended,
        })
    }

    /// 출석 처리
    ///
    /// 코드로 등록을 잠그고 한 번만 출석으로 기록합니다.
    pub async fn mark_attendance(
        db: &DatabaseConnection,
        attendance_code: &str,
    ) -> Result<AttendanceRecord, AppError> {
        let attendance_code = attendance_code.trim().to_ascii_uppercase();
        if attendance_code.is_empty() {
            return Err(AppError::invalid_input("Attendance code is required"));
        }
        let db_err = |e: DbErr| AppError::internal(MARK_ATTENDANCE_ERROR, e);

        let txn = db.begin().await.map_err(db_err)?;

        let registration = form_registration::Entity::find()
            .filter(form_registration::Column::AttendanceCode.eq(attendance_code.as_str()))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::not_found(INVALID_CODE))?;

        if registration.attended {
            return Err(AppError::conflict("Attendance already marked"));
        }

        let now = Utc::now().naive_utc();
        let result = form_registration::Entity::update_many()
            .col_expr(form_registration::Column::Attended, Expr::value(true))
            .col_expr(form_registration::Column::AttendedAt, Expr::value(now))
            .col_expr(form_registration::Column::UpdatedAt, Expr::value(now))
            .filter(form_registration::Column::Id.eq(registration.id.as_str()))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(db_err(DbErr::RecordNotUpdated));
        }

        txn.commit().await.map_err(db_err)?;

        info!(
            form_id = %registration.form_id,
            registration_id = %registration.id,
            "attendance marked"
        );

        Ok(AttendanceRecord::from(form_registration::Model {
            attended: true,
            attended_at: Some(now),
            updated_at: now,
            ..registration
        }))
    }

    /// 폼의 출석 현황 (관리자용)
    pub async fn export_attendance(
        db: &DatabaseConnection,
        form_id: &str,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let db_err = |e: DbErr| AppError::internal(EXPORT_ATTENDANCE_ERROR, e);

        form::Entity::find_by_id(form_id.trim())
            .one(db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::not_found("Form not found"))?;

        let registrations = form_registration::Entity::find()
            .filter(form_registration::Column::FormId.eq(form_id.trim()))
            .order_by_asc(form_registration::Column::CreatedAt)
            .all(db)
            .await
            .map_err(db_err)?;

        Ok(registrations
            .into_iter()
            .map(AttendanceRecord::from)
            .collect())
    }
}

async fn set_attendance_code<C: ConnectionTrait>(
    conn: &C,
    registration_id: &str,
    code: &str,
) -> Result<(), DbErr> {
    let result = form_registration::Entity::update_many()
        .col_expr(
            form_registration::Column::AttendanceCode,
            Expr::value(code.to_string()),
        )
        .col_expr(
            form_registration::Column::UpdatedAt,
            Expr::value(Utc::now().naive_utc()),
        )
        .filter(form_registration::Column::Id.eq(registration_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(DbErr::RecordNotUpdated);
    }
    Ok(())
}

async fn allocate_attendance_code<C: ConnectionTrait>(conn: &C) -> Result<String, AppError> {
    for _ in 0..MAX_ATTENDANCE_CODE_ATTEMPTS {
        let code = membership::generate_attendance_code();
        let taken = form_registration::Entity::find()
            .filter(form_registration::Column::AttendanceCode.eq(code.as_str()))
            .one(conn)
            .await
            .map_err(|e| AppError::internal(ATTENDANCE_CODE_ERROR, e))?;

        if taken.is_none() {
            return Ok(code);
        }
    }

    Err(AppError::internal(
        ATTENDANCE_CODE_ERROR,
        "could not allocate a unique attendance code",
    ))
}
