use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, Statement, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::dto::{RegisterRequest, RegistrationSummary, TeamDetails};
use super::entity::form_registration;
use super::membership;
use crate::domain::form::entity::form::{self, FormInfo};
use crate::domain::user::dto::UserProfile;
use crate::domain::user::entity::user;
use crate::utils::auth::CurrentUser;
use crate::utils::error::AppError;

const NO_REGISTRATION: &str = "No team registration found for this user in the specified form";
const FORM_NOT_FOUND: &str = "Form not found";

const REMOVE_MEMBER_ERROR: &str = "Error removing team member";
const TEAM_DETAILS_ERROR: &str = "Error fetching team details";
const REGISTER_ERROR: &str = "Error registering for form";
const LIST_REGISTRATIONS_ERROR: &str = "Error fetching registrations";

/// 팀 코드 충돌 시 재생성 횟수
const MAX_TEAM_CODE_ATTEMPTS: usize = 5;

pub struct RegistrationService;

impl RegistrationService {
    /// 팀 멤버 삭제
    ///
    /// 등록 행을 `FOR UPDATE`로 잠근 트랜잭션 안에서 검증과 갱신을 수행하므로,
    /// 같은 팀에 대한 동시 삭제는 직렬화되고 검증 실패 시 아무것도 저장되지 않습니다.
    pub async fn remove_member(
        db: &DatabaseConnection,
        form_id: &str,
        caller: &CurrentUser,
        member_email: &str,
    ) -> Result<TeamDetails, AppError> {
        // 1. 입력 검증 (대상 이메일은 공백 여부만 보고 원래 값으로 비교)
        let form_id = required(form_id, "Form ID is required")?;
        required(member_email, "Member email is required")?;
        let db_err = |e: DbErr| AppError::internal(REMOVE_MEMBER_ERROR, e);

        // 2. 트랜잭션 시작
        let txn = db.begin().await.map_err(db_err)?;

        // 3. 호출자가 속한 등록 조회 (행 잠금)
        let registration = form_registration::Entity::find()
            .filter(form_registration::Column::FormId.eq(form_id))
            .filter(form_registration::has_member(&caller.email))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::not_found(NO_REGISTRATION))?;

        let form = find_form(&txn, &registration.form_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::not_found(FORM_NOT_FOUND))?;

        let owner_email = user::Entity::find_by_id(registration.user_id.clone())
            .one(&txn)
            .await
            .map_err(db_err)?
            .map(|owner| owner.email)
            .unwrap_or_default();

        // 4. 팀 행사 / 권한 / 대상 존재 / 마지막 멤버 검증
        let updated = membership::plan_removal(
            &form.info,
            &owner_email,
            caller,
            &registration.reg_team_mem_emails,
            member_email,
        )?;

        // 5. 멤버 목록과 팀 크기를 함께 갱신
        update_members(&txn, &registration.id, &updated)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(
            form_id = %form_id,
            registration_id = %registration.id,
            removed = %member_email,
            by = %caller.email,
            team_size = updated.len(),
            "team member removed"
        );

        let registration = form_registration::Model {
            team_size: updated.len() as i32,
            reg_team_mem_emails: updated,
            ..registration
        };

        build_team_details(db, &registration, &form.info)
            .await
            .map_err(db_err)
    }

    /// 호출자가 속한 팀 상세 조회
    pub async fn get_team_details(
        db: &DatabaseConnection,
        form_id: &str,
        caller: &CurrentUser,
    ) -> Result<TeamDetails, AppError> {
        let form_id = required(form_id, "Form ID is required")?;
        let db_err = |e: DbErr| AppError::internal(TEAM_DETAILS_ERROR, e);

        let registration = form_registration::Entity::find()
            .filter(form_registration::Column::FormId.eq(form_id))
            .filter(form_registration::has_member(&caller.email))
            .one(db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::not_found(NO_REGISTRATION))?;

        let form = find_form(db, &registration.form_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::not_found(FORM_NOT_FOUND))?;

        build_team_details(db, &registration, &form.info)
            .await
            .map_err(db_err)
    }

    /// 폼 등록
    ///
    /// - 개인 폼: 호출자 1인 등록
    /// - 팀 폼 + `teamCode`: 기존 팀 합류
    /// - 팀 폼 + `teamName`: 새 팀 생성 (팀 코드 발급)
    ///
    /// 중복 등록 확인부터 저장까지 한 트랜잭션에서 (폼, 호출자) 단위 advisory lock을
    /// 잡고 수행하므로, 같은 사용자의 동시 등록은 하나만 성공합니다.
    pub async fn register(
        db: &DatabaseConnection,
        form_id: &str,
        caller: &CurrentUser,
        req: RegisterRequest,
    ) -> Result<TeamDetails, AppError> {
        let form_id = required(form_id, "Form ID is required")?;
        let db_err = |e: DbErr| AppError::internal(REGISTER_ERROR, e);

        // 1. 폼 확인
        let form = find_form(db, form_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::not_found(FORM_NOT_FOUND))?;

        if !form.is_open {
            return Err(AppError::invalid_operation(
                "Registrations are closed for this form",
            ));
        }

        // 2. 사용자 확인
        let user = user::Entity::find()
            .filter(user::Column::Email.eq(caller.email.as_str()))
            .one(db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        // 3. (폼, 호출자) 잠금 후 중복 등록 확인
        let txn = db.begin().await.map_err(db_err)?;
        lock_registrant(&txn, &form.id, &caller.email)
            .await
            .map_err(db_err)?;

        let existing = form_registration::Entity::find()
            .filter(form_registration::Column::FormId.eq(form.id.as_str()))
            .filter(form_registration::has_member(&caller.email))
            .one(&txn)
            .await
            .map_err(db_err)?;

        if existing.is_some() {
            return Err(AppError::conflict(
                "You have already registered for this form",
            ));
        }

        // 4. 개인 폼 / 팀 합류 / 팀 생성
        let registration = if !form.info.is_team_event() {
            insert_registration(&txn, &form.id, &user, None, None)
                .await
                .map_err(db_err)?
        } else {
            let team_code = non_empty(req.team_code).map(|code| code.to_ascii_uppercase());
            let team_name = non_empty(req.team_name);

            match (team_code, team_name) {
                (Some(code), _) => Self::join_team(&txn, &form, caller, &code).await?,
                (None, Some(name)) => Self::create_team(&txn, &user, &form.id, name).await?,
                (None, None) => {
                    return Err(AppError::invalid_input(
                        "Team name or team code is required",
                    ))
                }
            }
        };

        txn.commit().await.map_err(db_err)?;

        info!(
            form_id = %form.id,
            registration_id = %registration.id,
            email = %caller.email,
            team_size = registration.team_size,
            "registered"
        );

        build_team_details(db, &registration, &form.info)
            .await
            .map_err(db_err)
    }

    async fn join_team(
        txn: &DatabaseTransaction,
        form: &form::Model,
        caller: &CurrentUser,
        team_code: &str,
    ) -> Result<form_registration::Model, AppError> {
        let db_err = |e: DbErr| AppError::internal(REGISTER_ERROR, e);

        let registration = form_registration::Entity::find()
            .filter(form_registration::Column::FormId.eq(form.id.as_str()))
            .filter(form_registration::Column::TeamCode.eq(team_code))
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::not_found("Invalid team code"))?;

        let updated = membership::add_member(
            &registration.reg_team_mem_emails,
            &caller.email,
            form.info.effective_max_team_size(),
        )?;

        update_members(txn, &registration.id, &updated)
            .await
            .map_err(db_err)?;

        Ok(form_registration::Model {
            team_size: updated.len() as i32,
            reg_team_mem_emails: updated,
            ..registration
        })
    }

    async fn create_team(
        txn: &DatabaseTransaction,
        owner: &user::Model,
        form_id: &str,
        team_name: String,
    ) -> Result<form_registration::Model, AppError> {
        let team_code = allocate_team_code(txn).await?;

        insert_registration(txn, form_id, owner, Some(team_name), Some(team_code))
            .await
            .map_err(|e| AppError::internal(REGISTER_ERROR, e))
    }

    /// 폼의 전체 등록 목록 (관리자용)
    pub async fn list_registrations(
        db: &DatabaseConnection,
        form_id: &str,
    ) -> Result<Vec<RegistrationSummary>, AppError> {
        let form_id = required(form_id, "Form ID is required")?;
        let db_err = |e: DbErr| AppError::internal(LIST_REGISTRATIONS_ERROR, e);

        find_form(db, form_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::not_found(FORM_NOT_FOUND))?;

        let registrations = form_registration::Entity::find()
            .filter(form_registration::Column::FormId.eq(form_id))
            .order_by_asc(form_registration::Column::CreatedAt)
            .all(db)
            .await
            .map_err(db_err)?;

        Ok(registrations
            .into_iter()
            .map(RegistrationSummary::from)
            .collect())
    }
}

fn required<'a>(value: &'a str, message: &str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input(message));
    }
    Ok(trimmed)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn find_form<C: ConnectionTrait>(conn: &C, form_id: &str) -> Result<Option<form::Model>, DbErr> {
    form::Entity::find_by_id(form_id.to_string()).one(conn).await
}

/// 같은 폼에 대한 같은 사용자의 등록 시도를 트랜잭션이 끝날 때까지 직렬화합니다.
async fn lock_registrant<C: ConnectionTrait>(
    conn: &C,
    form_id: &str,
    email: &str,
) -> Result<(), DbErr> {
    conn.execute(Statement::from_sql_and_values(
        conn.get_database_backend(),
        "SELECT pg_advisory_xact_lock(hashtext($1))",
        [format!("{}:{}", form_id, email).into()],
    ))
    .await?;
    Ok(())
}

/// 멤버 목록과 `team_size`를 한 번의 UPDATE로 저장합니다.
async fn update_members<C: ConnectionTrait>(
    conn: &C,
    registration_id: &str,
    members: &[String],
) -> Result<(), DbErr> {
    let result = form_registration::Entity::update_many()
        .col_expr(
            form_registration::Column::RegTeamMemEmails,
            Expr::value(members.to_vec()),
        )
        .col_expr(
            form_registration::Column::TeamSize,
            Expr::value(members.len() as i32),
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

async fn insert_registration<C: ConnectionTrait>(
    conn: &C,
    form_id: &str,
    owner: &user::Model,
    team_name: Option<String>,
    team_code: Option<String>,
) -> Result<form_registration::Model, DbErr> {
    let now = Utc::now().naive_utc();
    let model = form_registration::Model {
        id: Uuid::new_v4().to_string(),
        form_id: form_id.to_string(),
        user_id: owner.id.clone(),
        team_name,
        team_code,
        team_size: 1,
        reg_team_mem_emails: vec![owner.email.clone()],
        attendance_code: None,
        attended: false,
        attended_at: None,
        created_at: now,
        updated_at: now,
    };

    let active = form_registration::ActiveModel {
        id: Set(model.id.clone()),
        form_id: Set(model.form_id.clone()),
        user_id: Set(model.user_id.clone()),
        team_name: Set(model.team_name.clone()),
        team_code: Set(model.team_code.clone()),
        team_size: Set(model.team_size),
        reg_team_mem_emails: Set(model.reg_team_mem_emails.clone()),
        attendance_code: Set(None),
        attended: Set(false),
        attended_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    form_registration::Entity::insert(active)
        .exec_without_returning(conn)
        .await?;

    Ok(model)
}

async fn allocate_team_code<C: ConnectionTrait>(conn: &C) -> Result<String, AppError> {
    for _ in 0..MAX_TEAM_CODE_ATTEMPTS {
        let code = membership::generate_team_code();
        let taken = form_registration::Entity::find()
            .filter(form_registration::Column::TeamCode.eq(code.as_str()))
            .one(conn)
            .await
            .map_err(|e| AppError::internal(REGISTER_ERROR, e))?;

        if taken.is_none() {
            return Ok(code);
        }
    }

    Err(AppError::internal(
        REGISTER_ERROR,
        "could not allocate a unique team code",
    ))
}

/// 남은 멤버의 프로필을 멤버 목록 순서대로 불러와 팀 요약을 만듭니다.
async fn build_team_details<C: ConnectionTrait>(
    conn: &C,
    registration: &form_registration::Model,
    info: &FormInfo,
) -> Result<TeamDetails, DbErr> {
    let members = load_profiles(conn, &registration.reg_team_mem_emails).await?;

    Ok(TeamDetails {
        team_name: registration.team_name.clone(),
        team_code: registration.team_code.clone(),
        team_size: registration.team_size,
        max_team_size: info.effective_max_team_size(),
        members,
        event_title: info.event_title.clone(),
    })
}

async fn load_profiles<C: ConnectionTrait>(
    conn: &C,
    emails: &[String],
) -> Result<Vec<UserProfile>, DbErr> {
    if emails.is_empty() {
        return Ok(Vec::new());
    }

    let users = user::Entity::find()
        .filter(user::Column::Email.is_in(emails.iter().cloned()))
        .all(conn)
        .await?;

    let mut by_email: HashMap<String, user::Model> = users
        .into_iter()
        .map(|u| (u.email.clone(), u))
        .collect();

    // 사용자 행이 없는 이메일은 건너뜁니다.
    Ok(emails
        .iter()
        .filter_map(|email| by_email.remove(email))
        .map(UserProfile::from)
        .collect())
}
