use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::dto::{FormDeleteResponse, FormRequest, FormResponse};
use super::entity::form;
use crate::domain::registration::entity::form_registration;
use crate::utils::error::AppError;

const FORM_NOT_FOUND: &str = "Form not found";

const LIST_FORMS_ERROR: &str = "Error fetching forms";
const ADD_FORM_ERROR: &str = "Error creating form";
const EDIT_FORM_ERROR: &str = "Error updating form";
const DELETE_FORM_ERROR: &str = "Error deleting form";

pub struct FormService;

impl FormService {
    /// 전체 폼 목록 (최신순)
    pub async fn list_forms(db: &DatabaseConnection) -> Result<Vec<FormResponse>, AppError> {
        let forms = form::Entity::find()
            .order_by_desc(form::Column::CreatedAt)
            .all(db)
            .await
            .map_err(|e| AppError::internal(LIST_FORMS_ERROR, e))?;

        Ok(forms.into_iter().map(FormResponse::from).collect())
    }

    pub async fn add_form(
        db: &DatabaseConnection,
        req: FormRequest,
    ) -> Result<FormResponse, AppError> {
        let (info, is_open) = req.into_parts();
        let now = Utc::now().naive_utc();

        let model = form::Model {
            id: Uuid::new_v4().to_string(),
            info,
            is_open,
            created_at: now,
            updated_at: now,
        };

        let active = form::ActiveModel {
            id: Set(model.id.clone()),
            info: Set(model.info.clone()),
            is_open: Set(model.is_open),
            created_at: Set(now),
            updated_at: Set(now),
        };

        form::Entity::insert(active)
            .exec_without_returning(db)
            .await
            .map_err(|e| AppError::internal(ADD_FORM_ERROR, e))?;

        info!(form_id = %model.id, title = %model.info.event_title, "form created");

        Ok(FormResponse::from(model))
    }

    /// 행사 정보와 접수 여부를 통째로 교체합니다.
    pub async fn edit_form(
        db: &DatabaseConnection,
        form_id: &str,
        req: FormRequest,
    ) -> Result<FormResponse, AppError> {
        let db_err = |e: DbErr| AppError::internal(EDIT_FORM_ERROR, e);

        let existing = form::Entity::find_by_id(form_id.to_string())
            .one(db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::not_found(FORM_NOT_FOUND))?;

        let (info, is_open) = req.into_parts();
        let now = Utc::now().naive_utc();

        let result = form::Entity::update_many()
            .col_expr(form::Column::Info, Expr::value(info.clone()))
            .col_expr(form::Column::IsOpen, Expr::value(is_open))
            .col_expr(form::Column::UpdatedAt, Expr::value(now))
            .filter(form::Column::Id.eq(existing.id.as_str()))
            .exec(db)
            .await
            .map_err(db_err)?;

        // 조회와 갱신 사이에 삭제된 경우
        if result.rows_affected == 0 {
            return Err(AppError::not_found(FORM_NOT_FOUND));
        }

        info!(form_id = %existing.id, "form updated");

        Ok(FormResponse::from(form::Model {
            info,
            is_open,
            updated_at: now,
            ..existing
        }))
    }

    /// 폼과 그 등록을 한 트랜잭션에서 삭제합니다.
    pub async fn delete_form(
        db: &DatabaseConnection,
        form_id: &str,
    ) -> Result<FormDeleteResponse, AppError> {
        let db_err = |e: DbErr| AppError::internal(DELETE_FORM_ERROR, e);

        let txn = db.begin().await.map_err(db_err)?;

        let existing = form::Entity::find_by_id(form_id.to_string())
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::not_found(FORM_NOT_FOUND))?;

        let removed = form_registration::Entity::delete_many()
            .filter(form_registration::Column::FormId.eq(existing.id.as_str()))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        form::Entity::delete_by_id(existing.id.clone())
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(
            form_id = %existing.id,
            registrations_removed = removed.rows_affected,
            "form deleted"
        );

        Ok(FormDeleteResponse { id: existing.id })
    }
}
