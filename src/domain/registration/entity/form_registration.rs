use sea_orm::entity::prelude::*;
use sea_orm::sea_query::extension::postgres::PgFunc;
use sea_orm::sea_query::{Expr, SimpleExpr};
use serde::{Deserialize, Serialize};

/// 폼과 팀(또는 개인)을 묶는 등록 레코드
///
/// `team_size`는 항상 `reg_team_mem_emails.len()`과 같고, 멤버 목록은 비어 있을 수 없습니다.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "form_registration")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub form_id: String,
    /// 등록자(팀 생성자)
    pub user_id: String,
    pub team_name: Option<String>,
    #[sea_orm(unique)]
    pub team_code: Option<String>,
    pub team_size: i32,
    pub reg_team_mem_emails: Vec<String>,
    /// 처음 조회할 때 발급되는 출석 코드
    #[sea_orm(unique)]
    pub attendance_code: Option<String>,
    pub attended: bool,
    pub attended_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::form::entity::form::Entity",
        from = "Column::FormId",
        to = "crate::domain::form::entity::form::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Form,
    #[sea_orm(
        belongs_to = "crate::domain::user::entity::user::Entity",
        from = "Column::UserId",
        to = "crate::domain::user::entity::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<crate::domain::form::entity::form::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Form.def()
    }
}

impl Related<crate::domain::user::entity::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// 멤버 목록에 `email`이 포함된 등록만 고르는 조건 (`$n = ANY("reg_team_mem_emails")`)
pub fn has_member(email: &str) -> SimpleExpr {
    Expr::val(email).eq(PgFunc::any(Expr::col((Entity, Column::RegTeamMemEmails))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn should_bind_member_email_as_parameter() {
        // Arrange & Act
        let stmt = Entity::find()
            .filter(Column::FormId.eq("form-1"))
            .filter(has_member("a@x"))
            .build(DbBackend::Postgres);

        // Assert
        assert!(stmt
            .sql
            .contains(r#"$2 = ANY("form_registration"."reg_team_mem_emails")"#));
        assert!(!stmt.sql.contains('?'));
        let values = stmt.values.expect("statement should carry values").0;
        assert_eq!(values[0], Value::from("form-1"));
        assert_eq!(values[1], Value::from("a@x"));
    }
}
