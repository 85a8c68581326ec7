use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub img: Option<String>,
    pub roll_number: Option<String>,
    pub college: Option<String>,
    pub year: Option<i32>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::domain::registration::entity::form_registration::Entity")]
    FormRegistration,
}

impl Related<crate::domain::registration::entity::form_registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FormRegistration.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
