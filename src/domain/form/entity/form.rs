use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 참가 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ParticipationType {
    Team,
    Individual,
}

/// 폼의 행사 정보 블록 (JSONB 컬럼)
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct FormInfo {
    #[schema(example = "Hackathon 2026")]
    pub event_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_description: Option<String>,
    pub participation_type: ParticipationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 4)]
    pub max_team_size: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

impl FormInfo {
    pub fn is_team_event(&self) -> bool {
        self.participation_type == ParticipationType::Team
    }

    /// 설정되지 않았거나 1 미만이면 1
    pub fn effective_max_team_size(&self) -> i32 {
        self.max_team_size.filter(|size| *size >= 1).unwrap_or(1)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "form")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub info: FormInfo,
    pub is_open: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
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

#[cfg(test)]
mod tests {
    use super::*;

    fn info(participation_type: ParticipationType, max_team_size: Option<i32>) -> FormInfo {
        FormInfo {
            event_title: "Hackathon".to_string(),
            event_description: None,
            participation_type,
            max_team_size,
            event_date: None,
            venue: None,
        }
    }

    #[test]
    fn should_default_max_team_size_to_one() {
        assert_eq!(info(ParticipationType::Team, None).effective_max_team_size(), 1);
        assert_eq!(info(ParticipationType::Team, Some(0)).effective_max_team_size(), 1);
        assert_eq!(info(ParticipationType::Team, Some(4)).effective_max_team_size(), 4);
    }

    #[test]
    fn should_parse_info_json_in_camel_case() {
        let parsed: FormInfo = serde_json::from_str(
            r#"{"eventTitle":"CTF","participationType":"Team","maxTeamSize":3}"#,
        )
        .unwrap();

        assert!(parsed.is_team_event());
        assert_eq!(parsed.max_team_size, Some(3));
        assert_eq!(parsed.event_description, None);
    }

    #[test]
    fn should_reject_unknown_participation_type() {
        let parsed = serde_json::from_str::<FormInfo>(
            r#"{"eventTitle":"CTF","participationType":"Duo"}"#,
        );
        assert!(parsed.is_err());
    }
}
