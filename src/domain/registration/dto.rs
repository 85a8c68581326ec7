use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::form_registration;
use crate::domain::user::dto::UserProfile;

/// 팀 요약 정보
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetails {
    #[schema(example = "Alpha")]
    pub team_name: Option<String>,
    #[schema(example = "K3Q9ZD")]
    pub team_code: Option<String>,
    #[schema(example = 2)]
    pub team_size: i32,
    #[schema(example = 4)]
    pub max_team_size: i32,
    pub members: Vec<UserProfile>,
    #[schema(example = "Hackathon 2026")]
    pub event_title: String,
}

/// 팀 멤버 삭제 요청
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveMemberRequest {
    /// 누락되거나 `null`이면 서비스 단계에서 "Member email is required"로 거절됩니다.
    #[serde(default)]
    #[schema(example = "b@x.com")]
    pub member_email: Option<String>,
}

impl RemoveMemberRequest {
    pub fn member_email(&self) -> &str {
        self.member_email.as_deref().unwrap_or_default()
    }
}

/// 폼 등록 요청. 팀 폼에서는 `teamCode`(합류) 또는 `teamName`(생성) 중 하나가 필요합니다.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(max = 100, message = "Team name must be at most 100 characters"))]
    pub team_name: Option<String>,
    #[validate(length(min = 1, max = 16, message = "Team code must be 1~16 characters"))]
    pub team_code: Option<String>,
}

/// 관리자용 등록 목록 항목
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSummary {
    pub id: String,
    pub team_name: Option<String>,
    pub team_code: Option<String>,
    pub team_size: i32,
    pub members: Vec<String>,
    pub attended: bool,
    #[schema(example = "2026-01-26T10:00:00")]
    pub created_at: String,
}

impl From<form_registration::Model> for RegistrationSummary {
    fn from(model: form_registration::Model) -> Self {
        Self {
            id: model.id,
            team_name: model.team_name,
            team_code: model.team_code,
            team_size: model.team_size,
            members: model.reg_team_mem_emails,
            attended: model.attended,
            created_at: model.created_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}

/// 팀 상세 성공 응답 (Swagger 문서용)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessTeamDetailsResponse {
    pub success: bool,
    pub message: String,
    pub data: TeamDetails,
}

/// 등록 목록 성공 응답 (Swagger 문서용)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessRegistrationListResponse {
    pub success: bool,
    pub message: String,
    pub data: Vec<RegistrationSummary>,
}
