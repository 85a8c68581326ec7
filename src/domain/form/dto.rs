use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::form::{self, FormInfo, ParticipationType};

/// 폼 생성/수정 요청
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormRequest {
    #[validate(length(min = 1, max = 200, message = "Event title must be 1~200 characters"))]
    pub event_title: String,
    #[validate(length(max = 5000, message = "Event description must be at most 5000 characters"))]
    pub event_description: Option<String>,
    pub participation_type: ParticipationType,
    #[validate(range(min = 1, max = 100, message = "Max team size must be between 1 and 100"))]
    pub max_team_size: Option<i32>,
    pub event_date: Option<String>,
    pub venue: Option<String>,
    /// 기본값 true
    pub is_open: Option<bool>,
}

impl FormRequest {
    pub fn into_parts(self) -> (FormInfo, bool) {
        let info = FormInfo {
            event_title: self.event_title.trim().to_string(),
            event_description: self.event_description,
            participation_type: self.participation_type,
            max_team_size: self.max_team_size,
            event_date: self.event_date,
            venue: self.venue,
        };
        (info, self.is_open.unwrap_or(true))
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub id: String,
    pub info: FormInfo,
    pub is_open: bool,
    #[schema(example = "2026-01-26T10:00:00")]
    pub created_at: String,
}

impl From<form::Model> for FormResponse {
    fn from(model: form::Model) -> Self {
        Self {
            id: model.id,
            info: model.info,
            is_open: model.is_open,
            created_at: model.created_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDeleteResponse {
    pub id: String,
}

/// 폼 단건 성공 응답 (Swagger 문서용)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessFormResponse {
    pub success: bool,
    pub message: String,
    pub data: FormResponse,
}

/// 폼 목록 성공 응답 (Swagger 문서용)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessFormListResponse {
    pub success: bool,
    pub message: String,
    pub data: Vec<FormResponse>,
}

/// 폼 삭제 성공 응답 (Swagger 문서용)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessFormDeleteResponse {
    pub success: bool,
    pub message: String,
    pub data: FormDeleteResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, max_team_size: Option<i32>) -> FormRequest {
        FormRequest {
            event_title: title.to_string(),
            event_description: None,
            participation_type: ParticipationType::Team,
            max_team_size,
            event_date: None,
            venue: None,
            is_open: None,
        }
    }

    #[test]
    fn should_pass_valid_form_request() {
        assert!(request("Hackathon", Some(4)).validate().is_ok());
    }

    #[test]
    fn should_fail_when_title_is_empty() {
        assert!(request("", Some(4)).validate().is_err());
    }

    #[test]
    fn should_fail_when_max_team_size_is_zero() {
        assert!(request("Hackathon", Some(0)).validate().is_err());
    }

    #[test]
    fn should_default_is_open_to_true() {
        let (info, is_open) = request("  Hackathon  ", None).into_parts();

        assert!(is_open);
        assert_eq!(info.event_title, "Hackathon");
    }

    #[test]
    fn should_parse_request_from_camel_case_json() {
        let req: FormRequest = serde_json::from_str(
            r#"{"eventTitle":"CTF","participationType":"Individual","isOpen":false}"#,
        )
        .unwrap();

        let (info, is_open) = req.into_parts();
        assert_eq!(info.participation_type, ParticipationType::Individual);
        assert!(!is_open);
    }
}
