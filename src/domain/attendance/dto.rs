use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::registration::entity::form_registration;

/// 참가자에게 보여주는 출석 코드
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceCode {
    #[schema(example = "Q7K2M9XD")]
    pub attendance_code: String,
    pub attended: bool,
}

/// 출석 처리 요청 (현장에서 스캔한 코드)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 16, message = "Attendance code is required"))]
    #[schema(example = "Q7K2M9XD")]
    pub attendance_code: String,
}

/// 등록 단위 출석 현황
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub registration_id: String,
    pub team_name: Option<String>,
    pub members: Vec<String>,
    pub attended: bool,
    #[schema(example = "2026-01-26T10:00:00")]
    pub attended_at: Option<String>,
}

impl From<form_registration::Model> for AttendanceRecord {
    fn from(model: form_registration::Model) -> Self {
        Self {
            registration_id: model.id,
            team_name: model.team_name,
            members: model.reg_team_mem_emails,
            attended: model.attended,
            attended_at: model
                .attended_at
                .map(|at| at.format("%Y-%m-%dT%H:%M:%S").to_string()),
        }
    }
}

/// 출석 코드 성공 응답 (Swagger 문서용)
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessAttendanceCodeResponse {
    pub success: bool,
    pub message: String,
    pub data: AttendanceCode,
}

/// 출석 처리 성공 응답 (Swagger 문서용)
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessAttendanceRecordResponse {
    pub success: bool,
    pub message: String,
    pub data: AttendanceRecord,
}

/// 출석 현황 목록 성공 응답 (Swagger 문서용)
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessAttendanceListResponse {
    pub success: bool,
    pub message: String,
    pub data: Vec<AttendanceRecord>,
}
