use serde::Serialize;
use utoipa::ToSchema;

use super::entity::user;

/// 팀 상세에 노출되는 멤버 프로필
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[schema(example = "홍길동")]
    pub name: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    pub img: Option<String>,
    pub roll_number: Option<String>,
    pub college: Option<String>,
    pub year: Option<i32>,
}

impl From<user::Model> for UserProfile {
    fn from(model: user::Model) -> Self {
        Self {
            name: model.name,
            email: model.email,
            img: model.img,
            roll_number: model.roll_number,
            college: model.college,
            year: model.year,
        }
    }
}
