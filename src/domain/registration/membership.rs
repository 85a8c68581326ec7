//! 팀 멤버 목록 변경 규칙
//!
//! DB 접근 없이 검증과 목록 변경만 담당합니다. 서비스는 여기서 만든 새 목록을
//! 그대로 저장하므로, 이 함수들이 실패하면 저장도 일어나지 않습니다.

use rand::{distributions::Alphanumeric, Rng};

use crate::domain::form::entity::form::FormInfo;
use crate::utils::auth::CurrentUser;
use crate::utils::error::AppError;

pub const TEAM_CODE_LENGTH: usize = 6;
pub const ATTENDANCE_CODE_LENGTH: usize = 8;

/// 멤버 삭제 검증 후 삭제된 새 목록을 반환합니다.
///
/// 검사 순서: 팀 행사 여부 → 권한(생성자 또는 관리자) → 대상 존재 → 마지막 멤버 보호.
pub fn plan_removal(
    info: &FormInfo,
    owner_email: &str,
    caller: &CurrentUser,
    members: &[String],
    target: &str,
) -> Result<Vec<String>, AppError> {
    ensure_team_event(info)?;
    authorize_removal(owner_email, caller)?;
    remove_one(members, target)
}

pub fn ensure_team_event(info: &FormInfo) -> Result<(), AppError> {
    if !info.is_team_event() {
        return Err(AppError::invalid_operation("This is not a team event"));
    }
    Ok(())
}

pub fn authorize_removal(owner_email: &str, caller: &CurrentUser) -> Result<(), AppError> {
    if owner_email != caller.email && !caller.is_admin() {
        return Err(AppError::forbidden(
            "Only the team creator or admin can remove members",
        ));
    }
    Ok(())
}

/// 첫 번째로 일치하는 항목 하나만 제거합니다.
pub fn remove_one(members: &[String], target: &str) -> Result<Vec<String>, AppError> {
    let position = members
        .iter()
        .position(|email| email == target)
        .ok_or_else(|| AppError::not_found("Member not found in this team"))?;

    if members.len() <= 1 {
        return Err(AppError::invalid_operation(
            "Cannot remove the last member from the team",
        ));
    }

    let mut updated = members.to_vec();
    updated.remove(position);
    Ok(updated)
}

/// 팀 합류 검증 후 멤버가 추가된 새 목록을 반환합니다.
pub fn add_member(
    members: &[String],
    email: &str,
    max_team_size: i32,
) -> Result<Vec<String>, AppError> {
    if members.iter().any(|m| m == email) {
        return Err(AppError::conflict("You are already a member of this team"));
    }

    if members.len() >= max_team_size.max(1) as usize {
        return Err(AppError::invalid_operation("Team is already full"));
    }

    let mut updated = members.to_vec();
    updated.push(email.to_string());
    Ok(updated)
}

/// 6자리 대문자/숫자 팀 코드
pub fn generate_team_code() -> String {
    generate_code(TEAM_CODE_LENGTH)
}

pub fn generate_attendance_code() -> String {
    generate_code(ATTENDANCE_CODE_LENGTH)
}

fn generate_code(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(|b| (b as char).to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::entity::form::ParticipationType;
    use crate::utils::auth::Role;

    fn team_info() -> FormInfo {
        FormInfo {
            event_title: "Hackathon".to_string(),
            event_description: None,
            participation_type: ParticipationType::Team,
            max_team_size: Some(4),
            event_date: None,
            venue: None,
        }
    }

    fn caller(email: &str, access: Role) -> CurrentUser {
        CurrentUser {
            email: email.to_string(),
            access,
        }
    }

    fn emails(list: &[&str]) -> Vec<String> {
        list.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn should_remove_member_when_caller_is_creator() {
        // Arrange
        let members = emails(&["a@x", "b@x", "c@x"]);

        // Act
        let updated = plan_removal(
            &team_info(),
            "a@x",
            &caller("a@x", Role::User),
            &members,
            "b@x",
        )
        .unwrap();

        // Assert
        assert_eq!(updated, emails(&["a@x", "c@x"]));
    }

    #[test]
    fn should_allow_admin_who_is_not_creator() {
        let members = emails(&["a@x", "b@x"]);

        let updated = plan_removal(
            &team_info(),
            "a@x",
            &caller("b@x", Role::Admin),
            &members,
            "a@x",
        )
        .unwrap();

        assert_eq!(updated, emails(&["b@x"]));
    }

    #[test]
    fn should_fail_for_non_creator_user() {
        let members = emails(&["a@x", "b@x", "c@x"]);

        let result = plan_removal(
            &team_info(),
            "a@x",
            &caller("d@x", Role::User),
            &members,
            "b@x",
        );

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn should_check_authorization_before_target_existence() {
        // 대상이 없어도 권한 오류가 먼저
        let members = emails(&["a@x", "b@x"]);

        let result = plan_removal(
            &team_info(),
            "a@x",
            &caller("b@x", Role::User),
            &members,
            "nobody@x",
        );

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn should_fail_for_individual_event() {
        let mut info = team_info();
        info.participation_type = ParticipationType::Individual;

        let result = plan_removal(
            &info,
            "a@x",
            &caller("a@x", Role::Admin),
            &emails(&["a@x", "b@x"]),
            "b@x",
        );

        match result {
            Err(AppError::InvalidOperation(msg)) => assert_eq!(msg, "This is not a team event"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn should_fail_when_member_not_in_team() {
        let result = remove_one(&emails(&["a@x", "b@x"]), "z@x");

        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Member not found in this team"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn should_fail_when_removing_last_member() {
        let result = remove_one(&emails(&["a@x"]), "a@x");

        match result {
            Err(AppError::InvalidOperation(msg)) => {
                assert_eq!(msg, "Cannot remove the last member from the team")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn should_remove_only_one_occurrence_of_duplicate() {
        let updated = remove_one(&emails(&["a@x", "b@x", "b@x"]), "b@x").unwrap();
        assert_eq!(updated, emails(&["a@x", "b@x"]));
    }

    #[test]
    fn should_preserve_member_order_after_removal() {
        let updated = remove_one(&emails(&["a@x", "b@x", "c@x", "d@x"]), "a@x").unwrap();
        assert_eq!(updated, emails(&["b@x", "c@x", "d@x"]));
    }

    #[test]
    fn should_add_member_when_team_has_room() {
        let updated = add_member(&emails(&["a@x"]), "b@x", 2).unwrap();
        assert_eq!(updated, emails(&["a@x", "b@x"]));
    }

    #[test]
    fn should_fail_to_add_when_team_is_full() {
        let result = add_member(&emails(&["a@x", "b@x"]), "c@x", 2);
        assert!(matches!(result, Err(AppError::InvalidOperation(_))));
    }

    #[test]
    fn should_fail_to_add_duplicate_member() {
        let result = add_member(&emails(&["a@x", "b@x"]), "b@x", 4);
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[test]
    fn should_generate_uppercase_alphanumeric_team_code() {
        let code = generate_team_code();

        assert_eq!(code.len(), TEAM_CODE_LENGTH);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn should_generate_longer_attendance_code() {
        let code = generate_attendance_code();

        assert_eq!(code.len(), ATTENDANCE_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric() && !c.is_ascii_lowercase()));
    }
}
