pub mod config;
pub mod domain;
pub mod global;
pub mod shutdown;
pub mod state;
pub mod utils;

pub use state::AppState;

use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use domain::{attendance, form, health, registration};
use global::middleware::request_id_middleware;
use utils::auth::{check_access, verify_token, Role};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::handler::health_check,
        form::handler::get_all_forms,
        form::handler::add_form,
        form::handler::edit_form,
        form::handler::delete_form,
        registration::handler::get_team_details,
        registration::handler::remove_member,
        registration::handler::register,
        registration::handler::download_registrations,
        attendance::handler::get_attendance_code,
        attendance::handler::mark_attendance,
        attendance::handler::export_attendance,
    ),
    components(
        schemas(
            health::dto::HealthStatus,
            health::dto::HealthState,
            health::dto::DatabaseCheck,
            form::entity::form::FormInfo,
            form::entity::form::ParticipationType,
            form::dto::FormRequest,
            form::dto::FormResponse,
            form::dto::FormDeleteResponse,
            form::dto::SuccessFormResponse,
            form::dto::SuccessFormListResponse,
            form::dto::SuccessFormDeleteResponse,
            domain::user::dto::UserProfile,
            registration::dto::TeamDetails,
            registration::dto::RemoveMemberRequest,
            registration::dto::RegisterRequest,
            registration::dto::RegistrationSummary,
            registration::dto::SuccessTeamDetailsResponse,
            registration::dto::SuccessRegistrationListResponse,
            attendance::dto::AttendanceCode,
            attendance::dto::MarkAttendanceRequest,
            attendance::dto::AttendanceRecord,
            attendance::dto::SuccessAttendanceCodeResponse,
            attendance::dto::SuccessAttendanceRecordResponse,
            attendance::dto::SuccessAttendanceListResponse,
            utils::response::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "헬스체크 API"),
        (name = "Form", description = "폼 조회 API"),
        (name = "Registration", description = "폼 등록 및 팀 관리 API"),
        (name = "Attendance", description = "출석 코드 및 출석 처리 API"),
        (name = "Admin", description = "관리자 전용 API")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn app(state: AppState) -> Router {
    let public = Router::new().route("/getAllForms", get(form::handler::get_all_forms));

    let user_routes = Router::new()
        .route(
            "/teamDetails/:formId",
            get(registration::handler::get_team_details),
        )
        .route(
            "/removeMember/:formId",
            delete(registration::handler::remove_member),
        )
        .route("/register/:formId", post(registration::handler::register))
        .route(
            "/attendanceCode/:id",
            get(attendance::handler::get_attendance_code),
        )
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            check_access(Role::User, req, next)
        }));

    let admin_routes = Router::new()
        .route("/addForm", post(form::handler::add_form))
        .route("/editForm/:id", put(form::handler::edit_form))
        .route("/deleteForm/:id", delete(form::handler::delete_form))
        .route(
            "/download/:id",
            get(registration::handler::download_registrations),
        )
        .route("/markAttendance", post(attendance::handler::mark_attendance))
        .route(
            "/export-attendance/:id",
            get(attendance::handler::export_attendance),
        )
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            check_access(Role::Admin, req, next)
        }));

    // 게이트보다 토큰 검증이 먼저 실행됩니다.
    let protected = user_routes
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), verify_token));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .nest("/api/form", public.merge(protected))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
