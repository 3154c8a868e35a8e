use std::sync::Arc;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use crate::controller::AppState;
use crate::error::ApiError;
use crate::helpers::validation::{
    is_blank, is_valid_calendar_date, is_valid_clock_time, INVALID_DATE, INVALID_TIME, REQUIRED,
};
use crate::models::pass::NewPass;
use crate::repositories::postgres_repo::PostgresConnectionRepo;

pub fn router(app_state: AppState) -> Router {
    let postgres_repo = Arc::new(PostgresConnectionRepo::new(
        app_state.postgres_connection
    ));

    Router::new()
        .route("/create-monthly-pass", post(create_monthly_pass))
        .route("/create-yearly-pass", post(create_yearly_pass))
        .route_layer(Extension(postgres_repo))
}

/// Shared application form for both pass kinds; the frontend submits the
/// same field set to either endpoint.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PassApplication {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<String>,
    pub vehicle_number: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl PassApplication {
    fn validate(&self) -> Vec<(&'static str, &'static str)> {
        let mut errors = Vec::new();
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("age", &self.age),
            ("vehicle_number", &self.vehicle_number),
        ] {
            if is_blank(value) {
                errors.push((field, REQUIRED));
            }
        }
        for (field, value) in [("start_time", &self.start_time), ("end_time", &self.end_time)] {
            match value.as_deref() {
                None | Some("") => errors.push((field, REQUIRED)),
                Some(v) if !is_valid_clock_time(v) => errors.push((field, INVALID_TIME)),
                Some(_) => {}
            }
        }
        for (field, value) in [("start_date", &self.start_date), ("end_date", &self.end_date)] {
            match value.as_deref() {
                None | Some("") => errors.push((field, REQUIRED)),
                Some(v) if !is_valid_calendar_date(v) => errors.push((field, INVALID_DATE)),
                Some(_) => {}
            }
        }
        errors
    }

    fn into_new_pass(self) -> NewPass {
        NewPass {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            age: self.age.unwrap_or_default(),
            vehicle_number: self.vehicle_number.unwrap_or_default(),
            start_time: self.start_time.unwrap_or_default(),
            end_time: self.end_time.unwrap_or_default(),
            start_date: self.start_date.unwrap_or_default(),
            end_date: self.end_date.unwrap_or_default(),
        }
    }
}

pub async fn create_monthly_pass(
    Extension(postgres_repo): Extension<Arc<PostgresConnectionRepo>>,
    Json(body): Json<PassApplication>,
) -> Result<impl IntoResponse, ApiError> {
    let field_errors = body.validate();
    if !field_errors.is_empty() {
        return Err(ApiError::Validation(field_errors));
    }

    let created = postgres_repo
        .create_monthly_pass(&body.into_new_pass())
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn create_yearly_pass(
    Extension(postgres_repo): Extension<Arc<PostgresConnectionRepo>>,
    Json(body): Json<PassApplication>,
) -> Result<impl IntoResponse, ApiError> {
    let field_errors = body.validate();
    if !field_errors.is_empty() {
        return Err(ApiError::Validation(field_errors));
    }

    let created = postgres_repo
        .create_yearly_pass(&body.into_new_pass())
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_application() -> PassApplication {
        PassApplication {
            name: Some("Priya".to_string()),
            email: Some("x@y.com".to_string()),
            age: Some("27".to_string()),
            vehicle_number: Some("TN-07-1234".to_string()),
            start_time: Some("08:00".to_string()),
            end_time: Some("12:00".to_string()),
            start_date: Some("2026-08-01".to_string()),
            end_date: Some("2026-08-30".to_string()),
        }
    }

    #[test]
    fn complete_application_passes_validation() {
        assert!(complete_application().validate().is_empty());
    }

    #[test]
    fn bad_date_is_flagged_as_invalid() {
        let mut application = complete_application();
        application.end_date = Some("30/08/2026".to_string());
        assert_eq!(application.validate(), vec![("end_date", INVALID_DATE)]);
    }

    #[test]
    fn conversion_preserves_every_field() {
        let new_pass = complete_application().into_new_pass();
        assert_eq!(new_pass.email, "x@y.com");
        assert_eq!(new_pass.vehicle_number, "TN-07-1234");
        assert_eq!(new_pass.end_date, "2026-08-30");
    }
}
