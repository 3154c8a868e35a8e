use std::sync::Arc;
use anyhow::anyhow;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::controller::AppState;
use crate::error::ApiError;
use crate::helpers::password;
use crate::helpers::validation::{is_blank, is_valid_clock_time, INVALID_TIME, REQUIRED};
use crate::models::reservation::NewReservation;
use crate::repositories::postgres_repo::PostgresConnectionRepo;

pub fn router(app_state: AppState) -> Router {
    let postgres_repo = Arc::new(PostgresConnectionRepo::new(
        app_state.postgres_connection
    ));

    Router::new()
        .route("/reserve", post(reserve_spot))
        .route_layer(Extension(postgres_repo))
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ReserveSpot {
    pub spot_id: Option<String>,
    pub spot_type: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration_hours: Option<f64>,
}

impl ReserveSpot {
    fn validate(&self) -> Vec<(&'static str, &'static str)> {
        let mut errors = Vec::new();
        for (field, value) in [
            ("spot_id", &self.spot_id),
            ("spot_type", &self.spot_type),
            ("name", &self.name),
            ("email", &self.email),
            ("password", &self.password),
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
        if self.duration_hours.is_none() {
            errors.push(("duration_hours", REQUIRED));
        }
        errors
    }
}

pub async fn reserve_spot(
    Extension(postgres_repo): Extension<Arc<PostgresConnectionRepo>>,
    Json(body): Json<ReserveSpot>,
) -> Result<impl IntoResponse, ApiError> {
    let field_errors = body.validate();
    if !field_errors.is_empty() {
        return Err(ApiError::Validation(field_errors));
    }

    let password_hash = password::hash_password(body.password.as_deref().unwrap_or_default())
        .map_err(|e| {
            warn!("Failed to hash a reservation password due to: {}", e);
            ApiError::Internal(anyhow!("Failed to hash the reservation password"))
        })?;

    let new_reservation = NewReservation {
        spot_id: body.spot_id.unwrap_or_default(),
        spot_type: body.spot_type.unwrap_or_default(),
        name: body.name.unwrap_or_default(),
        email: body.email.unwrap_or_default(),
        password: password_hash,
        start_time: body.start_time.unwrap_or_default(),
        end_time: body.end_time.unwrap_or_default(),
        duration_hours: body.duration_hours.unwrap_or_default(),
    };

    let created = postgres_repo.create_reservation(&new_reservation).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_body() -> ReserveSpot {
        ReserveSpot {
            spot_id: Some("A1".to_string()),
            spot_type: Some("car".to_string()),
            name: Some("Priya".to_string()),
            email: Some("x@y.com".to_string()),
            password: Some("p".to_string()),
            start_time: Some("09:00".to_string()),
            end_time: Some("11:00".to_string()),
            duration_hours: Some(2.0),
        }
    }

    #[test]
    fn complete_body_passes_validation() {
        assert!(complete_body().validate().is_empty());
    }

    #[test]
    fn missing_fields_are_each_reported() {
        let body = ReserveSpot {
            spot_id: None,
            spot_type: None,
            name: None,
            email: None,
            password: None,
            start_time: None,
            end_time: None,
            duration_hours: None,
        };
        assert_eq!(body.validate().len(), 8);
    }

    #[test]
    fn malformed_times_are_flagged_not_required() {
        let mut body = complete_body();
        body.start_time = Some("9am".to_string());
        let errors = body.validate();
        assert_eq!(errors, vec![("start_time", INVALID_TIME)]);
    }
}
