use std::sync::Arc;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use crate::controller::AppState;
use crate::error::ApiError;
use crate::helpers::validation::{is_blank, REQUIRED};
use crate::models::employee::NewEmployee;
use crate::repositories::postgres_repo::PostgresConnectionRepo;

pub fn router(app_state: AppState) -> Router {
    let postgres_repo = Arc::new(PostgresConnectionRepo::new(
        app_state.postgres_connection
    ));

    Router::new()
        .route("/new-employee", post(register_employee))
        .route_layer(Extension(postgres_repo))
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RegisterEmployee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub vehicle_number: Option<String>,
}

impl RegisterEmployee {
    fn validate(&self) -> Vec<(&'static str, &'static str)> {
        let mut errors = Vec::new();
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("role", &self.role),
            ("vehicle_number", &self.vehicle_number),
        ] {
            if is_blank(value) {
                errors.push((field, REQUIRED));
            }
        }
        errors
    }
}

pub async fn register_employee(
    Extension(postgres_repo): Extension<Arc<PostgresConnectionRepo>>,
    Json(body): Json<RegisterEmployee>,
) -> Result<impl IntoResponse, ApiError> {
    let field_errors = body.validate();
    if !field_errors.is_empty() {
        return Err(ApiError::Validation(field_errors));
    }

    let new_employee = NewEmployee {
        name: body.name.unwrap_or_default(),
        email: body.email.unwrap_or_default(),
        role: body.role.unwrap_or_default(),
        vehicle_number: body.vehicle_number.unwrap_or_default(),
    };

    let created = postgres_repo.create_employee(&new_employee).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_is_required() {
        let body = RegisterEmployee {
            name: None,
            email: Some("staff@campus.edu".to_string()),
            role: None,
            vehicle_number: None,
        };
        let fields: Vec<&str> = body.validate().iter().map(|(f, _)| *f).collect();
        assert_eq!(fields, vec!["name", "role", "vehicle_number"]);
    }

    #[test]
    fn complete_body_passes_validation() {
        let body = RegisterEmployee {
            name: Some("Arun".to_string()),
            email: Some("staff@campus.edu".to_string()),
            role: Some("attendant".to_string()),
            vehicle_number: Some("TN-09-4321".to_string()),
        };
        assert!(body.validate().is_empty());
    }
}
