use std::path::Path as FsPath;
use std::sync::Arc;
use axum::extract::Path;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;
use crate::config::Config;
use crate::controller::AppState;
use crate::error::ApiError;
use crate::helpers::password;
use crate::helpers::qr_generator::generate_qr;
use crate::helpers::validation::{is_blank, REQUIRED};
use crate::models::pass::PassKind;
use crate::repositories::postgres_repo::PostgresConnectionRepo;

pub fn router(app_state: AppState) -> Router {
    let postgres_repo = Arc::new(PostgresConnectionRepo::new(
        app_state.postgres_connection
    ));
    let settings = Arc::new(app_state.config);

    Router::new()
        .route("/cancel-reservation", post(cancel_reservation))
        .route("/mark-as-scanned/:spot_id", get(mark_as_scanned))
        .route("/check-scan-status/:spot_id", get(check_scan_status))
        .route_layer(Extension(postgres_repo))
        .route_layer(Extension(settings))
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CancelReservation {
    pub spot_id: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl CancelReservation {
    fn validate(&self) -> Vec<(&'static str, &'static str)> {
        let mut errors = Vec::new();
        if is_blank(&self.spot_id) {
            errors.push(("spot_id", REQUIRED));
        }
        if is_blank(&self.email) {
            errors.push(("email", REQUIRED));
        }
        if is_blank(&self.password) {
            errors.push(("password", REQUIRED));
        }
        errors
    }
}

/// Step 1 of the cancellation protocol. Pass holders are cancelled on the
/// spot; everyone else gets a QR link and keeps their row until the
/// polling client observes the scan.
pub async fn cancel_reservation(
    Extension(postgres_repo): Extension<Arc<PostgresConnectionRepo>>,
    Extension(settings): Extension<Arc<Config>>,
    Json(body): Json<CancelReservation>,
) -> Result<Json<Value>, ApiError> {
    let field_errors = body.validate();
    if !field_errors.is_empty() {
        return Err(ApiError::Validation(field_errors));
    }

    let spot_id = body.spot_id.unwrap_or_default();
    let email = body.email.unwrap_or_default().trim().to_lowercase();
    let supplied_password = body.password.unwrap_or_default();

    let reservation = postgres_repo
        .find_reservation_for_spot(&spot_id, &email)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("No reservation found for this email at this spot.".to_string())
        })?;

    if !password::verify_password(&supplied_password, &reservation.password) {
        return Err(ApiError::Unauthorized(
            "Incorrect password. Cancellation denied.".to_string(),
        ));
    }

    match postgres_repo.find_pass_kind(&email).await? {
        Some(kind) => {
            postgres_repo.delete_reservation(reservation.id).await?;
            let message = match kind {
                PassKind::Yearly => "Reservation cancelled. Thanks for being a Yearly Pass holder!",
                PassKind::Monthly => "Reservation cancelled. Thanks for being a Monthly Pass holder!",
            };
            Ok(Json(json!({ "success": message, "qr": null })))
        }
        None => {
            let scan_link = build_scan_link(&settings.scan_base_url, &spot_id);
            let qr_path = generate_qr(
                &scan_link,
                &format!("cancel_{}.png", spot_id),
                FsPath::new(&settings.media_dir),
            )?;
            Ok(Json(json!({
                "success": "Reservation cancelled successfully!",
                "qr": qr_path
            })))
        }
    }
}

/// Step 2, opened by whatever device scans the QR link. Flips the scanned
/// flag on the most recent awaiting reservation for the spot. Always
/// answers 200 with a readable page so the scanning device never sees a
/// hard error, and a repeated scan is a no-op.
pub async fn mark_as_scanned(
    Extension(postgres_repo): Extension<Arc<PostgresConnectionRepo>>,
    Path(spot_id): Path<String>,
) -> Html<String> {
    match postgres_repo.mark_spot_scanned(&spot_id).await {
        Ok(true) => Html(scan_confirmed_page(&spot_id)),
        Ok(false) => Html(scan_unavailable_page(&spot_id)),
        Err(e) => {
            warn!("Something went wrong confirming the scan for spot: {}, due to: {}", spot_id, e);
            Html(scan_unavailable_page(&spot_id))
        }
    }
}

/// Step 3, polled by the original client. Deleting and reporting happen in
/// one conditional statement, so exactly one poll observes true and a poll
/// after deletion quietly reports false.
pub async fn check_scan_status(
    Extension(postgres_repo): Extension<Arc<PostgresConnectionRepo>>,
    Path(spot_id): Path<String>,
) -> Json<Value> {
    match postgres_repo.claim_scanned_reservation(&spot_id).await {
        Ok(removed) => Json(json!({ "is_scanned": removed })),
        Err(e) => {
            warn!("Something went wrong checking scan status for spot: {}, due to: {}", spot_id, e);
            Json(json!({ "is_scanned": false }))
        }
    }
}

fn build_scan_link(scan_base_url: &str, spot_id: &str) -> String {
    format!(
        "{}/api/mark-as-scanned/{}",
        scan_base_url.trim_end_matches('/'),
        spot_id
    )
}

fn scan_confirmed_page(spot_id: &str) -> String {
    format!(
        "<html><body>\
        <h2>Cancellation confirmed</h2>\
        <p>The reservation for spot {} is being released. You can close this page.</p>\
        </body></html>",
        spot_id
    )
}

fn scan_unavailable_page(spot_id: &str) -> String {
    format!(
        "<html><body>\
        <h2>Nothing to confirm</h2>\
        <p>Spot {} has no pending cancellation, or it was already scanned.</p>\
        </body></html>",
        spot_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_link_embeds_the_spot_id() {
        let link = build_scan_link("http://192.168.1.20:8000", "A1");
        assert_eq!(link, "http://192.168.1.20:8000/api/mark-as-scanned/A1");
    }

    #[test]
    fn scan_link_tolerates_a_trailing_slash() {
        let link = build_scan_link("http://192.168.1.20:8000/", "B7");
        assert_eq!(link, "http://192.168.1.20:8000/api/mark-as-scanned/B7");
    }

    #[test]
    fn empty_body_reports_every_missing_field() {
        let body = CancelReservation {
            spot_id: None,
            email: None,
            password: None,
        };
        let errors = body.validate();
        let fields: Vec<&str> = errors.iter().map(|(f, _)| *f).collect();
        assert_eq!(fields, vec!["spot_id", "email", "password"]);
    }

    #[test]
    fn whitespace_only_fields_count_as_missing() {
        let body = CancelReservation {
            spot_id: Some("A1".to_string()),
            email: Some("   ".to_string()),
            password: Some("p".to_string()),
        };
        let errors = body.validate();
        assert_eq!(errors, vec![("email", REQUIRED)]);
    }

    #[test]
    fn complete_body_passes_validation() {
        let body = CancelReservation {
            spot_id: Some("A1".to_string()),
            email: Some("x@y.com".to_string()),
            password: Some("p".to_string()),
        };
        assert!(body.validate().is_empty());
    }

    #[test]
    fn scan_pages_mention_the_spot() {
        assert!(scan_confirmed_page("A1").contains("spot A1"));
        assert!(scan_unavailable_page("A1").contains("Spot A1"));
    }
}
