use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Reservation {
    pub id: i32,
    pub spot_id: String,
    pub spot_type: String,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string, never serialized back to clients
    #[serde(skip_serializing, default)]
    pub password: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_hours: f64,
    pub is_scanned: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewReservation {
    pub spot_id: String,
    pub spot_type: String,
    pub name: String,
    pub email: String,
    /// Already hashed by the endpoint layer
    pub password: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_hours: f64,
}
