use serde::{Deserialize, Serialize};

/// Holding either pass exempts a cancellation from the QR confirmation step.
/// Existence alone grants the status, there is no expiry check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassKind {
    Monthly,
    Yearly,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MonthlyPass {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub age: String,
    pub vehicle_number: String,
    pub start_time: String,
    pub end_time: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct YearlyPass {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub age: String,
    pub vehicle_number: String,
    pub start_time: String,
    pub end_time: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewPass {
    pub name: String,
    pub email: String,
    pub age: String,
    pub vehicle_number: String,
    pub start_time: String,
    pub end_time: String,
    pub start_date: String,
    pub end_date: String,
}
