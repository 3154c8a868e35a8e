use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub vehicle_number: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub role: String,
    pub vehicle_number: String,
}
