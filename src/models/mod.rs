pub mod employee;
pub mod pass;
pub mod reservation;
