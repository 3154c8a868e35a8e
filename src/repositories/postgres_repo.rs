use anyhow::anyhow;
use bb8_postgres::bb8::{Pool, PooledConnection};
use bb8_postgres::tokio_postgres::{NoTls, Row};
use bb8_postgres::PostgresConnectionManager;
use tracing::warn;

use crate::models::employee::{Employee, NewEmployee};
use crate::models::pass::{MonthlyPass, NewPass, PassKind, YearlyPass};
use crate::models::reservation::{NewReservation, Reservation};

pub const RETRY_LIMIT: usize = 5;

pub struct PostgresConnectionRepo {
    postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
}

impl PostgresConnectionRepo {
    pub fn new(
        postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
    ) -> Self {
        Self {
            postgres_connection
        }
    }

    async fn get_postgres_connection(
        &self,
    ) -> anyhow::Result<PooledConnection<PostgresConnectionManager<NoTls>>> {
        for _ in 0..RETRY_LIMIT {
            match self.postgres_connection.get().await {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    warn!("Failed to retrieve postgres connection due to: {}, retrying in 3s", e);
                    tokio::time::sleep(tokio::time::Duration::from_secs(3)).await;
                    continue;
                }
            }
        }

        return Err(anyhow!("Failed to retrieve a valid connection from postgres pool, BAILING"));
    }

    pub async fn create_reservation(
        &self,
        new_reservation: &NewReservation,
    ) -> anyhow::Result<Reservation> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "INSERT INTO parking_reservations \
            (spot_id, spot_type, name, email, password, start_time, end_time, duration_hours) \
            VALUES ('{}', '{}', '{}', '{}', '{}', '{}', '{}', {}) \
            RETURNING *;",
            new_reservation.spot_id,
            new_reservation.spot_type,
            new_reservation.name,
            new_reservation.email,
            new_reservation.password,
            new_reservation.start_time,
            new_reservation.end_time,
            new_reservation.duration_hours,
        );

        let res = conn
            .query(&stmt, &[])
            .await;
        match res {
            Ok(rows) => match rows.into_iter().next() {
                Some(row) => Ok(parse_row_into_reservation(row)),
                None => Err(anyhow!("Reservation insert returned no row")),
            },
            Err(e) => {
                warn!("Failed to insert reservation for spot: {}, due to: {}", new_reservation.spot_id, e);
                Err(anyhow!("Failed to persist the reservation"))
            }
        }
    }

    pub async fn create_monthly_pass(
        &self,
        new_pass: &NewPass,
    ) -> anyhow::Result<MonthlyPass> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "INSERT INTO monthly_passes \
            (name, email, age, vehicle_number, start_time, end_time, start_date, end_date) \
            VALUES ('{}', '{}', '{}', '{}', '{}', '{}', '{}', '{}') \
            RETURNING *;",
            new_pass.name,
            new_pass.email,
            new_pass.age,
            new_pass.vehicle_number,
            new_pass.start_time,
            new_pass.end_time,
            new_pass.start_date,
            new_pass.end_date,
        );

        let res = conn
            .query(&stmt, &[])
            .await;
        match res {
            Ok(rows) => match rows.into_iter().next() {
                Some(row) => Ok(parse_row_into_monthly_pass(row)),
                None => Err(anyhow!("Monthly pass insert returned no row")),
            },
            Err(e) => {
                warn!("Failed to insert monthly pass for: {}, due to: {}", new_pass.email, e);
                Err(anyhow!("Failed to persist the monthly pass"))
            }
        }
    }

    pub async fn create_yearly_pass(
        &self,
        new_pass: &NewPass,
    ) -> anyhow::Result<YearlyPass> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "INSERT INTO yearly_passes \
            (name, email, age, vehicle_number, start_time, end_time, start_date, end_date) \
            VALUES ('{}', '{}', '{}', '{}', '{}', '{}', '{}', '{}') \
            RETURNING *;",
            new_pass.name,
            new_pass.email,
            new_pass.age,
            new_pass.vehicle_number,
            new_pass.start_time,
            new_pass.end_time,
            new_pass.start_date,
            new_pass.end_date,
        );

        let res = conn
            .query(&stmt, &[])
            .await;
        match res {
            Ok(rows) => match rows.into_iter().next() {
                Some(row) => Ok(parse_row_into_yearly_pass(row)),
                None => Err(anyhow!("Yearly pass insert returned no row")),
            },
            Err(e) => {
                warn!("Failed to insert yearly pass for: {}, due to: {}", new_pass.email, e);
                Err(anyhow!("Failed to persist the yearly pass"))
            }
        }
    }

    pub async fn create_employee(
        &self,
        new_employee: &NewEmployee,
    ) -> anyhow::Result<Employee> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "INSERT INTO employees (name, email, role, vehicle_number) \
            VALUES ('{}', '{}', '{}', '{}') \
            RETURNING *;",
            new_employee.name,
            new_employee.email,
            new_employee.role,
            new_employee.vehicle_number,
        );

        let res = conn
            .query(&stmt, &[])
            .await;
        match res {
            Ok(rows) => match rows.into_iter().next() {
                Some(row) => Ok(parse_row_into_employee(row)),
                None => Err(anyhow!("Employee insert returned no row")),
            },
            Err(e) => {
                warn!("Failed to insert employee: {}, due to: {}", new_employee.email, e);
                Err(anyhow!("Failed to persist the employee"))
            }
        }
    }

    /// Most recently created reservation for the spot and email, if any.
    /// Email comparison is case-insensitive.
    pub async fn find_reservation_for_spot(
        &self,
        spot_id: &String,
        email: &String,
    ) -> anyhow::Result<Option<Reservation>> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "SELECT * FROM parking_reservations \
            WHERE spot_id = '{}' AND lower(email) = lower('{}') \
            ORDER BY id DESC LIMIT 1;",
            spot_id,
            email,
        );

        let res = conn
            .query(&stmt, &[])
            .await;
        match res {
            Ok(rows) => Ok(rows.into_iter().next().map(parse_row_into_reservation)),
            Err(e) => {
                warn!("Ran into an issue retrieving the reservation for spot: {}, due to: {}", spot_id, e);
                Err(anyhow!("Failed to look up the reservation"))
            }
        }
    }

    /// Checks both pass tables in one round trip. A yearly pass wins when
    /// the email holds both.
    pub async fn find_pass_kind(
        &self,
        email: &String,
    ) -> anyhow::Result<Option<PassKind>> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "SELECT \
            EXISTS(SELECT 1 FROM monthly_passes WHERE lower(email) = lower('{0}')) AS has_monthly, \
            EXISTS(SELECT 1 FROM yearly_passes WHERE lower(email) = lower('{0}')) AS has_yearly;",
            email,
        );

        let res = conn
            .query(&stmt, &[])
            .await;
        match res {
            Ok(rows) => {
                let row = rows
                    .into_iter()
                    .next()
                    .ok_or_else(|| anyhow!("Pass lookup returned no row"))?;
                let has_monthly = row.get::<&str, bool>("has_monthly");
                let has_yearly = row.get::<&str, bool>("has_yearly");
                if has_yearly {
                    Ok(Some(PassKind::Yearly))
                } else if has_monthly {
                    Ok(Some(PassKind::Monthly))
                } else {
                    Ok(None)
                }
            }
            Err(e) => {
                warn!("Ran into an issue checking pass status for: {}, due to: {}", email, e);
                Err(anyhow!("Failed to look up pass status"))
            }
        }
    }

    pub async fn delete_reservation(
        &self,
        reservation_id: i32,
    ) -> anyhow::Result<()> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "DELETE FROM parking_reservations WHERE id = {};",
            reservation_id,
        );

        let res = conn
            .execute(&stmt, &[])
            .await;
        match res {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("Failed to delete reservation: {}, due to: {}", reservation_id, e);
                Err(anyhow!("Failed to delete the reservation"))
            }
        }
    }

    /// Flips the scanned flag on the most recently created unscanned
    /// reservation for the spot. One conditional statement so concurrent
    /// scans flip at most one row; the affected-row count is the source
    /// of truth.
    pub async fn mark_spot_scanned(
        &self,
        spot_id: &String,
    ) -> anyhow::Result<bool> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "UPDATE parking_reservations SET is_scanned = TRUE \
            WHERE id = (\
                SELECT id FROM parking_reservations \
                WHERE spot_id = '{}' AND is_scanned = FALSE \
                ORDER BY id DESC LIMIT 1\
            );",
            spot_id,
        );

        let res = conn
            .execute(&stmt, &[])
            .await;
        match res {
            Ok(updated) => Ok(updated > 0),
            Err(e) => {
                warn!("Failed to mark spot: {} as scanned, due to: {}", spot_id, e);
                Err(anyhow!("Failed to mark the reservation as scanned"))
            }
        }
    }

    /// Delete-on-read for the polling client: removes scanned reservations
    /// for the spot and reports whether anything was removed. A second
    /// concurrent poll deletes nothing and reports false.
    pub async fn claim_scanned_reservation(
        &self,
        spot_id: &String,
    ) -> anyhow::Result<bool> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "DELETE FROM parking_reservations \
            WHERE spot_id = '{}' AND is_scanned = TRUE;",
            spot_id,
        );

        let res = conn
            .execute(&stmt, &[])
            .await;
        match res {
            Ok(deleted) => Ok(deleted > 0),
            Err(e) => {
                warn!("Failed to claim scanned reservation for spot: {}, due to: {}", spot_id, e);
                Err(anyhow!("Failed to check the scan status"))
            }
        }
    }
}

fn parse_row_into_reservation(
    row: Row,
) -> Reservation {
    Reservation {
        id: row.get("id"),
        spot_id: row.get("spot_id"),
        spot_type: row.get("spot_type"),
        name: row.get("name"),
        email: row.get("email"),
        password: row.get("password"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        duration_hours: row.get::<&str, f64>("duration_hours"),
        is_scanned: row.get("is_scanned"),
    }
}

fn parse_row_into_monthly_pass(
    row: Row,
) -> MonthlyPass {
    MonthlyPass {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        age: row.get("age"),
        vehicle_number: row.get("vehicle_number"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
    }
}

fn parse_row_into_yearly_pass(
    row: Row,
) -> YearlyPass {
    YearlyPass {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        age: row.get("age"),
        vehicle_number: row.get("vehicle_number"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
    }
}

fn parse_row_into_employee(
    row: Row,
) -> Employee {
    Employee {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        role: row.get("role"),
        vehicle_number: row.get("vehicle_number"),
    }
}
