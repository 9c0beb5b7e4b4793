use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{
    Admin, AdminRole, Bike, BikeCategory, BikeStatus, BookingSession, Customer, PaymentStatus,
    Rental, SessionData,
};

const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn fmt_dt(dt: &NaiveDateTime) -> String {
    dt.format(DT_FORMAT).to_string()
}

fn parse_dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DT_FORMAT).unwrap_or_else(|_| Utc::now().naive_utc())
}

// ── Categories ──

pub fn list_categories(conn: &Connection) -> anyhow::Result<Vec<BikeCategory>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, price_daily, price_weekly, price_monthly, deposit_amount
         FROM bike_categories ORDER BY price_daily ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(BikeCategory {
            id: row.get(0)?,
            name: row.get(1)?,
            price_daily: row.get(2)?,
            price_weekly: row.get(3)?,
            price_monthly: row.get(4)?,
            deposit_amount: row.get(5)?,
        })
    })?;

    let mut categories = vec![];
    for row in rows {
        categories.push(row?);
    }
    Ok(categories)
}

pub fn get_category(conn: &Connection, id: i64) -> anyhow::Result<Option<BikeCategory>> {
    let result = conn.query_row(
        "SELECT id, name, price_daily, price_weekly, price_monthly, deposit_amount
         FROM bike_categories WHERE id = ?1",
        params![id],
        |row| {
            Ok(BikeCategory {
                id: row.get(0)?,
                name: row.get(1)?,
                price_daily: row.get(2)?,
                price_weekly: row.get(3)?,
                price_monthly: row.get(4)?,
                deposit_amount: row.get(5)?,
            })
        },
    );

    match result {
        Ok(category) => Ok(Some(category)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Bikes ──

pub struct BikeInput {
    pub license_plate: String,
    pub model_name: String,
    pub color: String,
    pub engine_size: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub status: BikeStatus,
    pub category_id: i64,
}

/// A bike joined with its category, as shown in listings.
#[derive(serde::Serialize)]
pub struct BikeListing {
    pub id: i64,
    pub license_plate: String,
    pub model_name: String,
    pub color: String,
    pub engine_size: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub status: BikeStatus,
    pub category_id: i64,
    pub category_name: String,
    pub price_daily: f64,
    pub price_weekly: f64,
    pub price_monthly: f64,
    pub deposit_amount: f64,
}

const BIKE_LISTING_SELECT: &str = "SELECT b.id, b.license_plate, b.model_name, b.color, b.engine_size, b.image_url, b.description, b.status, b.category_id, c.name, c.price_daily, c.price_weekly, c.price_monthly, c.deposit_amount
     FROM bikes b INNER JOIN bike_categories c ON b.category_id = c.id";

fn parse_bike_listing_row(row: &rusqlite::Row) -> anyhow::Result<BikeListing> {
    let status_str: String = row.get(7)?;
    Ok(BikeListing {
        id: row.get(0)?,
        license_plate: row.get(1)?,
        model_name: row.get(2)?,
        color: row.get(3)?,
        engine_size: row.get(4)?,
        image_url: row.get(5)?,
        description: row.get(6)?,
        status: BikeStatus::parse(&status_str),
        category_id: row.get(8)?,
        category_name: row.get(9)?,
        price_daily: row.get(10)?,
        price_weekly: row.get(11)?,
        price_monthly: row.get(12)?,
        deposit_amount: row.get(13)?,
    })
}

pub fn insert_bike(conn: &Connection, bike: &BikeInput) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO bikes (license_plate, model_name, color, engine_size, image_url, description, status, category_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            bike.license_plate,
            bike.model_name,
            bike.color,
            bike.engine_size,
            bike.image_url,
            bike.description,
            bike.status.as_str(),
            bike.category_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_bike(conn: &Connection, id: i64, bike: &BikeInput) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bikes SET license_plate = ?1, model_name = ?2, color = ?3, engine_size = ?4,
                image_url = ?5, description = ?6, status = ?7, category_id = ?8
         WHERE id = ?9",
        params![
            bike.license_plate,
            bike.model_name,
            bike.color,
            bike.engine_size,
            bike.image_url,
            bike.description,
            bike.status.as_str(),
            bike.category_id,
            id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_bike(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM bikes WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn get_bike(conn: &Connection, id: i64) -> anyhow::Result<Option<Bike>> {
    let result = conn.query_row(
        "SELECT id, license_plate, model_name, color, engine_size, image_url, description, status, category_id
         FROM bikes WHERE id = ?1",
        params![id],
        |row| {
            let status_str: String = row.get(7)?;
            Ok(Bike {
                id: row.get(0)?,
                license_plate: row.get(1)?,
                model_name: row.get(2)?,
                color: row.get(3)?,
                engine_size: row.get(4)?,
                image_url: row.get(5)?,
                description: row.get(6)?,
                status: BikeStatus::parse(&status_str),
                category_id: row.get(8)?,
            })
        },
    );

    match result {
        Ok(bike) => Ok(Some(bike)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn license_plate_taken(
    conn: &Connection,
    plate: &str,
    exclude_id: Option<i64>,
) -> anyhow::Result<bool> {
    let count: i64 = match exclude_id {
        Some(id) => conn.query_row(
            "SELECT COUNT(*) FROM bikes WHERE license_plate = ?1 AND id != ?2",
            params![plate, id],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            "SELECT COUNT(*) FROM bikes WHERE license_plate = ?1",
            params![plate],
            |row| row.get(0),
        )?,
    };
    Ok(count > 0)
}

pub fn set_bike_status(conn: &Connection, id: i64, status: BikeStatus) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bikes SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

pub fn list_bikes(conn: &Connection) -> anyhow::Result<Vec<BikeListing>> {
    let sql = format!("{BIKE_LISTING_SELECT} ORDER BY c.name ASC, b.model_name ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(parse_bike_listing_row(row)))?;

    let mut bikes = vec![];
    for row in rows {
        bikes.push(row??);
    }
    Ok(bikes)
}

pub fn list_available_bikes(
    conn: &Connection,
    category_id: Option<i64>,
) -> anyhow::Result<Vec<BikeListing>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match category_id {
        Some(category) => (
            format!(
                "{BIKE_LISTING_SELECT} WHERE b.status = 'Available' AND b.category_id = ?1
                 ORDER BY c.price_daily ASC, b.model_name ASC"
            ),
            vec![Box::new(category) as Box<dyn rusqlite::types::ToSql>],
        ),
        None => (
            format!(
                "{BIKE_LISTING_SELECT} WHERE b.status = 'Available'
                 ORDER BY c.price_daily ASC, b.model_name ASC"
            ),
            vec![],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_bike_listing_row(row)))?;

    let mut bikes = vec![];
    for row in rows {
        bikes.push(row??);
    }
    Ok(bikes)
}

// ── Customers ──

fn parse_customer_row(row: &rusqlite::Row) -> anyhow::Result<Customer> {
    let created_at_str: String = row.get(7)?;
    Ok(Customer {
        id: row.get(0)?,
        citizen_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
        line_id: row.get(6)?,
        created_at: parse_dt(&created_at_str),
    })
}

pub fn get_customer_by_citizen_id(
    conn: &Connection,
    citizen_id: &str,
) -> anyhow::Result<Option<Customer>> {
    let result = conn.query_row(
        "SELECT id, citizen_id, first_name, last_name, phone, email, line_id, created_at
         FROM customers WHERE citizen_id = ?1",
        params![citizen_id],
        |row| Ok(parse_customer_row(row)),
    );

    match result {
        Ok(customer) => Ok(Some(customer?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_customers(conn: &Connection, limit: i64) -> anyhow::Result<Vec<Customer>> {
    let mut stmt = conn.prepare(
        "SELECT id, citizen_id, first_name, last_name, phone, email, line_id, created_at
         FROM customers ORDER BY created_at DESC, id DESC LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| Ok(parse_customer_row(row)))?;

    let mut customers = vec![];
    for row in rows {
        customers.push(row??);
    }
    Ok(customers)
}

// ── Rentals ──

pub struct RentalInput {
    pub customer_id: i64,
    pub bike_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub total_price: f64,
    pub is_delivery: bool,
    pub delivery_address: Option<String>,
    pub payment_status: PaymentStatus,
}

fn parse_rental_row(row: &rusqlite::Row) -> anyhow::Result<Rental> {
    let start_str: String = row.get(3)?;
    let end_str: String = row.get(4)?;
    let return_str: Option<String> = row.get(5)?;
    let status_str: String = row.get(9)?;
    let created_str: String = row.get(10)?;

    Ok(Rental {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        bike_id: row.get(2)?,
        start_date: parse_dt(&start_str),
        end_date: parse_dt(&end_str),
        actual_return_date: return_str.as_deref().map(parse_dt),
        total_price: row.get(6)?,
        is_delivery: row.get::<_, i32>(7)? != 0,
        delivery_address: row.get(8)?,
        payment_status: PaymentStatus::parse(&status_str),
        created_at: parse_dt(&created_str),
    })
}

const RENTAL_SELECT: &str = "SELECT id, customer_id, bike_id, start_date, end_date, actual_return_date, total_price, is_delivery, delivery_address, payment_status, created_at FROM rentals";

pub fn insert_rental(conn: &Connection, rental: &RentalInput) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO rentals (customer_id, bike_id, start_date, end_date, total_price, is_delivery, delivery_address, payment_status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            rental.customer_id,
            rental.bike_id,
            fmt_dt(&rental.start_date),
            fmt_dt(&rental.end_date),
            rental.total_price,
            rental.is_delivery as i32,
            rental.delivery_address,
            rental.payment_status.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_rental(conn: &Connection, id: i64) -> anyhow::Result<Option<Rental>> {
    let sql = format!("{RENTAL_SELECT} WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], |row| Ok(parse_rental_row(row)));

    match result {
        Ok(rental) => Ok(Some(rental?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_rental_status(
    conn: &Connection,
    id: i64,
    status: PaymentStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE rentals SET payment_status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

/// The open rental a return should close: Active, not yet returned,
/// most recent by start date.
pub fn find_open_rental_for_bike(
    conn: &Connection,
    bike_id: i64,
) -> anyhow::Result<Option<Rental>> {
    let sql = format!(
        "{RENTAL_SELECT} WHERE bike_id = ?1 AND payment_status = 'Active' AND actual_return_date IS NULL
         ORDER BY start_date DESC LIMIT 1"
    );
    let result = conn.query_row(&sql, params![bike_id], |row| Ok(parse_rental_row(row)));

    match result {
        Ok(rental) => Ok(Some(rental?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn close_rental(conn: &Connection, id: i64, returned_at: &NaiveDateTime) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE rentals SET actual_return_date = ?1, payment_status = 'Done' WHERE id = ?2",
        params![fmt_dt(returned_at), id],
    )?;
    Ok(count > 0)
}

pub fn count_rentals_for_bike(conn: &Connection, bike_id: i64) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM rentals WHERE bike_id = ?1",
        params![bike_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// A rental joined with customer and bike, as shown in the admin list.
pub struct RentalListing {
    pub rental: Rental,
    pub customer_name: String,
    pub license_plate: String,
    pub model_name: String,
}

pub fn list_rentals(
    conn: &Connection,
    status_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<RentalListing>> {
    let base = "SELECT r.id, r.customer_id, r.bike_id, r.start_date, r.end_date, r.actual_return_date, r.total_price, r.is_delivery, r.delivery_address, r.payment_status, r.created_at,
                c.first_name || ' ' || c.last_name, b.license_plate, b.model_name
         FROM rentals r
         INNER JOIN customers c ON r.customer_id = c.id
         INNER JOIN bikes b ON r.bike_id = b.id";

    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            format!("{base} WHERE r.payment_status = ?1 ORDER BY r.created_at DESC, r.id DESC LIMIT ?2"),
            vec![
                Box::new(status.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            format!("{base} ORDER BY r.created_at DESC, r.id DESC LIMIT ?1"),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| {
        let customer_name: String = row.get(11)?;
        let license_plate: String = row.get(12)?;
        let model_name: String = row.get(13)?;
        Ok((parse_rental_row(row), customer_name, license_plate, model_name))
    })?;

    let mut rentals = vec![];
    for row in rows {
        let (rental, customer_name, license_plate, model_name) = row?;
        rentals.push(RentalListing {
            rental: rental?,
            customer_name,
            license_plate,
            model_name,
        });
    }
    Ok(rentals)
}

// ── Checkout ──

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("bike is already booked for an overlapping period")]
    Conflict,
    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

pub struct CheckoutRecord<'a> {
    pub citizen_id: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub line_id: Option<&'a str>,
    pub bike_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub total_price: f64,
    pub delivery_address: Option<&'a str>,
}

pub struct CheckoutOutcome {
    pub customer_id: i64,
    pub rental_id: i64,
}

/// Customer upsert + rental insert as one transaction. The overlap check
/// against Active rentals for the bike lives here too, so a conflict rolls
/// everything back.
pub fn confirm_checkout(
    conn: &mut Connection,
    record: &CheckoutRecord,
) -> Result<CheckoutOutcome, CheckoutError> {
    let tx = conn.transaction()?;

    let overlapping: i64 = tx.query_row(
        "SELECT COUNT(*) FROM rentals
         WHERE bike_id = ?1 AND payment_status = 'Active' AND start_date < ?2 AND end_date > ?3",
        params![
            record.bike_id,
            fmt_dt(&record.end_date),
            fmt_dt(&record.start_date),
        ],
        |row| row.get(0),
    )?;
    if overlapping > 0 {
        return Err(CheckoutError::Conflict);
    }

    tx.execute(
        "INSERT INTO customers (citizen_id, first_name, last_name, phone, email, line_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(citizen_id) DO UPDATE SET
           first_name = excluded.first_name,
           last_name = excluded.last_name,
           phone = excluded.phone,
           email = excluded.email,
           line_id = excluded.line_id",
        params![
            record.citizen_id,
            record.first_name,
            record.last_name,
            record.phone,
            record.email,
            record.line_id,
        ],
    )?;

    let customer_id: i64 = tx.query_row(
        "SELECT id FROM customers WHERE citizen_id = ?1",
        params![record.citizen_id],
        |row| row.get(0),
    )?;

    tx.execute(
        "INSERT INTO rentals (customer_id, bike_id, start_date, end_date, total_price, is_delivery, delivery_address, payment_status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'Active')",
        params![
            customer_id,
            record.bike_id,
            fmt_dt(&record.start_date),
            fmt_dt(&record.end_date),
            record.total_price,
            record.delivery_address.is_some() as i32,
            record.delivery_address,
        ],
    )?;
    let rental_id = tx.last_insert_rowid();

    tx.commit()?;

    Ok(CheckoutOutcome {
        customer_id,
        rental_id,
    })
}

// ── Booking Sessions ──

pub fn get_booking_session(
    conn: &Connection,
    token: &str,
) -> anyhow::Result<Option<BookingSession>> {
    let now = fmt_dt(&Utc::now().naive_utc());
    let result = conn.query_row(
        "SELECT token, data, last_activity, expires_at
         FROM booking_sessions WHERE token = ?1 AND expires_at > ?2",
        params![token, now],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        },
    );

    match result {
        Ok((token, data_json, last_activity_str, expires_at_str)) => {
            let data: SessionData = serde_json::from_str(&data_json).unwrap_or_default();
            Ok(Some(BookingSession {
                token,
                data,
                last_activity: parse_dt(&last_activity_str),
                expires_at: parse_dt(&expires_at_str),
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn save_booking_session(conn: &Connection, session: &BookingSession) -> anyhow::Result<()> {
    let data_json = serde_json::to_string(&session.data)?;
    conn.execute(
        "INSERT INTO booking_sessions (token, data, last_activity, expires_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(token) DO UPDATE SET
           data = excluded.data,
           last_activity = excluded.last_activity,
           expires_at = excluded.expires_at",
        params![
            session.token,
            data_json,
            fmt_dt(&session.last_activity),
            fmt_dt(&session.expires_at),
        ],
    )?;
    Ok(())
}

pub fn delete_booking_session(conn: &Connection, token: &str) -> anyhow::Result<()> {
    conn.execute(
        "DELETE FROM booking_sessions WHERE token = ?1",
        params![token],
    )?;
    Ok(())
}

pub fn expire_old_booking_sessions(conn: &Connection) -> anyhow::Result<usize> {
    let now = fmt_dt(&Utc::now().naive_utc());
    let count = conn.execute(
        "DELETE FROM booking_sessions WHERE expires_at <= ?1",
        params![now],
    )?;
    Ok(count)
}

// ── Admins ──

fn parse_admin_row(row: &rusqlite::Row) -> rusqlite::Result<Admin> {
    let role_str: String = row.get(3)?;
    Ok(Admin {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        role: AdminRole::parse(&role_str),
    })
}

pub fn get_admin_by_username(conn: &Connection, username: &str) -> anyhow::Result<Option<Admin>> {
    let result = conn.query_row(
        "SELECT id, username, password_hash, role FROM admins WHERE username = ?1",
        params![username],
        parse_admin_row,
    );

    match result {
        Ok(admin) => Ok(Some(admin)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn insert_admin(
    conn: &Connection,
    username: &str,
    password_hash: &str,
    role: AdminRole,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO admins (username, password_hash, role) VALUES (?1, ?2, ?3)",
        params![username, password_hash, role.as_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn create_admin_session(
    conn: &Connection,
    token: &str,
    admin_id: i64,
    expires_at: &NaiveDateTime,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO admin_sessions (token, admin_id, expires_at) VALUES (?1, ?2, ?3)",
        params![token, admin_id, fmt_dt(expires_at)],
    )?;
    Ok(())
}

/// Resolve a session token to its admin, honoring expiry.
pub fn get_session_admin(conn: &Connection, token: &str) -> anyhow::Result<Option<Admin>> {
    let now = fmt_dt(&Utc::now().naive_utc());
    let result = conn.query_row(
        "SELECT a.id, a.username, a.password_hash, a.role
         FROM admin_sessions s INNER JOIN admins a ON s.admin_id = a.id
         WHERE s.token = ?1 AND s.expires_at > ?2",
        params![token, now],
        parse_admin_row,
    );

    match result {
        Ok(admin) => Ok(Some(admin)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_admin_session(conn: &Connection, token: &str) -> anyhow::Result<bool> {
    let count = conn.execute(
        "DELETE FROM admin_sessions WHERE token = ?1",
        params![token],
    )?;
    Ok(count > 0)
}

// ── Dashboard ──

pub struct DashboardStats {
    pub total_bikes: i64,
    pub available_bikes: i64,
    pub active_rentals: i64,
}

pub fn get_dashboard_stats(conn: &Connection) -> anyhow::Result<DashboardStats> {
    let total_bikes: i64 = conn
        .query_row("SELECT COUNT(*) FROM bikes", [], |row| row.get(0))
        .unwrap_or(0);

    let available_bikes: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM bikes WHERE status = 'Available'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    let active_rentals: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM rentals WHERE payment_status = 'Active'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    Ok(DashboardStats {
        total_bikes,
        available_bikes,
        active_rentals,
    })
}
