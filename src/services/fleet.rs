use chrono::Utc;
use rusqlite::Connection;

use crate::db::queries;
use crate::models::BikeStatus;

#[derive(Debug, thiserror::Error)]
pub enum FleetError {
    #[error("bike not found")]
    NotFound,
    #[error("bike is currently rented")]
    CurrentlyRented,
    #[error("bike has rental history")]
    HasRentalHistory,
    #[error(transparent)]
    Db(#[from] anyhow::Error),
}

#[derive(Debug)]
pub struct StatusChange {
    pub old_status: BikeStatus,
    pub new_status: BikeStatus,
    pub closed_rental_id: Option<i64>,
}

/// Manual status override. The only transition with a side effect is
/// Rented -> Available: the open rental for the bike gets its actual
/// return date stamped and moves to Done. No open rental is a no-op.
pub fn change_bike_status(
    conn: &Connection,
    bike_id: i64,
    new_status: BikeStatus,
) -> Result<StatusChange, FleetError> {
    let bike = queries::get_bike(conn, bike_id)?.ok_or(FleetError::NotFound)?;
    let old_status = bike.status;

    queries::set_bike_status(conn, bike_id, new_status)?;

    let closed_rental_id =
        if old_status == BikeStatus::Rented && new_status == BikeStatus::Available {
            match queries::find_open_rental_for_bike(conn, bike_id)? {
                Some(rental) => {
                    let now = Utc::now().naive_utc();
                    queries::close_rental(conn, rental.id, &now)?;
                    tracing::info!(bike_id, rental_id = rental.id, "bike returned, rental closed");
                    Some(rental.id)
                }
                None => None,
            }
        } else {
            None
        };

    tracing::info!(
        bike_id,
        old_status = old_status.as_str(),
        new_status = new_status.as_str(),
        "bike status changed"
    );

    Ok(StatusChange {
        old_status,
        new_status,
        closed_rental_id,
    })
}

/// A bike can only be deleted when it is not out on rent and nothing in
/// the rental history references it.
pub fn delete_bike(conn: &Connection, bike_id: i64) -> Result<(), FleetError> {
    let bike = queries::get_bike(conn, bike_id)?.ok_or(FleetError::NotFound)?;

    if bike.status == BikeStatus::Rented {
        return Err(FleetError::CurrentlyRented);
    }
    if queries::count_rentals_for_bike(conn, bike_id)? > 0 {
        return Err(FleetError::HasRentalHistory);
    }

    queries::delete_bike(conn, bike_id)?;
    tracing::info!(bike_id, "bike deleted");
    Ok(())
}

/// Add a unit to the fleet by cloning an existing bike's model data under
/// a new license plate. New inventory always starts Available.
pub fn add_inventory(
    conn: &Connection,
    source_bike_id: i64,
    license_plate: &str,
) -> Result<i64, FleetError> {
    let source = queries::get_bike(conn, source_bike_id)?.ok_or(FleetError::NotFound)?;

    let id = queries::insert_bike(
        conn,
        &queries::BikeInput {
            license_plate: license_plate.to_string(),
            model_name: source.model_name,
            color: source.color,
            engine_size: source.engine_size,
            image_url: source.image_url,
            description: source.description,
            status: BikeStatus::Available,
            category_id: source.category_id,
        },
    )?;
    Ok(id)
}
