use rocket::fairing;
use rocket::{Build, Rocket};
use rocket_db_pools::Database;

use crate::api::Db;

// Name, description, icon, is_default, is_placeholder, sort_order.
const DEFAULT_TRACK_TYPES: &[(&str, &str, &str, bool, bool, i32)] = &[
    ("Standard", "Standard Minigolf Bahn", "bahn_placeholder.png", true, false, 1),
    ("Kurve Links", "Linkskurve", "bahn_kurve_links.png", false, false, 2),
    ("Kurve Rechts", "Rechtskurve", "bahn_kurve_rechts.png", false, false, 3),
    ("Hindernis", "Bahn mit Hindernis", "bahn_hindernis.png", false, false, 4),
    ("Brücke", "Brücken-Bahn", "bahn_bruecke.png", false, false, 5),
    ("Windmühle", "Bahn mit Windmühle", "windmill.png", false, false, 6),
    ("Rampe", "Rampen-Bahn", "ramp.png", false, false, 7),
    ("Tunnel", "Tunnel-Bahn", "tunnel.png", false, false, 8),
    ("Unbekannt", "Platzhalter für unbekannte Bahn-Typen", "bahn_placeholder.png", false, true, 99),
];

/// Runs the embedded migrations and seeds the track-type library. Attached
/// with `AdHoc::try_on_ignite`, so a failure here aborts liftoff.
pub async fn init_store(rocket: Rocket<Build>) -> fairing::Result {
    let Some(db) = Db::fetch(&rocket) else {
        error!("Database pool is not attached");
        return Err(rocket);
    };

    if let Err(error) = sqlx::migrate!("./migrations").run(&db.0).await {
        error!("Failed to run migrations: {error}");
        return Err(rocket);
    }

    if let Err(error) = seed_track_types(&db.0).await {
        error!("Failed to seed track types: {error}");
        return Err(rocket);
    }

    info!("Store initialized");
    Ok(rocket)
}

async fn seed_track_types(pool: &sqlx::PgPool) -> Result<(), sqlx::Error> {
    for &(name, description, icon, is_default, is_placeholder, sort_order) in DEFAULT_TRACK_TYPES {
        sqlx::query(
            "INSERT INTO track_types \
             (name, description, icon_filename, is_default, is_placeholder, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(description)
        .bind(icon)
        .bind(is_default)
        .bind(is_placeholder)
        .bind(sort_order)
        .execute(pool)
        .await?;
    }
    Ok(())
}
