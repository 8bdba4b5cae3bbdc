mod guard;
mod mutation;
mod query;
mod webpage_responses;

use rocket::fairing::AdHoc;
use rocket::fs::{relative, FileServer};
use rocket::{Build, Rocket};
use rocket_db_pools::Database;
use rocket_dyn_templates::Template;

pub use guard::Error;

use crate::controller::setup_helpers;
use mutation::*;
use query::*;
use webpage_responses::*;

#[derive(Database)]
#[database("minigolf")]
pub struct Db(pub sqlx::PgPool);

pub fn launch() -> Rocket<Build> {
    // The hosting platform hands the connection string over as
    // DATABASE_URL; Rocket.toml only carries the local fallback.
    let mut figment = rocket::Config::figment();
    if let Ok(url) = std::env::var("DATABASE_URL") {
        figment = figment.merge(("databases.minigolf.url", url));
    }

    rocket::custom(figment)
        .attach(Db::init())
        .attach(Template::fairing())
        .attach(AdHoc::try_on_ignite("Store setup", setup_helpers::init_store))
        .mount(
            "/",
            routes![
                index,
                score_detail,
                history,
                game_results,
                settings,
                save,
                update_score,
                delete_game,
                health,
            ],
        )
        .mount(
            "/api",
            routes![
                get_places,
                create_place,
                update_place,
                delete_place,
                get_track_types,
                get_place_track_config,
                update_single_track,
                update_track_config,
            ],
        )
        .mount("/static", FileServer::from(relative!("static")))
}
