#[macro_use]
extern crate rocket;

use rocket::{Build, Rocket};

mod api;
pub mod controller;
mod dto;

#[launch]
fn rocket() -> Rocket<Build> {
    api::launch()
}
