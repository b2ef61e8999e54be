#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate rocket;

use std::error::Error;

use log::info;

use arithmetic::Evaluator;

mod api;
mod config;
mod error;
mod tool;

#[rocket::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let figment = rocket_util::figment();
    let config: config::Config = figment.extract()?;

    info!(
        "Evaluating with max_depth={} max_length={}",
        config.limits.max_depth, config.limits.max_length
    );

    rocket::custom(figment)
        .manage(Evaluator::new(config.limits))
        .mount("/", rocket_util::routes())
        .mount("/", api::routes())
        .launch()
        .await?;

    Ok(())
}
