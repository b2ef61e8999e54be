#[macro_use]
extern crate rocket;

use rocket::figment::{providers::Env, Figment};
use rocket::http::Status;
use rocket::serde::json::{json, Value};
use rocket::Route;

#[get("/status")]
fn status() -> Value {
    json!({ "status": "ok" })
}

#[get("/metrics")]
fn metrics() -> Result<String, Status> {
    telemetry::encode().map_err(|_| Status::InternalServerError)
}

/// Health and metrics routes mounted by every service
pub fn routes() -> Vec<Route> {
    routes![status, metrics]
}

/// Rocket's own configuration overlaid with `APP_` environment variables, where the
/// first `_` after the prefix separates the section, e.g. `APP_LIMITS_MAX_DEPTH`
pub fn figment() -> Figment {
    rocket::Config::figment()
        .merge(Env::prefixed("APP_").map(|s| s.as_str().replacen('_', ".", 1).into()))
}
