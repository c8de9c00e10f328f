#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone SecureCheck API server.
//!
//! Reads the store configuration from `DATABASE_URL` or the
//! `SECURECHECK_DB_*` variables and listens on `BIND_ADDR`:`PORT`.

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    securecheck_server::run_server().await
}
