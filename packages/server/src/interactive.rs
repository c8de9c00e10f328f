//! Interactive mode for the server.
//!
//! Prompts for the bind address and port before starting the server.

use actix_web::web;
use dialoguer::{Confirm, Input};
use securecheck_database::executor::QueryExecutor;

use crate::AppState;

/// Prompts for a bind address and port, then serves the API over
/// `executor` until shut down.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the server fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run(executor: QueryExecutor) -> std::io::Result<()> {
    println!("SecureCheck API Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default("127.0.0.1".to_string())
        .interact_text()
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(8080)
        .interact_text()
        .unwrap_or(8080);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::serve(web::Data::new(AppState::new(executor)), &bind_addr, port).await
}
