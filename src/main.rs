use std::sync::Arc;

use log::info;
use salon_booking::config::Config;
use salon_booking::db::get_db_pool;
use salon_booking::handlers::{router, AppState};
use salon_booking::identity::LineAuth;

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let config = Config::from_env().expect("invalid configuration");
    let pool = get_db_pool(&config.database_url).await;
    let line = LineAuth::new(&config.line_channel_id);

    info!(
        "Reservation service for LIFF app {} listening on {}",
        config.liff_id, config.bind_addr
    );

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState { config, pool, line });
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, router(state))
        .await
        .expect("server error");
}
