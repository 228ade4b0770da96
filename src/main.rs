// src/main.rs
use packpoint::api;
use packpoint::config::AppConfig;

#[tokio::main]
async fn main() {
    if let Err(err) = dotenvy::dotenv() {
        let missing_file = matches!(
            err,
            dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        );
        if !missing_file {
            eprintln!("⚠️ Could not load .env: {}", err);
        }
    }

    let app_config = AppConfig::from_env();

    println!("🚀 Packing service starting...");
    api::start_api_server(app_config.api, app_config.packer).await;
}
