mod handlers;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use handlers::static_files::StaticRoot;
use services::github::{HttpTransport, PlatformConfig};
use services::profile_service::ProfileService;
use std::sync::Arc;
use utils::clock::SystemClock;
use utils::config::{Config, SiteConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file FIRST before anything else
    dotenv::dotenv().ok();

    // Initialize logger with default level if RUST_LOG not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=================================================");
    println!("🚀 folio homepage server");
    println!("=================================================");

    let config = Config::from_env().expect("Failed to load configuration");
    let site_config =
        SiteConfig::load(&config.site_config_path).expect("Failed to load site configuration");
    let host = config.host.clone();
    let port = config.port;

    println!("📝 Configuration loaded:");
    println!("   - Site config: {}", config.site_config_path.display());
    println!("   - Base dir: {}", config.base_dir.display());
    println!("   - GitHub: {}", site_config.github_url);
    println!("   - Host: {}", host);
    println!("   - Port: {}", port);
    println!(
        "   - Log level: {}",
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    );

    let transport = HttpTransport::from_config(&site_config, &config.base_dir)
        .expect("Failed to create GitHub client");
    let profile_service = web::Data::new(ProfileService::new(
        site_config,
        &config.base_dir,
        Arc::new(transport),
        PlatformConfig::github(),
        Arc::new(SystemClock),
    ));
    println!("   - Account: {}", profile_service.handle());
    let static_root = web::Data::new(StaticRoot(config.base_dir.clone()));

    println!("🌐 Starting HTTP server at http://{}:{}", host, port);
    println!("📍 Available endpoints:");
    println!("   - GET  http://{}:{}/", host, port);
    println!("   - GET  http://{}:{}/api/profile", host, port);
    println!("   - GET  http://{}:{}/api/config", host, port);
    println!("   - GET  http://{}:{}/{{filename}}", host, port);
    println!("=================================================");

    log::info!("Server started at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(profile_service.clone())
            .app_data(static_root.clone())
            .wrap(Logger::default())
            .route("/", web::get().to(handlers::profile::get_profile))
            // Machine-readable endpoints, readable from any origin
            .service(
                web::scope("/api")
                    .wrap(Cors::permissive())
                    .route("/profile", web::get().to(handlers::profile::get_profile))
                    .route("/config", web::get().to(handlers::config::get_config)),
            )
            // Must stay last: matches any single path segment
            .route(
                "/{filename}",
                web::get().to(handlers::static_files::serve_static),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
