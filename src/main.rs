use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;
use pushkind_common::middleware::RedirectUnauthorized;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{logout, not_assigned};
use tera::Tera;

use pushkind_shifts::repository::DieselRepository;
use pushkind_shifts::routes::api::api_v1_shift_summaries;
use pushkind_shifts::routes::main::show_dashboard;
use pushkind_shifts::routes::reference::{
    show_reference, upload_machines, upload_products, upload_shift_patterns,
    upload_standard_rates,
};
use pushkind_shifts::routes::shift_reports::{
    delete_report, new_shift_report, preview_report, save_report, show_report,
};

/// Read `key` from the environment, falling back to `default`.
fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok();

    let database_url = env_or("DATABASE_URL", "app.db");
    let address = env_or("ADDRESS", "127.0.0.1");
    let port = env_or("PORT", "8080").parse::<u16>().unwrap_or(8080);
    let domain = env_or("DOMAIN", "localhost");

    let secret = env::var("SECRET_KEY").ok();
    let secret_key = secret
        .as_deref()
        .map(|key| Key::from(key.as_bytes()))
        .unwrap_or_else(Key::generate);

    let Ok(auth_service_url) = env::var("AUTH_SERVICE_URL") else {
        log::error!("AUTH_SERVICE_URL environment variable not set");
        std::process::exit(1);
    };

    let common_config = CommonServerConfig {
        secret: secret.unwrap_or_default(),
        auth_service_url,
    };

    log::info!("Starting shift reporting on {address}:{port} with database {database_url}");

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to load templates: {e}");
            std::process::exit(1);
        }
    };

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(not_assigned)
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_dashboard)
                    .service(api_v1_shift_summaries)
                    // `/shift-reports/new` must win over `/shift-reports/{id}`.
                    .service(new_shift_report)
                    .service(preview_report)
                    .service(save_report)
                    .service(show_report)
                    .service(delete_report)
                    .service(show_reference)
                    .service(upload_machines)
                    .service(upload_products)
                    .service(upload_shift_patterns)
                    .service(upload_standard_rates)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(common_config.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
