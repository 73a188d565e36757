use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use roomie_match::config::Settings;
use roomie_match::core::{ChatHub, Ranker};
use roomie_match::models::ScoringWeights;
use roomie_match::routes::{self, AppState, Limits};
use roomie_match::services::{AppwriteClient, AppwriteCollections, CacheManager, IdentityVerifier, PostgresClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn startup_error(what: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", what, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", what, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_tracing("info", "compact");
            return Err(startup_error("Failed to load configuration", e));
        }
    };

    init_tracing(&settings.logging.level, &settings.logging.format);

    info!("Starting Roomie Match service...");

    let appwrite = AppwriteClient::new(
        settings.appwrite.endpoint.clone(),
        settings.appwrite.api_key.clone(),
        settings.appwrite.project_id.clone(),
        settings.appwrite.database_id.clone(),
        AppwriteCollections {
            users: settings.collection.users.clone(),
            likes: settings.collection.likes.clone(),
            messages: settings.collection.messages.clone(),
        },
    )
    .map_err(|e| startup_error("Failed to create Appwrite client", e))?;

    info!("Appwrite client initialized");

    let cache_ttl = settings.cache.ttl_secs.unwrap_or(60);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);
    let cache = CacheManager::connect_or_local(
        settings.cache.redis_url.as_deref(),
        l1_cache_size,
        cache_ttl,
    )
    .await;

    info!(
        "Cache manager initialized (L1: {} entries, TTL: {}s, Redis: {})",
        l1_cache_size,
        cache_ttl,
        cache.has_redis()
    );

    let db_max_conn = settings.database.max_connections.unwrap_or(10);
    let postgres = PostgresClient::from_settings(
        &settings.database.url,
        Some(db_max_conn),
        settings.database.min_connections,
        settings.database.acquire_timeout_secs,
        settings.database.idle_timeout_secs,
    )
    .await
    .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    let identity = IdentityVerifier::new(
        &settings.identity.jwt_secret,
        settings.identity.issuer.as_deref(),
        settings.identity.allowed_email_domains.clone(),
        settings.identity.require_verified_email,
    );

    info!(
        "Identity verifier initialized (allowed domains: {:?})",
        settings.identity.allowed_email_domains
    );

    let weights = ScoringWeights::from(&settings.scoring.weights);
    let ranker = Ranker::new(weights);

    info!("Ranker initialized with weights: {:?}", weights);

    let chat_hub = ChatHub::new(
        settings.chat.channel_capacity,
        Duration::from_secs(settings.chat.channel_idle_secs),
    );

    let defaults = Limits::default();
    let limits = Limits {
        candidate_pool: settings.matching.candidate_pool_limit.unwrap_or(defaults.candidate_pool),
        max_page: settings.matching.max_limit.unwrap_or(defaults.max_page),
        long_poll: Duration::from_secs(settings.chat.long_poll_secs),
    };

    let app_state = AppState {
        appwrite: Arc::new(appwrite),
        cache: Arc::new(cache),
        postgres: Arc::new(postgres),
        identity: Arc::new(identity),
        ranker,
        chat_hub,
        limits,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(routes::handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
