mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::{Config, StorageBackend};
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::certificate_templates::{routes as templates_routes, TemplateService};
use crate::features::exports::{routes as exports_routes, ExportService};
use crate::features::imports::{routes as imports_routes, ImportService};
use crate::features::issuers::{routes as issuers_routes, IssuerService};
use crate::features::qr_codes::{routes as qr_codes_routes, QrCodeService};
use crate::features::students::{routes as students_routes, StudentService};
use crate::features::verification::{routes as verification_routes, VerificationService};
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Log system info
    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Initialize file storage
    let storage = modules::storage::build_storage(&config.storage, &config.app.base_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {}", e))?;
    tracing::info!("Storage backend initialized: {}", storage.backend_name());

    // Initialize services
    let issuer_service = Arc::new(IssuerService::new(
        pool.clone(),
        Arc::clone(&storage),
        config.app.base_url.clone(),
    ));
    let student_service = Arc::new(StudentService::new(
        pool.clone(),
        config.app.base_url.clone(),
    ));
    let template_service = Arc::new(TemplateService::new(pool.clone(), Arc::clone(&storage)));
    tracing::info!("Record services initialized");

    let import_service = Arc::new(ImportService::new(
        pool.clone(),
        Arc::clone(&storage),
        config.import.clone(),
    ));
    tracing::info!(
        "Import service initialized (create_missing_issuers={}, max_upload_bytes={})",
        config.import.create_missing_issuers,
        config.import.max_upload_bytes
    );

    let qr_code_service = Arc::new(QrCodeService::new(
        pool.clone(),
        Arc::clone(&storage),
        config.qr.clone(),
        config.app.base_url.clone(),
    ));
    tracing::info!(
        "QR code service initialized (logo: {})",
        config
            .qr
            .logo_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    let export_service = Arc::new(ExportService::new(pool.clone(), Arc::clone(&storage)));
    let verification_service = Arc::new(VerificationService::new(
        Arc::clone(&student_service),
        Arc::clone(&issuer_service),
        config.app.base_url.clone(),
    ));
    tracing::info!("Export and verification services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // JSON API
    let api_routes = Router::new()
        .merge(issuers_routes(issuer_service))
        .merge(students_routes(student_service))
        .merge(templates_routes(template_service))
        .merge(imports_routes(import_service))
        .merge(qr_codes_routes(qr_code_service))
        .merge(exports_routes(export_service));

    // Public verification pages
    let page_routes = verification_routes(verification_service);

    // Simple health check endpoint
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // Serve locally stored media (QR codes, signatures, backgrounds)
    let media_routes = match config.storage.backend {
        StorageBackend::Local => {
            let mount = config.storage.media_url.trim_end_matches('/');
            if mount.is_empty() {
                tracing::warn!("MEDIA_URL is '/', local media will not be served");
                Router::new()
            } else {
                tracing::info!(
                    "Serving {} from {}",
                    config.storage.media_url,
                    config.storage.media_root.display()
                );
                Router::new().nest_service(mount, ServeDir::new(&config.storage.media_root))
            }
        }
        StorageBackend::MinIO => Router::new(),
    };

    let app = Router::new()
        .merge(swagger)
        .merge(api_routes)
        .merge(page_routes)
        .merge(media_routes)
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
