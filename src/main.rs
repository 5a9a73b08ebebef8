use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use aran_sentinel::config::Config;
use aran_sentinel::handlers::{
    CatalogFacets, CatalogResponse, CompanyListResponse, DocumentListResponse, LoginRequest,
    UploadDocumentForm,
};
use aran_sentinel::models::{
    Anomaly, AnomalyDetectionInput, AnomalyReport, ApiDiscoveryInput, ApiDocument, ApiEntry,
    ApiStatus, AuthSession, BackendUser, CatalogField, Company, DiscoveredApi, DiscoveryReport,
    DocumentFormat, Severity, SortConfig, SortDirection,
};
use aran_sentinel::repositories::Pagination;
use aran_sentinel::state::AppState;
use aran_sentinel::{build_router, handlers};

/// Security scheme for Bearer token
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::documents::list_documents,
        handlers::documents::upload_document,
        handlers::documents::get_document_file,
        handlers::catalog::list_catalog,
        handlers::catalog::list_companies,
        handlers::ai::detect_anomalies,
        handlers::ai::discover_apis,
    ),
    components(schemas(
        LoginRequest,
        AuthSession,
        BackendUser,
        ApiDocument,
        DocumentFormat,
        DocumentListResponse,
        Pagination,
        UploadDocumentForm,
        ApiEntry,
        ApiStatus,
        CatalogField,
        SortDirection,
        SortConfig,
        CatalogFacets,
        CatalogResponse,
        Company,
        CompanyListResponse,
        AnomalyDetectionInput,
        Anomaly,
        Severity,
        AnomalyReport,
        ApiDiscoveryInput,
        DiscoveredApi,
        DiscoveryReport,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Authentication through the backend"),
        (name = "Documents", description = "Uploaded API specification documents"),
        (name = "Catalog", description = "API catalog search, filtering and sorting"),
        (name = "AI", description = "Anomaly detection and API discovery flows")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    let subscriber = tracing_subscriber::fmt().with_env_filter(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    );
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    let addr = config.server_addr();

    // Initialize application state (opens the document store)
    tracing::info!("Opening document store...");
    let state = AppState::new(config)
        .await
        .expect("Failed to initialize application state");

    // Build the main application router
    let app = build_router(state)
        // Add Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");

    tracing::info!("Server started on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
