#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the crime dashboard.
//!
//! Loads the neighborhood boundaries, crime incidents, and hospital roster
//! once at startup into a [`DataContext`], then serves `GeoJSON` views of
//! them for the map front-end: neighborhoods annotated with crime counts,
//! hospitals with simulated occupancy, and recent-incident hotspots. Also
//! proxies chat messages to an LLM provider when one is configured.

pub mod config;
mod features;
mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, error, middleware, web};
use crime_dashboard_aggregator::RecentWindow;
use crime_dashboard_chat::ChatProvider;
use crime_dashboard_dataset::{DataContext, DatasetError, load_config};
use crime_dashboard_dataset_models::DatasetConfig;
use crime_dashboard_server_models::ChatReply;
use crime_dashboard_simulate::{RandomGenerator, ValueGenerator};

pub use config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Loaded input data. Read-only.
    pub data: Arc<DataContext>,
    /// Source of simulated occupancy and intensity values.
    pub generator: Arc<dyn ValueGenerator>,
    /// Chat provider, or `None` when no credentials are configured.
    pub chat: Option<Arc<dyn ChatProvider>>,
    /// Default window for `/api/neighborhoods`.
    pub neighborhood_window: Option<RecentWindow>,
    /// Default window for `/api/hotspots`.
    pub hotspot_window: RecentWindow,
}

impl AppState {
    /// Loads the input files and chat provider described by `config`.
    ///
    /// A missing chat configuration is not an error; chat requests will
    /// get the generic failure reply.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the dataset config or any input file
    /// is missing or malformed.
    pub fn load(config: &ServerConfig) -> Result<Self, DatasetError> {
        let dataset_config = match &config.dataset_config {
            Some(path) => {
                log::info!("Reading dataset config from {}", path.display());
                load_config(path)?
            }
            None => DatasetConfig::default(),
        };

        let data = DataContext::load(&config.paths, &dataset_config)?;

        let chat: Option<Arc<dyn ChatProvider>> =
            match crime_dashboard_chat::create_provider_from_env() {
                Ok(provider) => Some(Arc::from(provider)),
                Err(e) => {
                    log::warn!("Chat disabled: {e}");
                    None
                }
            };

        Ok(Self {
            data: Arc::new(data),
            generator: Arc::new(RandomGenerator),
            chat,
            neighborhood_window: config.neighborhood_window,
            hotspot_window: config.hotspot_window,
        })
    }
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/neighborhoods", web::get().to(handlers::neighborhoods))
            .route("/hospitals", web::get().to(handlers::hospitals))
            .route("/hotspots", web::get().to(handlers::hotspots))
            .route("/debug_counts", web::get().to(handlers::debug_counts))
            .service(
                web::resource("/chat")
                    .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                        log::warn!("Rejected chat request body: {err}");
                        let response = HttpResponse::BadRequest().json(ChatReply::failure());
                        error::InternalError::from_response(err, response).into()
                    }))
                    .route(web::post().to(handlers::chat)),
            ),
    );
}

/// Starts the crime dashboard API server.
///
/// Reads [`ServerConfig`] from the environment, loads all input files, and
/// starts the Actix-Web HTTP server. The caller is responsible for
/// providing the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if an input file cannot be loaded,
/// or if the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = ServerConfig::from_env();

    log::info!("Loading dataset...");
    let state = AppState::load(&config).map_err(|e| {
        log::error!("Failed to load dataset: {e}");
        std::io::Error::other(e)
    })?;
    let state = web::Data::new(state);

    let ServerConfig {
        bind_addr, port, ..
    } = config;

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::{Duration, Utc};
    use crime_dashboard_chat::{ChatError, ChatSettings, ProviderKind, create_provider};
    use crime_dashboard_dataset::boundaries::parse_boundaries;
    use crime_dashboard_dataset_models::{BoundaryFieldMapping, Coordinates, Hospital, Incident};
    use crime_dashboard_simulate::FixedGenerator;

    const BOUNDARIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "Name": "Downtown" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-77.0, 38.9], [-77.01, 38.9], [-77.01, 38.91], [-77.0, 38.9]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "Neighborhood": "Midtown" },
                "geometry": null
            }
        ]
    }"#;

    struct EchoProvider;

    #[async_trait::async_trait]
    impl ChatProvider for EchoProvider {
        async fn reply(&self, message: &str) -> Result<String, ChatError> {
            Ok(format!("echo: {message}"))
        }
    }

    struct FailingProvider;

    #[async_trait::async_trait]
    impl ChatProvider for FailingProvider {
        async fn reply(&self, _message: &str) -> Result<String, ChatError> {
            Err(ChatError::Provider {
                message: "Overloaded".to_string(),
            })
        }
    }

    fn incident(region: Option<&str>, days_ago: Option<i64>, located: bool) -> Incident {
        Incident {
            region: region.map(str::to_string),
            occurred_at: days_ago.map(|d| Utc::now() - Duration::days(d)),
            location: located.then_some(Coordinates {
                latitude: 38.905,
                longitude: -77.005,
            }),
            category: None,
        }
    }

    fn data() -> DataContext {
        DataContext {
            boundaries: parse_boundaries(BOUNDARIES, &BoundaryFieldMapping::default()).unwrap(),
            incidents: vec![
                incident(Some("  DOWNTOWN "), Some(1), true),
                incident(Some("downtown"), Some(30), false),
                incident(Some("Uptown"), Some(2), true),
                incident(None, Some(1), false),
            ],
            hospitals: vec![Hospital {
                name: "General".to_string(),
                address: Some("1 Main St".to_string()),
                city: Some("Washington".to_string()),
                state: Some("DC".to_string()),
                zipcode: Some("20001".to_string()),
                location: Some(Coordinates {
                    latitude: 38.9,
                    longitude: -77.01,
                }),
            }],
        }
    }

    fn state(chat: Option<Arc<dyn ChatProvider>>) -> web::Data<AppState> {
        web::Data::new(AppState {
            data: Arc::new(data()),
            generator: Arc::new(FixedGenerator(7)),
            chat,
            neighborhood_window: None,
            hotspot_window: RecentWindow::default(),
        })
    }

    async fn get_json(state: web::Data<AppState>, uri: &str) -> serde_json::Value {
        let app =
            actix_test::init_service(App::new().app_data(state).configure(configure_api)).await;
        let req = actix_test::TestRequest::get().uri(uri).to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
        actix_test::read_body_json(resp).await
    }

    async fn post_chat(
        state: web::Data<AppState>,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let app =
            actix_test::init_service(App::new().app_data(state).configure(configure_api)).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/chat")
            .set_json(body)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        let status = resp.status();
        (status, actix_test::read_body_json(resp).await)
    }

    fn count_for<'a>(body: &'a serde_json::Value, name: &str) -> &'a serde_json::Value {
        body["features"]
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["properties"]["name"] == name)
            .map(|f| &f["properties"]["crime_count"])
            .unwrap_or_else(|| panic!("no feature named {name}"))
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let body = get_json(state(None), "/api/health").await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn neighborhoods_are_annotated() {
        let body = get_json(state(None), "/api/neighborhoods").await;
        assert_eq!(body["type"], "FeatureCollection");
        assert_eq!(body["features"].as_array().unwrap().len(), 2);
        assert_eq!(count_for(&body, "Downtown"), 2);
        assert_eq!(count_for(&body, "Midtown"), 0);
        assert_eq!(
            body["features"][0]["geometry"]["type"], "Polygon",
            "geometry passes through"
        );
    }

    #[actix_web::test]
    async fn neighborhoods_respect_window() {
        let body = get_json(state(None), "/api/neighborhoods?windowDays=7").await;
        assert_eq!(count_for(&body, "Downtown"), 1);

        let body = get_json(state(None), "/api/neighborhoods?windowDays=0").await;
        assert_eq!(count_for(&body, "Downtown"), 2);

        let body = get_json(state(None), "/api/neighborhoods?windowDays=4000000000").await;
        assert_eq!(count_for(&body, "Downtown"), 2);
    }

    #[actix_web::test]
    async fn neighborhoods_use_server_default_window() {
        let state = web::Data::new(AppState {
            data: Arc::new(data()),
            generator: Arc::new(FixedGenerator(7)),
            chat: None,
            neighborhood_window: Some(RecentWindow::days(7)),
            hotspot_window: RecentWindow::default(),
        });
        let body = get_json(state, "/api/neighborhoods").await;
        assert_eq!(count_for(&body, "Downtown"), 1);
    }

    #[actix_web::test]
    async fn hospitals_have_simulated_occupancy() {
        let body = get_json(state(None), "/api/hospitals").await;
        let feature = &body["features"][0];
        assert_eq!(feature["geometry"]["coordinates"], serde_json::json!([-77.01, 38.9]));
        let props = &feature["properties"];
        assert_eq!(props["name"], "General");
        assert_eq!(props["address"], "1 Main St");
        assert_eq!(props["city"], "Washington");
        assert_eq!(props["state"], "DC");
        assert_eq!(props["zipcode"], "20001");
        assert_eq!(props["occupancy"], 7);
    }

    #[actix_web::test]
    async fn hotspots_are_recent_located_incidents() {
        let body = get_json(state(None), "/api/hotspots").await;
        let features = body["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        for feature in features {
            assert_eq!(feature["properties"]["intensity"], 7);
            assert_eq!(feature["geometry"]["type"], "Point");
        }

        let body = get_json(state(None), "/api/hotspots?windowDays=2").await;
        assert_eq!(body["features"].as_array().unwrap().len(), 1);

        let body = get_json(state(None), "/api/hotspots?windowDays=4000000000").await;
        assert_eq!(body["features"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn debug_counts_are_raw() {
        let body = get_json(state(None), "/api/debug_counts").await;
        assert_eq!(
            body,
            serde_json::json!({ "  DOWNTOWN ": 1, "downtown": 1, "Uptown": 1 })
        );
    }

    #[actix_web::test]
    async fn chat_returns_provider_reply() {
        let (status, body) = post_chat(
            state(Some(Arc::new(EchoProvider))),
            serde_json::json!({ "message": "hi" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "reply": "echo: hi" }));
    }

    #[actix_web::test]
    async fn chat_failure_is_generic_500() {
        let (status, body) = post_chat(
            state(Some(Arc::new(FailingProvider))),
            serde_json::json!({ "message": "hi" }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "reply": "Something went wrong." }));
    }

    #[actix_web::test]
    async fn chat_without_provider_is_generic_500() {
        let (status, body) = post_chat(state(None), serde_json::json!({ "message": "hi" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["reply"], "Something went wrong.");
    }

    #[actix_web::test]
    async fn chat_upstream_timeout_is_generic_500() {
        // Accepts connections into the backlog but never answers.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let provider = create_provider(ChatSettings {
            kind: ProviderKind::OpenAi,
            api_key: "key".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: Some(format!("http://{addr}/v1")),
            timeout: std::time::Duration::from_millis(200),
        })
        .unwrap();

        let (status, body) = post_chat(
            state(Some(Arc::from(provider))),
            serde_json::json!({ "message": "hi" }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "reply": "Something went wrong." }));
        drop(listener);
    }

    #[actix_web::test]
    async fn chat_rejects_blank_and_malformed_bodies() {
        let (status, body) = post_chat(
            state(Some(Arc::new(EchoProvider))),
            serde_json::json!({ "message": "   " }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["reply"], "Message must not be empty.");

        let (status, body) = post_chat(
            state(Some(Arc::new(EchoProvider))),
            serde_json::json!({ "text": "hi" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["reply"], "Something went wrong.");
    }

    #[test]
    fn missing_input_files_fail_to_load() {
        let config = ServerConfig::from_lookup(|key| {
            (key == "DATA_DIR").then(|| "/nonexistent/crime-dashboard".to_string())
        });
        assert!(matches!(
            AppState::load(&config),
            Err(DatasetError::Io { .. })
        ));
    }
}
