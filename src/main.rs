use std::net::TcpListener;
use std::sync::Arc;

use chirpy::configuration::get_configuration;
use chirpy::startup::run;
use chirpy::store::{InMemoryStore, PgStore, RefreshTokenStore, UserStore};
use chirpy::telemetry::init_telemetry;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // 구조화된 로깅 초기화
    init_telemetry();

    tracing::info!("Starting application");

    // 설정 로드
    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    // 저장소 선택: 데이터베이스 설정이 없으면 메모리 저장소 사용
    let (users, refresh_tokens): (Arc<dyn UserStore>, Arc<dyn RefreshTokenStore>) =
        match &configuration.database {
            Some(database) => {
                tracing::info!("Attempting to connect to database");
                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(&database.connection_string())
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to create connection pool: {}", e);
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionRefused,
                            "Database connection error",
                        )
                    })?;

                sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
                    tracing::error!("Failed to run migrations: {}", e);
                    std::io::Error::new(std::io::ErrorKind::Other, "Migration error")
                })?;

                tracing::info!("Database connection pool created successfully");
                let store = Arc::new(PgStore::new(pool));
                (store.clone() as Arc<dyn UserStore>, store as Arc<dyn RefreshTokenStore>)
            }
            None => {
                tracing::warn!("No database configured, using in-memory store");
                let store = Arc::new(InMemoryStore::new());
                (store.clone() as Arc<dyn UserStore>, store as Arc<dyn RefreshTokenStore>)
            }
        };

    // 서버 주소 설정
    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(listener, users, refresh_tokens, configuration.jwt)?;
    tracing::info!("Server started successfully");

    server.await
}
