//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by the REST API.
//! Services are generic over repository/generator traits, but AppState
//! pins them to the concrete infra implementations.

use std::sync::Arc;

use studyhall_core::chat::service::ChatService;
use studyhall_core::llm::BoxTextGenerator;
use studyhall_infra::auth::jwt::JwtCodec;
use studyhall_infra::config::AppConfig;
use studyhall_infra::llm::mock::MockGenerator;
use studyhall_infra::sqlite::chat::SqliteChatRepository;
use studyhall_infra::sqlite::course::SqliteCourseRepository;
use studyhall_infra::sqlite::note::SqliteNoteRepository;
use studyhall_infra::sqlite::pool::DatabasePool;
use studyhall_infra::sqlite::user::SqliteUserRepository;

/// Concrete type alias for the chat service pinned to infra implementations.
///
/// The generator side is boxed because the backend (live Gemini vs
/// offline mock) is selected from configuration at startup.
pub type ConcreteChatService = ChatService<SqliteChatRepository, BoxTextGenerator>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub user_repo: Arc<SqliteUserRepository>,
    pub course_repo: Arc<SqliteCourseRepository>,
    pub note_repo: Arc<SqliteNoteRepository>,
    pub jwt: Arc<JwtCodec>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        // Ensure data directory exists
        tokio::fs::create_dir_all(&config.data_dir).await?;

        let db_pool = DatabasePool::new(&config.database_url()).await?;

        // Select the generation backend from configuration. The service
        // layer only ever sees the boxed trait; mock mode keeps the chat
        // feature working without a credential or network access.
        let generator = match config.gemini_generator() {
            Some(gemini) => {
                tracing::info!(model = %config.llm_model, "generation backend: Gemini");
                BoxTextGenerator::new(gemini)
            }
            None => {
                tracing::warn!(
                    "LLM_API_KEY not set; chat replies come from the offline mock backend"
                );
                BoxTextGenerator::new(MockGenerator)
            }
        };

        let chat_service = ChatService::new(SqliteChatRepository::new(db_pool.clone()), generator);

        let jwt = JwtCodec::new(&config.jwt_secret, config.token_ttl);

        Ok(Self {
            chat_service: Arc::new(chat_service),
            user_repo: Arc::new(SqliteUserRepository::new(db_pool.clone())),
            course_repo: Arc::new(SqliteCourseRepository::new(db_pool.clone())),
            note_repo: Arc::new(SqliteNoteRepository::new(db_pool.clone())),
            jwt: Arc::new(jwt),
            db_pool,
        })
    }
}
