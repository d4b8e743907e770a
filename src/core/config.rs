use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub backend_url: String,
    pub chat_service_url: String,
    pub ml_service_url: String,
    pub storage_path: String,
    pub db_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let backend_url = env::var("FINPILOT_BACKEND_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        let chat_service_url = env::var("FINPILOT_CHAT_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8081".to_string());
        let ml_service_url = env::var("FINPILOT_ML_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8001".to_string());
        let storage_path = env::var("FINPILOT_STORAGE_PATH").unwrap_or("./storage".to_string());
        let db_path = format!("{}/finpilot.sqlite3", storage_path);

        Self {
            backend_url,
            chat_service_url,
            ml_service_url,
            storage_path,
            db_path,
        }
    }
}

impl AppConfig {
    /// Chat WebSocket endpoint derived from the chat service base URL
    /// by swapping the scheme.
    pub fn chat_ws_url(&self) -> String {
        let base = self
            .chat_service_url
            .replacen("https://", "wss://", 1)
            .replacen("http://", "ws://", 1);
        format!("{}/ws/chat", base)
    }
}
