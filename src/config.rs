use std::env;

/// Runtime configuration, resolved once at startup.
///
/// Development falls back to local defaults. Production refuses to start
/// without `MONGODB_URI` and `JWT_SECRET`.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mongo_uri: String,
    pub client_url: String,
    pub server_url: String,
    pub api_base: String,
    pub upload_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        if app_env == "production" {
            let missing: Vec<&str> = ["MONGODB_URI", "JWT_SECRET"]
                .iter()
                .filter(|var| env::var(var).is_err())
                .copied()
                .collect();
            if !missing.is_empty() {
                panic!("Missing required environment variables: {}", missing.join(", "));
            }
        }

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3001);
        let mongo_uri = env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/studyhub".to_string());
        let client_url =
            env::var("CLIENT_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let server_url =
            env::var("SERVER_URL").unwrap_or_else(|_| format!("http://localhost:{}", port));
        let api_base = env::var("API_BASE_PATH").unwrap_or_else(|_| "/api".to_string());
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

        // Secrets are intentionally left out of this line
        log::info!(
            "🔧 Environment: {} (client: {}, server: {}, api base: {})",
            app_env,
            client_url,
            server_url,
            api_base
        );

        Config {
            host,
            port,
            mongo_uri,
            client_url,
            server_url,
            api_base,
            upload_dir,
        }
    }
}
