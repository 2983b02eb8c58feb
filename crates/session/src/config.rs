use serde::Deserialize;

#[derive(Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Deserialize)]
pub struct SessionConfig {
    pub log_level: LogLevel,
    pub environment: Environment,
    pub backend_host: String,
    pub backend_port: u16,
    pub api_token: String,
    pub course_id: String,
    /// Session date in `YYYY-MM-DD` form. Empty means "not selected";
    /// starting a session will then be refused.
    pub session_date: String,
    pub device_id: u32,
    pub frame_interval_ms: u64,
    pub frame_width: u32,
    pub frame_height: u32,
    pub channel_open_timeout_ms: u64,
}

pub fn get_configuration() -> Result<SessionConfig, config::ConfigError> {
    let config = config::Config::builder()
        .set_default("log_level", "info")?
        .set_default("environment", "development")?
        .set_default("backend_host", "127.0.0.1")?
        .set_default("backend_port", 8000)?
        .set_default("api_token", "")?
        .set_default("course_id", "0")?
        .set_default("session_date", "")?
        .set_default("device_id", 0)?
        .set_default("frame_interval_ms", 100)?
        .set_default("frame_width", 640)?
        .set_default("frame_height", 480)?
        .set_default("channel_open_timeout_ms", 5000)?
        .add_source(
            config::Environment::with_prefix("SESSION")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: SessionConfig = config.try_deserialize::<SessionConfig>()?;

    Ok(config)
}
