use crate::config::{Environment, SessionConfig};

pub fn setup_logging(config: &SessionConfig) {
    let environment = match config.environment {
        Environment::Development => common::Environment::Development,
        Environment::Production => common::Environment::Production,
    };
    common::setup_logging(config.log_level.as_str(), environment);
}
