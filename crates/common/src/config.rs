/// Deployment environment, selecting the log output format.
#[derive(Debug, Clone)]
pub enum Environment {
    Development,
    Production,
}
