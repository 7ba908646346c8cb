//! Environment variable source used during configuration resolution.

/// Read-only view of environment variables.
#[cfg_attr(test, mockall::automock)]
pub trait Env: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the process environment.
pub struct SystemEnv;

impl Env for SystemEnv {
    #[tracing::instrument(skip(self))]
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}
