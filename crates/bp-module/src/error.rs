use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("module configuration error: {0}")]
    Config(String),
}

pub type ModuleResult<T> = Result<T, ModuleError>;
