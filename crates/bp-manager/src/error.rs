use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("cooperate interface {0:?} is already registered")]
    DuplicateCooperateKey(String),
}

pub type ManagerResult<T> = Result<T, ManagerError>;
