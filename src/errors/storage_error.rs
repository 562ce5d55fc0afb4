use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("User not found")]
    NotFound,
    #[error("{0}")]
    ConstraintViolation(String),
    #[error("{0}")]
    Database(DieselError),
    #[error("Could not get connection from pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

impl From<DieselError> for StorageError {
    fn from(error: DieselError) -> Self {
        match error {
            DieselError::NotFound => StorageError::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, information) => {
                StorageError::ConstraintViolation(information.message().to_string())
            }
            other => StorageError::Database(other),
        }
    }
}
