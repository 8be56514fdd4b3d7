use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Db(#[from] clipcart_db::DbError),

    #[error("publisher setup failed: {0}")]
    Setup(String),
}
