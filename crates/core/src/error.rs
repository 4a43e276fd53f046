use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("no driver found for connection url `{0}`")]
    UnsupportedUrl(String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Postgres(#[from] postgres::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("Please provide valid file.. {}", .0.display())]
    InvalidFile(PathBuf),
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("failed to write output")]
    Output(#[source] io::Error),
}
