use std::fmt;

/// Where to connect and as whom. Built once at startup and never changed.
#[derive(PartialEq, Eq, Clone)]
pub struct ConnectionDescriptor {
    url: String,
    user: Option<String>,
    password: Option<String>,
}

impl ConnectionDescriptor {
    pub fn new(url: impl Into<String>) -> ConnectionDescriptor {
        ConnectionDescriptor {
            url: url.into(),
            user: None,
            password: None,
        }
    }

    #[must_use]
    pub fn with_credentials(self, user: Option<String>, password: Option<String>) -> Self {
        ConnectionDescriptor {
            user,
            password,
            ..self
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A single fetched column, whatever the backend.
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl std::convert::From<rusqlite::types::Value> for Value {
    fn from(value: rusqlite::types::Value) -> Value {
        match value {
            rusqlite::types::Value::Null => Value::Null,
            rusqlite::types::Value::Integer(i) => Value::Integer(i),
            rusqlite::types::Value::Real(r) => Value::Real(r),
            rusqlite::types::Value::Text(s) => Value::Text(s),
            rusqlite::types::Value::Blob(b) => Value::Blob(b),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct QueryStats {
    pub columns: usize,
    pub rows: u64,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Outcome {
    Completed(QueryStats),
    Failed,
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConnectionDescriptor, Value};

    #[test]
    fn test_debug_redacts_password() {
        let descriptor = ConnectionDescriptor::new("postgres://localhost/db")
            .with_credentials(Some("hive".into()), Some("s3cret".into()));

        let rendered = format!("{descriptor:?}");

        assert!(rendered.contains("hive"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("s3cret"));
        assert_eq!(descriptor.password(), Some("s3cret"));
    }

    #[test]
    fn test_descriptor_without_credentials() {
        let descriptor = ConnectionDescriptor::new("sqlite::memory:");

        assert_eq!(descriptor.url(), "sqlite::memory:");
        assert_eq!(descriptor.user(), None);
        assert_eq!(descriptor.password(), None);
    }

    #[test]
    fn test_value_from_sqlite() {
        assert_eq!(
            Value::from(rusqlite::types::Value::Integer(7)),
            Value::Integer(7)
        );
        assert_eq!(Value::from(rusqlite::types::Value::Null), Value::Null);
    }
}
