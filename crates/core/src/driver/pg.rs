use postgres::fallible_iterator::FallibleIterator;
use postgres::types::{FromSql, ToSql, Type};
use postgres::{Client, Config, NoTls};

use super::{Connection, ResultSet, Row, Statement};
use crate::error::DbError;
use crate::types::{ConnectionDescriptor, Value};

pub struct PgConnection {
    client: Client,
}

impl PgConnection {
    pub fn connect(url: &str, descriptor: &ConnectionDescriptor) -> Result<PgConnection, DbError> {
        let client = config_for(url, descriptor)?.connect(NoTls)?;
        Ok(PgConnection { client })
    }
}

// credentials given alongside the url win over the ones inside it
fn config_for(url: &str, descriptor: &ConnectionDescriptor) -> Result<Config, DbError> {
    let mut config: Config = url.parse()?;

    if let Some(user) = descriptor.user() {
        config.user(user);
    }
    if let Some(password) = descriptor.password() {
        config.password(password);
    }

    Ok(config)
}

impl Connection for PgConnection {
    fn create_statement(&mut self) -> Result<Box<dyn Statement + '_>, DbError> {
        Ok(Box::new(PgStatement {
            client: &mut self.client,
        }))
    }
}

struct PgStatement<'conn> {
    client: &'conn mut Client,
}

impl Statement for PgStatement<'_> {
    fn execute_update(&mut self, sql: &str) -> Result<u64, DbError> {
        Ok(self.client.execute(sql, &[])?)
    }

    fn execute_query(&mut self, sql: &str) -> Result<Box<dyn ResultSet + '_>, DbError> {
        let prepared = self.client.prepare(sql)?;
        let column_count = prepared.columns().len();
        let rows = self
            .client
            .query_raw(&prepared, std::iter::empty::<&dyn ToSql>())?;

        Ok(Box::new(PgResultSet {
            rows,
            current: None,
            column_count,
        }))
    }
}

struct PgResultSet<'conn> {
    rows: postgres::RowIter<'conn>,
    current: Option<postgres::Row>,
    column_count: usize,
}

impl ResultSet for PgResultSet<'_> {
    fn column_count(&self) -> usize {
        self.column_count
    }

    fn next_row(&mut self) -> Result<Option<&dyn Row>, DbError> {
        self.current = self.rows.next()?;
        Ok(self.current.as_ref().map(|row| row as &dyn Row))
    }
}

impl Row for postgres::Row {
    fn get_value(&self, index: usize) -> Result<Value, DbError> {
        let AnyValue(value) = self.try_get(index)?;
        Ok(value)
    }
}

/// Decodes whatever type the server sends. Common scalars are decoded,
/// everything else is kept as raw wire bytes.
struct AnyValue(Value);

impl<'a> FromSql<'a> for AnyValue {
    fn from_sql(
        ty: &Type,
        raw: &'a [u8],
    ) -> Result<AnyValue, Box<dyn std::error::Error + Sync + Send>> {
        let value = if <bool as FromSql>::accepts(ty) {
            Value::Integer(i64::from(bool::from_sql(ty, raw)?))
        } else if <i16 as FromSql>::accepts(ty) {
            Value::Integer(i16::from_sql(ty, raw)?.into())
        } else if <i32 as FromSql>::accepts(ty) {
            Value::Integer(i32::from_sql(ty, raw)?.into())
        } else if <i64 as FromSql>::accepts(ty) {
            Value::Integer(i64::from_sql(ty, raw)?)
        } else if <f32 as FromSql>::accepts(ty) {
            Value::Real(f32::from_sql(ty, raw)?.into())
        } else if <f64 as FromSql>::accepts(ty) {
            Value::Real(f64::from_sql(ty, raw)?)
        } else if <String as FromSql>::accepts(ty) {
            Value::Text(String::from_sql(ty, raw)?)
        } else {
            Value::Blob(raw.to_vec())
        };

        Ok(AnyValue(value))
    }

    fn from_sql_null(_ty: &Type) -> Result<AnyValue, Box<dyn std::error::Error + Sync + Send>> {
        Ok(AnyValue(Value::Null))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}
