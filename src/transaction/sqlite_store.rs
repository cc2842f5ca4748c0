//! Implements a SQLite backed transaction store.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, Row, params, params_from_iter, types::Type, types::Value};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{
        core::{NewTransaction, Transaction, TransactionPatch, truncate_to_millis},
        store::{
            GroupField, GroupSum, Sort, SortField, SortOrder, SumField, TransactionFilter,
            TransactionStore,
        },
    },
};

const SELECT_COLUMNS: &str =
    "SELECT id, type, amount, description, category, date, created_at FROM \"transaction\"";

/// Stores transactions in a SQLite database.
///
/// Clones share the same connection.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// The transaction table must already exist, see [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl TransactionStore for SQLiteTransactionStore {
    fn insert(&self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        let created_at = truncate_to_millis(OffsetDateTime::now_utc());

        let transaction = self
            .lock()?
            .prepare(
                "INSERT INTO \"transaction\" (type, amount, description, category, date, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, type, amount, description, category, date, created_at",
            )?
            .query_row(
                params![
                    new_transaction.type_.as_str(),
                    new_transaction.amount,
                    new_transaction.description,
                    new_transaction.category,
                    to_unix_millis(new_transaction.date),
                    to_unix_millis(created_at),
                ],
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, Error> {
        let connection = self.lock()?;

        find_by_id(id, &connection)
    }

    fn update_by_id(
        &self,
        id: TransactionId,
        patch: &TransactionPatch,
    ) -> Result<Option<Transaction>, Error> {
        let connection = self.lock()?;

        let Some(mut transaction) = find_by_id(id, &connection)? else {
            return Ok(None);
        };

        patch.apply_to(&mut transaction);

        connection.execute(
            "UPDATE \"transaction\" \
            SET type = ?1, amount = ?2, description = ?3, category = ?4, date = ?5 \
            WHERE id = ?6",
            params![
                transaction.type_.as_str(),
                transaction.amount,
                transaction.description,
                transaction.category,
                to_unix_millis(transaction.date),
                id,
            ],
        )?;

        Ok(Some(transaction))
    }

    fn delete_by_id(&self, id: TransactionId) -> Result<bool, Error> {
        let rows_affected = self
            .lock()?
            .execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

        Ok(rows_affected > 0)
    }

    fn find(
        &self,
        filter: &TransactionFilter,
        sort: Sort,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Transaction>, Error> {
        let (where_clause, mut parameters) = build_where_clause(filter);
        let direction = match sort.order {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        };

        // Sort by ID last to keep the order stable between pages
        let query = format!(
            "{SELECT_COLUMNS} {where_clause} ORDER BY {} {direction}, id ASC LIMIT ?{} OFFSET ?{}",
            sort_column(sort.field),
            parameters.len() + 1,
            parameters.len() + 2,
        );
        parameters.push(Value::Integer(clamp_to_i64(limit)));
        parameters.push(Value::Integer(clamp_to_i64(skip)));

        self.lock()?
            .prepare(&query)?
            .query_map(params_from_iter(parameters.iter()), map_transaction_row)?
            .map(|transaction_result| transaction_result.map_err(Error::SqlError))
            .collect()
    }

    fn count(&self, filter: &TransactionFilter) -> Result<u64, Error> {
        let (where_clause, parameters) = build_where_clause(filter);
        let query = format!("SELECT COUNT(id) FROM \"transaction\" {where_clause}");

        let count: i64 = self.lock()?.query_row(
            &query,
            params_from_iter(parameters.iter()),
            |row| row.get(0),
        )?;

        Ok(count.max(0) as u64)
    }

    fn aggregate_sum_by_group(
        &self,
        filter: &TransactionFilter,
        request: GroupSum,
    ) -> Result<HashMap<String, f64>, Error> {
        let (where_clause, parameters) = build_where_clause(filter);
        let group_column = match request.group_by {
            GroupField::Type => "type",
            GroupField::Category => "category",
        };
        let sum_column = match request.sum {
            SumField::Amount => "amount",
        };
        let query = format!(
            "SELECT {group_column}, TOTAL({sum_column}) FROM \"transaction\" \
            {where_clause} GROUP BY {group_column}"
        );

        self.lock()?
            .prepare(&query)?
            .query_map(params_from_iter(parameters.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .map(|group_result| group_result.map_err(Error::SqlError))
            .collect()
    }
}

fn find_by_id(id: TransactionId, connection: &Connection) -> Result<Option<Transaction>, Error> {
    let query = format!("{SELECT_COLUMNS} WHERE id = ?1");

    match connection.query_row(&query, [id], map_transaction_row) {
        Ok(transaction) => Ok(Some(transaction)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// Translate `filter` into a SQL WHERE clause and its positional parameters.
///
/// Returns an empty clause if the filter matches everything.
fn build_where_clause(filter: &TransactionFilter) -> (String, Vec<Value>) {
    let mut where_clause_parts = vec![];
    let mut query_parameters = vec![];

    if let Some(type_) = filter.type_ {
        query_parameters.push(Value::Text(type_.as_str().to_owned()));
        where_clause_parts.push(format!("type = ?{}", query_parameters.len()));
    }

    if let Some(category) = &filter.category {
        query_parameters.push(Value::Text(category.clone()));
        where_clause_parts.push(format!("category = ?{}", query_parameters.len()));
    }

    if let Some(date_from) = filter.date_from {
        query_parameters.push(Value::Integer(to_unix_millis(date_from)));
        where_clause_parts.push(format!("date >= ?{}", query_parameters.len()));
    }

    if let Some(date_to) = filter.date_to {
        query_parameters.push(Value::Integer(to_unix_millis(date_to)));
        where_clause_parts.push(format!("date <= ?{}", query_parameters.len()));
    }

    if where_clause_parts.is_empty() {
        (String::new(), query_parameters)
    } else {
        (
            format!("WHERE {}", where_clause_parts.join(" AND ")),
            query_parameters,
        )
    }
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Date => "date",
        SortField::Amount => "amount",
        SortField::Type => "type",
        SortField::Category => "category",
        SortField::Description => "description",
        SortField::CreatedAt => "created_at",
    }
}

fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn to_unix_millis(date_time: OffsetDateTime) -> i64 {
    (date_time.unix_timestamp_nanos() / 1_000_000) as i64
}

fn from_unix_millis(column: usize, millis: i64) -> Result<OffsetDateTime, rusqlite::Error> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(column, Type::Integer, Box::new(error)))
}

/// Create the transaction table and its indexes in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                amount REAL NOT NULL CHECK (amount >= 0),
                description TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT '',
                date INTEGER NOT NULL,
                created_at INTEGER NOT NULL
                )",
        (),
    )?;

    for (index_name, column) in [
        ("idx_transaction_date", "date"),
        ("idx_transaction_type", "type"),
        ("idx_transaction_category", "category"),
    ] {
        connection.execute(
            &format!("CREATE INDEX IF NOT EXISTS {index_name} ON \"transaction\"({column})"),
            (),
        )?;
    }

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let type_text: String = row.get(1)?;
    let type_ = type_text.parse().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(error))
    })?;
    let amount = row.get(2)?;
    let description = row.get(3)?;
    let category = row.get(4)?;
    let date = from_unix_millis(5, row.get(5)?)?;
    let created_at = from_unix_millis(6, row.get(6)?)?;

    Ok(Transaction {
        id,
        type_,
        amount,
        description,
        category,
        date,
        created_at,
    })
}
