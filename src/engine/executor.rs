//! Batch execution and the read path

use rusqlite::{Connection, Statement, TransactionBehavior};
use serde_json::Map;

use super::errors::ExecutionError;
use crate::observability::Logger;
use crate::store::value::{from_sql_value, to_sql_value};
use crate::store::{Database, StoreError, StoreResult};
use crate::template::{ParsedStatement, RowBatch, RowPayload, Template};

/// Result of a committed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Rows in the batch, all of which were applied
    pub rows_applied: usize,
    /// Sum of SQLite change counts across the batch
    pub rows_affected: u64,
}

/// Runs templates against the backing store
#[derive(Debug, Clone)]
pub struct ExecutionEngine {
    db: Database,
}

impl ExecutionEngine {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Apply `template` once per row inside a single write transaction.
    ///
    /// Either every row is committed or none is. The first failing row
    /// rolls the transaction back and is reported with its 1-based index.
    pub fn execute(
        &self,
        template: &Template,
        batch: &RowBatch,
    ) -> Result<BatchOutcome, ExecutionError> {
        let plan = template.plan();
        let mut conn = self.db.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut rows_affected = 0u64;
        for (index, row) in batch.iter().enumerate() {
            let statement = plan.bind(row);
            match apply(&tx, &statement) {
                Ok(changed) => rows_affected += changed,
                Err(source) => {
                    if let Err(e) = tx.rollback() {
                        Logger::error(
                            "BATCH_ROLLBACK_FAILED",
                            &[("error", e.to_string().as_str())],
                        );
                    }
                    return Err(ExecutionError::RowFailed {
                        row: index + 1,
                        source,
                    });
                }
            }
        }

        tx.commit()?;

        Ok(BatchOutcome {
            rows_applied: batch.len(),
            rows_affected,
        })
    }

    /// Run `template` once with `payload` and return every result row.
    ///
    /// No transaction is opened; the statement runs in autocommit mode.
    pub fn query(
        &self,
        template: &Template,
        payload: &RowPayload,
    ) -> Result<Vec<RowPayload>, ExecutionError> {
        let statement = template.plan().bind(payload);
        let conn = self.db.connect()?;
        let mut stmt = conn.prepare(statement.sql())?;
        bind_parameters(&mut stmt, &statement)?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.raw_query();
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Map::with_capacity(columns.len());
            for (i, name) in columns.iter().enumerate() {
                record.insert(name.clone(), from_sql_value(row.get_ref(i)?));
            }
            records.push(record);
        }

        Ok(records)
    }
}

/// Prepare, bind and run one statement, returning its change count.
fn apply(conn: &Connection, statement: &ParsedStatement) -> StoreResult<u64> {
    let mut stmt = conn.prepare(statement.sql())?;
    bind_parameters(&mut stmt, statement)?;

    if stmt.column_count() == 0 {
        return Ok(stmt.raw_execute()? as u64);
    }

    // RETURNING clauses and the like: step through and discard the rows.
    let readonly = stmt.readonly();
    let mut rows = stmt.raw_query();
    while rows.next()?.is_some() {}
    drop(rows);

    if readonly {
        Ok(0)
    } else {
        Ok(conn.changes() as u64)
    }
}

/// Bind each positional marker by name. Every marker the template produced
/// must exist in the prepared statement.
pub fn bind_parameters(stmt: &mut Statement<'_>, statement: &ParsedStatement) -> StoreResult<()> {
    for (marker, value) in statement.parameters() {
        let index = stmt
            .parameter_index(&marker)?
            .ok_or_else(|| StoreError::MissingMarker(marker.clone()))?;
        stmt.raw_bind_parameter(index, to_sql_value(value))?;
    }
    Ok(())
}
