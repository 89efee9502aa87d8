//! Dynamic SQL execution helpers.
//!
//! The execution endpoint forwards arbitrary SQL text here. The helpers make
//! no attempt to restrict or rewrite the statement — `SELECT`, `INSERT`, DDL
//! and multi-statement batches are all accepted — they only classify the
//! outcome: statements that produce columns are collected into JSON rows,
//! everything else reports its affected-row count.

use paddock_types::Row;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Statement};
use serde_json::{Number, Value};

/// Result of executing one SQL string.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecOutcome {
    /// Row count for reads, rows affected for writes.
    pub results: u64,
    /// Result rows; empty for statements that return no columns.
    pub rows: Vec<Row>,
}

/// Executes an arbitrary SQL string on the given connection.
///
/// A single statement with result columns is queried and its rows collected;
/// a single statement without them runs via `execute` and reports its
/// affected-row count. Anything holding more than one statement (the
/// add-race flow concatenates two inserts) runs as a batch and `results` is
/// the total number of rows changed by it — `prepare` would compile only the
/// first statement and silently drop the rest, so the batch decision has to
/// happen up front.
///
/// # Errors
///
/// Returns the underlying `rusqlite::Error` for any parse or execution
/// failure; the caller decides how to surface it.
pub fn execute_sql(conn: &Connection, sql: &str) -> Result<ExecOutcome, rusqlite::Error> {
    if has_trailing_statement(sql) {
        let before = conn.total_changes();
        conn.execute_batch(sql)?;
        let affected = conn.total_changes().saturating_sub(before);
        return Ok(ExecOutcome {
            results: affected as u64,
            rows: Vec::new(),
        });
    }

    let mut stmt = conn.prepare(sql)?;

    if stmt.column_count() > 0 {
        let rows = collect_rows(&mut stmt)?;
        return Ok(ExecOutcome {
            results: rows.len() as u64,
            rows,
        });
    }
    drop(stmt);

    let affected = conn.execute(sql, [])?;
    Ok(ExecOutcome {
        results: affected as u64,
        rows: Vec::new(),
    })
}

/// Detects whether `sql` continues past its first statement.
///
/// A semicolon inside a string literal, quoted identifier, or comment does
/// not end a statement, and a semicolon followed by nothing but whitespace
/// is just a terminator. Statement bodies that legitimately embed semicolons
/// (trigger definitions) are routed to the batch path, where they execute
/// correctly anyway.
fn has_trailing_statement(sql: &str) -> bool {
    let bytes = sql.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == quote {
                        // a doubled quote is an escaped quote, not the end
                        if bytes.get(i + 1) == Some(&quote) {
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    i += 1;
                }
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i += 1;
            }
            b';' => return !sql[i + 1..].trim().is_empty(),
            _ => {}
        }
        i += 1;
    }

    false
}

/// Runs `SELECT *` over a fixed table.
///
/// The table name is a compile-time constant chosen by the calling route —
/// it is never derived from request input, which is why plain string
/// formatting is acceptable here.
pub fn fetch_all(conn: &Connection, table: &str) -> Result<ExecOutcome, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!("SELECT * FROM {table}"))?;
    let rows = collect_rows(&mut stmt)?;
    Ok(ExecOutcome {
        results: rows.len() as u64,
        rows,
    })
}

fn collect_rows(stmt: &mut Statement<'_>) -> Result<Vec<Row>, rusqlite::Error> {
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let mut out = Vec::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut object = Row::new();
        for (i, name) in columns.iter().enumerate() {
            object.insert(name.clone(), json_value(row.get_ref(i)?));
        }
        out.push(object);
    }
    Ok(out)
}

fn json_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(Number::from(i)),
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(b.iter().map(|byte| format!("{byte:02x}")).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        run_migrations(&conn).expect("migrations should succeed");
        conn
    }

    #[test]
    fn select_returns_rows_as_json_objects() {
        let conn = test_conn();
        let outcome = execute_sql(&conn, "SELECT 1 AS x").expect("select should succeed");

        assert_eq!(outcome.results, 1);
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0]["x"], Value::from(1));
    }

    #[test]
    fn select_with_no_matches_returns_empty_rows() {
        let conn = test_conn();
        let outcome = execute_sql(&conn, "SELECT * FROM Horse").expect("select should succeed");

        assert_eq!(outcome.results, 0);
        assert!(outcome.rows.is_empty());
    }

    #[test]
    fn insert_reports_affected_count_and_no_rows() {
        let conn = test_conn();
        let outcome = execute_sql(
            &conn,
            "INSERT INTO Stable (StableID, StableName) VALUES (1, 'Willow Farm')",
        )
        .expect("insert should succeed");

        assert_eq!(outcome.results, 1);
        assert!(outcome.rows.is_empty());
    }

    #[test]
    fn multi_statement_batch_reports_total_changes() {
        let conn = test_conn();
        execute_sql(
            &conn,
            "INSERT INTO Track (TrackID, TrackName) VALUES (1, 'Ascot')",
        )
        .expect("track insert should succeed");

        let sql = "INSERT INTO Race (RaceID, RaceName, TrackName) VALUES (1, 'Gold Cup', 'Ascot'); \
                   INSERT INTO Stable (StableID, StableName) VALUES (7, 'Elm Yard');";
        let outcome = execute_sql(&conn, sql).expect("batch should succeed");

        assert_eq!(outcome.results, 2);
        assert!(outcome.rows.is_empty());
    }

    #[test]
    fn leading_select_does_not_discard_trailing_statements() {
        let conn = test_conn();
        execute_sql(
            &conn,
            "INSERT INTO Owner (OwnerID, FirstName, LastName) VALUES (1, 'Jane', 'Hart')",
        )
        .expect("seed should succeed");

        let outcome =
            execute_sql(&conn, "SELECT 1 AS x; DELETE FROM Owner;").expect("batch should succeed");

        // The whole string ran as a batch: no rows, and the delete counted.
        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.results, 1);

        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM Owner", [], |row| row.get(0))
            .expect("count should succeed");
        assert_eq!(remaining, 0);
    }

    #[test]
    fn semicolons_inside_literals_and_comments_stay_single_statement() {
        let conn = test_conn();

        let outcome =
            execute_sql(&conn, "SELECT 'a;b' AS x").expect("literal select should succeed");
        assert_eq!(outcome.rows[0]["x"], Value::from("a;b"));

        let outcome = execute_sql(&conn, "SELECT 2 AS x -- note; not a statement")
            .expect("commented select should succeed");
        assert_eq!(outcome.rows[0]["x"], Value::from(2));
    }

    #[test]
    fn trailing_semicolon_still_returns_rows() {
        let conn = test_conn();
        let outcome = execute_sql(&conn, "SELECT 1 AS x;").expect("select should succeed");

        assert_eq!(outcome.results, 1);
        assert_eq!(outcome.rows[0]["x"], Value::from(1));
    }

    #[test]
    fn syntax_error_is_propagated() {
        let conn = test_conn();
        let err = execute_sql(&conn, "SELEC wrong").expect_err("bad sql should fail");
        assert!(err.to_string().contains("syntax error"));
    }

    #[test]
    fn null_and_real_columns_map_to_json() {
        let conn = test_conn();
        let outcome = execute_sql(&conn, "SELECT NULL AS a, 1.5 AS b, 'x' AS c")
            .expect("select should succeed");

        let row = &outcome.rows[0];
        assert_eq!(row["a"], Value::Null);
        assert_eq!(row["b"], Value::from(1.5));
        assert_eq!(row["c"], Value::from("x"));
    }

    #[test]
    fn fetch_all_reads_whole_table() {
        let conn = test_conn();
        execute_sql(
            &conn,
            "INSERT INTO Owner (OwnerID, FirstName, LastName) VALUES (1, 'Jane', 'Hart'); \
             INSERT INTO Owner (OwnerID, FirstName, LastName) VALUES (2, 'Tom', 'Reed');",
        )
        .expect("seed should succeed");

        let outcome = fetch_all(&conn, "Owner").expect("fetch should succeed");
        assert_eq!(outcome.results, 2);
        assert_eq!(outcome.rows[0]["LastName"], Value::from("Hart"));
    }
}
