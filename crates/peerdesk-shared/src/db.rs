pub use rusqlite::Connection;

pub type DbResult<T> = rusqlite::Result<T>;

use rusqlite::params;
use std::path::Path;

use crate::dispatcher::DispatchOutcome;
use crate::models::{AlertPresentation, Delivery, DeliveryKind};
use crate::schema;

pub fn open(db_path: &Path) -> rusqlite::Result<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let conn = Connection::open(db_path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "busy_timeout", 5000)?;
    schema::initialize(&conn)?;
    Ok(conn)
}

/// Connection without schema initialization, for read-only commands
/// against a journal that `open` already created.
pub fn open_reader(db_path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "busy_timeout", 5000)?;
    Ok(conn)
}

/// Parameters for one journal row
pub struct DeliveryInput<'a> {
    pub kind: DeliveryKind,
    pub screen: &'a str,
    pub notification_id: &'a str,
    pub path: &'a str,
    pub detail: &'a str,
}

pub fn record(conn: &Connection, input: &DeliveryInput) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO deliveries (kind, screen, notification_id, path, detail)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            input.kind.as_str(),
            input.screen,
            input.notification_id,
            input.path,
            input.detail
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Journal the result of a dispatch attempt.
pub fn record_outcome(
    conn: &Connection,
    outcome: &DispatchOutcome,
    notification_id: &str,
) -> rusqlite::Result<i64> {
    let params_json: String;
    let input = match outcome {
        DispatchOutcome::Navigated { screen, target } => {
            params_json = serde_json::to_string(&target.params).unwrap_or_else(|_| "{}".to_string());
            DeliveryInput {
                kind: DeliveryKind::Navigated,
                screen,
                notification_id,
                path: &target.path,
                detail: &params_json,
            }
        }
        DispatchOutcome::Dropped { screen, reason } => DeliveryInput {
            kind: DeliveryKind::Dropped,
            screen,
            notification_id,
            path: "",
            detail: reason,
        },
        DispatchOutcome::Duplicate { screen, id } => DeliveryInput {
            kind: DeliveryKind::Duplicate,
            screen,
            notification_id: id,
            path: "",
            detail: "",
        },
        DispatchOutcome::Held { screen } => DeliveryInput {
            kind: DeliveryKind::Held,
            screen,
            notification_id,
            path: "",
            detail: "",
        },
    };
    record(conn, &input)
}

/// Journal the alert decision made for an incoming notification.
pub fn record_presentation(
    conn: &Connection,
    presentation: &AlertPresentation,
    screen: &str,
    notification_id: &str,
) -> rusqlite::Result<i64> {
    let kind = if presentation.is_suppressed() {
        DeliveryKind::Suppressed
    } else {
        DeliveryKind::Presented
    };
    record(
        conn,
        &DeliveryInput {
            kind,
            screen,
            notification_id,
            path: "",
            detail: "",
        },
    )
}

fn row_to_delivery(row: &rusqlite::Row) -> rusqlite::Result<Delivery> {
    Ok(Delivery {
        id: row.get(0)?,
        kind: row.get(1)?,
        screen: row.get(2)?,
        notification_id: row.get(3)?,
        path: row.get(4)?,
        detail: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Most recent entries first.
pub fn list(conn: &Connection, limit: i64) -> rusqlite::Result<Vec<Delivery>> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, screen, notification_id, path, detail, created_at
         FROM deliveries ORDER BY id DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], row_to_delivery)?;
    rows.collect()
}

pub fn count_by_kind(conn: &Connection, kind: DeliveryKind) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM deliveries WHERE kind = ?1",
        params![kind.as_str()],
        |row| row.get(0),
    )
}

pub fn clear(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM deliveries", [])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RouteTarget;

    fn temp_journal() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = open(&dir.path().join("nested").join("journal.db")).unwrap();
        (dir, conn)
    }

    #[test]
    fn records_and_lists_newest_first() {
        let (_dir, conn) = temp_journal();
        record_presentation(&conn, &AlertPresentation::shown(), "chat", "n1").unwrap();
        record_outcome(
            &conn,
            &DispatchOutcome::Navigated {
                screen: "unknownFutureScreen".to_string(),
                target: RouteTarget::bare("/home"),
            },
            "n1",
        )
        .unwrap();

        let rows = list(&conn, 10).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, "navigated");
        assert_eq!(rows[0].screen, "unknownFutureScreen");
        assert_eq!(rows[0].path, "/home");
        assert_eq!(rows[0].detail, "{}");
        assert_eq!(rows[1].kind, "presented");
        assert_eq!(rows[1].screen, "chat");
    }

    #[test]
    fn duplicate_uses_its_own_id() {
        let (_dir, conn) = temp_journal();
        record_outcome(
            &conn,
            &DispatchOutcome::Duplicate {
                screen: "chat".to_string(),
                id: "n7".to_string(),
            },
            "",
        )
        .unwrap();
        let row = &list(&conn, 1).unwrap()[0];
        assert_eq!(row.notification_id, "n7");
        assert_eq!(row.screen, "chat");
    }

    #[test]
    fn counts_and_clears() {
        let (_dir, conn) = temp_journal();
        record_presentation(&conn, &AlertPresentation::silenced(), "chat", "").unwrap();
        record_presentation(&conn, &AlertPresentation::silenced(), "chat", "").unwrap();
        assert_eq!(count_by_kind(&conn, DeliveryKind::Suppressed).unwrap(), 2);
        assert_eq!(count_by_kind(&conn, DeliveryKind::Presented).unwrap(), 0);
        clear(&conn).unwrap();
        assert!(list(&conn, 10).unwrap().is_empty());
    }

    #[test]
    fn list_respects_limit() {
        let (_dir, conn) = temp_journal();
        for _ in 0..5 {
            record_outcome(
                &conn,
                &DispatchOutcome::Dropped {
                    screen: "clubDetails".to_string(),
                    reason: "x".to_string(),
                },
                "",
            )
            .unwrap();
        }
        assert_eq!(list(&conn, 3).unwrap().len(), 3);
    }
}
