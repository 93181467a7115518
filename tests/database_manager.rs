//! The database manager against file-backed SQLite.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use tagsql::error::kind;
use tagsql::{args, ColumnDecl, Database, Error, Record, ValueType};

fn file_columns() -> Vec<ColumnDecl> {
    vec![
        ColumnDecl::new("path", ValueType::Path)
            .with_constraint("NOT NULL PRIMARY KEY")
            .unwrap(),
        ColumnDecl::new("size", ValueType::Integer),
        ColumnDecl::new("modified", ValueType::Date),
        ColumnDecl::optional("digest", ValueType::Blob),
    ]
}

fn open(path: &std::path::Path) -> Database {
    Database::builder()
        .path(path)
        .busy_timeout(Duration::from_millis(250))
        .open()
        .unwrap()
}

#[test]
fn migration_by_user_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("files.db");

    for _ in 0..2 {
        let db = open(&path);
        if db.user_version().unwrap() < 1 {
            db.create_table("file", &file_columns()).unwrap();
            db.set_user_version(1).unwrap();
        }
        assert!(db.table_exists("file").unwrap());
        assert_eq!(db.user_version().unwrap(), 1);
    }
}

#[test]
fn rows_persist_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("files.db");
    let modified = Utc.with_ymd_and_hms(2020, 6, 1, 8, 30, 0).unwrap();

    {
        let db = open(&path);
        db.create_table("file", &file_columns()).unwrap();
        let mut insert = db.prepared_insert("file", &file_columns()).unwrap();
        insert
            .execute(args! {
                "path" => std::path::PathBuf::from("/a.txt"),
                "size" => 10_i64,
                "modified" => modified,
                "digest" => vec![0xde_u8, 0xad],
            })
            .unwrap();
        insert
            .execute(args! {
                "path" => std::path::PathBuf::from("/b.txt"),
                "size" => 20_i64,
                "modified" => modified,
            })
            .unwrap();
    }

    let db = open(&path);
    let mut select = db
        .prepared_select_where("file", &file_columns(), "size > ?/*:min:integer*/ ORDER BY path")
        .unwrap();
    let rows: Vec<Record> = select
        .execute_rows(args! { "min" => 5_i64 })
        .unwrap()
        .collect::<eyre::Result<_>>()
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get::<i64>("size").unwrap(), 10);
    assert_eq!(
        rows[0].get::<Option<Vec<u8>>>("digest").unwrap(),
        Some(vec![0xde, 0xad])
    );
    assert_eq!(rows[1].get::<Option<Vec<u8>>>("digest").unwrap(), None);
    assert_eq!(
        rows[1].get::<chrono::DateTime<Utc>>("modified").unwrap(),
        modified
    );
}

#[test]
fn selected_rows_feed_back_into_inserts() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir.path().join("copy.db"));
    db.create_table("file", &file_columns()).unwrap();
    db.create_table("archive", &file_columns()).unwrap();

    db.prepared_insert("file", &file_columns())
        .unwrap()
        .execute(args! {
            "path" => std::path::PathBuf::from("/c.txt"),
            "size" => 3_i64,
            "modified" => Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap(),
        })
        .unwrap();

    let mut select = db.prepared_select("file", &file_columns()).unwrap();
    let mut archive = db.prepared_insert_or_replace("archive", &file_columns()).unwrap();
    let rows: Vec<Record> = select
        .execute_rows_unbound()
        .unwrap()
        .collect::<eyre::Result<_>>()
        .unwrap();
    for row in &rows {
        archive.execute(row).unwrap();
        archive.execute(row).unwrap();
    }
    drop(archive);

    let copied = db
        .prepared_select("archive", &file_columns())
        .unwrap()
        .execute_rows_unbound()
        .unwrap()
        .count();
    assert_eq!(copied, 1);
}

#[test]
fn delete_where_removes_matching_rows() {
    let db = Database::open_in_memory().unwrap();
    db.create_table("file", &file_columns()).unwrap();
    let mut insert = db.prepared_insert("file", &file_columns()).unwrap();
    for (name, size) in [("/x", 1_i64), ("/y", 100), ("/z", 1000)] {
        insert
            .execute(args! {
                "path" => std::path::PathBuf::from(name),
                "size" => size,
                "modified" => Utc.with_ymd_and_hms(2022, 2, 2, 2, 2, 2).unwrap(),
            })
            .unwrap();
    }
    drop(insert);

    db.prepared_delete_where("file", "size >= ?/*:limit:integer*/")
        .unwrap()
        .execute(args! { "limit" => 100_i64 })
        .unwrap();

    let left: Vec<std::path::PathBuf> = db
        .prepared_select("file", &file_columns())
        .unwrap()
        .execute_rows_unbound()
        .unwrap()
        .map(|row| row.and_then(|r| r.get::<std::path::PathBuf>("path")))
        .collect::<eyre::Result<_>>()
        .unwrap();
    assert_eq!(left, [std::path::PathBuf::from("/x")]);
}

#[test]
fn bad_annotation_in_where_clause_is_reported() {
    let db = Database::open_in_memory().unwrap();
    db.create_table("file", &file_columns()).unwrap();
    let err = db
        .prepared_delete_where("file", "size > ?/*:limit:bigint*/")
        .err()
        .unwrap();
    assert_eq!(kind(&err), Some(&Error::UnrecognizedType("bigint".into())));
}
