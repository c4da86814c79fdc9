//! Shared fixtures for the persistence integration tests.
//!
//! Every backend test seeds the same small table of heroes so that search
//! expectations read the same across backends.

#![allow(dead_code)]

use quarry_persistence::core::RecordStore;
use quarry_persistence::schema::{ColumnType, RecordSchema};
use quarry_persistence::types::Record;

/// A hero row: id, name, hometown, alias, team.
pub type HeroRow = (i64, &'static str, &'static str, Option<&'static str>, i64);

/// The seeded heroes.
pub const HEROES: &[HeroRow] = &[
    (1, "Superman", "Smallville", Some("Clark Kent"), 1),
    (2, "Supergirl", "Argo City", Some("Kara Zor-El"), 1),
    (3, "Man of Steel", "Metropolis", None, 1),
    (4, "Batman", "Gotham", Some("Bruce Wayne"), 2),
    (5, "Clark Kent", "Metropolis", None, 1),
    (6, "100% Hero", "Under_Score", None, 3),
    (7, "Iron Man", "Malibu", Some("Tony Stark"), 2),
    (8, "Manhunter", "Mars", None, 1),
    (9, "The Mandarin", "Valley of Spirits", None, 4),
];

/// Builds the hero schema backed by `table`.
///
/// `name` and `hometown` are searchable.
pub fn hero_schema(table: &str) -> RecordSchema {
    RecordSchema::builder("Hero")
        .table(table)
        .column("id", ColumnType::Integer)
        .column("name", ColumnType::Text)
        .column("hometown", ColumnType::Text)
        .column("alias", ColumnType::Text)
        .column("team_id", ColumnType::Integer)
        .searchable(["name", "hometown"])
        .allow_unfiltered_fetch(true)
        .build()
        .expect("hero schema is valid")
}

/// Builds a team schema that can only be fetched by id.
pub fn team_schema(table: &str) -> RecordSchema {
    RecordSchema::builder("Team")
        .table(table)
        .column("id", ColumnType::Integer)
        .column("name", ColumnType::Text)
        .build()
        .expect("team schema is valid")
}

/// Converts a fixture row into a record.
pub fn hero_record(row: &HeroRow) -> Record {
    let (id, name, hometown, alias, team_id) = *row;
    let mut record = Record::new()
        .with("id", id)
        .with("name", name)
        .with("hometown", hometown)
        .with("team_id", team_id);
    if let Some(alias) = alias {
        record.set("alias", alias);
    }
    record
}

/// Creates the hero table and inserts every fixture row.
pub async fn seed_heroes(store: &dyn RecordStore, schema: &RecordSchema) {
    store
        .ensure_table(schema)
        .await
        .expect("Failed to create hero table");
    for row in HEROES {
        store
            .insert(schema, &hero_record(row))
            .await
            .expect("Failed to insert hero");
    }
}

/// Extracts the integer ids of `records`, in result order.
pub fn ids_of(records: &[Record]) -> Vec<i64> {
    records
        .iter()
        .map(|record| {
            record
                .get("id")
                .and_then(|value| value.as_i64())
                .expect("record has an integer id")
        })
        .collect()
}
