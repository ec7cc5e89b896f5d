/// Database layer
///
/// Schema migrations for the PostgreSQL backend. Pool construction lives in
/// `PgStore::connect`; the persistence operations live behind the `store`
/// traits.

pub mod migrations;
