use anyhow::Result;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::migration::Migrator;

pub type OrmConn = DatabaseConnection;

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<OrmConn> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);
    // An in-memory SQLite database lives and dies with its single connection.
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Apply every pending migration.
pub async fn run_migrations(conn: &OrmConn) -> Result<()> {
    Migrator::up(conn, None).await?;
    Ok(())
}

/// `%term%` for a case-insensitive substring match against a lowered column.
pub fn contains_pattern(term: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like(&term.to_lowercase()))).escape('\\')
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\x"), "c:\\\\x");
        assert_eq!(escape_like("plain"), "plain");
    }
}
