//! Classification of SeaORM errors into domain outcomes.

use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryResult, QueryTrait, Select,
    SqlErr,
};

use crate::domain::error::DomainError;

/// Storage constraint that rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Unique,
    ForeignKey,
}

/// Which constraint, if any, caused `err`.
#[must_use]
pub fn constraint_violation(err: &DbErr) -> Option<Violation> {
    match err.sql_err()? {
        SqlErr::UniqueConstraintViolation(_) => Some(Violation::Unique),
        SqlErr::ForeignKeyConstraintViolation(_) => Some(Violation::ForeignKey),
        _ => None,
    }
}

/// `true` when an update or lookup found no row to act on.
#[must_use]
pub const fn is_missing_row(err: &DbErr) -> bool {
    matches!(err, DbErr::RecordNotUpdated | DbErr::RecordNotFound(_))
}

/// Fallback conversion for errors with no domain meaning.
#[allow(clippy::needless_pass_by_value)]
pub fn db_err(err: DbErr) -> DomainError {
    DomainError::database(err.to_string())
}

/// Run `select` and return the rows undecoded.
///
/// Listings decode each row separately so one unreadable row cannot fail the
/// whole result.
pub async fn query_rows<E: EntityTrait>(
    db: &DatabaseConnection,
    select: &Select<E>,
) -> Result<Vec<QueryResult>, DomainError> {
    let stmt = select.build(db.get_database_backend());
    db.query_all(stmt).await.map_err(db_err)
}
