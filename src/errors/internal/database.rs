use thiserror::Error;

/// Database-level failures, pre-classified by constraint type
///
/// Classification happens once, here, from the driver error text; the api
/// layer maps `UniqueViolation` to 409 and `ForeignKeyViolation` to 400
/// without re-inspecting driver strings.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Duplicate entry in {operation}: {source}")]
    UniqueViolation {
        operation: String,
        source: sea_orm::DbErr,
    },

    #[error("Referenced resource not found in {operation}: {source}")]
    ForeignKeyViolation {
        operation: String,
        source: sea_orm::DbErr,
    },

    #[error("Database error in {operation}: {source}")]
    Operation {
        operation: String,
        source: sea_orm::DbErr,
    },
}

impl DatabaseError {
    /// Sort a sea-orm error into the constraint taxonomy.
    ///
    /// Matches both the sqlite ("UNIQUE constraint failed", "FOREIGN KEY
    /// constraint failed") and mysql ("Duplicate entry",
    /// "foreign key constraint fails") driver messages.
    pub fn classify(operation: &str, source: sea_orm::DbErr) -> Self {
        let text = source.to_string();
        let operation = operation.to_string();

        if text.contains("UNIQUE") || text.contains("Duplicate entry") {
            DatabaseError::UniqueViolation { operation, source }
        } else if text.contains("FOREIGN KEY") || text.contains("foreign key") {
            DatabaseError::ForeignKeyViolation { operation, source }
        } else {
            DatabaseError::Operation { operation, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(message: &str) -> sea_orm::DbErr {
        sea_orm::DbErr::Custom(message.to_string())
    }

    #[test]
    fn classify_detects_sqlite_unique_violation() {
        let err = DatabaseError::classify("insert_user", custom("UNIQUE constraint failed: users.email"));
        assert!(matches!(err, DatabaseError::UniqueViolation { .. }));
    }

    #[test]
    fn classify_detects_mysql_duplicate_entry() {
        let err = DatabaseError::classify(
            "insert_admin",
            custom("Duplicate entry 'admin' for key 'admins.username'"),
        );
        assert!(matches!(err, DatabaseError::UniqueViolation { .. }));
    }

    #[test]
    fn classify_detects_foreign_key_violation() {
        let err = DatabaseError::classify("insert_form", custom("FOREIGN KEY constraint failed"));
        assert!(matches!(err, DatabaseError::ForeignKeyViolation { .. }));
    }

    #[test]
    fn classify_falls_back_to_operation() {
        let err = DatabaseError::classify("list_forms", custom("disk I/O error"));
        assert!(matches!(err, DatabaseError::Operation { .. }));
    }
}
