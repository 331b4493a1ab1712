//! Retry of statements that hit a locked database.

use std::future::Future;

use crate::error::StoreError;

/// Upper bound on tries for one statement, confirmed or not.
pub const MAX_ATTEMPTS: u32 = 10;

/// Run `op`, asking `confirm` whether to try again each time it fails
/// because the database is busy. Any other outcome is returned as-is.
///
/// `confirm` is where an interactive caller prompts the operator; returning
/// `false` gives up with the busy error, as does reaching [`MAX_ATTEMPTS`].
pub async fn retry_busy<T, F, Fut, C>(mut op: F, mut confirm: C) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
    C: FnMut(&StoreError) -> bool,
{
    let mut attempt = 1u32;
    loop {
        match op().await {
            Err(e) if e.is_busy() => {
                tracing::warn!(attempt, error = %e, "Database is busy");
                if attempt >= MAX_ATTEMPTS {
                    tracing::error!(attempt, "Giving up on busy database");
                    return Err(e);
                }
                if !confirm(&e) {
                    return Err(e);
                }
                attempt += 1;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cliplog_core::TimecodeError;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::fmt;

    /// Driver error carrying a fixed SQLite result code.
    #[derive(Debug)]
    struct SqliteCode(&'static str);

    impl fmt::Display for SqliteCode {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "sqlite error {}", self.0)
        }
    }

    impl std::error::Error for SqliteCode {}

    impl DatabaseError for SqliteCode {
        fn message(&self) -> &str {
            "database is locked"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    fn busy() -> StoreError {
        StoreError::Database(sqlx::Error::Database(Box::new(SqliteCode("5"))))
    }

    #[test]
    fn test_busy_codes() {
        assert!(busy().is_busy());
        // SQLITE_LOCKED and the extended SQLITE_BUSY_SNAPSHOT.
        let locked = StoreError::Database(sqlx::Error::Database(Box::new(SqliteCode("6"))));
        assert!(locked.is_busy());
        let snapshot = StoreError::Database(sqlx::Error::Database(Box::new(SqliteCode("517"))));
        assert!(snapshot.is_busy());
        let constraint = StoreError::Database(sqlx::Error::Database(Box::new(SqliteCode("19"))));
        assert!(!constraint.is_busy());
    }

    #[tokio::test]
    async fn test_non_busy_errors_pass_through() {
        let mut calls = 0;
        let result: Result<(), _> = retry_busy(
            || {
                calls += 1;
                async {
                    Err(StoreError::Timecode(TimecodeError::MalformedTimecode {
                        input: "x".to_string(),
                    }))
                }
            },
            |_| true,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_success_is_returned() {
        let value = retry_busy(|| async { Ok::<_, StoreError>(7) }, |_| false)
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_confirmed_retries_until_success() {
        let mut calls = 0;
        let mut prompts = 0;
        let value = retry_busy(
            || {
                calls += 1;
                let result = if calls < 3 { Err(busy()) } else { Ok(calls) };
                async move { result }
            },
            |e| {
                prompts += 1;
                e.is_busy()
            },
        )
        .await
        .unwrap();
        assert_eq!(value, 3);
        assert_eq!(calls, 3);
        assert_eq!(prompts, 2);
    }

    #[tokio::test]
    async fn test_declined_retry_returns_busy_error() {
        let mut calls = 0;
        let result: Result<(), _> = retry_busy(
            || {
                calls += 1;
                async { Err(busy()) }
            },
            |_| false,
        )
        .await;
        assert!(result.unwrap_err().is_busy());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let mut calls = 0;
        let result: Result<(), _> = retry_busy(
            || {
                calls += 1;
                async { Err(busy()) }
            },
            |_| true,
        )
        .await;
        assert!(result.unwrap_err().is_busy());
        assert_eq!(calls, MAX_ATTEMPTS);
    }
}
