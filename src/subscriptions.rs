//! Directed follow edges between users.
//!
//! Two invariants hold at write time: a user never follows themselves, and an
//! edge exists at most once. Both are backed by database constraints (CHECK
//! and a unique index); the pre-checks here only pick the error message.

use crate::models::{NewSubscription, User};
use crate::schema::{subscriptions, users};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubscriptionError {
    #[error("User not found")]
    AuthorNotFound,

    #[error("You cannot subscribe to yourself")]
    SelfSubscription,

    #[error("You are already subscribed to this author")]
    AlreadySubscribed,

    #[error("You are not subscribed to this author")]
    NotSubscribed,

    #[error("Database error: {0}")]
    Db(#[from] DieselError),
}

fn load_author(conn: &mut PgConnection, author_id: i32) -> Result<User, SubscriptionError> {
    users::table
        .find(author_id)
        .select(User::as_select())
        .first(conn)
        .map_err(|e| match e {
            DieselError::NotFound => SubscriptionError::AuthorNotFound,
            other => SubscriptionError::Db(other),
        })
}

/// Create a follow edge and return the followed author.
pub fn subscribe(
    conn: &mut PgConnection,
    follower_id: i32,
    author_id: i32,
) -> Result<User, SubscriptionError> {
    if follower_id == author_id {
        return Err(SubscriptionError::SelfSubscription);
    }

    let author = load_author(conn, author_id)?;

    let inserted = diesel::insert_into(subscriptions::table)
        .values(&NewSubscription {
            user_id: follower_id,
            author_id,
        })
        .execute(conn);

    match inserted {
        Ok(_) => Ok(author),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            Err(SubscriptionError::AlreadySubscribed)
        }
        // The CHECK constraint also rejects self-edges if one races past the
        // guard above
        Err(DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _)) => {
            Err(SubscriptionError::SelfSubscription)
        }
        Err(e) => Err(SubscriptionError::Db(e)),
    }
}

/// Remove a follow edge.
pub fn unsubscribe(
    conn: &mut PgConnection,
    follower_id: i32,
    author_id: i32,
) -> Result<(), SubscriptionError> {
    load_author(conn, author_id)?;

    let deleted = diesel::delete(
        subscriptions::table
            .filter(subscriptions::user_id.eq(follower_id))
            .filter(subscriptions::author_id.eq(author_id)),
    )
    .execute(conn)?;

    if deleted == 0 {
        return Err(SubscriptionError::NotSubscribed);
    }

    Ok(())
}

/// Does `follower_id` follow `author_id`?
pub fn is_subscribed(
    conn: &mut PgConnection,
    follower_id: i32,
    author_id: i32,
) -> Result<bool, DieselError> {
    let count: i64 = subscriptions::table
        .filter(subscriptions::user_id.eq(follower_id))
        .filter(subscriptions::author_id.eq(author_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Interpret the `recipes_limit` query parameter: absent or non-numeric means
/// unbounded.
pub fn parse_recipes_limit(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.parse::<i64>().ok()).filter(|n| *n >= 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipes_limit_numeric() {
        assert_eq!(parse_recipes_limit(Some("3")), Some(3));
        assert_eq!(parse_recipes_limit(Some("0")), Some(0));
    }

    #[test]
    fn test_recipes_limit_absent_or_garbage_is_unbounded() {
        assert_eq!(parse_recipes_limit(None), None);
        assert_eq!(parse_recipes_limit(Some("abc")), None);
        assert_eq!(parse_recipes_limit(Some("")), None);
        assert_eq!(parse_recipes_limit(Some("-1")), None);
    }
}
