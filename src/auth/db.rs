use crate::db::DbPool;
use crate::models::{NewSession, User};
use crate::schema::{sessions, users};
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;

use super::crypto::{generate_token, hash_token};

const SESSION_LIFETIME_DAYS: i64 = 30;

type ExpiredSessions =
    diesel::dsl::Filter<sessions::table, diesel::dsl::LtEq<sessions::expires_at, DateTime<Utc>>>;

/// Sessions dead as of `now`. Purged on login so the table doesn't grow
/// with tokens nobody will ever present again.
fn expired_sessions(now: DateTime<Utc>) -> ExpiredSessions {
    sessions::table.filter(sessions::expires_at.le(now))
}

pub fn create_session(
    conn: &mut PgConnection,
    user_id: i32,
) -> Result<String, diesel::result::Error> {
    let now = Utc::now();
    diesel::delete(expired_sessions(now)).execute(conn)?;

    let token = generate_token();
    let token_hash = hash_token(&token);
    let expires_at = now + Duration::days(SESSION_LIFETIME_DAYS);

    let new_session = NewSession {
        user_id,
        token_hash: &token_hash,
        expires_at,
    };

    diesel::insert_into(sessions::table)
        .values(&new_session)
        .execute(conn)?;

    Ok(token)
}

/// Delete the session matching a raw bearer token. Returns how many rows went away.
pub fn delete_session(
    conn: &mut PgConnection,
    token: &str,
) -> Result<usize, diesel::result::Error> {
    let token_hash = hash_token(token);
    diesel::delete(sessions::table.filter(sessions::token_hash.eq(&token_hash))).execute(conn)
}

pub async fn get_user_from_token(pool: &DbPool, token: &str) -> Option<User> {
    let mut conn = pool.get().ok()?;
    let token_hash = hash_token(token);

    sessions::table
        .inner_join(users::table)
        .filter(sessions::token_hash.eq(&token_hash))
        .filter(sessions::expires_at.gt(Utc::now()))
        .select(User::as_select())
        .first(&mut conn)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::pg::Pg;

    #[test]
    fn test_expired_session_purge_targets_at_or_before_now() {
        let query = diesel::delete(expired_sessions(Utc::now()));
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("DELETE FROM \"sessions\""));
        assert!(sql.contains("\"expires_at\" <="));
    }
}
