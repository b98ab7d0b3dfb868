use chrono::NaiveDateTime;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, Set,
};

use crate::entities::verification_token;
use crate::error::AppError;

/// Persistent collection of single-use verification tokens.
#[derive(Clone)]
pub struct TokenStore {
    db: DatabaseConnection,
}

impl TokenStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        alert_id: i32,
        token: String,
        now: NaiveDateTime,
    ) -> Result<verification_token::Model, AppError> {
        let row = verification_token::ActiveModel {
            alert_id: Set(alert_id),
            token: Set(token),
            used: Set(false),
            created_at: Set(now),
            used_at: Set(None),
            ..Default::default()
        };

        Ok(row.insert(&self.db).await?)
    }

    /// Exact match on token and alert, unused only.
    pub async fn find_unused(
        &self,
        alert_id: i32,
        token: &str,
    ) -> Result<Option<verification_token::Model>, AppError> {
        Ok(verification_token::Entity::find()
            .filter(verification_token::Column::AlertId.eq(alert_id))
            .filter(verification_token::Column::Token.eq(token))
            .filter(verification_token::Column::Used.eq(false))
            .one(&self.db)
            .await?)
    }

    /// Flips `used` to true in one conditional UPDATE (`... AND used = false`).
    /// Returns `false` when no unused token matched, which is also what a
    /// concurrent caller that lost the race observes.
    pub async fn consume<C: ConnectionTrait>(
        conn: &C,
        alert_id: i32,
        token: &str,
        now: NaiveDateTime,
    ) -> Result<bool, AppError> {
        let res = verification_token::Entity::update_many()
            .col_expr(verification_token::Column::Used, Expr::value(true))
            .col_expr(verification_token::Column::UsedAt, Expr::value(Some(now)))
            .filter(verification_token::Column::AlertId.eq(alert_id))
            .filter(verification_token::Column::Token.eq(token))
            .filter(verification_token::Column::Used.eq(false))
            .exec(conn)
            .await?;

        Ok(res.rows_affected == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{memory_db, now, seed_alert};

    #[tokio::test]
    async fn consume_is_single_shot() {
        let db = memory_db().await;
        let alert = seed_alert(&db, now(), false).await;
        let store = TokenStore::new(db.clone());
        store.create(alert.id, "abc123".into(), now()).await.unwrap();

        assert!(store.find_unused(alert.id, "abc123").await.unwrap().is_some());
        assert!(TokenStore::consume(&db, alert.id, "abc123", now()).await.unwrap());
        assert!(!TokenStore::consume(&db, alert.id, "abc123", now()).await.unwrap());
        assert!(store.find_unused(alert.id, "abc123").await.unwrap().is_none());

        let row = verification_token::Entity::find()
            .filter(verification_token::Column::Token.eq("abc123"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert!(row.used);
        assert_eq!(row.used_at, Some(now()));
    }

    #[tokio::test]
    async fn lookup_is_scoped_to_the_alert() {
        let db = memory_db().await;
        let a = seed_alert(&db, now(), false).await;
        let b = seed_alert(&db, now(), false).await;
        let store = TokenStore::new(db.clone());
        store.create(a.id, "t-a".into(), now()).await.unwrap();

        assert!(store.find_unused(b.id, "t-a").await.unwrap().is_none());
        assert!(store.find_unused(a.id, "T-A").await.unwrap().is_none());
        assert!(!TokenStore::consume(&db, b.id, "t-a", now()).await.unwrap());
        assert!(store.find_unused(a.id, "t-a").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn token_values_are_unique() {
        let db = memory_db().await;
        let a = seed_alert(&db, now(), false).await;
        let store = TokenStore::new(db);
        store.create(a.id, "dup".into(), now()).await.unwrap();

        let again = store.create(a.id, "dup".into(), now()).await;
        assert!(matches!(again, Err(AppError::Storage(_))));
    }
}
