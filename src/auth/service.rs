use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use tracing::warn;

use super::claims::Principal;
use super::jwt::JwtManager;
use super::password::{hash_password, verify_password};
use crate::entities::user;
use crate::error::AppError;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub other_name: String,
    pub email: String,
    pub affiliation: String,
    #[serde(default)]
    pub user_type: String,
    #[serde(default)]
    pub level: String,
}

#[derive(Clone, Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub user: user::Model,
}

/// Users plus session tokens. Login reads through the `users` entity like
/// every other user lookup.
#[derive(Clone)]
pub struct CredentialService {
    db: DatabaseConnection,
    jwt: JwtManager,
}

fn is_unique_violation(e: &DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("duplicate key value violates unique constraint")
        || msg.contains("UNIQUE constraint failed")
}

impl CredentialService {
    pub fn new(db: DatabaseConnection, jwt: JwtManager) -> Self {
        Self { db, jwt }
    }

    fn live() -> sea_orm::Select<user::Entity> {
        user::Entity::find().filter(user::Column::DeletedAt.is_null())
    }

    pub async fn register(
        &self,
        req: RegisterRequest,
        now: NaiveDateTime,
    ) -> Result<user::Model, AppError> {
        for (value, name) in [
            (&req.username, "username"),
            (&req.password, "password"),
            (&req.email, "email"),
            (&req.first_name, "firstName"),
            (&req.last_name, "lastName"),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::invalid_argument(format!("{name} is required")));
            }
        }

        let taken = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(req.username.as_str()))
                    .add(user::Column::Email.eq(req.email.as_str())),
            )
            .one(&self.db)
            .await?;
        if taken.is_some() {
            return Err(AppError::Conflict("Username or email already exists".into()));
        }

        let new_user = user::ActiveModel {
            username: Set(req.username),
            password_hash: Set(hash_password(&req.password)?),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            other_name: Set(req.other_name),
            email: Set(req.email),
            affiliation: Set(req.affiliation),
            user_type: Set(req.user_type),
            level: Set(req.level),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        new_user.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Username or email already exists".into())
            } else {
                AppError::Storage(e)
            }
        })
    }

    /// Unknown user and wrong password produce the same error.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let user = Self::live()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .ok_or(AppError::Unauthorized(INVALID_CREDENTIALS))?;

        let matches = match verify_password(password, &user.password_hash) {
            Ok(matches) => matches,
            Err(e) => {
                warn!(user_id = user.id, "unreadable password hash: {}", e);
                false
            }
        };
        if !matches {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.jwt.issue(user.id, &user.username)?;
        Ok(LoginOutcome { token, user })
    }

    pub fn authenticate(&self, token: &str) -> Result<Principal, AppError> {
        self.jwt
            .validate(token)?
            .principal()
            .ok_or(AppError::Unauthorized("Invalid token"))
    }

    pub async fn get_user(&self, id: i32) -> Result<user::Model, AppError> {
        Self::live()
            .filter(user::Column::Id.eq(id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    pub async fn list_users(&self) -> Result<Vec<user::Model>, AppError> {
        Ok(Self::live()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?)
    }
}
