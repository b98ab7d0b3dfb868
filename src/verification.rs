//! Token-gated alert verification.
//!
//! An authenticated user mints a token for an alert; a field verifier later
//! redeems it, unauthenticated, together with corrected case details. Token
//! consumption and the alert update commit in one transaction.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sea_orm::{ActiveModelTrait, Set, TransactionError, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::entities::alert;
use crate::error::AppError;
use crate::store::{AlertStore, CaseDetails, TokenStore};

const TOKEN_BYTES: usize = 32;

/// 256 bits from the OS CSPRNG, lowercase hex.
pub fn generate_token_value() -> Result<String, AppError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| AppError::Credential(format!("token generation failed: {e}")))?;
    Ok(hex::encode(bytes))
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub alert_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_url: Option<String>,
}

/// Body of the unauthenticated verify request.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerificationPayload {
    pub token: String,
    pub status: Option<String>,
    /// Declared by the verifier; may be backdated to the field visit.
    pub verification_date: Option<NaiveDate>,
    pub verification_time: Option<NaiveTime>,
    pub verified_by: Option<String>,
    #[serde(flatten)]
    pub details: CaseDetails,
}

/// Payload after the checks that need no storage access.
struct CheckedPayload {
    status: Option<String>,
    verified_by: String,
    verification_date: NaiveDate,
    verification_time: NaiveTime,
    details: CaseDetails,
}

impl VerificationPayload {
    fn check(self) -> Result<(String, CheckedPayload), AppError> {
        if self.token.is_empty() {
            return Err(AppError::InvalidToken);
        }

        let verified_by = self
            .verified_by
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::invalid_argument("verifiedBy is required"))?;
        let verification_date = self
            .verification_date
            .ok_or_else(|| AppError::invalid_argument("verificationDate is required"))?;
        let verification_time = self
            .verification_time
            .ok_or_else(|| AppError::invalid_argument("verificationTime is required"))?;

        Ok((
            self.token,
            CheckedPayload {
                status: self.status.filter(|s| !s.trim().is_empty()),
                verified_by,
                verification_date,
                verification_time,
                details: self.details,
            },
        ))
    }
}

impl CheckedPayload {
    fn apply_to(self, active: &mut alert::ActiveModel, now: NaiveDateTime) {
        self.details.apply_to(active);
        if let Some(status) = self.status {
            active.status = Set(status);
        }
        active.is_verified = Set(true);
        active.verified_by = Set(Some(self.verified_by));
        active.verification_date = Set(Some(self.verification_date));
        active.verification_time = Set(Some(self.verification_time));
        active.updated_at = Set(now);
    }
}

#[derive(Clone)]
pub struct VerificationWorkflow {
    alerts: AlertStore,
    tokens: TokenStore,
    verification_base_url: Option<String>,
}

impl VerificationWorkflow {
    pub fn new(alerts: AlertStore, tokens: TokenStore) -> Self {
        Self {
            alerts,
            tokens,
            verification_base_url: None,
        }
    }

    pub fn with_verification_base_url(mut self, base_url: Option<String>) -> Self {
        self.verification_base_url = base_url.map(|u| u.trim_end_matches('/').to_string());
        self
    }

    pub async fn generate_token(
        &self,
        alert_id: i32,
        now: NaiveDateTime,
    ) -> Result<IssuedToken, AppError> {
        let alert = self.alerts.get(alert_id).await?;
        let token = generate_token_value()?;
        let row = self.tokens.create(alert.id, token, now).await?;

        info!(alert_id = alert.id, token_id = row.id, "verification token issued");

        let verification_url = self
            .verification_base_url
            .as_ref()
            .map(|base| format!("{}?id={}&token={}", base, alert.id, row.token));

        Ok(IssuedToken {
            token: row.token,
            alert_id: alert.id,
            verification_url,
        })
    }

    /// Consumes the token and applies the payload, or changes nothing.
    ///
    /// The token is consumed with a conditional update inside the transaction,
    /// so racing callers holding the same token get exactly one success; the
    /// rest see [`AppError::InvalidToken`].
    pub async fn verify_alert(
        &self,
        alert_id: i32,
        payload: VerificationPayload,
        now: NaiveDateTime,
    ) -> Result<alert::Model, AppError> {
        let (token, checked) = payload.check()?;

        let result = self
            .alerts
            .connection()
            .transaction::<_, alert::Model, AppError>(|txn| {
                Box::pin(async move {
                    if !TokenStore::consume(txn, alert_id, &token, now).await? {
                        return Err(AppError::InvalidToken);
                    }

                    let current = AlertStore::find_live(txn, alert_id).await?;
                    let mut active: alert::ActiveModel = current.into();
                    checked.apply_to(&mut active, now);

                    Ok(active.update(txn).await?)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db) => AppError::Storage(db),
                TransactionError::Transaction(app) => app,
            });

        match &result {
            Ok(alert) => info!(
                alert_id = alert.id,
                verified_by = alert.verified_by.as_deref().unwrap_or_default(),
                "alert verified"
            ),
            Err(e) => warn!(alert_id, error = %e, "alert verification rejected"),
        }

        result
    }
}
