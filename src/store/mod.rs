//! sea-orm backed stores. Each holds a cloned [`sea_orm::DatabaseConnection`]
//! handed in by the caller; there is no process-wide connection.

pub mod admin_units;
pub mod alerts;
pub mod tokens;

pub use admin_units::AdminUnitStore;
pub use alerts::{AlertInput, AlertStore, CaseDetails};
pub use tokens::TokenStore;

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use chrono::{NaiveDate, NaiveDateTime};
    use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
    use sea_orm_migration::MigratorTrait;

    use super::alerts::{blank_alert, AlertInput};
    use crate::entities::{alert, district, region, subcounty};
    use crate::migrator::Migrator;

    /// Fresh in-memory SQLite with the full schema. One pooled connection so
    /// every query sees the same database.
    pub async fn memory_db() -> DatabaseConnection {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    /// File-backed SQLite with a real pool, for tests where transactions must
    /// actually overlap. Keep the `TempDir` alive for the test's duration.
    pub async fn file_db(max_connections: u32) -> (tempfile::TempDir, DatabaseConnection) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("alerts.db").display());
        let mut opts = ConnectOptions::new(url);
        opts.max_connections(max_connections)
            .min_connections(1)
            .sqlx_logging(false)
            .map_sqlx_sqlite_opts(|o| o.busy_timeout(Duration::from_secs(10)));
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        (dir, db)
    }

    pub fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    pub fn alert_input(reporter: &str, case_name: &str) -> AlertInput {
        let mut input = AlertInput::default();
        input.details.person_reporting = Some(reporter.to_string());
        input.details.alert_case_name = Some(case_name.to_string());
        input
    }

    /// Inserts an alert with an explicit `created_at`.
    pub async fn seed_alert(
        db: &DatabaseConnection,
        created_at: NaiveDateTime,
        verified: bool,
    ) -> alert::Model {
        let mut active = blank_alert(created_at);
        active.person_reporting = Set("Seeder".into());
        active.alert_case_name = Set("Seeded case".into());
        if verified {
            active.is_verified = Set(true);
            active.verified_by = Set(Some("Seeder".into()));
            active.verification_date = Set(Some(created_at.date()));
            active.verification_time = Set(Some(created_at.time()));
        }
        active.insert(db).await.unwrap()
    }

    /// One region with two districts; the first district has one subcounty.
    /// Returns `(region_id, first_district_id)`.
    pub async fn seed_admin_units(db: &DatabaseConnection) -> (i32, i32) {
        let region = region::ActiveModel {
            region_uid: Set("R1".into()),
            region: Set("Central".into()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();

        let mut first = None;
        for (uid, name) in [("D2", "Wakiso"), ("D1", "Kampala")] {
            let district = district::ActiveModel {
                district_uid: Set(uid.into()),
                district: Set(name.into()),
                region_id: Set(region.id),
                ..Default::default()
            }
            .insert(db)
            .await
            .unwrap();
            first.get_or_insert(district.id);
        }
        let district_id = first.unwrap();

        subcounty::ActiveModel {
            subcounty_uid: Set("S1".into()),
            subcounty: Set("Nakawa".into()),
            district_id: Set(district_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();

        (region.id, district_id)
    }
}
