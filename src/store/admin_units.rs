use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::{district, region, subcounty};
use crate::error::AppError;

/// Read-only lookups over the region → district → subcounty hierarchy.
#[derive(Clone)]
pub struct AdminUnitStore {
    db: DatabaseConnection,
}

impl AdminUnitStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn regions(&self) -> Result<Vec<region::Model>, AppError> {
        Ok(region::Entity::find()
            .order_by_asc(region::Column::Region)
            .all(&self.db)
            .await?)
    }

    pub async fn all_districts(&self) -> Result<Vec<district::Model>, AppError> {
        Ok(district::Entity::find()
            .order_by_asc(district::Column::District)
            .all(&self.db)
            .await?)
    }

    pub async fn all_subcounties(&self) -> Result<Vec<subcounty::Model>, AppError> {
        Ok(subcounty::Entity::find()
            .order_by_asc(subcounty::Column::Subcounty)
            .all(&self.db)
            .await?)
    }

    /// `NotFound` when the region itself does not exist.
    pub async fn districts(&self, region_id: i32) -> Result<Vec<district::Model>, AppError> {
        region::Entity::find_by_id(region_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("Region"))?;

        Ok(district::Entity::find()
            .filter(district::Column::RegionId.eq(region_id))
            .order_by_asc(district::Column::District)
            .all(&self.db)
            .await?)
    }

    pub async fn subcounties(&self, district_id: i32) -> Result<Vec<subcounty::Model>, AppError> {
        district::Entity::find_by_id(district_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("District"))?;

        Ok(subcounty::Entity::find()
            .filter(subcounty::Column::DistrictId.eq(district_id))
            .order_by_asc(subcounty::Column::Subcounty)
            .all(&self.db)
            .await?)
    }
}
