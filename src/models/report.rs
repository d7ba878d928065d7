use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "community_reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub report_id: i32,
    pub date_reported: DateTime,
    #[sea_orm(column_type = "String(StringLen::N(200))")]
    pub location: String,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub category: String,
    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub severity: String,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub reporter_type: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "String(StringLen::N(500))", nullable)]
    pub image_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub ai_keywords: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub ai_sentiment: Option<String>,
    pub ai_urgency_score: Option<f64>,
    pub risk_score: Option<f64>,
    #[sea_orm(column_type = "String(StringLen::N(20))", nullable)]
    pub predicted_risk_level: Option<String>,
    pub created_at: DateTime,
    pub updated_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A validated submission, before the store assigns its identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct NewReport {
    pub date_reported: chrono::NaiveDateTime,
    pub location: String,
    pub category: String,
    pub severity: String,
    pub reporter_type: String,
    pub description: String,
    pub image_url: Option<String>,
}
