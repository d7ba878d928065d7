use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum CommunityReports {
    Table,
    ReportId,
    DateReported,
    Location,
    Category,
    Severity,
    ReporterType,
    Description,
    ImageUrl,
    AiKeywords,
    AiSentiment,
    AiUrgencyScore,
    RiskScore,
    PredictedRiskLevel,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CommunityReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CommunityReports::ReportId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CommunityReports::DateReported)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommunityReports::Location)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommunityReports::Category)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommunityReports::Severity)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommunityReports::ReporterType)
                            .string_len(50)
                            .not_null()
                            .default("Anonymous"),
                    )
                    .col(ColumnDef::new(CommunityReports::Description).text().not_null())
                    .col(ColumnDef::new(CommunityReports::ImageUrl).string_len(500).null())
                    .col(ColumnDef::new(CommunityReports::AiKeywords).text().null())
                    .col(ColumnDef::new(CommunityReports::AiSentiment).text().null())
                    .col(ColumnDef::new(CommunityReports::AiUrgencyScore).double().null())
                    .col(ColumnDef::new(CommunityReports::RiskScore).double().null())
                    .col(
                        ColumnDef::new(CommunityReports::PredictedRiskLevel)
                            .string_len(20)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CommunityReports::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(CommunityReports::UpdatedAt).timestamp().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_community_reports_date_reported")
                    .table(CommunityReports::Table)
                    .col(CommunityReports::DateReported)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_community_reports_risk_level")
                    .table(CommunityReports::Table)
                    .col(CommunityReports::PredictedRiskLevel)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommunityReports::Table).to_owned())
            .await
    }
}
