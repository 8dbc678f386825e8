use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Money columns: 15 integer digits, 4 fractional.
const MONEY_PRECISION: u32 = 19;
const MONEY_SCALE: u32 = 4;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(EstimateKind::Enum)
                    .values(EstimateKind::VALUES)
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(ProjectType::Enum)
                    .values(ProjectType::VALUES)
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(ServiceType::Enum)
                    .values(ServiceType::VALUES)
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(EstimateStatus::Enum)
                    .values(EstimateStatus::VALUES)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Estimates::Table)
                    .if_not_exists()
                    .col(pk_uuid(Estimates::Id))
                    .col(string_len(Estimates::ProjectName, 200))
                    .col(string_len(Estimates::ClientName, 150))
                    .col(string_len(Estimates::ClientEmail, 320))
                    .col(
                        ColumnDef::new(Estimates::Status)
                            .enumeration(EstimateStatus::Enum, EstimateStatus::VALUES)
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Estimates::EstimateKind)
                            .enumeration(EstimateKind::Enum, EstimateKind::VALUES)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Estimates::ProjectType)
                            .enumeration(ProjectType::Enum, ProjectType::VALUES)
                            .not_null()
                            .default("standard"),
                    )
                    .col(
                        ColumnDef::new(Estimates::ServiceType)
                            .enumeration(ServiceType::Enum, ServiceType::VALUES)
                            .not_null()
                            .default("maintenance"),
                    )
                    .col(integer(Estimates::EstimatedDurationDays).default(0))
                    .col(integer(Estimates::EstimatedHours).default(0))
                    .col(money(Estimates::PerVisitCost))
                    .col(integer(Estimates::VisitsPerMonth).default(0))
                    .col(money(Estimates::MaterialCost))
                    .col(money(Estimates::EquipmentCost))
                    .col(money(Estimates::TravelCost))
                    .col(boolean(Estimates::IsRecurring).default(false))
                    .col(money(Estimates::DistanceFromBase))
                    .col(string_len(Estimates::ClientTier, 50).default("Standard"))
                    .col(boolean(Estimates::IsRushOrder).default(false))
                    .col(boolean(Estimates::IsRepeatClient).default(false))
                    .col(json_binary(Estimates::SelectedPackages).default("[]"))
                    .col(json_binary(Estimates::SelectedAddOns).default("[]"))
                    .col(decimal_len_null(Estimates::TotalEstimatedCost, MONEY_PRECISION, MONEY_SCALE))
                    .col(decimal_len_null(Estimates::MonthlyEstimatedCost, MONEY_PRECISION, MONEY_SCALE))
                    .col(json_binary(Estimates::Breakdown))
                    .col(
                        timestamp_with_time_zone(Estimates::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Estimates::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_estimates_estimate_kind", Estimates::EstimateKind),
            ("idx_estimates_status", Estimates::Status),
            ("idx_estimates_client_email", Estimates::ClientEmail),
            ("idx_estimates_created_at", Estimates::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Estimates::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER estimates_touch_updated_at
                    BEFORE UPDATE ON estimates
                    FOR EACH ROW
                    EXECUTE FUNCTION util.touch_updated_at()
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TRIGGER IF EXISTS estimates_touch_updated_at ON estimates")
            .await?;

        manager
            .drop_table(Table::drop().table(Estimates::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(EstimateStatus::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(ServiceType::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(ProjectType::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(EstimateKind::Enum).to_owned())
            .await?;

        Ok(())
    }
}

/// Non-negative money amount, zero by default.
fn money<T: IntoIden>(col: T) -> ColumnDef {
    decimal_len(col, MONEY_PRECISION, MONEY_SCALE)
        .default(0)
        .to_owned()
}

#[derive(DeriveIden)]
enum Estimates {
    Table,
    Id,
    ProjectName,
    ClientName,
    ClientEmail,
    Status,
    EstimateKind,
    ProjectType,
    ServiceType,
    EstimatedDurationDays,
    EstimatedHours,
    PerVisitCost,
    VisitsPerMonth,
    MaterialCost,
    EquipmentCost,
    TravelCost,
    IsRecurring,
    DistanceFromBase,
    ClientTier,
    IsRushOrder,
    IsRepeatClient,
    SelectedPackages,
    SelectedAddOns,
    TotalEstimatedCost,
    MonthlyEstimatedCost,
    Breakdown,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum EstimateKind {
    #[sea_orm(iden = "estimate_kind")]
    Enum,
    #[sea_orm(iden = "design_build")]
    DesignBuild,
    #[sea_orm(iden = "recurring_service")]
    RecurringService,
    #[sea_orm(iden = "on_demand")]
    OnDemand,
}

impl EstimateKind {
    const VALUES: [Self; 3] = [Self::DesignBuild, Self::RecurringService, Self::OnDemand];
}

#[derive(DeriveIden, Clone, Copy)]
enum ProjectType {
    #[sea_orm(iden = "project_type")]
    Enum,
    #[sea_orm(iden = "standard")]
    Standard,
    #[sea_orm(iden = "custom")]
    Custom,
    #[sea_orm(iden = "peak")]
    Peak,
    #[sea_orm(iden = "off_season")]
    OffSeason,
    #[sea_orm(iden = "rush")]
    Rush,
    #[sea_orm(iden = "emergency")]
    Emergency,
}

impl ProjectType {
    const VALUES: [Self; 6] = [
        Self::Standard,
        Self::Custom,
        Self::Peak,
        Self::OffSeason,
        Self::Rush,
        Self::Emergency,
    ];
}

#[derive(DeriveIden, Clone, Copy)]
enum ServiceType {
    #[sea_orm(iden = "service_type")]
    Enum,
    #[sea_orm(iden = "maintenance")]
    Maintenance,
    #[sea_orm(iden = "repair")]
    Repair,
    #[sea_orm(iden = "installation")]
    Installation,
    #[sea_orm(iden = "consultation")]
    Consultation,
}

impl ServiceType {
    const VALUES: [Self; 4] = [
        Self::Maintenance,
        Self::Repair,
        Self::Installation,
        Self::Consultation,
    ];
}

#[derive(DeriveIden, Clone, Copy)]
enum EstimateStatus {
    #[sea_orm(iden = "estimate_status")]
    Enum,
    #[sea_orm(iden = "draft")]
    Draft,
    #[sea_orm(iden = "approved")]
    Approved,
    #[sea_orm(iden = "rejected")]
    Rejected,
}

impl EstimateStatus {
    const VALUES: [Self; 3] = [Self::Draft, Self::Approved, Self::Rejected];
}
