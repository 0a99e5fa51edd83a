use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240315_000001_create_users_table::Migration),
            Box::new(m20240315_000002_create_motors_table::Migration),
            Box::new(m20240315_000003_create_control_devices_table::Migration),
            Box::new(m20240315_000004_create_fault_types_table::Migration),
            Box::new(m20240315_000005_create_fault_records_table::Migration),
            Box::new(m20240315_000006_create_production_lines_table::Migration),
            Box::new(m20240315_000007_create_general_fault_tables::Migration),
            Box::new(m20240315_000008_create_stock_tables::Migration),
            Box::new(m20240315_000009_create_production_stops_table::Migration),
            Box::new(m20240315_000010_create_announcements_table::Migration),
            Box::new(m20240315_000011_create_action_logs_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240315_000001_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(
                            ColumnDef::new(Users::Role)
                                .string()
                                .not_null()
                                .default("user"),
                        )
                        .col(ColumnDef::new(Users::FirstName).string().null())
                        .col(ColumnDef::new(Users::LastName).string().null())
                        .col(ColumnDef::new(Users::Phone).string().null())
                        .col(ColumnDef::new(Users::Department).string().null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_users_email")
                        .table(Users::Table)
                        .col(Users::Email)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Users {
        Table,
        Id,
        Email,
        PasswordHash,
        Role,
        FirstName,
        LastName,
        Phone,
        Department,
        CreatedAt,
    }
}

mod m20240315_000002_create_motors_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000002_create_motors_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Motors::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Motors::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Motors::Serial)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Motors::Name).string().not_null())
                        .col(ColumnDef::new(Motors::Tag).string().null())
                        .col(ColumnDef::new(Motors::Description).string().null())
                        .col(ColumnDef::new(Motors::Status).string().null())
                        .col(ColumnDef::new(Motors::Location).string().null())
                        .col(ColumnDef::new(Motors::PowerKw).double().null())
                        .col(ColumnDef::new(Motors::Voltage).double().null())
                        .col(ColumnDef::new(Motors::Current).double().null())
                        .col(ColumnDef::new(Motors::Phase).integer().null())
                        .col(ColumnDef::new(Motors::Manufacturer).string().null())
                        .col(ColumnDef::new(Motors::ModelNo).string().null())
                        .col(ColumnDef::new(Motors::Year).integer().null())
                        .col(ColumnDef::new(Motors::Rpm).integer().null())
                        .col(ColumnDef::new(Motors::Protection).string().null())
                        .col(ColumnDef::new(Motors::ConnectionType).string().null())
                        .col(
                            ColumnDef::new(Motors::LastService)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Motors::NextService)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Motors::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Motors::QrCode).string().null())
                        .col(ColumnDef::new(Motors::ImageUrl).string().null())
                        .col(ColumnDef::new(Motors::Notes).string().null())
                        .col(
                            ColumnDef::new(Motors::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_motors_serial")
                        .table(Motors::Table)
                        .col(Motors::Serial)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Motors::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Motors {
        Table,
        Id,
        Serial,
        Name,
        Tag,
        Description,
        Status,
        Location,
        PowerKw,
        Voltage,
        Current,
        Phase,
        Manufacturer,
        ModelNo,
        Year,
        Rpm,
        Protection,
        ConnectionType,
        LastService,
        NextService,
        IsActive,
        QrCode,
        ImageUrl,
        Notes,
        CreatedAt,
    }
}

mod m20240315_000003_create_control_devices_table {
    use sea_orm_migration::prelude::*;

    use super::m20240315_000002_create_motors_table::Motors;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000003_create_control_devices_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ControlDevices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ControlDevices::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ControlDevices::DeviceType)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ControlDevices::Serial).string().not_null())
                        .col(ColumnDef::new(ControlDevices::Brand).string().null())
                        .col(ColumnDef::new(ControlDevices::Model).string().null())
                        .col(ColumnDef::new(ControlDevices::PowerKw).double().not_null())
                        .col(ColumnDef::new(ControlDevices::Voltage).double().not_null())
                        .col(ColumnDef::new(ControlDevices::Status).string().null())
                        .col(
                            ColumnDef::new(ControlDevices::IsSpare)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ControlDevices::ActiveMotorId)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ControlDevices::SpareForMotors)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(ControlDevices::Location).string().null())
                        .col(ColumnDef::new(ControlDevices::Protection).string().null())
                        .col(ColumnDef::new(ControlDevices::CommProtocol).string().null())
                        .col(ColumnDef::new(ControlDevices::ControlType).string().null())
                        .col(ColumnDef::new(ControlDevices::Firmware).string().null())
                        .col(ColumnDef::new(ControlDevices::RampUpTime).integer().null())
                        .col(
                            ColumnDef::new(ControlDevices::RampDownTime)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ControlDevices::BypassContact)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(ControlDevices::Year).integer().null())
                        .col(
                            ColumnDef::new(ControlDevices::LastService)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ControlDevices::NextService)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(ControlDevices::Notes).string().null())
                        .col(ColumnDef::new(ControlDevices::ImageUrl).string().null())
                        .col(ColumnDef::new(ControlDevices::QrCode).string().null())
                        .col(
                            ColumnDef::new(ControlDevices::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_control_devices_active_motor_id")
                                .from(ControlDevices::Table, ControlDevices::ActiveMotorId)
                                .to(Motors::Table, Motors::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::NoAction),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_control_devices_active_motor_id")
                        .table(ControlDevices::Table)
                        .col(ControlDevices::ActiveMotorId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ControlDevices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ControlDevices {
        Table,
        Id,
        DeviceType,
        Serial,
        Brand,
        Model,
        PowerKw,
        Voltage,
        Status,
        IsSpare,
        ActiveMotorId,
        SpareForMotors,
        Location,
        Protection,
        CommProtocol,
        ControlType,
        Firmware,
        RampUpTime,
        RampDownTime,
        BypassContact,
        Year,
        LastService,
        NextService,
        Notes,
        ImageUrl,
        QrCode,
        CreatedAt,
    }
}

mod m20240315_000004_create_fault_types_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000004_create_fault_types_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(FaultTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FaultTypes::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(FaultTypes::Name).string().not_null())
                        .col(
                            ColumnDef::new(FaultTypes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(FaultTypes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum FaultTypes {
        Table,
        Id,
        Name,
        CreatedAt,
    }
}

mod m20240315_000005_create_fault_records_table {
    use sea_orm_migration::prelude::*;

    use super::m20240315_000001_create_users_table::Users;
    use super::m20240315_000002_create_motors_table::Motors;
    use super::m20240315_000004_create_fault_types_table::FaultTypes;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000005_create_fault_records_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(FaultRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FaultRecords::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(FaultRecords::UserId).integer().not_null())
                        .col(ColumnDef::new(FaultRecords::MotorId).integer().not_null())
                        .col(
                            ColumnDef::new(FaultRecords::FaultTypeId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FaultRecords::Description)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(FaultRecords::DurationMin).integer().null())
                        .col(
                            ColumnDef::new(FaultRecords::OccurredAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_fault_records_user_id")
                                .from(FaultRecords::Table, FaultRecords::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::NoAction),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_fault_records_motor_id")
                                .from(FaultRecords::Table, FaultRecords::MotorId)
                                .to(Motors::Table, Motors::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::NoAction),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_fault_records_fault_type_id")
                                .from(FaultRecords::Table, FaultRecords::FaultTypeId)
                                .to(FaultTypes::Table, FaultTypes::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::NoAction),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_fault_records_motor_id")
                        .table(FaultRecords::Table)
                        .col(FaultRecords::MotorId)
                        .to_owned(),
                )
                .await?;

            // Recurrence counting filters on the motor+type pair
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_fault_records_motor_fault_type")
                        .table(FaultRecords::Table)
                        .col(FaultRecords::MotorId)
                        .col(FaultRecords::FaultTypeId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_fault_records_occurred_at")
                        .table(FaultRecords::Table)
                        .col(FaultRecords::OccurredAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(FaultRecords::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum FaultRecords {
        Table,
        Id,
        UserId,
        MotorId,
        FaultTypeId,
        Description,
        DurationMin,
        OccurredAt,
    }
}

mod m20240315_000006_create_production_lines_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000006_create_production_lines_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductionLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductionLines::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionLines::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(ProductionLines::Name).string().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductionLines::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ProductionLines {
        Table,
        Id,
        Code,
        Name,
    }
}

mod m20240315_000007_create_general_fault_tables {
    use sea_orm_migration::prelude::*;

    use super::m20240315_000001_create_users_table::Users;
    use super::m20240315_000006_create_production_lines_table::ProductionLines;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000007_create_general_fault_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(GeneralFaults::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(GeneralFaults::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GeneralFaults::Description)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(GeneralFaults::Location).string().null())
                        .col(
                            ColumnDef::new(GeneralFaults::ProductionImpact)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(GeneralFaults::OccurredAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GeneralFaults::ReportedBy)
                                .integer()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_general_faults_reported_by")
                                .from(GeneralFaults::Table, GeneralFaults::ReportedBy)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::NoAction),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_general_faults_occurred_at")
                        .table(GeneralFaults::Table)
                        .col(GeneralFaults::OccurredAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(GeneralFaultLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(GeneralFaultLines::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GeneralFaultLines::GeneralFaultId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GeneralFaultLines::LineId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GeneralFaultLines::DowntimeMin)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_general_fault_lines_general_fault_id")
                                .from(
                                    GeneralFaultLines::Table,
                                    GeneralFaultLines::GeneralFaultId,
                                )
                                .to(GeneralFaults::Table, GeneralFaults::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::NoAction),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_general_fault_lines_line_id")
                                .from(GeneralFaultLines::Table, GeneralFaultLines::LineId)
                                .to(ProductionLines::Table, ProductionLines::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::NoAction),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_general_fault_lines_general_fault_id")
                        .table(GeneralFaultLines::Table)
                        .col(GeneralFaultLines::GeneralFaultId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(FaultFiles::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FaultFiles::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FaultFiles::GeneralFaultId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(FaultFiles::Url).string().not_null())
                        .col(ColumnDef::new(FaultFiles::FileName).string().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_fault_files_general_fault_id")
                                .from(FaultFiles::Table, FaultFiles::GeneralFaultId)
                                .to(GeneralFaults::Table, GeneralFaults::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::NoAction),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(FaultFiles::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(GeneralFaultLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(GeneralFaults::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum GeneralFaults {
        Table,
        Id,
        Description,
        Location,
        ProductionImpact,
        OccurredAt,
        ReportedBy,
    }

    #[derive(DeriveIden)]
    pub(super) enum GeneralFaultLines {
        Table,
        Id,
        GeneralFaultId,
        LineId,
        DowntimeMin,
    }

    #[derive(DeriveIden)]
    pub(super) enum FaultFiles {
        Table,
        Id,
        GeneralFaultId,
        Url,
        FileName,
    }
}

mod m20240315_000008_create_stock_tables {
    use sea_orm_migration::prelude::*;

    use super::m20240315_000001_create_users_table::Users;
    use super::m20240315_000005_create_fault_records_table::FaultRecords;
    use super::m20240315_000007_create_general_fault_tables::GeneralFaults;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000008_create_stock_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Stocks::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Stocks::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Stocks::Name).string().not_null())
                        .col(ColumnDef::new(Stocks::Description).string().null())
                        .col(
                            ColumnDef::new(Stocks::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Stocks::Unit).string().null())
                        .col(
                            ColumnDef::new(Stocks::CriticalLevel)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Stocks::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StockUsages::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockUsages::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockUsages::StockId).integer().not_null())
                        .col(ColumnDef::new(StockUsages::Amount).integer().not_null())
                        .col(
                            ColumnDef::new(StockUsages::UsedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockUsages::GeneralFaultId)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockUsages::FaultRecordId)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(StockUsages::UserId).integer().null())
                        .col(ColumnDef::new(StockUsages::Note).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_usages_stock_id")
                                .from(StockUsages::Table, StockUsages::StockId)
                                .to(Stocks::Table, Stocks::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::NoAction),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_usages_general_fault_id")
                                .from(StockUsages::Table, StockUsages::GeneralFaultId)
                                .to(GeneralFaults::Table, GeneralFaults::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::NoAction),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_usages_fault_record_id")
                                .from(StockUsages::Table, StockUsages::FaultRecordId)
                                .to(FaultRecords::Table, FaultRecords::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::NoAction),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_usages_user_id")
                                .from(StockUsages::Table, StockUsages::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::NoAction),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_usages_stock_id")
                        .table(StockUsages::Table)
                        .col(StockUsages::StockId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_usages_used_at")
                        .table(StockUsages::Table)
                        .col(StockUsages::UsedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockUsages::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Stocks::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Stocks {
        Table,
        Id,
        Name,
        Description,
        Quantity,
        Unit,
        CriticalLevel,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum StockUsages {
        Table,
        Id,
        StockId,
        Amount,
        UsedAt,
        GeneralFaultId,
        FaultRecordId,
        UserId,
        Note,
    }
}

mod m20240315_000009_create_production_stops_table {
    use sea_orm_migration::prelude::*;

    use super::m20240315_000001_create_users_table::Users;
    use super::m20240315_000007_create_general_fault_tables::GeneralFaults;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000009_create_production_stops_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductionStops::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductionStops::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductionStops::Line).string().not_null())
                        .col(
                            ColumnDef::new(ProductionStops::StartedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionStops::EndedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionStops::DurationMin)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductionStops::Reason).string().null())
                        .col(
                            ColumnDef::new(ProductionStops::GeneralFaultId)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(ProductionStops::CreatedBy).integer().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_production_stops_general_fault_id")
                                .from(ProductionStops::Table, ProductionStops::GeneralFaultId)
                                .to(GeneralFaults::Table, GeneralFaults::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::NoAction),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_production_stops_created_by")
                                .from(ProductionStops::Table, ProductionStops::CreatedBy)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::NoAction),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_production_stops_started_at")
                        .table(ProductionStops::Table)
                        .col(ProductionStops::StartedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductionStops::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ProductionStops {
        Table,
        Id,
        Line,
        StartedAt,
        EndedAt,
        DurationMin,
        Reason,
        GeneralFaultId,
        CreatedBy,
    }
}

mod m20240315_000010_create_announcements_table {
    use sea_orm_migration::prelude::*;

    use super::m20240315_000001_create_users_table::Users;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000010_create_announcements_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Announcements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Announcements::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Announcements::Title).string().not_null())
                        .col(ColumnDef::new(Announcements::Body).string().not_null())
                        .col(
                            ColumnDef::new(Announcements::PostedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Announcements::CreatedBy)
                                .integer()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_announcements_created_by")
                                .from(Announcements::Table, Announcements::CreatedBy)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::NoAction),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Announcements::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Announcements {
        Table,
        Id,
        Title,
        Body,
        PostedAt,
        CreatedBy,
    }
}

mod m20240315_000011_create_action_logs_table {
    use sea_orm_migration::prelude::*;

    use super::m20240315_000001_create_users_table::Users;
    use super::m20240315_000007_create_general_fault_tables::GeneralFaults;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000011_create_action_logs_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ActionLogs::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ActionLogs::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ActionLogs::UserId).integer().not_null())
                        .col(ColumnDef::new(ActionLogs::Action).string().not_null())
                        .col(ColumnDef::new(ActionLogs::Description).string().null())
                        .col(
                            ColumnDef::new(ActionLogs::GeneralFaultId)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ActionLogs::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_action_logs_user_id")
                                .from(ActionLogs::Table, ActionLogs::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::NoAction),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_action_logs_general_fault_id")
                                .from(ActionLogs::Table, ActionLogs::GeneralFaultId)
                                .to(GeneralFaults::Table, GeneralFaults::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::NoAction),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_action_logs_created_at")
                        .table(ActionLogs::Table)
                        .col(ActionLogs::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ActionLogs::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ActionLogs {
        Table,
        Id,
        UserId,
        Action,
        Description,
        GeneralFaultId,
        CreatedAt,
    }
}
