use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::FirstName).string_len(50).not_null())
                    .col(ColumnDef::new(Users::LastName).string_len(50).not_null())
                    .col(ColumnDef::new(Users::Email).string_len(100).not_null().unique_key())
                    .col(ColumnDef::new(Users::Phone).string_len(15).not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::AgreeToTerms).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::SubscribeNewsletter).boolean().not_null().default(true))
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Users::RegistrationTime).big_integer().not_null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer())
                    .to_owned(),
            )
            .await?;

        // Create admins table
        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Admins::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Admins::Username).string_len(50).not_null().unique_key())
                    .col(ColumnDef::new(Admins::Email).string_len(100).unique_key())
                    .col(ColumnDef::new(Admins::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Admins::Role).string_len(20).not_null())
                    .col(ColumnDef::new(Admins::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Admins::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Admins::LastLogin).big_integer())
                    .to_owned(),
            )
            .await?;

        // Create health_assessment_forms table
        manager
            .create_table(
                Table::create()
                    .table(HealthAssessmentForms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HealthAssessmentForms::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HealthAssessmentForms::FormId)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(HealthAssessmentForms::UserId).integer().not_null())
                    .col(ColumnDef::new(HealthAssessmentForms::FullName).string_len(100).not_null())
                    .col(ColumnDef::new(HealthAssessmentForms::FatherMotherName).string_len(100).not_null())
                    .col(ColumnDef::new(HealthAssessmentForms::Age).integer().not_null())
                    .col(ColumnDef::new(HealthAssessmentForms::Gender).string_len(20).not_null())
                    .col(ColumnDef::new(HealthAssessmentForms::Contact).string_len(15).not_null())
                    .col(ColumnDef::new(HealthAssessmentForms::CompleteAddress).text().not_null())
                    .col(ColumnDef::new(HealthAssessmentForms::MedicalSystem).string_len(20).not_null())
                    .col(ColumnDef::new(HealthAssessmentForms::PrimaryIssue).text().not_null())
                    .col(ColumnDef::new(HealthAssessmentForms::Symptoms).text())
                    .col(
                        ColumnDef::new(HealthAssessmentForms::Status)
                            .string_len(30)
                            .not_null()
                            .default("submitted"),
                    )
                    .col(ColumnDef::new(HealthAssessmentForms::AdminNotes).text())
                    .col(ColumnDef::new(HealthAssessmentForms::AssignedDoctorId).integer())
                    .col(ColumnDef::new(HealthAssessmentForms::ConsultationDate).big_integer())
                    .col(ColumnDef::new(HealthAssessmentForms::SubmittedAt).big_integer().not_null())
                    .col(ColumnDef::new(HealthAssessmentForms::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_health_forms_user_id")
                            .from(HealthAssessmentForms::Table, HealthAssessmentForms::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Indexes for the lookup patterns the admin and citizen routes use
        manager
            .create_index(
                Index::create()
                    .name("idx_health_forms_user_id")
                    .table(HealthAssessmentForms::Table)
                    .col(HealthAssessmentForms::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_health_forms_status")
                    .table(HealthAssessmentForms::Table)
                    .col(HealthAssessmentForms::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_health_forms_submitted_at")
                    .table(HealthAssessmentForms::Table)
                    .col(HealthAssessmentForms::SubmittedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HealthAssessmentForms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    PasswordHash,
    AgreeToTerms,
    SubscribeNewsletter,
    IsActive,
    RegistrationTime,
    LastLogin,
}

#[derive(DeriveIden)]
enum Admins {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    IsActive,
    CreatedAt,
    LastLogin,
}

#[derive(DeriveIden)]
enum HealthAssessmentForms {
    Table,
    Id,
    FormId,
    UserId,
    FullName,
    FatherMotherName,
    Age,
    Gender,
    Contact,
    CompleteAddress,
    MedicalSystem,
    PrimaryIssue,
    Symptoms,
    Status,
    AdminNotes,
    AssignedDoctorId,
    ConsultationDate,
    SubmittedAt,
    UpdatedAt,
}
