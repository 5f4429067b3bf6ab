//! Initial schema migration - creates all tables from scratch.
//!
//! Tables:
//!
//! - `cash_boxes`: period-scoped petty-cash ledgers ("cajas")
//! - `entries`: dated credit/debit movements posted against a cash box
//! - `expenses`: fixed/recurring and variable/one-off expenses
//! - `incomes`: receivables with payment method and collection state
//!
//! Amounts are stored as integer cents of the base currency; exchange rates
//! are stored as text because sqlite has no native decimal type.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum CashBoxes {
    Table,
    Id,
    Name,
    Description,
    Month,
    Year,
    InitialBalanceCents,
    CurrentBalanceCents,
    State,
    OpenedAt,
    ClosedAt,
    CreatedBy,
    ClosedBy,
    UpdatedAt,
    UpdatedBy,
}

#[derive(Iden)]
enum Entries {
    Table,
    Id,
    CashBoxId,
    Direction,
    Category,
    Description,
    AmountCents,
    ValueDate,
    DocumentKind,
    DocumentNumber,
    Attachment,
    State,
    CreatedAt,
    CreatedBy,
    UpdatedAt,
    UpdatedBy,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    Kind,
    Name,
    Description,
    Category,
    Currency,
    AmountCents,
    OriginalAmountCents,
    ExchangeRate,
    ValueDate,
    Month,
    Year,
    DueDay,
    Recurring,
    Active,
    CashBoxId,
    DocumentKind,
    DocumentNumber,
    Vendor,
    State,
    PaidAt,
    CreatedAt,
    CreatedBy,
    UpdatedAt,
    UpdatedBy,
}

#[derive(Iden)]
enum Incomes {
    Table,
    Id,
    Concept,
    Description,
    Category,
    AmountCents,
    ValueDate,
    ClientId,
    ClientName,
    PaymentMethod,
    PaymentReference,
    DocumentKind,
    DocumentNumber,
    State,
    CollectedAt,
    CreatedAt,
    CreatedBy,
    UpdatedAt,
    UpdatedBy,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Cash boxes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CashBoxes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashBoxes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CashBoxes::Name).string().not_null())
                    .col(ColumnDef::new(CashBoxes::Description).string())
                    .col(ColumnDef::new(CashBoxes::Month).small_integer().not_null())
                    .col(ColumnDef::new(CashBoxes::Year).integer().not_null())
                    .col(
                        ColumnDef::new(CashBoxes::InitialBalanceCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CashBoxes::CurrentBalanceCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CashBoxes::State)
                            .string()
                            .not_null()
                            .default("abierta"),
                    )
                    .col(
                        ColumnDef::new(CashBoxes::OpenedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CashBoxes::ClosedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CashBoxes::CreatedBy).string().not_null())
                    .col(ColumnDef::new(CashBoxes::ClosedBy).string())
                    .col(ColumnDef::new(CashBoxes::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CashBoxes::UpdatedBy).string())
                    .to_owned(),
            )
            .await?;

        // One box per name per period.
        manager
            .create_index(
                Index::create()
                    .name("idx_cash_boxes_name_period")
                    .table(CashBoxes::Table)
                    .col(CashBoxes::Name)
                    .col(CashBoxes::Month)
                    .col(CashBoxes::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Entries
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Entries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Entries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Entries::CashBoxId).string().not_null())
                    .col(ColumnDef::new(Entries::Direction).string().not_null())
                    .col(ColumnDef::new(Entries::Category).string().not_null())
                    .col(ColumnDef::new(Entries::Description).string().not_null())
                    .col(ColumnDef::new(Entries::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(Entries::ValueDate).date().not_null())
                    .col(
                        ColumnDef::new(Entries::DocumentKind)
                            .string()
                            .not_null()
                            .default("comprobante"),
                    )
                    .col(ColumnDef::new(Entries::DocumentNumber).string())
                    .col(ColumnDef::new(Entries::Attachment).string())
                    .col(
                        ColumnDef::new(Entries::State)
                            .string()
                            .not_null()
                            .default("registrado"),
                    )
                    .col(
                        ColumnDef::new(Entries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Entries::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Entries::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Entries::UpdatedBy).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entries_cash_box")
                            .from(Entries::Table, Entries::CashBoxId)
                            .to(CashBoxes::Table, CashBoxes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_entries_cash_box")
                    .table(Entries::Table)
                    .col(Entries::CashBoxId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::Kind).string().not_null())
                    .col(ColumnDef::new(Expenses::Name).string().not_null())
                    .col(ColumnDef::new(Expenses::Description).string())
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::Currency)
                            .string()
                            .not_null()
                            .default("PEN"),
                    )
                    .col(
                        ColumnDef::new(Expenses::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::OriginalAmountCents).big_integer())
                    .col(ColumnDef::new(Expenses::ExchangeRate).string())
                    .col(ColumnDef::new(Expenses::ValueDate).date().not_null())
                    .col(ColumnDef::new(Expenses::Month).small_integer().not_null())
                    .col(ColumnDef::new(Expenses::Year).integer().not_null())
                    .col(ColumnDef::new(Expenses::DueDay).small_integer())
                    .col(
                        ColumnDef::new(Expenses::Recurring)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Expenses::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Expenses::CashBoxId).string())
                    .col(ColumnDef::new(Expenses::DocumentKind).string())
                    .col(ColumnDef::new(Expenses::DocumentNumber).string())
                    .col(ColumnDef::new(Expenses::Vendor).string())
                    .col(
                        ColumnDef::new(Expenses::State)
                            .string()
                            .not_null()
                            .default("pendiente"),
                    )
                    .col(ColumnDef::new(Expenses::PaidAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Expenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Expenses::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Expenses::UpdatedBy).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_expenses_period")
                    .table(Expenses::Table)
                    .col(Expenses::Year)
                    .col(Expenses::Month)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Incomes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Incomes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Incomes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Incomes::Concept).string().not_null())
                    .col(ColumnDef::new(Incomes::Description).string())
                    .col(ColumnDef::new(Incomes::Category).string().not_null())
                    .col(
                        ColumnDef::new(Incomes::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Incomes::ValueDate).date().not_null())
                    .col(ColumnDef::new(Incomes::ClientId).string())
                    .col(ColumnDef::new(Incomes::ClientName).string())
                    .col(
                        ColumnDef::new(Incomes::PaymentMethod)
                            .string()
                            .not_null()
                            .default("efectivo"),
                    )
                    .col(ColumnDef::new(Incomes::PaymentReference).string())
                    .col(ColumnDef::new(Incomes::DocumentKind).string())
                    .col(ColumnDef::new(Incomes::DocumentNumber).string())
                    .col(
                        ColumnDef::new(Incomes::State)
                            .string()
                            .not_null()
                            .default("pendiente"),
                    )
                    .col(ColumnDef::new(Incomes::CollectedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Incomes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Incomes::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Incomes::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Incomes::UpdatedBy).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incomes_value_date")
                    .table(Incomes::Table)
                    .col(Incomes::ValueDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Incomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Entries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CashBoxes::Table).to_owned())
            .await?;
        Ok(())
    }
}
