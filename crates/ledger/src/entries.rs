//! Ledger entries ("movimientos"): dated credits and debits posted against a
//! cash box.
//!
//! Amounts are non-negative; the direction alone carries the sign semantics
//! used when recomputing a box balance. Only `Recorded` and `Approved`
//! entries count toward the balance; `Rejected` and `Voided` are kept for
//! audit but excluded.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, Money, util};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "ingreso",
            Self::Debit => "egreso",
        }
    }
}

impl TryFrom<&str> for Direction {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "ingreso" => Ok(Self::Credit),
            "egreso" => Ok(Self::Debit),
            other => Err(LedgerError::Validation(format!(
                "invalid direction: {other}"
            ))),
        }
    }
}

/// Kind of supporting document attached to an entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Invoice,
    Receipt,
    /// Generic voucher; the default when the form leaves the kind blank.
    #[default]
    Voucher,
    Stub,
    Other,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "factura",
            Self::Receipt => "recibo",
            Self::Voucher => "comprobante",
            Self::Stub => "talon",
            Self::Other => "otro",
        }
    }
}

impl TryFrom<&str> for DocumentKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "factura" => Ok(Self::Invoice),
            "recibo" => Ok(Self::Receipt),
            "comprobante" => Ok(Self::Voucher),
            "talon" => Ok(Self::Stub),
            "otro" => Ok(Self::Other),
            other => Err(LedgerError::Validation(format!(
                "invalid document kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    #[default]
    Recorded,
    Approved,
    Rejected,
    Voided,
}

impl EntryState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recorded => "registrado",
            Self::Approved => "aprobado",
            Self::Rejected => "rechazado",
            Self::Voided => "anulado",
        }
    }

    /// Whether an entry in this state participates in balance recomputation.
    #[must_use]
    pub fn counts_toward_balance(self) -> bool {
        matches!(self, Self::Recorded | Self::Approved)
    }
}

impl TryFrom<&str> for EntryState {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "registrado" => Ok(Self::Recorded),
            "aprobado" => Ok(Self::Approved),
            "rechazado" => Ok(Self::Rejected),
            "anulado" => Ok(Self::Voided),
            other => Err(LedgerError::Validation(format!(
                "invalid entry state: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub cash_box_id: Uuid,
    pub direction: Direction,
    pub category: String,
    pub description: String,
    pub amount: Money,
    pub value_date: NaiveDate,
    pub document_kind: DocumentKind,
    pub document_number: Option<String>,
    pub attachment: Option<String>,
    pub state: EntryState,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

/// Input for posting an entry against a cash box.
///
/// The direction is optional here because it mirrors a form field; `create`
/// rejects a missing direction before anything is written.
#[derive(Clone, Debug, Default)]
pub struct NewEntry {
    pub direction: Option<Direction>,
    pub category: String,
    pub description: String,
    pub amount: Money,
    /// Defaults to today when omitted.
    pub value_date: Option<NaiveDate>,
    /// Defaults to [`DocumentKind::Voucher`] when omitted.
    pub document_kind: Option<DocumentKind>,
    pub document_number: Option<String>,
    pub attachment: Option<String>,
    pub created_by: String,
}

/// Partial update for an entry. Absent fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct EntryUpdate {
    pub direction: Option<Direction>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub value_date: Option<NaiveDate>,
    pub document_kind: Option<DocumentKind>,
    pub document_number: Option<String>,
    pub attachment: Option<String>,
    pub state: Option<EntryState>,
    pub updated_by: Option<String>,
}

/// Listing filter; absent fields impose no constraint.
#[derive(Clone, Debug, Default)]
pub struct EntryQuery {
    pub direction: Option<Direction>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub cash_box_id: String,
    pub direction: String,
    pub category: String,
    pub description: String,
    pub amount_cents: i64,
    pub value_date: Date,
    pub document_kind: String,
    pub document_number: Option<String>,
    pub attachment: Option<String>,
    pub state: String,
    pub created_at: DateTimeUtc,
    pub created_by: String,
    pub updated_at: Option<DateTimeUtc>,
    pub updated_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cash_boxes::Entity",
        from = "Column::CashBoxId",
        to = "super::cash_boxes::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    CashBoxes,
}

impl Related<super::cash_boxes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashBoxes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Entry> for ActiveModel {
    fn from(entry: &Entry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            cash_box_id: ActiveValue::Set(entry.cash_box_id.to_string()),
            direction: ActiveValue::Set(entry.direction.as_str().to_string()),
            category: ActiveValue::Set(entry.category.clone()),
            description: ActiveValue::Set(entry.description.clone()),
            amount_cents: ActiveValue::Set(entry.amount.cents()),
            value_date: ActiveValue::Set(entry.value_date),
            document_kind: ActiveValue::Set(entry.document_kind.as_str().to_string()),
            document_number: ActiveValue::Set(entry.document_number.clone()),
            attachment: ActiveValue::Set(entry.attachment.clone()),
            state: ActiveValue::Set(entry.state.as_str().to_string()),
            created_at: ActiveValue::Set(entry.created_at),
            created_by: ActiveValue::Set(entry.created_by.clone()),
            updated_at: ActiveValue::Set(entry.updated_at),
            updated_by: ActiveValue::Set(entry.updated_by.clone()),
        }
    }
}

impl TryFrom<Model> for Entry {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: util::parse_uuid(&model.id, "entry")?,
            cash_box_id: util::parse_uuid(&model.cash_box_id, "cash box")?,
            direction: Direction::try_from(model.direction.as_str())?,
            category: model.category,
            description: model.description,
            amount: Money::new(model.amount_cents),
            value_date: model.value_date,
            document_kind: DocumentKind::try_from(model.document_kind.as_str())?,
            document_number: model.document_number,
            attachment: model.attachment,
            state: EntryState::try_from(model.state.as_str())?,
            created_at: model.created_at,
            created_by: model.created_by,
            updated_at: model.updated_at,
            updated_by: model.updated_by,
        })
    }
}
