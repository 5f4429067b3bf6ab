//! Cash boxes ("cajas"): period-scoped petty-cash ledgers.
//!
//! A cash box owns dated credit/debit entries and an initial balance. Its
//! current balance is derived, never authoritative: it is recomputed from the
//! entries after every mutation (see [`Ledger::recompute`](crate::Ledger)).
//!
//! Lifecycle: created `Open`; entries and the initial balance are mutable only
//! while open; `Closed` is irreversible through this core; `UnderCount` marks
//! a box that is being counted ("arqueo").

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, Money, ResultLedger, util};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashBoxState {
    #[default]
    Open,
    Closed,
    UnderCount,
}

impl CashBoxState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "abierta",
            Self::Closed => "cerrada",
            Self::UnderCount => "en_arqueo",
        }
    }
}

impl TryFrom<&str> for CashBoxState {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "abierta" => Ok(Self::Open),
            "cerrada" => Ok(Self::Closed),
            "en_arqueo" => Ok(Self::UnderCount),
            other => Err(LedgerError::Validation(format!(
                "invalid cash box state: {other}"
            ))),
        }
    }
}

/// A petty-cash box scoped to one `(month, year)` period.
///
/// `(name, month, year)` is unique across the ledger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CashBox {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub month: u8,
    pub year: i32,
    pub initial_balance: Money,
    /// Derived: `initial_balance + Σcredits − Σdebits` over counted entries.
    pub current_balance: Money,
    pub state: CashBoxState,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub closed_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl CashBox {
    pub fn new(
        name: String,
        description: Option<String>,
        month: u8,
        year: i32,
        initial_balance: Money,
        created_by: String,
        opened_at: DateTime<Utc>,
    ) -> ResultLedger<Self> {
        if name.trim().is_empty() {
            return Err(LedgerError::Validation(
                "cash box name is required".to_string(),
            ));
        }
        util::validate_period(month, year)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description,
            month,
            year,
            initial_balance,
            current_balance: initial_balance,
            state: CashBoxState::Open,
            opened_at,
            closed_at: None,
            created_by,
            closed_by: None,
            updated_at: None,
            updated_by: None,
        })
    }

    /// Returns `true` while entries and the initial balance may be mutated.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == CashBoxState::Open
    }
}

/// Input for creating a cash box.
#[derive(Clone, Debug, Default)]
pub struct NewCashBox {
    pub name: String,
    pub description: Option<String>,
    pub month: u8,
    pub year: i32,
    /// Defaults to 0 when omitted.
    pub initial_balance: Option<Money>,
    pub created_by: String,
}

/// Partial update for an open cash box. Absent fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct CashBoxUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub initial_balance: Option<Money>,
    pub updated_by: Option<String>,
}

/// Listing filter; absent fields impose no constraint.
#[derive(Clone, Debug, Default)]
pub struct CashBoxFilter {
    pub month: Option<u8>,
    pub year: Option<i32>,
    pub state: Option<CashBoxState>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cash_boxes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub month: i16,
    pub year: i32,
    pub initial_balance_cents: i64,
    pub current_balance_cents: i64,
    pub state: String,
    pub opened_at: DateTimeUtc,
    pub closed_at: Option<DateTimeUtc>,
    pub created_by: String,
    pub closed_by: Option<String>,
    pub updated_at: Option<DateTimeUtc>,
    pub updated_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::entries::Entity")]
    Entries,
}

impl Related<super::entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CashBox> for ActiveModel {
    fn from(value: &CashBox) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            month: ActiveValue::Set(i16::from(value.month)),
            year: ActiveValue::Set(value.year),
            initial_balance_cents: ActiveValue::Set(value.initial_balance.cents()),
            current_balance_cents: ActiveValue::Set(value.current_balance.cents()),
            state: ActiveValue::Set(value.state.as_str().to_string()),
            opened_at: ActiveValue::Set(value.opened_at),
            closed_at: ActiveValue::Set(value.closed_at),
            created_by: ActiveValue::Set(value.created_by.clone()),
            closed_by: ActiveValue::Set(value.closed_by.clone()),
            updated_at: ActiveValue::Set(value.updated_at),
            updated_by: ActiveValue::Set(value.updated_by.clone()),
        }
    }
}

impl TryFrom<Model> for CashBox {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: util::parse_uuid(&model.id, "cash box")?,
            name: model.name,
            description: model.description,
            month: u8::try_from(model.month)
                .map_err(|_| LedgerError::Validation(format!("invalid month: {}", model.month)))?,
            year: model.year,
            initial_balance: Money::new(model.initial_balance_cents),
            current_balance: Money::new(model.current_balance_cents),
            state: CashBoxState::try_from(model.state.as_str())?,
            opened_at: model.opened_at,
            closed_at: model.closed_at,
            created_by: model.created_by,
            closed_by: model.closed_by,
            updated_at: model.updated_at,
            updated_by: model.updated_by,
        })
    }
}
