//! Expenses ("gastos"), fixed/recurring or variable/one-off.
//!
//! Every expense stores an authoritative amount in base currency. When the
//! expense was entered in a foreign currency the original amount and the
//! exchange rate used are retained for traceability; the base amount is
//! `round(original × rate, 2)` computed through the single normalization
//! boundary in [`currency`](crate::currency).
//!
//! `Overdue` is an explicit but ungoverned state: nothing in the core flips a
//! pending expense to overdue automatically. [`Expense::effective_state`]
//! derives it at read time from "pending and the due date has passed".

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, LedgerError, Money, ResultLedger, entries::DocumentKind, util};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    Fixed,
    Variable,
}

impl ExpenseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fijo",
            Self::Variable => "variable",
        }
    }
}

impl TryFrom<&str> for ExpenseKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "fijo" => Ok(Self::Fixed),
            "variable" => Ok(Self::Variable),
            other => Err(LedgerError::Validation(format!(
                "invalid expense kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseState {
    #[default]
    Pending,
    Paid,
    Overdue,
    Voided,
}

impl ExpenseState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::Paid => "pagado",
            Self::Overdue => "vencido",
            Self::Voided => "anulado",
        }
    }

    /// Whether the expense still awaits payment (pending or overdue).
    #[must_use]
    pub fn is_unpaid(self) -> bool {
        matches!(self, Self::Pending | Self::Overdue)
    }
}

impl TryFrom<&str> for ExpenseState {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pendiente" => Ok(Self::Pending),
            "pagado" => Ok(Self::Paid),
            "vencido" => Ok(Self::Overdue),
            "anulado" => Ok(Self::Voided),
            other => Err(LedgerError::Validation(format!(
                "invalid expense state: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub kind: ExpenseKind,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub currency: Currency,
    /// Authoritative amount in base currency; always populated.
    pub amount: Money,
    /// Original foreign amount, retained when `currency` is foreign.
    pub original_amount: Option<Money>,
    /// Exchange rate used to compute `amount`, retained when foreign.
    pub exchange_rate: Option<Decimal>,
    pub value_date: NaiveDate,
    /// Derived from `value_date`; re-derived whenever the date is edited.
    pub month: u8,
    pub year: i32,
    /// Day of month (1-31) a fixed expense falls due.
    pub due_day: Option<u8>,
    pub recurring: bool,
    /// Fixed expenses only: include in monthly totals and projections.
    /// This is not a payment state.
    pub active: bool,
    pub cash_box_id: Option<Uuid>,
    pub document_kind: Option<DocumentKind>,
    pub document_number: Option<String>,
    pub vendor: Option<String>,
    pub state: ExpenseState,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl Expense {
    /// Date this expense falls due.
    ///
    /// Fixed expenses use `due_day` within their period, clamped to the last
    /// day of the month; variable expenses fall due on their value date.
    #[must_use]
    pub fn due_date(&self) -> NaiveDate {
        match (self.kind, self.due_day) {
            (ExpenseKind::Fixed, Some(day)) => {
                let mut day = u32::from(day);
                loop {
                    if let Some(date) =
                        NaiveDate::from_ymd_opt(self.year, u32::from(self.month), day)
                    {
                        return date;
                    }
                    day -= 1;
                }
            }
            _ => self.value_date,
        }
    }

    /// Read-time classification: a pending expense whose due date has passed
    /// reads as overdue without any stored transition.
    #[must_use]
    pub fn effective_state(&self, today: NaiveDate) -> ExpenseState {
        if self.state == ExpenseState::Pending && self.due_date() < today {
            return ExpenseState::Overdue;
        }
        self.state
    }
}

/// Input for creating an expense. The amount is entered in `currency`; the
/// core normalizes it to base cents before storage.
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub kind: ExpenseKind,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub currency: Currency,
    pub amount: Decimal,
    pub exchange_rate: Option<Decimal>,
    /// Defaults to today when omitted.
    pub value_date: Option<NaiveDate>,
    pub due_day: Option<u8>,
    pub recurring: bool,
    pub active: bool,
    pub cash_box_id: Option<Uuid>,
    pub document_kind: Option<DocumentKind>,
    pub document_number: Option<String>,
    pub vendor: Option<String>,
    pub created_by: String,
}

impl Default for NewExpense {
    fn default() -> Self {
        Self {
            kind: ExpenseKind::Variable,
            name: String::new(),
            description: None,
            category: String::new(),
            currency: Currency::Pen,
            amount: Decimal::ZERO,
            exchange_rate: None,
            value_date: None,
            due_day: None,
            recurring: false,
            active: true,
            cash_box_id: None,
            document_kind: None,
            document_number: None,
            vendor: None,
            created_by: String::new(),
        }
    }
}

/// Partial update for an expense. Absent fields are left untouched. Editing
/// any of amount/currency/rate re-runs normalization; editing the value date
/// re-derives month/year.
#[derive(Clone, Debug, Default)]
pub struct ExpenseUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub currency: Option<Currency>,
    pub amount: Option<Decimal>,
    pub exchange_rate: Option<Decimal>,
    pub value_date: Option<NaiveDate>,
    pub due_day: Option<u8>,
    pub recurring: Option<bool>,
    pub active: Option<bool>,
    pub cash_box_id: Option<Uuid>,
    pub document_kind: Option<DocumentKind>,
    pub document_number: Option<String>,
    pub vendor: Option<String>,
    /// Direct state edits are allowed (including `Overdue`); `mark_paid` is
    /// the only guarded transition.
    pub state: Option<ExpenseState>,
    pub updated_by: Option<String>,
}

/// Listing filter; absent fields impose no constraint.
#[derive(Clone, Debug, Default)]
pub struct ExpenseFilter {
    pub kind: Option<ExpenseKind>,
    pub month: Option<u8>,
    pub year: Option<i32>,
    pub state: Option<ExpenseState>,
    pub category: Option<String>,
    /// Restrict to fixed expenses flagged `active` (variable expenses are
    /// unaffected by the flag and always pass).
    pub active_only: bool,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub currency: String,
    pub amount_cents: i64,
    pub original_amount_cents: Option<i64>,
    /// Decimal stored as text; sqlite has no native decimal type.
    pub exchange_rate: Option<String>,
    pub value_date: Date,
    pub month: i16,
    pub year: i32,
    pub due_day: Option<i16>,
    pub recurring: bool,
    pub active: bool,
    pub cash_box_id: Option<String>,
    pub document_kind: Option<String>,
    pub document_number: Option<String>,
    pub vendor: Option<String>,
    pub state: String,
    pub paid_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub created_by: String,
    pub updated_at: Option<DateTimeUtc>,
    pub updated_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            kind: ActiveValue::Set(expense.kind.as_str().to_string()),
            name: ActiveValue::Set(expense.name.clone()),
            description: ActiveValue::Set(expense.description.clone()),
            category: ActiveValue::Set(expense.category.clone()),
            currency: ActiveValue::Set(expense.currency.code().to_string()),
            amount_cents: ActiveValue::Set(expense.amount.cents()),
            original_amount_cents: ActiveValue::Set(expense.original_amount.map(Money::cents)),
            exchange_rate: ActiveValue::Set(expense.exchange_rate.map(|r| r.to_string())),
            value_date: ActiveValue::Set(expense.value_date),
            month: ActiveValue::Set(i16::from(expense.month)),
            year: ActiveValue::Set(expense.year),
            due_day: ActiveValue::Set(expense.due_day.map(i16::from)),
            recurring: ActiveValue::Set(expense.recurring),
            active: ActiveValue::Set(expense.active),
            cash_box_id: ActiveValue::Set(expense.cash_box_id.map(|id| id.to_string())),
            document_kind: ActiveValue::Set(
                expense.document_kind.map(|k| k.as_str().to_string()),
            ),
            document_number: ActiveValue::Set(expense.document_number.clone()),
            vendor: ActiveValue::Set(expense.vendor.clone()),
            state: ActiveValue::Set(expense.state.as_str().to_string()),
            paid_at: ActiveValue::Set(expense.paid_at),
            created_at: ActiveValue::Set(expense.created_at),
            created_by: ActiveValue::Set(expense.created_by.clone()),
            updated_at: ActiveValue::Set(expense.updated_at),
            updated_by: ActiveValue::Set(expense.updated_by.clone()),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let exchange_rate = model
            .exchange_rate
            .as_deref()
            .map(|raw| {
                Decimal::from_str(raw).map_err(|_| {
                    LedgerError::Validation(format!("invalid exchange rate: {raw}"))
                })
            })
            .transpose()?;

        Ok(Self {
            id: util::parse_uuid(&model.id, "expense")?,
            kind: ExpenseKind::try_from(model.kind.as_str())?,
            name: model.name,
            description: model.description,
            category: model.category,
            currency: Currency::try_from(model.currency.as_str())?,
            amount: Money::new(model.amount_cents),
            original_amount: model.original_amount_cents.map(Money::new),
            exchange_rate,
            value_date: model.value_date,
            month: u8::try_from(model.month)
                .map_err(|_| LedgerError::Validation(format!("invalid month: {}", model.month)))?,
            year: model.year,
            due_day: model
                .due_day
                .map(|day| {
                    u8::try_from(day)
                        .map_err(|_| LedgerError::Validation(format!("invalid due day: {day}")))
                })
                .transpose()?,
            recurring: model.recurring,
            active: model.active,
            cash_box_id: model
                .cash_box_id
                .as_deref()
                .map(|id| util::parse_uuid(id, "cash box"))
                .transpose()?,
            document_kind: model
                .document_kind
                .as_deref()
                .map(DocumentKind::try_from)
                .transpose()?,
            document_number: model.document_number,
            vendor: model.vendor,
            state: ExpenseState::try_from(model.state.as_str())?,
            paid_at: model.paid_at,
            created_at: model.created_at,
            created_by: model.created_by,
            updated_at: model.updated_at,
            updated_by: model.updated_by,
        })
    }
}

/// Validate the fields that depend on the expense kind.
pub(crate) fn validate_kind_fields(kind: ExpenseKind, due_day: Option<u8>) -> ResultLedger<()> {
    match kind {
        ExpenseKind::Fixed => match due_day {
            Some(day) if (1..=31).contains(&day) => Ok(()),
            Some(day) => Err(LedgerError::Validation(format!("invalid due day: {day}"))),
            None => Err(LedgerError::Validation(
                "fixed expenses require a due day".to_string(),
            )),
        },
        ExpenseKind::Variable => Ok(()),
    }
}
