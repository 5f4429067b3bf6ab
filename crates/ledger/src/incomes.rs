//! Incomes ("ingresos"): receivable or received amounts independent of cash
//! boxes, with a payment method and a collection state.
//!
//! Incomes are base currency only; there is no foreign-currency handling
//! here.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, Money, entries::DocumentKind, util};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Transfer,
    Card,
    Yape,
    Plin,
    Check,
    Other,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "efectivo",
            Self::Transfer => "transferencia",
            Self::Card => "tarjeta",
            Self::Yape => "yape",
            Self::Plin => "plin",
            Self::Check => "cheque",
            Self::Other => "otro",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "efectivo" => Ok(Self::Cash),
            "transferencia" => Ok(Self::Transfer),
            "tarjeta" => Ok(Self::Card),
            "yape" => Ok(Self::Yape),
            "plin" => Ok(Self::Plin),
            "cheque" => Ok(Self::Check),
            "otro" => Ok(Self::Other),
            other => Err(LedgerError::Validation(format!(
                "invalid payment method: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeState {
    #[default]
    Pending,
    Collected,
    Voided,
}

impl IncomeState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::Collected => "cobrado",
            Self::Voided => "anulado",
        }
    }
}

impl TryFrom<&str> for IncomeState {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pendiente" => Ok(Self::Pending),
            "cobrado" => Ok(Self::Collected),
            "anulado" => Ok(Self::Voided),
            other => Err(LedgerError::Validation(format!(
                "invalid income state: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: Uuid,
    pub concept: String,
    pub description: Option<String>,
    pub category: String,
    pub amount: Money,
    pub value_date: NaiveDate,
    /// Free-form reference to a client or order in the surrounding app.
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub payment_method: PaymentMethod,
    pub payment_reference: Option<String>,
    pub document_kind: Option<DocumentKind>,
    pub document_number: Option<String>,
    pub state: IncomeState,
    pub collected_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

/// Input for recording an income.
#[derive(Clone, Debug, Default)]
pub struct NewIncome {
    pub concept: String,
    pub description: Option<String>,
    pub category: String,
    pub amount: Money,
    /// Defaults to today when omitted.
    pub value_date: Option<NaiveDate>,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub payment_method: PaymentMethod,
    pub payment_reference: Option<String>,
    pub document_kind: Option<DocumentKind>,
    pub document_number: Option<String>,
    pub created_by: String,
}

/// Partial update for an income. Absent fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct IncomeUpdate {
    pub concept: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub amount: Option<Money>,
    pub value_date: Option<NaiveDate>,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_reference: Option<String>,
    pub document_kind: Option<DocumentKind>,
    pub document_number: Option<String>,
    pub state: Option<IncomeState>,
    pub updated_by: Option<String>,
}

/// Listing filter; absent fields impose no constraint.
#[derive(Clone, Debug, Default)]
pub struct IncomeFilter {
    pub month: Option<u8>,
    pub year: Option<i32>,
    pub state: Option<IncomeState>,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub concept: String,
    pub description: Option<String>,
    pub category: String,
    pub amount_cents: i64,
    pub value_date: Date,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub payment_method: String,
    pub payment_reference: Option<String>,
    pub document_kind: Option<String>,
    pub document_number: Option<String>,
    pub state: String,
    pub collected_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub created_by: String,
    pub updated_at: Option<DateTimeUtc>,
    pub updated_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Income> for ActiveModel {
    fn from(income: &Income) -> Self {
        Self {
            id: ActiveValue::Set(income.id.to_string()),
            concept: ActiveValue::Set(income.concept.clone()),
            description: ActiveValue::Set(income.description.clone()),
            category: ActiveValue::Set(income.category.clone()),
            amount_cents: ActiveValue::Set(income.amount.cents()),
            value_date: ActiveValue::Set(income.value_date),
            client_id: ActiveValue::Set(income.client_id.clone()),
            client_name: ActiveValue::Set(income.client_name.clone()),
            payment_method: ActiveValue::Set(income.payment_method.as_str().to_string()),
            payment_reference: ActiveValue::Set(income.payment_reference.clone()),
            document_kind: ActiveValue::Set(income.document_kind.map(|k| k.as_str().to_string())),
            document_number: ActiveValue::Set(income.document_number.clone()),
            state: ActiveValue::Set(income.state.as_str().to_string()),
            collected_at: ActiveValue::Set(income.collected_at),
            created_at: ActiveValue::Set(income.created_at),
            created_by: ActiveValue::Set(income.created_by.clone()),
            updated_at: ActiveValue::Set(income.updated_at),
            updated_by: ActiveValue::Set(income.updated_by.clone()),
        }
    }
}

impl TryFrom<Model> for Income {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: util::parse_uuid(&model.id, "income")?,
            concept: model.concept,
            description: model.description,
            category: model.category,
            amount: Money::new(model.amount_cents),
            value_date: model.value_date,
            client_id: model.client_id,
            client_name: model.client_name,
            payment_method: PaymentMethod::try_from(model.payment_method.as_str())?,
            payment_reference: model.payment_reference,
            document_kind: model
                .document_kind
                .as_deref()
                .map(DocumentKind::try_from)
                .transpose()?,
            document_number: model.document_number,
            state: IncomeState::try_from(model.state.as_str())?,
            collected_at: model.collected_at,
            created_at: model.created_at,
            created_by: model.created_by,
            updated_at: model.updated_at,
            updated_by: model.updated_by,
        })
    }
}
