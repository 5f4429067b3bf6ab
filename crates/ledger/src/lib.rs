//! Petty-cash ledger core.
//!
//! The [`Ledger`] service tracks period-scoped cash boxes ("cajas") and their
//! dated credit/debit entries, standalone expenses and incomes, and produces
//! monthly cross-entity summaries. Persistence is delegated to an external
//! relational store reached through sea-orm; the service itself keeps no
//! cached state, so callers own any read model and its invalidation.
//!
//! Every entry mutation and every initial-balance edit recomputes the owning
//! box balance inside the same database transaction, so a successful mutation
//! never leaves a stale balance behind.

use chrono::Utc;
pub use cash_boxes::{CashBox, CashBoxFilter, CashBoxState, CashBoxUpdate, NewCashBox};
pub use currency::{Currency, normalize};
pub use entries::{
    Direction, DocumentKind, Entry, EntryQuery, EntryState, EntryUpdate, NewEntry,
};
pub use error::LedgerError;
pub use expenses::{
    Expense, ExpenseFilter, ExpenseKind, ExpenseState, ExpenseUpdate, NewExpense,
};
pub use filter::{Numbered, RowFilter, TableRow, number};
pub use incomes::{Income, IncomeFilter, IncomeState, IncomeUpdate, NewIncome, PaymentMethod};
pub use money::Money;
use sea_orm::{
    ActiveValue, Condition, QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*,
};
pub use summary::MonthlySummary;
use tracing::debug;
use uuid::Uuid;

mod cash_boxes;
pub mod currency;
mod entries;
mod error;
mod expenses;
pub mod filter;
mod incomes;
mod money;
mod summary;
mod util;

type ResultLedger<T> = Result<T, LedgerError>;

/// Result of recomputing a cash box balance from its entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reconciliation {
    pub current_balance: Money,
    pub total_credits: Money,
    pub total_debits: Money,
}

/// The ledger service.
///
/// All operations are stateless request/response calls against the
/// persistence layer; reads may run concurrently with writes and reflect
/// whatever the store currently returns.
#[derive(Clone, Debug)]
pub struct Ledger {
    database: DatabaseConnection,
    delete_closed_boxes: bool,
}

impl Ledger {
    /// Return a builder for `Ledger`.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    // ────────────────────────────────────────────────────────────────────
    // Cash boxes
    // ────────────────────────────────────────────────────────────────────

    /// Create a cash box for a `(month, year)` period.
    ///
    /// Fails with [`LedgerError::DuplicateCashBox`] when a box with the same
    /// name already exists for that period. The initial balance defaults to
    /// 0; the box starts `Open` with its current balance reconciled.
    pub async fn create_cash_box(&self, new: NewCashBox) -> ResultLedger<CashBox> {
        let cash_box = CashBox::new(
            new.name,
            new.description,
            new.month,
            new.year,
            new.initial_balance.unwrap_or(Money::ZERO),
            new.created_by,
            Utc::now(),
        )?;

        self.ensure_unique_period_name(
            &cash_box.name,
            cash_box.month,
            cash_box.year,
            None,
        )
        .await?;

        let db_tx = self.database.begin().await?;
        cash_boxes::ActiveModel::from(&cash_box).insert(&db_tx).await?;
        self.recompute_in(&db_tx, cash_box.id).await?;
        db_tx.commit().await?;

        debug!(cash_box_id = %cash_box.id, name = %cash_box.name, "created cash box");
        self.cash_box(cash_box.id).await
    }

    /// Return a cash box by id.
    pub async fn cash_box(&self, cash_box_id: Uuid) -> ResultLedger<CashBox> {
        self.cash_box_in(&self.database, cash_box_id).await
    }

    /// List cash boxes, newest period first.
    pub async fn list_cash_boxes(&self, filter: CashBoxFilter) -> ResultLedger<Vec<CashBox>> {
        let mut query = cash_boxes::Entity::find()
            .order_by_desc(cash_boxes::Column::Year)
            .order_by_desc(cash_boxes::Column::Month)
            .order_by_asc(cash_boxes::Column::Name);

        if let Some(month) = filter.month {
            query = query.filter(cash_boxes::Column::Month.eq(i16::from(month)));
        }
        if let Some(year) = filter.year {
            query = query.filter(cash_boxes::Column::Year.eq(year));
        }
        if let Some(state) = filter.state {
            query = query.filter(cash_boxes::Column::State.eq(state.as_str()));
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(CashBox::try_from).collect()
    }

    /// Rename a cash box or edit its description/initial balance.
    ///
    /// Fails with [`LedgerError::CashBoxClosed`] unless the box is `Open`.
    /// Editing the initial balance reconciles the box in the same
    /// transaction.
    pub async fn update_cash_box(
        &self,
        cash_box_id: Uuid,
        update: CashBoxUpdate,
    ) -> ResultLedger<CashBox> {
        let mut cash_box = self.cash_box(cash_box_id).await?;
        if !cash_box.is_open() {
            return Err(LedgerError::CashBoxClosed);
        }

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(LedgerError::Validation(
                    "cash box name is required".to_string(),
                ));
            }
            if name != cash_box.name {
                self.ensure_unique_period_name(
                    &name,
                    cash_box.month,
                    cash_box.year,
                    Some(cash_box_id),
                )
                .await?;
            }
            cash_box.name = name;
        }
        if let Some(description) = update.description {
            cash_box.description = Some(description);
        }
        let initial_changed = update.initial_balance.is_some();
        if let Some(initial_balance) = update.initial_balance {
            cash_box.initial_balance = initial_balance;
        }
        cash_box.updated_at = Some(Utc::now());
        cash_box.updated_by = update.updated_by;

        let db_tx = self.database.begin().await?;
        cash_boxes::ActiveModel::from(&cash_box).update(&db_tx).await?;
        if initial_changed {
            self.recompute_in(&db_tx, cash_box_id).await?;
        }
        db_tx.commit().await?;

        debug!(cash_box_id = %cash_box_id, "updated cash box");
        self.cash_box(cash_box_id).await
    }

    /// Close a cash box: irreversible through this core, freezes its entries.
    ///
    /// Fails with [`LedgerError::CashBoxClosed`] when already closed.
    pub async fn close_cash_box(
        &self,
        cash_box_id: Uuid,
        closed_by: &str,
    ) -> ResultLedger<CashBox> {
        let mut cash_box = self.cash_box(cash_box_id).await?;
        if cash_box.state == CashBoxState::Closed {
            return Err(LedgerError::CashBoxClosed);
        }

        cash_box.state = CashBoxState::Closed;
        cash_box.closed_at = Some(Utc::now());
        cash_box.closed_by = Some(closed_by.to_string());

        cash_boxes::ActiveModel::from(&cash_box)
            .update(&self.database)
            .await?;

        debug!(cash_box_id = %cash_box_id, closed_by, "closed cash box");
        Ok(cash_box)
    }

    /// Put an open cash box under count ("arqueo").
    pub async fn begin_count(&self, cash_box_id: Uuid) -> ResultLedger<CashBox> {
        let mut cash_box = self.cash_box(cash_box_id).await?;
        if cash_box.state != CashBoxState::Open {
            return Err(LedgerError::InvalidStateTransition(format!(
                "cannot start a count on a {} cash box",
                cash_box.state.as_str()
            )));
        }

        cash_box.state = CashBoxState::UnderCount;
        cash_boxes::ActiveModel::from(&cash_box)
            .update(&self.database)
            .await?;

        debug!(cash_box_id = %cash_box_id, "cash box under count");
        Ok(cash_box)
    }

    /// Delete a cash box and cascade its entries.
    ///
    /// By default only open boxes may be deleted; closed and under-count
    /// boxes fail with [`LedgerError::CashBoxLocked`] unless the builder
    /// enabled `delete_closed_boxes`.
    pub async fn delete_cash_box(&self, cash_box_id: Uuid) -> ResultLedger<()> {
        let cash_box = self.cash_box(cash_box_id).await?;
        if !cash_box.is_open() && !self.delete_closed_boxes {
            return Err(LedgerError::CashBoxLocked);
        }

        let db_tx = self.database.begin().await?;
        entries::Entity::delete_many()
            .filter(entries::Column::CashBoxId.eq(cash_box_id.to_string()))
            .exec(&db_tx)
            .await?;
        cash_boxes::Entity::delete_by_id(cash_box_id.to_string())
            .exec(&db_tx)
            .await?;
        db_tx.commit().await?;

        debug!(cash_box_id = %cash_box_id, "deleted cash box and its entries");
        Ok(())
    }

    /// Recompute a cash box balance from its initial balance and entries.
    ///
    /// Only `Recorded` and `Approved` entries count; the recomputed balance
    /// is persisted back onto the box. Idempotent: with unchanged entries a
    /// repeated call yields the same result, and a box with no entries
    /// settles on its initial balance.
    pub async fn recompute(&self, cash_box_id: Uuid) -> ResultLedger<Reconciliation> {
        self.recompute_in(&self.database, cash_box_id).await
    }

    // ────────────────────────────────────────────────────────────────────
    // Entries
    // ────────────────────────────────────────────────────────────────────

    /// Post an entry against an open cash box and reconcile its balance.
    ///
    /// Defaults: value date = today, document kind = generic voucher. Fails
    /// with [`LedgerError::MissingDirection`] when the input carries no
    /// direction and [`LedgerError::CashBoxClosed`] when the box is not open.
    pub async fn create_entry(&self, cash_box_id: Uuid, new: NewEntry) -> ResultLedger<Entry> {
        let cash_box = self.cash_box(cash_box_id).await?;
        if !cash_box.is_open() {
            return Err(LedgerError::CashBoxClosed);
        }

        let direction = new.direction.ok_or(LedgerError::MissingDirection)?;
        if new.description.trim().is_empty() {
            return Err(LedgerError::Validation(
                "entry description is required".to_string(),
            ));
        }
        if new.amount.is_negative() {
            return Err(LedgerError::Validation(
                "entry amount must be >= 0".to_string(),
            ));
        }

        let entry = Entry {
            id: Uuid::new_v4(),
            cash_box_id,
            direction,
            category: new.category,
            description: new.description,
            amount: new.amount,
            value_date: new.value_date.unwrap_or_else(|| Utc::now().date_naive()),
            document_kind: new.document_kind.unwrap_or_default(),
            document_number: new.document_number,
            attachment: new.attachment,
            state: EntryState::default(),
            created_at: Utc::now(),
            created_by: new.created_by,
            updated_at: None,
            updated_by: None,
        };

        let db_tx = self.database.begin().await?;
        entries::ActiveModel::from(&entry).insert(&db_tx).await?;
        self.recompute_in(&db_tx, cash_box_id).await?;
        db_tx.commit().await?;

        debug!(entry_id = %entry.id, cash_box_id = %cash_box_id, "created entry");
        Ok(entry)
    }

    /// Update an entry on an open cash box and reconcile the balance.
    pub async fn update_entry(&self, entry_id: Uuid, update: EntryUpdate) -> ResultLedger<Entry> {
        let mut entry = self.entry_in(&self.database, entry_id).await?;
        let cash_box = self.cash_box(entry.cash_box_id).await?;
        if !cash_box.is_open() {
            return Err(LedgerError::CashBoxClosed);
        }

        if let Some(direction) = update.direction {
            entry.direction = direction;
        }
        if let Some(category) = update.category {
            entry.category = category;
        }
        if let Some(description) = update.description {
            if description.trim().is_empty() {
                return Err(LedgerError::Validation(
                    "entry description is required".to_string(),
                ));
            }
            entry.description = description;
        }
        if let Some(amount) = update.amount {
            if amount.is_negative() {
                return Err(LedgerError::Validation(
                    "entry amount must be >= 0".to_string(),
                ));
            }
            entry.amount = amount;
        }
        if let Some(value_date) = update.value_date {
            entry.value_date = value_date;
        }
        if let Some(document_kind) = update.document_kind {
            entry.document_kind = document_kind;
        }
        if let Some(document_number) = update.document_number {
            entry.document_number = Some(document_number);
        }
        if let Some(attachment) = update.attachment {
            entry.attachment = Some(attachment);
        }
        if let Some(state) = update.state {
            entry.state = state;
        }
        entry.updated_at = Some(Utc::now());
        entry.updated_by = update.updated_by;

        let db_tx = self.database.begin().await?;
        entries::ActiveModel::from(&entry).update(&db_tx).await?;
        self.recompute_in(&db_tx, entry.cash_box_id).await?;
        db_tx.commit().await?;

        debug!(entry_id = %entry_id, "updated entry");
        Ok(entry)
    }

    /// Delete an entry from an open cash box and reconcile the balance.
    pub async fn delete_entry(&self, entry_id: Uuid) -> ResultLedger<()> {
        let entry = self.entry_in(&self.database, entry_id).await?;
        let cash_box = self.cash_box(entry.cash_box_id).await?;
        if !cash_box.is_open() {
            return Err(LedgerError::CashBoxClosed);
        }

        let db_tx = self.database.begin().await?;
        entries::Entity::delete_by_id(entry_id.to_string())
            .exec(&db_tx)
            .await?;
        self.recompute_in(&db_tx, entry.cash_box_id).await?;
        db_tx.commit().await?;

        debug!(entry_id = %entry_id, "deleted entry");
        Ok(())
    }

    /// List the entries of a cash box, oldest value date first.
    pub async fn list_entries(
        &self,
        cash_box_id: Uuid,
        query: EntryQuery,
    ) -> ResultLedger<Vec<Entry>> {
        // Existence check so a bad id surfaces as NotFound, not an empty list.
        self.cash_box(cash_box_id).await?;

        let mut find = entries::Entity::find()
            .filter(entries::Column::CashBoxId.eq(cash_box_id.to_string()))
            .order_by_asc(entries::Column::ValueDate)
            .order_by_asc(entries::Column::CreatedAt);

        if let Some(direction) = query.direction {
            find = find.filter(entries::Column::Direction.eq(direction.as_str()));
        }
        if let Some(date_from) = query.date_from {
            find = find.filter(entries::Column::ValueDate.gte(date_from));
        }
        if let Some(date_to) = query.date_to {
            find = find.filter(entries::Column::ValueDate.lte(date_to));
        }

        let models = find.all(&self.database).await?;
        models.into_iter().map(Entry::try_from).collect()
    }

    // ────────────────────────────────────────────────────────────────────
    // Expenses
    // ────────────────────────────────────────────────────────────────────

    /// Record an expense, normalizing the amount into base currency.
    ///
    /// Foreign amounts retain the original amount and the exchange rate used;
    /// `month`/`year` are derived from the value date.
    pub async fn create_expense(&self, new: NewExpense) -> ResultLedger<Expense> {
        if new.name.trim().is_empty() {
            return Err(LedgerError::Validation(
                "expense name is required".to_string(),
            ));
        }
        expenses::validate_kind_fields(new.kind, new.due_day)?;

        let amount = currency::normalize(new.amount, new.currency, new.exchange_rate)?;
        if amount.is_negative() {
            return Err(LedgerError::Validation(
                "expense amount must be >= 0".to_string(),
            ));
        }

        let value_date = new.value_date.unwrap_or_else(|| Utc::now().date_naive());
        let (month, year) = util::period_of(value_date);

        let foreign = !new.currency.is_base();
        let expense = Expense {
            id: Uuid::new_v4(),
            kind: new.kind,
            name: new.name,
            description: new.description,
            category: new.category,
            currency: new.currency,
            amount,
            original_amount: foreign
                .then(|| Money::from_decimal(new.amount))
                .transpose()?,
            exchange_rate: foreign.then_some(new.exchange_rate).flatten(),
            value_date,
            month,
            year,
            due_day: new.due_day,
            recurring: new.recurring,
            active: new.active,
            cash_box_id: new.cash_box_id,
            document_kind: new.document_kind,
            document_number: new.document_number,
            vendor: new.vendor,
            state: ExpenseState::default(),
            paid_at: None,
            created_at: Utc::now(),
            created_by: new.created_by,
            updated_at: None,
            updated_by: None,
        };

        expenses::ActiveModel::from(&expense)
            .insert(&self.database)
            .await?;

        debug!(expense_id = %expense.id, kind = expense.kind.as_str(), "created expense");
        Ok(expense)
    }

    /// Update an expense; money edits re-run normalization and date edits
    /// re-derive `month`/`year`.
    pub async fn update_expense(
        &self,
        expense_id: Uuid,
        update: ExpenseUpdate,
    ) -> ResultLedger<Expense> {
        let mut expense = self.expense_in(&self.database, expense_id).await?;

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(LedgerError::Validation(
                    "expense name is required".to_string(),
                ));
            }
            expense.name = name;
        }
        if let Some(description) = update.description {
            expense.description = Some(description);
        }
        if let Some(category) = update.category {
            expense.category = category;
        }
        if let Some(due_day) = update.due_day {
            expense.due_day = Some(due_day);
        }
        expenses::validate_kind_fields(expense.kind, expense.due_day)?;
        if let Some(recurring) = update.recurring {
            expense.recurring = recurring;
        }
        if let Some(active) = update.active {
            expense.active = active;
        }
        if let Some(cash_box_id) = update.cash_box_id {
            expense.cash_box_id = Some(cash_box_id);
        }
        if let Some(document_kind) = update.document_kind {
            expense.document_kind = Some(document_kind);
        }
        if let Some(document_number) = update.document_number {
            expense.document_number = Some(document_number);
        }
        if let Some(vendor) = update.vendor {
            expense.vendor = Some(vendor);
        }
        if let Some(state) = update.state {
            expense.state = state;
        }

        if update.amount.is_some() || update.currency.is_some() || update.exchange_rate.is_some()
        {
            let currency = update.currency.unwrap_or(expense.currency);
            let rate = update.exchange_rate.or(expense.exchange_rate);
            let amount_input = update.amount.unwrap_or_else(|| {
                expense
                    .original_amount
                    .unwrap_or(expense.amount)
                    .to_decimal()
            });

            let amount = currency::normalize(amount_input, currency, rate)?;
            if amount.is_negative() {
                return Err(LedgerError::Validation(
                    "expense amount must be >= 0".to_string(),
                ));
            }

            let foreign = !currency.is_base();
            expense.currency = currency;
            expense.amount = amount;
            expense.original_amount = foreign
                .then(|| Money::from_decimal(amount_input))
                .transpose()?;
            expense.exchange_rate = if foreign { rate } else { None };
        }

        if let Some(value_date) = update.value_date {
            expense.value_date = value_date;
            let (month, year) = util::period_of(value_date);
            expense.month = month;
            expense.year = year;
        }

        expense.updated_at = Some(Utc::now());
        expense.updated_by = update.updated_by;

        expenses::ActiveModel::from(&expense)
            .update(&self.database)
            .await?;

        debug!(expense_id = %expense_id, "updated expense");
        Ok(expense)
    }

    /// Delete an expense.
    pub async fn delete_expense(&self, expense_id: Uuid) -> ResultLedger<()> {
        // Surface NotFound for a bad id instead of a silent no-op delete.
        self.expense_in(&self.database, expense_id).await?;

        expenses::Entity::delete_by_id(expense_id.to_string())
            .exec(&self.database)
            .await?;

        debug!(expense_id = %expense_id, "deleted expense");
        Ok(())
    }

    /// Settle a pending expense.
    ///
    /// The only guarded expense transition: valid from `Pending` alone, sets
    /// the payment date; any other origin fails with
    /// [`LedgerError::InvalidStateTransition`].
    pub async fn mark_expense_paid(
        &self,
        expense_id: Uuid,
        actor: &str,
    ) -> ResultLedger<Expense> {
        let mut expense = self.expense_in(&self.database, expense_id).await?;
        if expense.state != ExpenseState::Pending {
            return Err(LedgerError::InvalidStateTransition(format!(
                "cannot mark a {} expense as paid",
                expense.state.as_str()
            )));
        }

        expense.state = ExpenseState::Paid;
        expense.paid_at = Some(Utc::now());
        expense.updated_at = Some(Utc::now());
        expense.updated_by = Some(actor.to_string());

        expenses::ActiveModel::from(&expense)
            .update(&self.database)
            .await?;

        debug!(expense_id = %expense_id, actor, "expense paid");
        Ok(expense)
    }

    /// List expenses. A month filter requires a year.
    pub async fn list_expenses(&self, filter: ExpenseFilter) -> ResultLedger<Vec<Expense>> {
        if filter.month.is_some() && filter.year.is_none() {
            return Err(LedgerError::Validation(
                "a month filter requires a year".to_string(),
            ));
        }

        let mut query = expenses::Entity::find()
            .order_by_asc(expenses::Column::ValueDate)
            .order_by_asc(expenses::Column::CreatedAt);

        if let Some(kind) = filter.kind {
            query = query.filter(expenses::Column::Kind.eq(kind.as_str()));
        }
        if let Some(month) = filter.month {
            query = query.filter(expenses::Column::Month.eq(i16::from(month)));
        }
        if let Some(year) = filter.year {
            query = query.filter(expenses::Column::Year.eq(year));
        }
        if let Some(state) = filter.state {
            query = query.filter(expenses::Column::State.eq(state.as_str()));
        }
        if let Some(category) = filter.category {
            query = query.filter(expenses::Column::Category.eq(category));
        }
        if filter.active_only {
            // The flag only gates fixed expenses; variable ones always pass.
            query = query.filter(
                Condition::any()
                    .add(expenses::Column::Kind.eq(ExpenseKind::Variable.as_str()))
                    .add(expenses::Column::Active.eq(true)),
            );
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(Expense::try_from).collect()
    }

    // ────────────────────────────────────────────────────────────────────
    // Incomes
    // ────────────────────────────────────────────────────────────────────

    /// Record an income (base currency only).
    pub async fn create_income(&self, new: NewIncome) -> ResultLedger<Income> {
        if new.concept.trim().is_empty() {
            return Err(LedgerError::Validation(
                "income concept is required".to_string(),
            ));
        }
        if new.amount.is_negative() {
            return Err(LedgerError::Validation(
                "income amount must be >= 0".to_string(),
            ));
        }

        let income = Income {
            id: Uuid::new_v4(),
            concept: new.concept,
            description: new.description,
            category: new.category,
            amount: new.amount,
            value_date: new.value_date.unwrap_or_else(|| Utc::now().date_naive()),
            client_id: new.client_id,
            client_name: new.client_name,
            payment_method: new.payment_method,
            payment_reference: new.payment_reference,
            document_kind: new.document_kind,
            document_number: new.document_number,
            state: IncomeState::default(),
            collected_at: None,
            created_at: Utc::now(),
            created_by: new.created_by,
            updated_at: None,
            updated_by: None,
        };

        incomes::ActiveModel::from(&income)
            .insert(&self.database)
            .await?;

        debug!(income_id = %income.id, "created income");
        Ok(income)
    }

    /// Update an income.
    pub async fn update_income(
        &self,
        income_id: Uuid,
        update: IncomeUpdate,
    ) -> ResultLedger<Income> {
        let mut income = self.income_in(&self.database, income_id).await?;

        if let Some(concept) = update.concept {
            if concept.trim().is_empty() {
                return Err(LedgerError::Validation(
                    "income concept is required".to_string(),
                ));
            }
            income.concept = concept;
        }
        if let Some(description) = update.description {
            income.description = Some(description);
        }
        if let Some(category) = update.category {
            income.category = category;
        }
        if let Some(amount) = update.amount {
            if amount.is_negative() {
                return Err(LedgerError::Validation(
                    "income amount must be >= 0".to_string(),
                ));
            }
            income.amount = amount;
        }
        if let Some(value_date) = update.value_date {
            income.value_date = value_date;
        }
        if let Some(client_id) = update.client_id {
            income.client_id = Some(client_id);
        }
        if let Some(client_name) = update.client_name {
            income.client_name = Some(client_name);
        }
        if let Some(payment_method) = update.payment_method {
            income.payment_method = payment_method;
        }
        if let Some(payment_reference) = update.payment_reference {
            income.payment_reference = Some(payment_reference);
        }
        if let Some(document_kind) = update.document_kind {
            income.document_kind = Some(document_kind);
        }
        if let Some(document_number) = update.document_number {
            income.document_number = Some(document_number);
        }
        if let Some(state) = update.state {
            income.state = state;
        }
        income.updated_at = Some(Utc::now());
        income.updated_by = update.updated_by;

        incomes::ActiveModel::from(&income)
            .update(&self.database)
            .await?;

        debug!(income_id = %income_id, "updated income");
        Ok(income)
    }

    /// Delete an income.
    pub async fn delete_income(&self, income_id: Uuid) -> ResultLedger<()> {
        self.income_in(&self.database, income_id).await?;

        incomes::Entity::delete_by_id(income_id.to_string())
            .exec(&self.database)
            .await?;

        debug!(income_id = %income_id, "deleted income");
        Ok(())
    }

    /// Collect a pending income.
    ///
    /// Valid from `Pending` alone; sets the collection date.
    pub async fn mark_income_collected(
        &self,
        income_id: Uuid,
        actor: &str,
    ) -> ResultLedger<Income> {
        let mut income = self.income_in(&self.database, income_id).await?;
        if income.state != IncomeState::Pending {
            return Err(LedgerError::InvalidStateTransition(format!(
                "cannot collect a {} income",
                income.state.as_str()
            )));
        }

        income.state = IncomeState::Collected;
        income.collected_at = Some(Utc::now());
        income.updated_at = Some(Utc::now());
        income.updated_by = Some(actor.to_string());

        incomes::ActiveModel::from(&income)
            .update(&self.database)
            .await?;

        debug!(income_id = %income_id, actor, "income collected");
        Ok(income)
    }

    /// List incomes. A month filter requires a year.
    pub async fn list_incomes(&self, filter: IncomeFilter) -> ResultLedger<Vec<Income>> {
        let mut query = incomes::Entity::find()
            .order_by_asc(incomes::Column::ValueDate)
            .order_by_asc(incomes::Column::CreatedAt);

        match (filter.month, filter.year) {
            (Some(month), Some(year)) => {
                let (first, next) = util::month_range(month, year)?;
                query = query
                    .filter(incomes::Column::ValueDate.gte(first))
                    .filter(incomes::Column::ValueDate.lt(next));
            }
            (None, Some(year)) => {
                let (first, _) = util::month_range(1, year)?;
                let (_, next) = util::month_range(12, year)?;
                query = query
                    .filter(incomes::Column::ValueDate.gte(first))
                    .filter(incomes::Column::ValueDate.lt(next));
            }
            (Some(_), None) => {
                return Err(LedgerError::Validation(
                    "a month filter requires a year".to_string(),
                ));
            }
            (None, None) => {}
        }

        if let Some(state) = filter.state {
            query = query.filter(incomes::Column::State.eq(state.as_str()));
        }
        if let Some(payment_method) = filter.payment_method {
            query = query.filter(incomes::Column::PaymentMethod.eq(payment_method.as_str()));
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(Income::try_from).collect()
    }

    // ────────────────────────────────────────────────────────────────────
    // Monthly summary
    // ────────────────────────────────────────────────────────────────────

    /// Aggregate totals for one `(month, year)` period.
    ///
    /// Read-only: pulls entries dated within the month across all boxes,
    /// expenses with matching derived period, and incomes with a value date
    /// in range. Each sub-collection is read once; no snapshot isolation is
    /// guaranteed across the three reads.
    pub async fn summarize(&self, month: u8, year: i32) -> ResultLedger<MonthlySummary> {
        let (first, next) = util::month_range(month, year)?;
        let mut summary = MonthlySummary::empty(month, year);

        let entry_models = entries::Entity::find()
            .filter(entries::Column::ValueDate.gte(first))
            .filter(entries::Column::ValueDate.lt(next))
            .all(&self.database)
            .await?;
        for model in entry_models {
            let entry = Entry::try_from(model)?;
            if !entry.state.counts_toward_balance() {
                continue;
            }
            match entry.direction {
                Direction::Credit => summary.box_credits += entry.amount,
                Direction::Debit => summary.box_debits += entry.amount,
            }
        }

        let expense_models = expenses::Entity::find()
            .filter(expenses::Column::Month.eq(i16::from(month)))
            .filter(expenses::Column::Year.eq(year))
            .all(&self.database)
            .await?;
        for model in expense_models {
            let expense = Expense::try_from(model)?;
            if expense.state == ExpenseState::Voided {
                continue;
            }
            // Inactive fixed expenses are excluded from monthly totals.
            if expense.kind == ExpenseKind::Fixed && !expense.active {
                continue;
            }
            match expense.kind {
                ExpenseKind::Fixed => summary.fixed_expenses += expense.amount,
                ExpenseKind::Variable => summary.variable_expenses += expense.amount,
            }
            if expense.state == ExpenseState::Paid {
                summary.paid_expenses += expense.amount;
            } else if expense.state.is_unpaid() {
                summary.pending_expenses += expense.amount;
            }
        }

        let income_models = incomes::Entity::find()
            .filter(incomes::Column::ValueDate.gte(first))
            .filter(incomes::Column::ValueDate.lt(next))
            .all(&self.database)
            .await?;
        for model in income_models {
            let income = Income::try_from(model)?;
            match income.state {
                IncomeState::Collected => summary.collected_incomes += income.amount,
                IncomeState::Pending => summary.pending_incomes += income.amount,
                IncomeState::Voided => {}
            }
        }

        Ok(summary.finish())
    }

    // ────────────────────────────────────────────────────────────────────
    // Internals
    // ────────────────────────────────────────────────────────────────────

    async fn cash_box_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        cash_box_id: Uuid,
    ) -> ResultLedger<CashBox> {
        let model = cash_boxes::Entity::find_by_id(cash_box_id.to_string())
            .one(conn)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("cash box {cash_box_id}")))?;
        CashBox::try_from(model)
    }

    async fn entry_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        entry_id: Uuid,
    ) -> ResultLedger<Entry> {
        let model = entries::Entity::find_by_id(entry_id.to_string())
            .one(conn)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("entry {entry_id}")))?;
        Entry::try_from(model)
    }

    async fn expense_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        expense_id: Uuid,
    ) -> ResultLedger<Expense> {
        let model = expenses::Entity::find_by_id(expense_id.to_string())
            .one(conn)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("expense {expense_id}")))?;
        Expense::try_from(model)
    }

    async fn income_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        income_id: Uuid,
    ) -> ResultLedger<Income> {
        let model = incomes::Entity::find_by_id(income_id.to_string())
            .one(conn)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("income {income_id}")))?;
        Income::try_from(model)
    }

    async fn ensure_unique_period_name(
        &self,
        name: &str,
        month: u8,
        year: i32,
        exclude: Option<Uuid>,
    ) -> ResultLedger<()> {
        let mut query = cash_boxes::Entity::find()
            .filter(cash_boxes::Column::Name.eq(name))
            .filter(cash_boxes::Column::Month.eq(i16::from(month)))
            .filter(cash_boxes::Column::Year.eq(year));
        if let Some(id) = exclude {
            query = query.filter(cash_boxes::Column::Id.ne(id.to_string()));
        }

        if query.one(&self.database).await?.is_some() {
            return Err(LedgerError::DuplicateCashBox);
        }
        Ok(())
    }

    /// Sum counted entries per direction and persist the recomputed balance.
    async fn recompute_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        cash_box_id: Uuid,
    ) -> ResultLedger<Reconciliation> {
        let cash_box = self.cash_box_in(conn, cash_box_id).await?;
        let backend = conn.get_database_backend();

        let total_credits: i64 = {
            let stmt = Statement::from_sql_and_values(
                backend,
                "SELECT COALESCE(SUM(amount_cents), 0) AS sum \
                 FROM entries \
                 WHERE cash_box_id = ? AND direction = ? AND state IN (?, ?)",
                vec![
                    cash_box_id.to_string().into(),
                    Direction::Credit.as_str().into(),
                    EntryState::Recorded.as_str().into(),
                    EntryState::Approved.as_str().into(),
                ],
            );
            let row = conn.query_one(stmt).await?;
            row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0)
        };

        let total_debits: i64 = {
            let stmt = Statement::from_sql_and_values(
                backend,
                "SELECT COALESCE(SUM(amount_cents), 0) AS sum \
                 FROM entries \
                 WHERE cash_box_id = ? AND direction = ? AND state IN (?, ?)",
                vec![
                    cash_box_id.to_string().into(),
                    Direction::Debit.as_str().into(),
                    EntryState::Recorded.as_str().into(),
                    EntryState::Approved.as_str().into(),
                ],
            );
            let row = conn.query_one(stmt).await?;
            row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0)
        };

        let total_credits = Money::new(total_credits);
        let total_debits = Money::new(total_debits);
        let current_balance = cash_box.initial_balance + total_credits - total_debits;

        let model = cash_boxes::ActiveModel {
            id: ActiveValue::Set(cash_box_id.to_string()),
            current_balance_cents: ActiveValue::Set(current_balance.cents()),
            ..Default::default()
        };
        model.update(conn).await?;

        Ok(Reconciliation {
            current_balance,
            total_credits,
            total_debits,
        })
    }
}

/// The builder for `Ledger`.
#[derive(Default)]
pub struct LedgerBuilder {
    database: DatabaseConnection,
    delete_closed_boxes: bool,
}

impl LedgerBuilder {
    /// Pass the required database.
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = db;
        self
    }

    /// Allow deleting closed cash boxes (default: open boxes only).
    pub fn delete_closed_boxes(mut self, allow: bool) -> LedgerBuilder {
        self.delete_closed_boxes = allow;
        self
    }

    /// Construct `Ledger`.
    pub fn build(self) -> Ledger {
        Ledger {
            database: self.database,
            delete_closed_boxes: self.delete_closed_boxes,
        }
    }
}
