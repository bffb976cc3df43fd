//! Ledger service: posting construction, validation, reversal and
//! reconciliation over the chart, the calendar and the entry log.
//!
//! The service owns no I/O. Every invariant check completes before a call
//! returns; only validated entries reach the balance projection.

use chrono::{NaiveDate, Utc};
use ohada_shared::types::{ActorId, EntryId, EntryLineId, FiscalPeriodId};
use ohada_shared::{LedgerConfig, PostingPolicy};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use super::entry::{EntryLine, JournalEntry};
use super::error::LedgerError;
use super::events::BusinessEvent;
use super::posting::{self, PostingPlan};
use super::reconciliation::Reconciliation;
use super::reversal::ReversalService;
use super::store::JournalStore;
use super::types::{InvoiceDoc, ManualEntryInput, PaymentDoc, SourceDocument};
use super::validation::{validate_balanced, validate_entry_lines, validate_line_shapes};
use crate::accounts::{
    Account, AccountBalance, BalanceProjection, ChartOfAccounts, NewAccount, seed_syscohada,
};
use crate::fiscal::{FiscalCalendar, FiscalPeriod};

/// The bookkeeping engine.
///
/// Shareable across threads (`Arc<LedgerService>`); every mutation is
/// serialized per target inside the store.
#[derive(Debug, Default)]
pub struct LedgerService {
    config: LedgerConfig,
    chart: ChartOfAccounts,
    calendar: FiscalCalendar,
    store: JournalStore,
    balances: BalanceProjection,
}

impl LedgerService {
    /// Creates an engine with an empty chart and calendar.
    #[must_use]
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Creates an engine preloaded with the SYSCOHADA chart.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed table cannot be loaded.
    pub fn with_syscohada_chart(config: LedgerConfig) -> Result<Self, LedgerError> {
        let service = Self::new(config);
        let created = seed_syscohada(&service.chart)?;
        info!(accounts = created, "SYSCOHADA chart seeded");
        Ok(service)
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// The chart of accounts.
    #[must_use]
    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    /// The fiscal calendar.
    #[must_use]
    pub fn calendar(&self) -> &FiscalCalendar {
        &self.calendar
    }

    /// The entry log.
    #[must_use]
    pub fn store(&self) -> &JournalStore {
        &self.store
    }

    // ------------------------------------------------------------------
    // Accounts and periods
    // ------------------------------------------------------------------

    /// Adds an account to the chart.
    ///
    /// # Errors
    ///
    /// Returns `AccountInUse` when the parent already carries postings,
    /// otherwise see [`ChartOfAccounts::create`].
    pub fn create_account(&self, input: NewAccount) -> Result<Account, LedgerError> {
        if let Some(parent_code) = input.parent_code.as_deref() {
            self.ensure_no_postings(parent_code)?;
        }
        let account = self.chart.create(input)?;
        info!(account = %account.code, postable = account.is_postable, "Account created");
        Ok(account)
    }

    /// Moves an account under another parent, or to the top level.
    ///
    /// # Errors
    ///
    /// Returns `AccountInUse` when the new parent carries postings, otherwise
    /// see [`ChartOfAccounts::set_parent`].
    pub fn set_account_parent(&self, code: &str, parent_code: Option<&str>) -> Result<(), LedgerError> {
        if let Some(parent_code) = parent_code {
            self.ensure_no_postings(parent_code)?;
        }
        self.chart.set_parent(code, parent_code)?;
        info!(account = %code, parent = parent_code.unwrap_or_default(), "Account re-parented");
        Ok(())
    }

    fn ensure_no_postings(&self, code: &str) -> Result<(), LedgerError> {
        let account = self
            .chart
            .get(code)
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))?;
        if account.is_postable && self.store.has_lines_for(account.id) {
            warn!(account = %code, "Refusing to subdivide an account with postings");
            return Err(LedgerError::AccountInUse(code.to_string()));
        }
        Ok(())
    }

    /// Removes an account that no entry references.
    ///
    /// # Errors
    ///
    /// Returns `AccountInUse` when lines reference the account, otherwise see
    /// [`ChartOfAccounts::delete`].
    pub fn delete_account(&self, code: &str) -> Result<Account, LedgerError> {
        let account = self
            .chart
            .get(code)
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))?;
        if self.store.has_lines_for(account.id) {
            warn!(account = %code, "Refusing to delete an account with postings");
            return Err(LedgerError::AccountInUse(code.to_string()));
        }
        let deleted = self.chart.delete(code)?;
        info!(account = %code, "Account deleted");
        Ok(deleted)
    }

    /// Opens a fiscal period.
    ///
    /// # Errors
    ///
    /// See [`FiscalCalendar::open`].
    pub fn open_period(
        &self,
        code: &str,
        label: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FiscalPeriod, LedgerError> {
        self.calendar.open(code, label, start, end)
    }

    /// Closes a fiscal period.
    ///
    /// # Errors
    ///
    /// See [`FiscalCalendar::close`].
    pub fn close_period(&self, id: FiscalPeriodId, actor: ActorId) -> Result<FiscalPeriod, LedgerError> {
        self.calendar.close(id, actor)
    }

    // ------------------------------------------------------------------
    // Automatic postings
    // ------------------------------------------------------------------

    /// Posts a sale invoice (or credit note) as a validated entry.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` for bad amounts or a document posted twice,
    /// account resolution errors, and period errors.
    pub fn post_sale_invoice(&self, doc: &InvoiceDoc, actor: ActorId) -> Result<JournalEntry, LedgerError> {
        let plan = posting::sale_invoice(doc, &self.config.accounts)?;
        self.post_plan(plan, actor)
    }

    /// Posts a purchase invoice (or credit note) as a validated entry.
    ///
    /// # Errors
    ///
    /// Same as [`Self::post_sale_invoice`].
    pub fn post_purchase_invoice(&self, doc: &InvoiceDoc, actor: ActorId) -> Result<JournalEntry, LedgerError> {
        let plan = posting::purchase_invoice(doc, &self.config.accounts)?;
        self.post_plan(plan, actor)
    }

    /// Posts a customer payment as a validated entry.
    ///
    /// # Errors
    ///
    /// Same as [`Self::post_sale_invoice`].
    pub fn post_client_payment(&self, doc: &PaymentDoc, actor: ActorId) -> Result<JournalEntry, LedgerError> {
        let plan = posting::client_payment(doc, &self.config.accounts)?;
        self.post_plan(plan, actor)
    }

    /// Posts a supplier payment as a validated entry.
    ///
    /// # Errors
    ///
    /// Same as [`Self::post_sale_invoice`].
    pub fn post_supplier_payment(&self, doc: &PaymentDoc, actor: ActorId) -> Result<JournalEntry, LedgerError> {
        let plan = posting::supplier_payment(doc, &self.config.accounts)?;
        self.post_plan(plan, actor)
    }

    /// Resolves every account and the period, then stores the entry validated.
    ///
    /// Nothing is stored unless every step succeeds.
    fn post_plan(&self, plan: PostingPlan, actor: ActorId) -> Result<JournalEntry, LedgerError> {
        let accounts = self.chart.resolve_all(&plan.account_codes())?;
        validate_entry_lines(&plan.amounts())?;
        let period = self.calendar.resolve_for_date(plan.date)?;

        let lines = plan
            .lines
            .into_iter()
            .zip(&accounts)
            .map(|(line, account)| EntryLine::new(account, line.label, line.debit, line.credit))
            .collect();
        let entry = JournalEntry::draft(
            plan.journal,
            plan.date,
            plan.label,
            plan.reference,
            period.id,
            lines,
            plan.source,
            actor,
        );

        self.store.claim_source(&entry.source, entry.id)?;
        let entry = self.store.insert_validated(entry, actor);
        self.apply_balances(&entry);

        info!(
            entry_id = %entry.id,
            journal = %entry.journal,
            number = entry.number().as_deref().unwrap_or_default(),
            source = entry.source.kind(),
            amount = %entry.total_debit,
            "Entry posted"
        );
        Ok(entry)
    }

    /// Posts the entry a business event calls for, applying the configured
    /// [`PostingPolicy`] on failure.
    ///
    /// Under `Lenient` a failed posting is logged and `Ok(None)` is returned,
    /// so the operation that emitted the event still completes.
    ///
    /// # Errors
    ///
    /// Under `Strict`, the posting error.
    pub fn handle_event(
        &self,
        event: &BusinessEvent,
        actor: ActorId,
    ) -> Result<Option<JournalEntry>, LedgerError> {
        let result = match event {
            BusinessEvent::SaleInvoiceValidated(doc) => self.post_sale_invoice(doc, actor),
            BusinessEvent::PurchaseInvoiceValidated(doc) => self.post_purchase_invoice(doc, actor),
            BusinessEvent::ClientPaymentValidated(doc) => self.post_client_payment(doc, actor),
            BusinessEvent::SupplierPaymentValidated(doc) => self.post_supplier_payment(doc, actor),
        };

        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(err) => match self.config.posting_policy {
                PostingPolicy::Lenient => {
                    error!(
                        event = event.name(),
                        document = event.document_number(),
                        error = %err,
                        code = err.error_code(),
                        "Automatic posting failed, event completes without an entry"
                    );
                    Ok(None)
                }
                PostingPolicy::Strict => {
                    warn!(
                        event = event.name(),
                        document = event.document_number(),
                        error = %err,
                        "Automatic posting failed, event rejected"
                    );
                    Err(err)
                }
            },
        }
    }

    // ------------------------------------------------------------------
    // Manual entries
    // ------------------------------------------------------------------

    fn manual_lines(&self, input: &ManualEntryInput) -> Result<Vec<EntryLine>, LedgerError> {
        if input.label.trim().is_empty() {
            return Err(LedgerError::ValidationFailed("entry label is required".to_string()));
        }
        let amounts: Vec<(Decimal, Decimal)> = input.lines.iter().map(|l| (l.debit, l.credit)).collect();
        validate_line_shapes(&amounts)?;

        let codes: Vec<&str> = input.lines.iter().map(|l| l.account_code.as_str()).collect();
        let accounts = self.chart.resolve_all(&codes)?;

        Ok(input
            .lines
            .iter()
            .zip(&accounts)
            .map(|(line, account)| {
                let label = line.label.clone().unwrap_or_else(|| input.label.clone());
                EntryLine::new(account, label, line.debit, line.credit)
            })
            .collect())
    }

    /// Stores caller-supplied lines as a draft.
    ///
    /// Line shape is checked now; balance is checked at validation.
    ///
    /// # Errors
    ///
    /// Returns line shape, account resolution and period errors.
    pub fn post_manual_entry(&self, input: &ManualEntryInput, actor: ActorId) -> Result<JournalEntry, LedgerError> {
        let lines = self.manual_lines(input)?;
        let period = self.calendar.resolve_for_date(input.date)?;

        let entry = self.store.insert_draft(JournalEntry::draft(
            input.journal,
            input.date,
            input.label.clone(),
            input.reference.clone(),
            period.id,
            lines,
            SourceDocument::Manual,
            actor,
        ));
        info!(entry_id = %entry.id, journal = %entry.journal, actor = %actor, "Draft entry created");
        Ok(entry)
    }

    /// Replaces the content of a draft.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyValidated` for validated entries, plus the errors of
    /// [`Self::post_manual_entry`].
    pub fn update_draft(
        &self,
        id: EntryId,
        input: &ManualEntryInput,
        actor: ActorId,
    ) -> Result<JournalEntry, LedgerError> {
        let lines = self.manual_lines(input)?;
        let period = self.calendar.resolve_for_date(input.date)?;

        let entry = self.store.update_draft(id, |entry| {
            entry.journal = input.journal;
            entry.date = input.date;
            entry.label.clone_from(&input.label);
            entry.reference.clone_from(&input.reference);
            entry.period_id = period.id;
            entry.set_lines(lines);
            Ok(())
        })?;
        info!(entry_id = %id, actor = %actor, "Draft entry updated");
        Ok(entry)
    }

    /// Soft-deletes a draft.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or `AlreadyValidated`.
    pub fn delete_draft(&self, id: EntryId, actor: ActorId) -> Result<JournalEntry, LedgerError> {
        let entry = self.store.delete_draft(id, Utc::now())?;
        info!(entry_id = %id, actor = %actor, "Draft entry deleted");
        Ok(entry)
    }

    // ------------------------------------------------------------------
    // State transitions
    // ------------------------------------------------------------------

    /// Validates a draft: balance and period are checked, then the entry gets
    /// the next sequence of its journal and its lines reach the balances.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyValidated`, `Unbalanced` (status unchanged) or
    /// `PeriodClosed`.
    pub fn validate(&self, id: EntryId, actor: ActorId) -> Result<JournalEntry, LedgerError> {
        let result = self.store.validate_draft(id, actor, |entry| {
            validate_balanced(entry.totals())?;
            self.calendar.ensure_open(entry.period_id)
        });

        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                warn!(entry_id = %id, error = %err, "Entry validation rejected");
                return Err(err);
            }
        };
        self.apply_balances(&entry);

        info!(
            entry_id = %entry.id,
            journal = %entry.journal,
            number = entry.number().as_deref().unwrap_or_default(),
            actor = %actor,
            "Entry validated"
        );
        Ok(entry)
    }

    /// Cancels a validated entry by appending its mirror image.
    ///
    /// The reversal is booked in the period of `date`, created validated and
    /// linked to the original, which is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `OnlyValidatedCanBeReversed`, `AlreadyReversed`, or period
    /// errors for `date`.
    pub fn reverse(&self, id: EntryId, date: NaiveDate, actor: ActorId) -> Result<JournalEntry, LedgerError> {
        let original = self.store.get(id).ok_or(LedgerError::EntryNotFound(id))?;
        if !original.is_validated() {
            warn!(entry_id = %id, "Attempt to reverse a draft");
            return Err(LedgerError::OnlyValidatedCanBeReversed(id));
        }
        if self.store.reversed_by(id).is_some() {
            warn!(entry_id = %id, "Attempt to reverse an entry twice");
            return Err(LedgerError::AlreadyReversed(id));
        }

        let period = self.calendar.resolve_for_date(date)?;
        let reversal = ReversalService::build(&original, date, period.id, actor);
        if original.is_reversal {
            let root = self.store.chain_root(&original);
            self.store
                .claim_reinstating_reversal(&original.source, root, id, reversal.id)
                .inspect_err(|err| warn!(entry_id = %id, error = %err, "Reinstatement rejected"))?;
        } else {
            self.store.claim_reversal(id, reversal.id)?;
        }
        let reversal = self.store.insert_validated(reversal, actor);
        self.apply_balances(&reversal);

        info!(
            original_entry_id = %id,
            reversal_entry_id = %reversal.id,
            number = reversal.number().as_deref().unwrap_or_default(),
            actor = %actor,
            "Reversal entry created"
        );
        Ok(reversal)
    }

    /// Letters lines of one account together.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, `LineNotFound`, `ValidationFailed` (fewer than
    /// two lines on the account), `AlreadyReconciled` or `UnbalancedMatch`.
    pub fn reconcile(
        &self,
        account_code: &str,
        line_ids: &[EntryLineId],
        actor: ActorId,
    ) -> Result<Reconciliation, LedgerError> {
        let account = self
            .chart
            .get(account_code)
            .ok_or_else(|| LedgerError::AccountNotFound(account_code.to_string()))?;
        let date = Utc::now().date_naive();

        let (code, lines) = self
            .store
            .reconcile(account.id, line_ids, date)
            .inspect_err(|err| warn!(account = %account_code, error = %err, "Reconciliation rejected"))?;

        info!(account = %account_code, code = %code, lines = lines.len(), actor = %actor, "Lines reconciled");
        Ok(Reconciliation {
            account_code: account.code,
            code,
            date,
            line_ids: lines,
        })
    }

    /// Removes a lettering code from an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `ReconciliationNotFound`.
    pub fn unreconcile(&self, account_code: &str, code: &str, actor: ActorId) -> Result<usize, LedgerError> {
        let account = self
            .chart
            .get(account_code)
            .ok_or_else(|| LedgerError::AccountNotFound(account_code.to_string()))?;
        let cleared = self.store.unreconcile(account.id, account_code, code)?;
        info!(account = %account_code, code = %code, lines = cleared, actor = %actor, "Reconciliation removed");
        Ok(cleared)
    }

    // ------------------------------------------------------------------
    // Queries and projections
    // ------------------------------------------------------------------

    /// Copy of an entry.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`.
    pub fn entry(&self, id: EntryId) -> Result<JournalEntry, LedgerError> {
        self.store.get(id).ok_or(LedgerError::EntryNotFound(id))
    }

    /// Drafts awaiting validation, oldest first.
    #[must_use]
    pub fn drafts(&self) -> Vec<JournalEntry> {
        self.store.drafts()
    }

    /// Validated entries in chronological order.
    #[must_use]
    pub fn validated_entries(&self) -> Vec<JournalEntry> {
        self.store.validated_entries()
    }

    fn apply_balances(&self, entry: &JournalEntry) {
        for line in &entry.lines {
            self.balances.record(line.account_id, line.debit, line.credit);
        }
    }

    /// Cached totals of one account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`.
    pub fn account_balance(&self, code: &str) -> Result<AccountBalance, LedgerError> {
        let account = self
            .chart
            .get(code)
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))?;
        Ok(self.balances.get(account.id))
    }

    /// Totals of an account and all its descendants.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`.
    pub fn rolled_up_balance(&self, code: &str) -> Result<AccountBalance, LedgerError> {
        let account = self
            .chart
            .get(code)
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))?;
        let mut total = AccountBalance::new(account.id);
        for id in self.chart.subtree(code) {
            let balance = self.balances.get(id);
            total.add_debit(balance.debit_total);
            total.add_credit(balance.credit_total);
        }
        Ok(total)
    }

    /// Recomputes every cached balance from the validated log.
    pub fn rebuild_balances(&self) {
        let entries = self.store.validated_entries();
        self.balances.rebuild(
            entries
                .iter()
                .flat_map(|e| e.lines.iter().map(|l| (l.account_id, l.debit, l.credit))),
        );
        info!(entries = entries.len(), "Balance projection rebuilt");
    }
}
