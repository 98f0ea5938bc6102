//! Chart of accounts + journal engine.
//!
//! The only writer of `Account.balance`. Every posting path funnels through
//! [`post_entry`], which validates the double-entry invariants and applies
//! balance updates inside the caller's transaction — the entry and all
//! balance changes commit or fail together.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use tradebook_accounting::{
    Account, AccountType, JournalEntry, LedgerError, Posting, SourceRef, validate_postings,
};
use tradebook_core::{AccountId, Clock, JournalEntryId, Money, UserId};

use crate::store::{Store, StoreState};

/// Persist a fully-built journal entry and apply its balance effects.
///
/// Must run inside a transaction: a failure part-way through leaves balance
/// mutations behind that only the transaction rollback undoes.
pub(crate) fn post_prepared(
    state: &mut StoreState,
    entry: JournalEntry,
) -> Result<JournalEntry, LedgerError> {
    // Resolve all accounts before the balance check and before mutating any
    // balance: a bad account reference is reported as such, not as an
    // arithmetic problem.
    for posting in &entry.postings {
        let account = state
            .account(posting.account_id)
            .ok_or(LedgerError::UnknownAccount(posting.account_id))?;
        if !account.is_active {
            return Err(LedgerError::InactiveAccount(posting.account_id));
        }
    }

    validate_postings(&entry.postings)?;

    for posting in &entry.postings {
        let account = state
            .account_mut(posting.account_id)
            .ok_or(LedgerError::UnknownAccount(posting.account_id))?;
        account.apply_posting(posting.side, posting.amount)?;
    }

    state.push_journal_entry(entry.clone());
    tracing::info!(
        journal_entry_id = %entry.id,
        postings = entry.postings.len(),
        "journal entry posted"
    );
    Ok(entry)
}

/// Build and persist a journal entry from raw postings.
pub(crate) fn post_entry(
    state: &mut StoreState,
    postings: Vec<Posting>,
    description: impl Into<String>,
    reference: Option<String>,
    source: Option<SourceRef>,
    performed_by: UserId,
    now: DateTime<Utc>,
) -> Result<JournalEntry, LedgerError> {
    let entry = JournalEntry {
        id: JournalEntryId::generate(now.date_naive()),
        postings,
        description: description.into(),
        reference,
        source,
        performed_by,
        posted_at: now,
    };
    post_prepared(state, entry)
}

/// One line of a trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBalanceRow {
    pub code: String,
    pub name: String,
    pub debit: Money,
    pub credit: Money,
}

/// Ledger-wide debit/credit summary over active accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBalance {
    pub rows: Vec<TrialBalanceRow>,
    pub total_debits: i128,
    pub total_credits: i128,
}

impl TrialBalance {
    pub fn is_balanced(&self) -> bool {
        self.total_debits == self.total_credits
    }
}

/// Chart-of-accounts and journal operations over a [`Store`].
pub struct LedgerService<S, C> {
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S: Store, C: Clock> LedgerService<S, C> {
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Create an account; fails with `DuplicateCode` if the code is taken.
    pub fn create_account(
        &self,
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        parent_id: Option<AccountId>,
    ) -> Result<Account, LedgerError> {
        let code = code.into();
        let name = name.into();
        let now = self.clock.now();

        self.store.with_transaction(|state| {
            if state.account_by_code(&code).is_some() {
                return Err(LedgerError::DuplicateCode(code.clone()));
            }
            if let Some(parent) = parent_id {
                if state.account(parent).is_none() {
                    return Err(LedgerError::AccountNotFound(parent));
                }
            }
            let account = Account::new(code.clone(), name.clone(), account_type, parent_id, now);
            state.insert_account(account.clone());
            tracing::info!(account_id = %account.id, code = %account.code, "account created");
            Ok(account)
        })
    }

    /// Re-parent an account, rejecting links that would close a cycle.
    pub fn set_parent(
        &self,
        account_id: AccountId,
        parent_id: Option<AccountId>,
    ) -> Result<(), LedgerError> {
        self.store.with_transaction(|state| {
            if state.account(account_id).is_none() {
                return Err(LedgerError::AccountNotFound(account_id));
            }
            if let Some(parent) = parent_id {
                // Walk up from the proposed parent; reaching ourselves means
                // the new link would close a cycle.
                let mut cursor = Some(parent);
                while let Some(current) = cursor {
                    if current == account_id {
                        return Err(LedgerError::ParentCycle(account_id));
                    }
                    cursor = state
                        .account(current)
                        .ok_or(LedgerError::AccountNotFound(current))?
                        .parent_id;
                }
            }
            let account = state
                .account_mut(account_id)
                .ok_or(LedgerError::AccountNotFound(account_id))?;
            account.parent_id = parent_id;
            Ok(())
        })
    }

    /// Soft-disable an account; existing history is untouched.
    pub fn deactivate_account(&self, account_id: AccountId) -> Result<(), LedgerError> {
        self.store.with_transaction(|state| {
            let account = state
                .account_mut(account_id)
                .ok_or(LedgerError::AccountNotFound(account_id))?;
            account.is_active = false;
            Ok(())
        })
    }

    /// Hard-delete; refused once the account has postings.
    pub fn delete_account(&self, account_id: AccountId) -> Result<(), LedgerError> {
        self.store.with_transaction(|state| {
            if state.account(account_id).is_none() {
                return Err(LedgerError::AccountNotFound(account_id));
            }
            if state.postings_for(account_id).next().is_some() {
                return Err(LedgerError::HasTransactions(account_id));
            }
            state.remove_account(account_id);
            Ok(())
        })
    }

    pub fn get_account(&self, account_id: AccountId) -> Result<Account, LedgerError> {
        self.store.read(|state| {
            state
                .account(account_id)
                .cloned()
                .ok_or(LedgerError::AccountNotFound(account_id))
        })
    }

    /// Fast path: the denormalized balance.
    pub fn get_balance(&self, account_id: AccountId) -> Result<Money, LedgerError> {
        Ok(self.get_account(account_id)?.balance)
    }

    /// Audit path: recompute the balance from posting history.
    ///
    /// Must always agree with [`Self::get_balance`]; a divergence means a
    /// balance write escaped the ledger.
    pub fn recompute_balance(&self, account_id: AccountId) -> Result<Money, LedgerError> {
        self.store.read(|state| {
            let account = state
                .account(account_id)
                .ok_or(LedgerError::AccountNotFound(account_id))?;
            let mut balance = Money::ZERO;
            for posting in state.postings_for(account_id) {
                let delta = account.account_type.signed_delta(posting.side, posting.amount);
                balance = balance
                    .checked_add(delta)
                    .ok_or(LedgerError::BalanceOverflow)?;
            }
            Ok(balance)
        })
    }

    /// Post a balanced set of postings as one atomic journal entry.
    pub fn post_journal_entry(
        &self,
        postings: Vec<Posting>,
        description: impl Into<String>,
        reference: Option<String>,
        source: Option<SourceRef>,
        performed_by: UserId,
    ) -> Result<JournalEntry, LedgerError> {
        let now = self.clock.now();
        let description = description.into();
        self.store
            .with_transaction(|state| post_entry(state, postings, description, reference, source, performed_by, now))
    }

    /// Record a sale: debit a cash/receivable account, credit revenue.
    pub fn record_sale(
        &self,
        cash_account: AccountId,
        revenue_account: AccountId,
        amount: Money,
        reference: Option<String>,
        source: Option<SourceRef>,
        performed_by: UserId,
    ) -> Result<JournalEntry, LedgerError> {
        self.post_journal_entry(
            vec![
                Posting::debit(cash_account, amount),
                Posting::credit(revenue_account, amount),
            ],
            "Sale recorded",
            reference,
            source,
            performed_by,
        )
    }

    /// Record an expense: debit the expense account, credit the payment account.
    pub fn record_expense(
        &self,
        expense_account: AccountId,
        payment_account: AccountId,
        amount: Money,
        description: impl Into<String>,
        performed_by: UserId,
    ) -> Result<JournalEntry, LedgerError> {
        self.post_journal_entry(
            vec![
                Posting::debit(expense_account, amount),
                Posting::credit(payment_account, amount),
            ],
            description,
            None,
            Some(SourceRef {
                source_type: "expense".to_string(),
                source_id: String::new(),
            }),
            performed_by,
        )
    }

    /// Transfer between accounts: debit the destination, credit the origin.
    pub fn transfer_funds(
        &self,
        from_account: AccountId,
        to_account: AccountId,
        amount: Money,
        notes: Option<String>,
        performed_by: UserId,
    ) -> Result<JournalEntry, LedgerError> {
        let description = notes.unwrap_or_else(|| format!("Transfer {amount}"));
        self.post_journal_entry(
            vec![
                Posting::debit(to_account, amount),
                Posting::credit(from_account, amount),
            ],
            description,
            None,
            Some(SourceRef {
                source_type: "transfer".to_string(),
                source_id: String::new(),
            }),
            performed_by,
        )
    }

    pub fn get_entry(&self, id: &JournalEntryId) -> Result<JournalEntry, LedgerError> {
        self.store.read(|state| {
            state
                .journal_entry(id)
                .cloned()
                .ok_or_else(|| LedgerError::EntryNotFound(id.to_string()))
        })
    }

    /// Post the mirror-image correction of an existing entry.
    ///
    /// Posted entries are immutable; this is the only sanctioned way to
    /// undo one.
    pub fn reverse_entry(
        &self,
        id: &JournalEntryId,
        performed_by: UserId,
    ) -> Result<JournalEntry, LedgerError> {
        let now = self.clock.now();
        self.store.with_transaction(|state| {
            let original = state
                .journal_entry(id)
                .ok_or_else(|| LedgerError::EntryNotFound(id.to_string()))?;
            let reversal = original.reversal(performed_by, now);
            post_prepared(state, reversal)
        })
    }

    /// Debit/credit summary over active accounts.
    ///
    /// Balances sit in the column of their normal side; a balance that has
    /// swung negative shows up (absolute) in the opposite column.
    pub fn trial_balance(&self) -> Result<TrialBalance, LedgerError> {
        self.store.read(|state| {
            let mut rows: Vec<TrialBalanceRow> = Vec::new();
            let mut total_debits: i128 = 0;
            let mut total_credits: i128 = 0;

            let mut accounts: Vec<&Account> =
                state.accounts().filter(|a| a.is_active).collect();
            accounts.sort_by(|a, b| a.code.cmp(&b.code));

            for account in accounts {
                if account.balance.is_zero() {
                    continue;
                }
                let normal_debit =
                    account.account_type.normal_side() == tradebook_accounting::Side::Debit;
                let positive = account.balance.is_positive();
                let magnitude = if positive {
                    account.balance
                } else {
                    -account.balance
                };

                let (debit, credit) = if normal_debit == positive {
                    (magnitude, Money::ZERO)
                } else {
                    (Money::ZERO, magnitude)
                };
                total_debits += debit.minor() as i128;
                total_credits += credit.minor() as i128;
                rows.push(TrialBalanceRow {
                    code: account.code.clone(),
                    name: account.name.clone(),
                    debit,
                    credit,
                });
            }

            Ok(TrialBalance {
                rows,
                total_debits,
                total_credits,
            })
        })
    }
}
