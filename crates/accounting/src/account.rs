use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradebook_core::{AccountId, Money};

use crate::error::LedgerError;
use crate::journal::Side;

/// High-level account kind (determines normal balance side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

impl AccountType {
    /// The side that increases this account type's balance.
    pub fn normal_side(&self) -> Side {
        match self {
            AccountType::Asset | AccountType::Expense => Side::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Income => Side::Credit,
        }
    }

    /// Signed balance effect of posting `amount` on `side` to this type.
    pub fn signed_delta(&self, side: Side, amount: Money) -> Money {
        if side == self.normal_side() {
            amount
        } else {
            -amount
        }
    }
}

/// A ledger account with its denormalized running balance.
///
/// `balance` always equals the signed sum of all postings against the
/// account; only the ledger service mutates it, inside the same transaction
/// that persists the journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Unique chart code, e.g. "1000" for Cash.
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    /// Flat hierarchy: parent is just a foreign key, cycles rejected on write.
    pub parent_id: Option<AccountId>,
    pub description: Option<String>,
    pub is_active: bool,
    pub balance: Money,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        parent_id: Option<AccountId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AccountId::new(),
            code: code.into(),
            name: name.into(),
            account_type,
            parent_id,
            description: None,
            is_active: true,
            balance: Money::ZERO,
            created_at,
        }
    }

    /// Apply a posting's balance effect per the normal-balance rule.
    pub fn apply_posting(&mut self, side: Side, amount: Money) -> Result<(), LedgerError> {
        let delta = self.account_type.signed_delta(side, amount);
        self.balance = self
            .balance
            .checked_add(delta)
            .ok_or(LedgerError::BalanceOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(account_type: AccountType) -> Account {
        Account::new("1000", "Test", account_type, None, Utc::now())
    }

    #[test]
    fn debit_increases_asset_and_expense_balances() {
        for t in [AccountType::Asset, AccountType::Expense] {
            let mut a = account(t);
            a.apply_posting(Side::Debit, Money::from_minor(100)).unwrap();
            assert_eq!(a.balance, Money::from_minor(100));
            a.apply_posting(Side::Credit, Money::from_minor(30)).unwrap();
            assert_eq!(a.balance, Money::from_minor(70));
        }
    }

    #[test]
    fn credit_increases_liability_equity_income_balances() {
        for t in [
            AccountType::Liability,
            AccountType::Equity,
            AccountType::Income,
        ] {
            let mut a = account(t);
            a.apply_posting(Side::Credit, Money::from_minor(100)).unwrap();
            assert_eq!(a.balance, Money::from_minor(100));
            a.apply_posting(Side::Debit, Money::from_minor(30)).unwrap();
            assert_eq!(a.balance, Money::from_minor(70));
        }
    }

    #[test]
    fn balance_overflow_is_reported() {
        let mut a = account(AccountType::Asset);
        a.balance = Money::from_minor(i64::MAX);
        let err = a
            .apply_posting(Side::Debit, Money::from_minor(1))
            .unwrap_err();
        assert_eq!(err, LedgerError::BalanceOverflow);
    }

    #[test]
    fn normal_side_matches_account_type() {
        assert_eq!(AccountType::Asset.normal_side(), Side::Debit);
        assert_eq!(AccountType::Expense.normal_side(), Side::Debit);
        assert_eq!(AccountType::Liability.normal_side(), Side::Credit);
        assert_eq!(AccountType::Equity.normal_side(), Side::Credit);
        assert_eq!(AccountType::Income.normal_side(), Side::Credit);
    }
}
