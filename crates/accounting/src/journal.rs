use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradebook_core::{AccountId, JournalEntryId, Money, UserId};

use crate::error::LedgerError;

/// Which side of the books a posting lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Debit,
    Credit,
}

impl Side {
    pub fn flipped(&self) -> Side {
        match self {
            Side::Debit => Side::Credit,
            Side::Credit => Side::Debit,
        }
    }
}

/// One line of a journal entry, affecting exactly one account.
///
/// Never exists outside a `JournalEntry`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub account_id: AccountId,
    pub side: Side,
    /// Strictly positive; validated before the entry is accepted.
    pub amount: Money,
    pub description: Option<String>,
}

impl Posting {
    pub fn debit(account_id: AccountId, amount: Money) -> Self {
        Self {
            account_id,
            side: Side::Debit,
            amount,
            description: None,
        }
    }

    pub fn credit(account_id: AccountId, amount: Money) -> Self {
        Self {
            account_id,
            side: Side::Credit,
            amount,
            description: None,
        }
    }
}

/// Where a journal entry came from (e.g. `order` / order id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub source_type: String,
    pub source_id: String,
}

impl SourceRef {
    pub fn order(order_id: impl ToString) -> Self {
        Self {
            source_type: "order".to_string(),
            source_id: order_id.to_string(),
        }
    }
}

/// A balanced, atomic group of postings representing one financial event.
///
/// Immutable once posted: corrections are reversing entries, never edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: JournalEntryId,
    pub postings: Vec<Posting>,
    pub description: String,
    pub reference: Option<String>,
    pub source: Option<SourceRef>,
    pub performed_by: UserId,
    pub posted_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Build the mirror-image correction of this entry.
    ///
    /// Every posting keeps its account and amount but flips sides, so the
    /// net balance effect of original + reversal is zero on every account.
    pub fn reversal(&self, performed_by: UserId, posted_at: DateTime<Utc>) -> JournalEntry {
        JournalEntry {
            id: JournalEntryId::generate(posted_at.date_naive()),
            postings: self
                .postings
                .iter()
                .map(|p| Posting {
                    account_id: p.account_id,
                    side: p.side.flipped(),
                    amount: p.amount,
                    description: p.description.clone(),
                })
                .collect(),
            description: format!("Reversal of {}", self.id),
            reference: Some(self.id.to_string()),
            source: self.source.clone(),
            performed_by,
            posted_at,
        }
    }
}

/// Independent debit/credit totals of a validated entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTotals {
    pub debits: i128,
    pub credits: i128,
}

/// Validate the double-entry invariants of a posting set.
///
/// Checks, in order: non-empty, all amounts strictly positive, and exact
/// equality of debit and credit totals. Equality is exact on purpose — a
/// tolerance would paper over caller bugs instead of surfacing them.
pub fn validate_postings(postings: &[Posting]) -> Result<EntryTotals, LedgerError> {
    if postings.is_empty() {
        return Err(LedgerError::EmptyEntry);
    }
    if postings.iter().any(|p| !p.amount.is_positive()) {
        return Err(LedgerError::NonPositiveAmount);
    }

    let side_total = |side: Side| {
        Money::sum(
            postings
                .iter()
                .filter(|p| p.side == side)
                .map(|p| p.amount),
        )
    };
    let debits = side_total(Side::Debit);
    let credits = side_total(Side::Credit);

    if debits != credits {
        return Err(LedgerError::UnbalancedEntry { debits, credits });
    }

    Ok(EntryTotals { debits, credits })
}
