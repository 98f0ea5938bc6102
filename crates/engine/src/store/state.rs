use std::collections::HashMap;

use tradebook_accounting::{Account, JournalEntry, Posting, SourceRef};
use tradebook_core::{AccountId, JournalEntryId, OrderId, ProductId};
use tradebook_inventory::{Product, StockMovement};
use tradebook_orders::{Order, OrderStateTransition};

/// The engine's full data set, as seen inside one transaction.
///
/// Journal entries, state transitions, and stock movements are append-only;
/// accounts, orders, and products are keyed entity tables.
#[derive(Debug, Default, Clone)]
pub struct StoreState {
    accounts: HashMap<AccountId, Account>,
    journal_entries: Vec<JournalEntry>,
    orders: HashMap<OrderId, Order>,
    order_transitions: Vec<OrderStateTransition>,
    products: HashMap<ProductId, Product>,
    stock_movements: Vec<StockMovement>,
}

impl StoreState {
    // --- accounts ---

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    pub fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(&id)
    }

    pub fn account_by_code(&self, code: &str) -> Option<&Account> {
        self.accounts.values().find(|a| a.code == code)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn insert_account(&mut self, account: Account) {
        self.accounts.insert(account.id, account);
    }

    pub fn remove_account(&mut self, id: AccountId) -> Option<Account> {
        self.accounts.remove(&id)
    }

    // --- journal ---

    pub fn journal_entries(&self) -> &[JournalEntry] {
        &self.journal_entries
    }

    pub fn journal_entry(&self, id: &JournalEntryId) -> Option<&JournalEntry> {
        self.journal_entries.iter().find(|e| &e.id == id)
    }

    /// First entry recorded against the given source (creation order).
    pub fn journal_entry_for_source(&self, source: &SourceRef) -> Option<&JournalEntry> {
        self.journal_entries
            .iter()
            .find(|e| e.source.as_ref() == Some(source))
    }

    /// All postings ever made against an account, in posting order.
    pub fn postings_for(&self, account_id: AccountId) -> impl Iterator<Item = &Posting> {
        self.journal_entries
            .iter()
            .flat_map(|e| e.postings.iter())
            .filter(move |p| p.account_id == account_id)
    }

    pub fn push_journal_entry(&mut self, entry: JournalEntry) {
        self.journal_entries.push(entry);
    }

    // --- orders ---

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    pub fn put_order(&mut self, order: Order) {
        self.orders.insert(order.id, order);
    }

    pub fn order_transitions(&self) -> &[OrderStateTransition] {
        &self.order_transitions
    }

    pub fn transitions_for(&self, order_id: OrderId) -> impl Iterator<Item = &OrderStateTransition> {
        self.order_transitions
            .iter()
            .filter(move |t| t.order_id == order_id)
    }

    pub fn push_order_transition(&mut self, transition: OrderStateTransition) {
        self.order_transitions.push(transition);
    }

    // --- inventory ---

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    pub fn product_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.products.get_mut(&id)
    }

    pub fn product_by_sku(&self, sku: &str) -> Option<&Product> {
        self.products.values().find(|p| p.sku == sku)
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn insert_product(&mut self, product: Product) {
        self.products.insert(product.id, product);
    }

    pub fn stock_movements(&self) -> &[StockMovement] {
        &self.stock_movements
    }

    pub fn movements_for(&self, product_id: ProductId) -> impl Iterator<Item = &StockMovement> {
        self.stock_movements
            .iter()
            .filter(move |m| m.product_id == product_id)
    }

    pub fn push_stock_movement(&mut self, movement: StockMovement) {
        self.stock_movements.push(movement);
    }
}
