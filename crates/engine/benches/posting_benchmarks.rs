use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use std::sync::Arc;

use tradebook_accounting::{AccountType, Posting};
use tradebook_core::{AccountId, Money, SystemClock, UserId};
use tradebook_engine::{InMemoryStore, LedgerService};

fn setup_ledger() -> (
    LedgerService<InMemoryStore, SystemClock>,
    AccountId,
    AccountId,
    UserId,
) {
    let ledger = LedgerService::new(Arc::new(InMemoryStore::new()), Arc::new(SystemClock));
    let cash = ledger
        .create_account("1000", "Cash", AccountType::Asset, None)
        .unwrap();
    let revenue = ledger
        .create_account("4000", "Sales Revenue", AccountType::Income, None)
        .unwrap();
    (ledger, cash.id, revenue.id, UserId::new())
}

fn bench_posting_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("posting_latency");
    group.sample_size(1000);

    group.bench_function("two_posting_entry", |b| {
        let (ledger, cash, revenue, user) = setup_ledger();
        b.iter(|| {
            ledger
                .record_sale(
                    cash,
                    revenue,
                    black_box(Money::from_minor(5000)),
                    None,
                    None,
                    user,
                )
                .unwrap();
        });
    });

    // Wide entries: one debit split across many credit lines.
    for lines in [2i64, 8, 32].iter() {
        group.bench_with_input(BenchmarkId::new("wide_entry", lines), lines, |b, &lines| {
            let (ledger, cash, revenue, user) = setup_ledger();
            b.iter(|| {
                let mut postings = vec![Posting::debit(cash, Money::from_minor(lines * 100))];
                for _ in 0..lines {
                    postings.push(Posting::credit(revenue, Money::from_minor(100)));
                }
                ledger
                    .post_journal_entry(postings, "split sale", None, None, user)
                    .unwrap();
            });
        });
    }

    group.finish();
}

fn bench_balance_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("balance_recompute");

    for entry_count in [10i64, 100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::new("replay_postings", entry_count),
            entry_count,
            |b, &count| {
                let (ledger, cash, revenue, user) = setup_ledger();
                for i in 0..count {
                    ledger
                        .record_sale(
                            cash,
                            revenue,
                            Money::from_minor(100 + i),
                            None,
                            None,
                            user,
                        )
                        .unwrap();
                }

                b.iter(|| {
                    black_box(ledger.recompute_balance(black_box(cash)).unwrap());
                });
            },
        );
    }

    group.finish();
}

fn bench_trial_balance(c: &mut Criterion) {
    let mut group = c.benchmark_group("trial_balance");
    group.throughput(Throughput::Elements(1));

    for account_count in [10, 100, 500].iter() {
        group.bench_with_input(
            BenchmarkId::new("active_accounts", account_count),
            account_count,
            |b, &count| {
                let (ledger, cash, _, user) = setup_ledger();
                for i in 0..count {
                    let acct = ledger
                        .create_account(
                            format!("5{i:03}"),
                            format!("Expense {i}"),
                            AccountType::Expense,
                            None,
                        )
                        .unwrap();
                    ledger
                        .record_expense(acct.id, cash, Money::from_minor(100), "seed", user)
                        .unwrap();
                }

                b.iter(|| {
                    black_box(ledger.trial_balance().unwrap());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_posting_latency,
    bench_balance_recompute,
    bench_trial_balance
);
criterion_main!(benches);
