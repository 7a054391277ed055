use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use moolah_core::core::commands::{AddExpenseCommand, Command, UndoCommand};
use moolah_core::core::services::StatisticsService;
use moolah_core::domain::{
    Category, Description, Expense, Price, TimeUnit, Timestamp, UniqueIdentifier,
};
use moolah_core::ledger::MooLah;
use moolah_core::utils::persistence::{load_moolah_from_file, save_moolah_to_file};
use moolah_core::Model;
use tempfile::tempdir;

fn build_sample_moolah(expense_count: usize) -> MooLah {
    let mut moolah = MooLah::new();
    let categories = ["Food", "Transport", "Bills", "Leisure"]
        .map(|name| Category::new(name).expect("valid category"));
    let start_date = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");

    for idx in 0..expense_count {
        let day = start_date + Duration::days((idx % 365) as i64);
        let expense = Expense::new(
            Description::new(format!("Expense {idx}")).expect("valid description"),
            Price::from_cents(150 + (idx % 5_000) as u64),
            [categories[idx % categories.len()].clone()],
            Timestamp::start_of_day(day),
            UniqueIdentifier::generate(),
        );
        moolah.add_expense(expense);
    }
    moolah
}

fn bench_moolah_io(c: &mut Criterion) {
    let moolah = build_sample_moolah(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("moolah.json");

    c.bench_function("moolah_save_10k", |b| {
        b.iter(|| {
            save_moolah_to_file(&moolah, &file_path).expect("save ledger");
        })
    });

    save_moolah_to_file(&moolah, &file_path).expect("seed");

    c.bench_function("moolah_load_10k", |b| {
        b.iter(|| {
            let loaded = load_moolah_from_file(&file_path).expect("load ledger");
            black_box(loaded);
        })
    });
}

fn bench_statistics(c: &mut Criterion) {
    let moolah = build_sample_moolah(black_box(10_000));

    c.bench_function("stats_by_category_10k", |b| {
        b.iter(|| {
            let window = StatisticsService::resolve_window(moolah.expenses(), None, None)
                .expect("window");
            black_box(StatisticsService::by_category(moolah.expenses(), window));
        })
    });

    c.bench_function("stats_trend_weekly_10k", |b| {
        b.iter(|| {
            let window = StatisticsService::resolve_window(moolah.expenses(), None, None)
                .expect("window");
            black_box(
                StatisticsService::trend(moolah.expenses(), window, TimeUnit::Week).expect("trend"),
            );
        })
    });
}

fn bench_snapshot_undo(c: &mut Criterion) {
    let moolah = build_sample_moolah(black_box(10_000));

    c.bench_function("add_then_undo_10k", |b| {
        b.iter_batched(
            || Model::with_moolah(moolah.clone(), Default::default()),
            |mut model| {
                let extra = Expense::create(
                    Description::new("Bench").expect("valid description"),
                    Price::from_cents(100),
                    [],
                );
                AddExpenseCommand::new(extra).run(&mut model).expect("add");
                UndoCommand.run(&mut model).expect("undo");
                black_box(model);
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_moolah_io, bench_statistics, bench_snapshot_undo);
criterion_main!(benches);
