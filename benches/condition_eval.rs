//! Condition matching benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use uuid::Uuid;

use deskflow::domain::models::{Condition, TicketSnapshot};
use deskflow::services::all_conditions_match;

fn bench_condition_matching(c: &mut Criterion) {
    let snapshot = TicketSnapshot::from_value(
        Uuid::new_v4(),
        "TCK-BENCH",
        json!({
            "status": "open",
            "priority": "urgent",
            "subject": "VPN outage affecting the Berlin office",
            "hoursOpen": 26,
            "assignee": { "name": "Priya", "team": { "name": "Tier 2" } },
        }),
    );

    let conditions = vec![
        Condition::new("status", "equals", Some("Open".into())),
        Condition::new("priority", "in", Some("high, urgent".into())),
        Condition::new("subject", "contains", Some("vpn".into())),
        Condition::new("hoursOpen", "greater_than", Some("24".into())),
        Condition::new("assignee.team.name", "is_not_empty", None),
    ];

    c.bench_function("all_conditions_match/5", |b| {
        b.iter(|| all_conditions_match(black_box(&snapshot), black_box(&conditions)))
    });

    let deep = Condition::new("assignee.team.name", "equals", Some("tier 2".into()));
    c.bench_function("matches_condition/nested_path", |b| {
        b.iter(|| {
            deskflow::services::matches_condition(black_box(&deep), black_box(&snapshot))
        })
    });
}

criterion_group!(benches, bench_condition_matching);
criterion_main!(benches);
