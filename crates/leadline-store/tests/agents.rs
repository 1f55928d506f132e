use chrono::FixedOffset;
use leadline_core::domain::{Agent, AgentName, Role};
use leadline_store::error::StoreError;
use leadline_store::repo::LeadNew;
use leadline_store::Store;

const NOW: i64 = 1_700_000_000;

fn name(raw: &str) -> AgentName {
    AgentName::new(raw).expect("name")
}

#[test]
fn directory_add_get_and_require() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    store
        .agents()
        .add(NOW, &name(" Asha "), Role::User)
        .expect("add agent");
    let fetched = store
        .agents()
        .get(&name("asha"))
        .expect("get")
        .expect("agent exists");
    assert_eq!(fetched.user_name.as_str(), "asha");
    assert_eq!(fetched.role, Role::User);

    let err = store
        .agents()
        .add(NOW, &name("ASHA"), Role::Admin)
        .expect_err("duplicate agent");
    assert!(matches!(err, StoreError::DuplicateAgent(_)));

    let err = store.agents().require(&name("ghost")).expect_err("unknown");
    assert!(matches!(err, StoreError::UnknownAgent(_)));
}

#[test]
fn assignment_pool_is_sorted_users_only() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    store
        .agents()
        .add(NOW, &name("zara"), Role::User)
        .expect("add agent");
    store
        .agents()
        .add(NOW, &name("boss"), Role::Admin)
        .expect("add agent");
    store
        .agents()
        .add(NOW, &name("asha"), Role::User)
        .expect("add agent");

    let pool = store.agents().assignment_pool().expect("pool");
    let names: Vec<&str> = pool.iter().map(|n| n.as_str()).collect();
    assert_eq!(names, ["asha", "zara"]);
}

#[test]
fn open_lead_counts_skip_the_owner_and_escalated_leads() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    for raw in ["asha", "kiran", "zara"] {
        store
            .agents()
            .add(NOW, &name(raw), Role::User)
            .expect("add agent");
    }

    let offset = FixedOffset::east_opt(5 * 3600 + 1800).expect("offset");
    let kiran = Agent {
        user_name: name("kiran"),
        role: Role::User,
        created_at: 0,
    };
    store
        .leads()
        .create(
            NOW,
            offset,
            &kiran,
            LeadNew {
                name: None,
                mobile: "9000000001".to_string(),
                status: None,
                source: None,
                job_role: None,
                budget: None,
                project: None,
                remarks: None,
                next_action_at: None,
                assigned_to: None,
            },
        )
        .expect("create lead");

    let counts = store
        .agents()
        .open_lead_counts(Some(&name("asha")))
        .expect("counts");
    let pairs: Vec<(&str, i64)> = counts
        .iter()
        .map(|(agent, load)| (agent.as_str(), *load))
        .collect();
    assert_eq!(pairs, [("kiran", 1), ("zara", 0)]);
}
