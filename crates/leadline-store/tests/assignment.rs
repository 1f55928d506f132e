use chrono::FixedOffset;
use leadline_core::domain::{Agent, AgentName, Role};
use leadline_store::repo::LeadNew;
use leadline_store::Store;

const NOW: i64 = 1_700_000_000;

fn offset() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 1800).expect("offset")
}

fn admin(name: &str) -> Agent {
    Agent {
        user_name: AgentName::new(name).expect("name"),
        role: Role::Admin,
        created_at: 0,
    }
}

fn new_lead(mobile: &str) -> LeadNew {
    LeadNew {
        name: None,
        mobile: mobile.to_string(),
        status: None,
        source: None,
        job_role: None,
        budget: None,
        project: None,
        remarks: None,
        next_action_at: None,
        assigned_to: None,
    }
}

fn seed_pool(store: &Store, names: &[&str]) {
    for name in names {
        store
            .agents()
            .add(NOW, &AgentName::new(name).expect("name"), Role::User)
            .expect("add agent");
    }
}

#[test]
fn take_slots_returns_the_pre_increment_counter() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    assert_eq!(store.rotation().position().expect("position"), 0);
    assert_eq!(store.rotation().take_slots(5).expect("take"), 0);
    assert_eq!(store.rotation().position().expect("position"), 5);
    assert_eq!(store.rotation().take_slots(2).expect("take"), 5);
}

#[test]
fn round_robin_visits_each_agent_once_per_cycle() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    seed_pool(&store, &["zara", "asha", "kiran"]);
    let boss = admin("boss");

    let mobiles = ["9000000001", "9000000002", "9000000003"];
    let mut owners = Vec::new();
    for mobile in mobiles {
        let lead = store
            .leads()
            .create(NOW, offset(), &boss, new_lead(mobile))
            .expect("create lead");
        owners.push(lead.assigned_to.expect("assigned").to_string());
    }

    // Alphabetical pool order, one slot each, cursor back at the start.
    assert_eq!(owners, ["asha", "kiran", "zara"]);
    assert_eq!(store.rotation().position().expect("position"), 3);

    let lead = store
        .leads()
        .create(NOW, offset(), &boss, new_lead("9000000004"))
        .expect("create lead");
    assert_eq!(lead.assigned_to.expect("assigned").to_string(), "asha");
}

#[test]
fn admin_list_backfills_ownerless_leads_oldest_first() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    let boss = admin("boss");

    // Intake with no pool leaves leads unowned.
    let older = store
        .leads()
        .create(NOW, offset(), &boss, new_lead("9000000001"))
        .expect("create lead");
    let newer = store
        .leads()
        .create(NOW + 60, offset(), &boss, new_lead("9000000002"))
        .expect("create lead");
    assert!(older.assigned_to.is_none());
    assert!(newer.assigned_to.is_none());

    seed_pool(&store, &["asha", "kiran"]);

    let listed = store
        .leads()
        .list_for_admin(NOW + 120, None)
        .expect("list for admin");
    assert_eq!(listed.len(), 2);
    for lead in &listed {
        assert!(lead.assigned_to.is_some());
        assert_eq!(lead.assigned_at, Some(NOW + 120));
    }

    let oldest = store.leads().get(older.id).expect("get").expect("lead");
    let newest = store.leads().get(newer.id).expect("get").expect("lead");
    assert_eq!(oldest.assigned_to.map(|n| n.to_string()), Some("asha".into()));
    assert_eq!(
        newest.assigned_to.map(|n| n.to_string()),
        Some("kiran".into())
    );
    assert_eq!(store.rotation().position().expect("position"), 2);
}

#[test]
fn agent_list_only_shows_their_own_leads() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    seed_pool(&store, &["asha", "kiran"]);
    let boss = admin("boss");

    store
        .leads()
        .create(NOW, offset(), &boss, new_lead("9000000001"))
        .expect("create lead");
    store
        .leads()
        .create(NOW, offset(), &boss, new_lead("9000000002"))
        .expect("create lead");

    let asha = AgentName::new("asha").expect("name");
    let mine = store
        .leads()
        .list_for_agent(&asha, None)
        .expect("list for agent");
    assert_eq!(mine.len(), 1);
    assert_eq!(
        mine[0].assigned_to.as_ref().map(|n| n.as_str()),
        Some("asha")
    );
}
