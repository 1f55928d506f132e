use chrono::{FixedOffset, TimeZone, Utc};
use leadline_core::domain::{Agent, AgentName, LeadStatus, Role};
use leadline_core::CoreError;
use leadline_store::error::StoreError;
use leadline_store::repo::LeadNew;
use leadline_store::Store;

fn ist() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 1800).expect("offset")
}

fn noon_utc() -> i64 {
    Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0)
        .unwrap()
        .timestamp()
}

fn admin(name: &str) -> Agent {
    Agent {
        user_name: AgentName::new(name).expect("name"),
        role: Role::Admin,
        created_at: 0,
    }
}

fn agent(name: &str) -> Agent {
    Agent {
        user_name: AgentName::new(name).expect("name"),
        role: Role::User,
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

#[test]
fn create_normalizes_mobile() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let lead = store
        .leads()
        .create(noon_utc(), ist(), &admin("boss"), new_lead("+91 98765 43210"))
        .expect("create lead");
    assert_eq!(lead.mobile, "9876543210");

    let fetched = store
        .leads()
        .find_by_mobile("098765 43210")
        .expect("find")
        .expect("lead exists");
    assert_eq!(fetched.id, lead.id);
}

#[test]
fn duplicate_mobile_conflicts_across_raw_forms() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    let boss = admin("boss");

    let first = store
        .leads()
        .create(noon_utc(), ist(), &boss, new_lead("+91 98765 43210"))
        .expect("create lead");

    let err = store
        .leads()
        .create(noon_utc(), ist(), &boss, new_lead("09876543210"))
        .expect_err("duplicate rejected");
    match err {
        StoreError::DuplicateMobile { mobile, lead_id } => {
            assert_eq!(mobile, "9876543210");
            assert_eq!(lead_id, first.id.to_string());
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // Same rejection when the prefixed form arrives second.
    let second = store
        .leads()
        .create(noon_utc(), ist(), &boss, new_lead("09123456789"))
        .expect("create lead");
    let err = store
        .leads()
        .create(noon_utc(), ist(), &boss, new_lead("+919123456789"))
        .expect_err("duplicate rejected");
    match err {
        StoreError::DuplicateMobile { lead_id, .. } => {
            assert_eq!(lead_id, second.id.to_string());
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn create_rejects_bad_mobile_without_writing() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let err = store
        .leads()
        .create(noon_utc(), ist(), &admin("boss"), new_lead("1234567890"))
        .expect_err("bad leading digit");
    assert!(matches!(
        err,
        StoreError::Core(CoreError::InvalidMobile(_))
    ));
    let leads = store
        .leads()
        .list_for_admin(noon_utc(), None)
        .expect("list");
    assert!(leads.is_empty());
}

#[test]
fn visit_requires_an_explicit_date() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    let boss = admin("boss");

    let mut input = new_lead("9876543210");
    input.status = Some(LeadStatus::VisitScheduled);
    let err = store
        .leads()
        .create(noon_utc(), ist(), &boss, input)
        .expect_err("visit without date");
    assert!(matches!(
        err,
        StoreError::Core(CoreError::VisitDateRequired)
    ));

    let visit_at = noon_utc() + 86_400;
    let mut input = new_lead("9876543210");
    input.status = Some(LeadStatus::VisitScheduled);
    input.next_action_at = Some(visit_at);
    let lead = store
        .leads()
        .create(noon_utc(), ist(), &boss, input)
        .expect("create lead");
    assert_eq!(lead.next_action_at, Some(visit_at));
    assert!(!lead.next_action_auto);
}

#[test]
fn non_contact_status_defaults_to_tomorrow_nine_local() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let mut input = new_lead("9876543210");
    input.status = Some(LeadStatus::Busy);
    let lead = store
        .leads()
        .create(noon_utc(), ist(), &admin("boss"), input)
        .expect("create lead");

    let expected = ist()
        .with_ymd_and_hms(2024, 6, 11, 9, 0, 0)
        .unwrap()
        .with_timezone(&Utc)
        .timestamp();
    assert_eq!(lead.next_action_at, Some(expected));
    assert!(lead.next_action_auto);
}

#[test]
fn agent_actor_assigns_to_self() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let lead = store
        .leads()
        .create(noon_utc(), ist(), &agent("Asha"), new_lead("9876543210"))
        .expect("create lead");
    assert_eq!(lead.assigned_to.as_ref().map(|n| n.as_str()), Some("asha"));
    assert_eq!(lead.assigned_at, Some(noon_utc()));
}

#[test]
fn explicit_assignment_skips_the_rotation() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
        .agents()
        .add(noon_utc(), &AgentName::new("asha").unwrap(), Role::User)
        .expect("add agent");

    let mut input = new_lead("9876543210");
    input.assigned_to = Some(AgentName::new("Kiran").unwrap());
    let lead = store
        .leads()
        .create(noon_utc(), ist(), &admin("boss"), input)
        .expect("create lead");
    assert_eq!(lead.assigned_to.as_ref().map(|n| n.as_str()), Some("kiran"));
    assert_eq!(store.rotation().position().expect("position"), 0);
}

#[test]
fn admin_with_empty_pool_leaves_lead_unassigned() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let lead = store
        .leads()
        .create(noon_utc(), ist(), &admin("boss"), new_lead("9876543210"))
        .expect("create lead");
    assert!(lead.assigned_to.is_none());
    assert!(lead.assigned_at.is_none());
}

#[test]
fn delete_removes_lead_and_reports_unknown_ids() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let lead = store
        .leads()
        .create(noon_utc(), ist(), &admin("boss"), new_lead("9876543210"))
        .expect("create lead");
    store.leads().delete(lead.id).expect("delete lead");
    assert!(store.leads().get(lead.id).expect("get").is_none());

    let err = store.leads().delete(lead.id).expect_err("already gone");
    assert!(matches!(err, StoreError::NotFound(_)));
}
