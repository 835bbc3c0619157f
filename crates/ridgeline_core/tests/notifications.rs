use ridgeline_core::db::open_db_in_memory;
use ridgeline_core::repo::investment_repo::InvestmentRepository;
use ridgeline_core::repo::investor_repo::InvestorRepository;
use ridgeline_core::repo::notification_repo::SqliteNotificationRepository;
use ridgeline_core::repo::project_repo::ProjectRepository;
use ridgeline_core::{
    Investment, InvestmentStatus, Investor, NotificationDraft, NotificationService,
    NotificationServiceError, NotificationType, Project, RepoError, SqliteInvestmentRepository,
    SqliteInvestorRepository, SqliteProjectRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

const COMMIT_DATE: i64 = 1_700_000_000_000;

fn seed_investor(conn: &Connection, email: &str) -> Investor {
    let investor = Investor::new("Ada", "Smith", email);
    SqliteInvestorRepository::new(conn)
        .create_investor(&investor)
        .unwrap();
    investor
}

fn seed_project(conn: &Connection, name: &str) -> Project {
    let project = Project::new(name);
    SqliteProjectRepository::new(conn)
        .create_project(&project)
        .unwrap();
    project
}

fn seed_investment(conn: &Connection, investor: &Investor, project: &Project) -> Investment {
    let investment = Investment::new(investor.uuid, project.uuid, 25_000.0, COMMIT_DATE);
    SqliteInvestmentRepository::new(conn)
        .create_investment(&investment)
        .unwrap();
    investment
}

fn notifications(conn: &Connection) -> NotificationService<SqliteNotificationRepository<'_>> {
    NotificationService::new(SqliteNotificationRepository::new(conn))
}

#[test]
fn notify_always_inserts_a_new_row() {
    let conn = open_db_in_memory().unwrap();
    let investor = seed_investor(&conn, "ada@example.com");
    let service = notifications(&conn);

    let draft = NotificationDraft::new(
        NotificationType::General,
        "Welcome to the portal",
        "Thank you for registering!",
    );
    service.notify(investor.uuid, draft.clone()).unwrap();
    service.notify(investor.uuid, draft).unwrap();

    // Identical sends are never deduplicated.
    assert_eq!(service.unread_count(investor.uuid).unwrap(), 2);
}

#[test]
fn notify_unknown_investor_fails_immediately() {
    let conn = open_db_in_memory().unwrap();
    let service = notifications(&conn);

    let outcome = service.notify(
        Uuid::new_v4(),
        NotificationDraft::new(NotificationType::General, "t", "m"),
    );
    assert!(matches!(
        outcome,
        Err(NotificationServiceError::InvestorNotFound(_))
    ));
}

#[test]
fn status_change_messages_are_canned_per_status() {
    let conn = open_db_in_memory().unwrap();
    let investor = seed_investor(&conn, "ada@example.com");
    let project = seed_project(&conn, "Springfield Meadows");
    let investment = seed_investment(&conn, &investor, &project);
    let service = notifications(&conn);

    let funded = service
        .notify_investment_status_change(&investment, InvestmentStatus::Funded)
        .unwrap();
    assert_eq!(funded.title, "Investment Status: FUNDED");
    assert_eq!(funded.message, "Your investment has been funded. Thank you!");

    let committed = service
        .notify_investment_status_change(&investment, InvestmentStatus::Committed)
        .unwrap();
    assert_eq!(
        committed.message,
        "Your investment in \"Springfield Meadows\" status changed to COMMITTED."
    );
}

#[test]
fn tax_document_notice_links_the_document() {
    let conn = open_db_in_memory().unwrap();
    let investor = seed_investor(&conn, "ada@example.com");
    let service = notifications(&conn);
    let document = Uuid::new_v4();

    let sent = service
        .notify_tax_document_ready(investor.uuid, 2025, document)
        .unwrap();
    assert_eq!(sent.title, "2025 Tax Documents Ready");
    assert_eq!(sent.document_uuid, Some(document));
    assert!(sent.message.contains("K-1"));
}

#[test]
fn project_fanout_reaches_each_investor_once() {
    let conn = open_db_in_memory().unwrap();
    let repeat = seed_investor(&conn, "ada@example.com");
    let single = seed_investor(&conn, "ben@example.com");
    let outsider = seed_investor(&conn, "cleo@example.com");
    let project = seed_project(&conn, "Juniper Ridge");
    let elsewhere = seed_project(&conn, "Elsewhere");
    // Two investments for the same investor collapse to one notification.
    seed_investment(&conn, &repeat, &project);
    seed_investment(&conn, &repeat, &project);
    seed_investment(&conn, &single, &project);
    seed_investment(&conn, &outsider, &elsewhere);
    let service = notifications(&conn);

    let sent = service
        .notify_project_investors(
            project.uuid,
            &NotificationDraft::new(
                NotificationType::ProjectUpdate,
                "Update: Juniper Ridge",
                "Framing is complete.",
            ),
        )
        .unwrap();

    assert_eq!(sent.len(), 2);
    assert_eq!(service.unread_count(repeat.uuid).unwrap(), 1);
    assert_eq!(service.unread_count(single.uuid).unwrap(), 1);
    assert_eq!(service.unread_count(outsider.uuid).unwrap(), 0);
    assert!(sent.iter().all(|n| n.project_uuid == Some(project.uuid)));
}

#[test]
fn read_transition_is_scoped_to_the_owner() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_investor(&conn, "ada@example.com");
    let stranger = seed_investor(&conn, "ben@example.com");
    let service = notifications(&conn);

    let sent = service
        .notify(
            owner.uuid,
            NotificationDraft::new(NotificationType::General, "t", "m"),
        )
        .unwrap();

    // A stranger cannot mark someone else's notification.
    assert!(matches!(
        service.mark_as_read(sent.uuid, stranger.uuid),
        Err(RepoError::NotFound { .. })
    ));
    assert_eq!(service.unread_count(owner.uuid).unwrap(), 1);

    service.mark_as_read(sent.uuid, owner.uuid).unwrap();
    assert_eq!(service.unread_count(owner.uuid).unwrap(), 0);

    let inbox = service.recent(owner.uuid, 10).unwrap();
    assert!(inbox[0].read);
    assert!(inbox[0].read_at.is_some());
}

#[test]
fn mark_all_clears_only_that_inbox() {
    let conn = open_db_in_memory().unwrap();
    let busy = seed_investor(&conn, "ada@example.com");
    let other = seed_investor(&conn, "ben@example.com");
    let service = notifications(&conn);

    for title in ["one", "two", "three"] {
        service
            .notify(
                busy.uuid,
                NotificationDraft::new(NotificationType::General, title, "m"),
            )
            .unwrap();
    }
    service
        .notify(
            other.uuid,
            NotificationDraft::new(NotificationType::General, "t", "m"),
        )
        .unwrap();

    let changed = service.mark_all_as_read(busy.uuid).unwrap();
    assert_eq!(changed, 3);
    assert_eq!(service.unread_count(busy.uuid).unwrap(), 0);
    assert_eq!(service.unread_count(other.uuid).unwrap(), 1);

    // Re-running is a no-op.
    assert_eq!(service.mark_all_as_read(busy.uuid).unwrap(), 0);
}
