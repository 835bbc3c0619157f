use ridgeline_core::db::open_db_in_memory;
use ridgeline_core::repo::investor_repo::InvestorRepository;
use ridgeline_core::repo::notification_repo::SqliteNotificationRepository;
use ridgeline_core::repo::project_repo::ProjectRepository;
use ridgeline_core::{
    CommitInvestmentRequest, InvestmentService, InvestmentServiceError, InvestmentStatus, Investor,
    NotificationService, Project, SqliteInvestmentRepository, SqliteInvestorRepository,
    SqliteProjectRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

const COMMIT_DATE: i64 = 1_700_000_000_000;

fn seed(conn: &Connection) -> (Investor, Project) {
    let investor = Investor::new("Ada", "Smith", "ada@example.com");
    SqliteInvestorRepository::new(conn)
        .create_investor(&investor)
        .unwrap();
    let project = Project::new("Springfield Meadows");
    SqliteProjectRepository::new(conn)
        .create_project(&project)
        .unwrap();
    (investor, project)
}

fn service(
    conn: &Connection,
) -> InvestmentService<SqliteInvestmentRepository<'_>, SqliteNotificationRepository<'_>> {
    InvestmentService::new(
        SqliteInvestmentRepository::new(conn),
        NotificationService::new(SqliteNotificationRepository::new(conn)),
    )
}

fn commit_request(investor: &Investor, project: &Project, amount: f64) -> CommitInvestmentRequest {
    CommitInvestmentRequest {
        investor_uuid: investor.uuid,
        project_uuid: project.uuid,
        amount,
        date: COMMIT_DATE,
        notes: None,
    }
}

#[test]
fn commit_records_investment_and_notifies() {
    let conn = open_db_in_memory().unwrap();
    let (investor, project) = seed(&conn);
    let service = service(&conn);

    let investment = service
        .commit(&commit_request(&investor, &project, 25_000.0))
        .unwrap();
    assert_eq!(investment.status, InvestmentStatus::Committed);
    assert_eq!(service.get(investment.uuid).unwrap(), investment);

    let notifications = NotificationService::new(SqliteNotificationRepository::new(&conn));
    let inbox = notifications.recent(investor.uuid, 10).unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].title, "New Investment Recorded");
    assert_eq!(
        inbox[0].message,
        "Your investment of $25,000.00 in \"Springfield Meadows\" has been recorded."
    );
}

#[test]
fn commit_rejects_non_positive_amounts() {
    let conn = open_db_in_memory().unwrap();
    let (investor, project) = seed(&conn);
    let service = service(&conn);

    for bad in [0.0, -10.0, f64::NAN] {
        let outcome = service.commit(&commit_request(&investor, &project, bad));
        assert!(matches!(
            outcome,
            Err(InvestmentServiceError::InvalidAmount(_))
        ));
    }
}

#[test]
fn commit_requires_known_parties() {
    let conn = open_db_in_memory().unwrap();
    let (investor, project) = seed(&conn);
    let service = service(&conn);

    let mut unknown_investor = commit_request(&investor, &project, 100.0);
    unknown_investor.investor_uuid = Uuid::new_v4();
    assert!(matches!(
        service.commit(&unknown_investor),
        Err(InvestmentServiceError::InvestorNotFound(_))
    ));

    let mut unknown_project = commit_request(&investor, &project, 100.0);
    unknown_project.project_uuid = Uuid::new_v4();
    assert!(matches!(
        service.commit(&unknown_project),
        Err(InvestmentServiceError::ProjectNotFound(_))
    ));
}

#[test]
fn status_change_persists_and_notifies() {
    let conn = open_db_in_memory().unwrap();
    let (investor, project) = seed(&conn);
    let service = service(&conn);
    let investment = service
        .commit(&commit_request(&investor, &project, 25_000.0))
        .unwrap();

    let funded = service
        .change_status(investment.uuid, InvestmentStatus::Funded)
        .unwrap();
    assert_eq!(funded.status, InvestmentStatus::Funded);

    let notifications = NotificationService::new(SqliteNotificationRepository::new(&conn));
    let inbox = notifications.recent(investor.uuid, 10).unwrap();
    // Commit notice plus the status change.
    assert_eq!(inbox.len(), 2);
    assert!(inbox
        .iter()
        .any(|n| n.message == "Your investment has been funded. Thank you!"));
}

#[test]
fn status_change_on_unknown_investment_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = service(&conn);

    assert!(matches!(
        service.change_status(Uuid::new_v4(), InvestmentStatus::Funded),
        Err(InvestmentServiceError::InvestmentNotFound(_))
    ));
}

#[test]
fn listings_are_scoped_to_owner_and_project() {
    let conn = open_db_in_memory().unwrap();
    let (investor, project) = seed(&conn);
    let other_project = Project::new("Alder Grove");
    SqliteProjectRepository::new(&conn)
        .create_project(&other_project)
        .unwrap();
    let service = service(&conn);

    service
        .commit(&commit_request(&investor, &project, 10_000.0))
        .unwrap();
    service
        .commit(&commit_request(&investor, &other_project, 5_000.0))
        .unwrap();

    assert_eq!(service.list_for_investor(investor.uuid).unwrap().len(), 2);
    let in_project = service.list_for_project(project.uuid).unwrap();
    assert_eq!(in_project.len(), 1);
    assert_eq!(in_project[0].amount, 10_000.0);
}
