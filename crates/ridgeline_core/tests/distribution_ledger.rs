use ridgeline_core::db::open_db_in_memory;
use ridgeline_core::repo::investment_repo::InvestmentRepository;
use ridgeline_core::repo::investor_repo::InvestorRepository;
use ridgeline_core::repo::notification_repo::SqliteNotificationRepository;
use ridgeline_core::repo::project_repo::ProjectRepository;
use ridgeline_core::{
    DistributionListQuery, DistributionPatch, DistributionService, DistributionServiceError,
    DistributionType, Investment, InvestmentStatus, Investor, ManualDistributionRequest,
    NotificationService, Project, SqliteDistributionRepository, SqliteInvestmentRepository,
    SqliteInvestorRepository, SqliteProjectRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

const COMMIT_DATE: i64 = 1_700_000_000_000;
const JANUARY: i64 = 1_704_067_200_000;
const MARCH: i64 = 1_709_251_200_000;

fn seed(conn: &Connection, email: &str, project_name: &str) -> (Investor, Project, Investment) {
    let investor = Investor::new("Ada", "Smith", email);
    SqliteInvestorRepository::new(conn)
        .create_investor(&investor)
        .unwrap();
    let project = Project::new(project_name);
    SqliteProjectRepository::new(conn)
        .create_project(&project)
        .unwrap();
    let repo = SqliteInvestmentRepository::new(conn);
    let mut investment = Investment::new(investor.uuid, project.uuid, 50_000.0, COMMIT_DATE);
    repo.create_investment(&investment).unwrap();
    repo.set_status(investment.uuid, InvestmentStatus::Active)
        .unwrap();
    investment.status = InvestmentStatus::Active;
    (investor, project, investment)
}

fn ledger(
    conn: &Connection,
) -> DistributionService<SqliteDistributionRepository<'_>, SqliteNotificationRepository<'_>> {
    DistributionService::new(
        SqliteDistributionRepository::new(conn),
        NotificationService::new(SqliteNotificationRepository::new(conn)),
    )
}

fn manual(investment: &Investment, amount: f64, date: i64) -> ManualDistributionRequest {
    ManualDistributionRequest {
        investment_uuid: investment.uuid,
        amount,
        kind: DistributionType::InterestPayment,
        date,
        notes: None,
        notify: true,
    }
}

#[test]
fn manual_entry_is_recorded_and_notified() {
    let conn = open_db_in_memory().unwrap();
    let (investor, _, investment) = seed(&conn, "ada@example.com", "Springfield Meadows");
    let service = ledger(&conn);

    let created = service.create(&manual(&investment, 2500.0, JANUARY)).unwrap();
    assert_eq!(created.amount, 2500.0);

    let loaded = service.get(created.uuid).unwrap();
    assert_eq!(loaded.distribution, created);
    assert_eq!(loaded.investor_uuid, investor.uuid);

    let notifications = NotificationService::new(SqliteNotificationRepository::new(&conn));
    let inbox = notifications.recent(investor.uuid, 10).unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(
        inbox[0].message,
        "A interest payment of $2,500.00 has been sent for your investment in \"Springfield Meadows\"."
    );
}

#[test]
fn manual_entry_can_skip_notification() {
    let conn = open_db_in_memory().unwrap();
    let (investor, _, investment) = seed(&conn, "ada@example.com", "Cedar Flats");
    let service = ledger(&conn);

    let mut request = manual(&investment, 100.0, JANUARY);
    request.notify = false;
    service.create(&request).unwrap();

    let notifications = NotificationService::new(SqliteNotificationRepository::new(&conn));
    assert_eq!(notifications.unread_count(investor.uuid).unwrap(), 0);
}

#[test]
fn manual_entry_requires_existing_investment() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, "ada@example.com", "Cedar Flats");
    let service = ledger(&conn);

    let missing = ManualDistributionRequest {
        investment_uuid: Uuid::new_v4(),
        amount: 100.0,
        kind: DistributionType::ReturnOfCapital,
        date: JANUARY,
        notes: None,
        notify: false,
    };
    assert!(matches!(
        service.create(&missing),
        Err(DistributionServiceError::InvestmentNotFound(_))
    ));
}

#[test]
fn update_patches_only_supplied_fields() {
    let conn = open_db_in_memory().unwrap();
    let (_, _, investment) = seed(&conn, "ada@example.com", "Cedar Flats");
    let service = ledger(&conn);
    let created = service.create(&manual(&investment, 2500.0, JANUARY)).unwrap();

    let updated = service
        .update(
            created.uuid,
            &DistributionPatch {
                amount: Some(2600.0),
                notes: Some("corrected wire total".to_string()),
                ..DistributionPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.distribution.amount, 2600.0);
    assert_eq!(updated.distribution.kind, DistributionType::InterestPayment);
    assert_eq!(updated.distribution.date, JANUARY);
    assert_eq!(
        updated.distribution.notes.as_deref(),
        Some("corrected wire total")
    );
}

#[test]
fn delete_removes_one_row() {
    let conn = open_db_in_memory().unwrap();
    let (_, _, investment) = seed(&conn, "ada@example.com", "Cedar Flats");
    let service = ledger(&conn);
    let created = service.create(&manual(&investment, 100.0, JANUARY)).unwrap();

    service.delete(created.uuid).unwrap();
    assert!(matches!(
        service.get(created.uuid),
        Err(DistributionServiceError::DistributionNotFound(_))
    ));
    assert!(matches!(
        service.delete(created.uuid),
        Err(DistributionServiceError::DistributionNotFound(_))
    ));
}

#[test]
fn list_filters_by_owner_type_and_date_range() {
    let conn = open_db_in_memory().unwrap();
    let (investor, project, investment) = seed(&conn, "ada@example.com", "Cedar Flats");
    let (_, _, other_investment) = seed(&conn, "ben@example.com", "Alder Grove");
    let service = ledger(&conn);

    service.create(&manual(&investment, 100.0, JANUARY)).unwrap();
    let mut capital = manual(&investment, 900.0, MARCH);
    capital.kind = DistributionType::ReturnOfCapital;
    service.create(&capital).unwrap();
    service
        .create(&manual(&other_investment, 555.0, JANUARY))
        .unwrap();

    let mine = service
        .list(&DistributionListQuery {
            investor: Some(investor.uuid),
            ..DistributionListQuery::default()
        })
        .unwrap();
    assert_eq!(mine.len(), 2);
    // Newest first.
    assert_eq!(mine[0].distribution.date, MARCH);

    let by_project = service
        .list(&DistributionListQuery {
            project: Some(project.uuid),
            kind: Some(DistributionType::ReturnOfCapital),
            ..DistributionListQuery::default()
        })
        .unwrap();
    assert_eq!(by_project.len(), 1);
    assert_eq!(by_project[0].distribution.amount, 900.0);

    let early = service
        .list(&DistributionListQuery {
            to_date: Some(JANUARY),
            ..DistributionListQuery::default()
        })
        .unwrap();
    assert_eq!(early.len(), 2);
    assert!(early.iter().all(|row| row.distribution.date <= JANUARY));
}

#[test]
fn summary_groups_totals_by_type() {
    let conn = open_db_in_memory().unwrap();
    let (_, project, investment) = seed(&conn, "ada@example.com", "Cedar Flats");
    let service = ledger(&conn);

    service.create(&manual(&investment, 100.0, JANUARY)).unwrap();
    service.create(&manual(&investment, 200.0, MARCH)).unwrap();
    let mut capital = manual(&investment, 1000.0, MARCH);
    capital.kind = DistributionType::ReturnOfCapital;
    service.create(&capital).unwrap();

    let summary = service
        .summary(&DistributionListQuery {
            project: Some(project.uuid),
            ..DistributionListQuery::default()
        })
        .unwrap();

    assert_eq!(summary.total_count, 3);
    assert!((summary.total_amount - 1300.0).abs() < 1e-9);

    let interest = summary
        .by_type
        .iter()
        .find(|group| group.kind == DistributionType::InterestPayment)
        .expect("interest group");
    assert_eq!(interest.count, 2);
    assert!((interest.total_amount - 300.0).abs() < 1e-9);
}
