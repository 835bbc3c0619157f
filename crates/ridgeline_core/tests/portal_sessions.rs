use ridgeline_core::db::open_db_in_memory;
use ridgeline_core::repo::investor_repo::InvestorRepository;
use ridgeline_core::repo::session_repo::SqliteSessionRepository;
use ridgeline_core::{Investor, SessionService, SessionServiceError, SqliteInvestorRepository};
use rusqlite::Connection;
use uuid::Uuid;

const NOW: i64 = 1_700_000_000_000;
const ONE_HOUR: i64 = 60 * 60 * 1000;

fn seed_investor(conn: &Connection, email: &str, portal_access: bool) -> Investor {
    let mut investor = Investor::new("Ada", "Smith", email);
    investor.portal_access = portal_access;
    SqliteInvestorRepository::new(conn)
        .create_investor(&investor)
        .unwrap();
    investor
}

fn sessions(conn: &Connection) -> SessionService<SqliteSessionRepository<'_>> {
    SessionService::new(SqliteSessionRepository::new(conn))
}

#[test]
fn open_and_resolve_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let investor = seed_investor(&conn, "ada@example.com", true);
    let service = sessions(&conn);

    let session = service.open(investor.uuid, NOW, ONE_HOUR).unwrap();
    assert_eq!(session.expires_at, NOW + ONE_HOUR);

    let resolved = service.resolve(session.token, NOW + 1).unwrap();
    assert_eq!(resolved, Some(investor.uuid));
}

#[test]
fn expired_tokens_resolve_to_none() {
    let conn = open_db_in_memory().unwrap();
    let investor = seed_investor(&conn, "ada@example.com", true);
    let service = sessions(&conn);

    let session = service.open(investor.uuid, NOW, ONE_HOUR).unwrap();
    assert_eq!(
        service.resolve(session.token, NOW + ONE_HOUR).unwrap(),
        None
    );
}

#[test]
fn unknown_tokens_resolve_to_none() {
    let conn = open_db_in_memory().unwrap();
    seed_investor(&conn, "ada@example.com", true);
    let service = sessions(&conn);

    assert_eq!(service.resolve(Uuid::new_v4(), NOW).unwrap(), None);
}

#[test]
fn open_requires_portal_access() {
    let conn = open_db_in_memory().unwrap();
    let no_access = seed_investor(&conn, "ada@example.com", false);
    let service = sessions(&conn);

    assert!(matches!(
        service.open(no_access.uuid, NOW, ONE_HOUR),
        Err(SessionServiceError::PortalAccessDisabled(_))
    ));
    assert!(matches!(
        service.open(Uuid::new_v4(), NOW, ONE_HOUR),
        Err(SessionServiceError::InvestorNotFound(_))
    ));
}

#[test]
fn close_revokes_a_live_session() {
    let conn = open_db_in_memory().unwrap();
    let investor = seed_investor(&conn, "ada@example.com", true);
    let service = sessions(&conn);

    let session = service.open(investor.uuid, NOW, ONE_HOUR).unwrap();
    assert!(service.close(session.token).unwrap());
    assert_eq!(service.resolve(session.token, NOW + 1).unwrap(), None);
    // Closing again reports that nothing was removed.
    assert!(!service.close(session.token).unwrap());
}

#[test]
fn purge_removes_only_expired_rows() {
    let conn = open_db_in_memory().unwrap();
    let investor = seed_investor(&conn, "ada@example.com", true);
    let service = sessions(&conn);

    let stale = service.open(investor.uuid, NOW - 2 * ONE_HOUR, ONE_HOUR).unwrap();
    let live = service.open(investor.uuid, NOW, ONE_HOUR).unwrap();

    assert_eq!(service.purge_expired(NOW).unwrap(), 1);
    assert_eq!(service.resolve(stale.token, NOW).unwrap(), None);
    assert_eq!(service.resolve(live.token, NOW).unwrap(), Some(investor.uuid));
}
