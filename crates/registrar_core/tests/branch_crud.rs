use registrar_core::db::open_db_in_memory;
use registrar_core::{
    Branch, BranchRepository, BranchService, ServiceError, SqliteBranchRepository,
};
use rusqlite::Connection;

fn service(conn: &Connection) -> BranchService<SqliteBranchRepository<'_>> {
    BranchService::new(SqliteBranchRepository::try_new(conn).unwrap())
}

#[test]
fn add_branch_assigns_ids_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let branches = service(&conn);

    let cs = branches.add_branch("CS").unwrap();
    let ee = branches.add_branch("  EE  ").unwrap();

    assert!(cs.id < ee.id);
    assert_eq!(ee.name, "EE");
    let names: Vec<String> = branches
        .get_all_branches()
        .unwrap()
        .into_iter()
        .map(|branch| branch.name)
        .collect();
    assert_eq!(names, vec!["CS", "EE"]);
}

#[test]
fn duplicate_names_are_rejected_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let branches = service(&conn);

    branches.add_branch("CS").unwrap();
    let err = branches.add_branch("cs").unwrap_err();

    assert!(matches!(err, ServiceError::Duplicate { .. }));
    assert_eq!(branches.get_all_branches().unwrap().len(), 1);
}

#[test]
fn blank_names_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let branches = service(&conn);

    let err = branches.add_branch("   ").unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert!(!branches.branch_exists().unwrap());
}

#[test]
fn existence_checks_and_lookups() {
    let conn = open_db_in_memory().unwrap();
    let branches = service(&conn);
    assert!(!branches.branch_exists().unwrap());

    let mech = branches.add_branch("Mechanical").unwrap();

    assert!(branches.branch_exists().unwrap());
    assert!(branches.branch_exists_by_name("MECHANICAL").unwrap());
    assert!(!branches.branch_exists_by_name("Civil").unwrap());
    assert_eq!(branches.get_branch_by_id(mech.id).unwrap(), Some(mech.clone()));
    assert_eq!(branches.get_branch_by_name("mechanical").unwrap(), Some(mech));
    assert_eq!(branches.get_branch_by_id(999).unwrap(), None);
}

#[test]
fn update_branch_renames_and_guards_uniqueness() {
    let conn = open_db_in_memory().unwrap();
    let branches = service(&conn);
    let cs = branches.add_branch("CS").unwrap();
    branches.add_branch("EE").unwrap();

    branches
        .update_branch(&Branch::new(cs.id, "Computer Science"))
        .unwrap();
    assert_eq!(
        branches.get_branch_by_id(cs.id).unwrap().unwrap().name,
        "Computer Science"
    );

    // Re-casing its own name is not a conflict.
    branches
        .update_branch(&Branch::new(cs.id, "COMPUTER SCIENCE"))
        .unwrap();

    let err = branches
        .update_branch(&Branch::new(cs.id, "ee"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Duplicate { .. }));

    let err = branches
        .update_branch(&Branch::new(4242, "Physics"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { id: 4242, .. }));
}

#[test]
fn delete_branch_removes_row_and_reports_missing_ids() {
    let conn = open_db_in_memory().unwrap();
    let branches = service(&conn);
    let cs = branches.add_branch("CS").unwrap();

    assert_eq!(branches.delete_branch(cs.id).unwrap(), 0);
    assert!(!branches.branch_exists().unwrap());

    let err = branches.delete_branch(cs.id).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
}

#[test]
fn repository_writes_leave_no_open_transaction() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBranchRepository::try_new(&conn).unwrap();

    repo.save_branch("CS").unwrap();
    assert!(repo.delete_branch(12345).is_err());
    assert!(conn.is_autocommit());
    assert_eq!(repo.list_branches().unwrap().len(), 1);
}

#[test]
fn duplicate_check_folds_non_ascii_case() {
    let conn = open_db_in_memory().unwrap();
    let branches = service(&conn);

    let elec = branches.add_branch("Élec").unwrap();
    let err = branches.add_branch("élec").unwrap_err();
    assert!(matches!(err, ServiceError::Duplicate { .. }));
    assert_eq!(branches.get_branch_by_name("ÉLEC").unwrap(), Some(elec));

    let math = branches.add_branch("Math").unwrap();
    let err = branches
        .update_branch(&Branch::new(math.id, "éLEC"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Duplicate { .. }));
    assert_eq!(branches.get_all_branches().unwrap().len(), 2);
}
