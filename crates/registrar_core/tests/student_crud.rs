use chrono::NaiveDate;
use registrar_core::db::open_db_in_memory;
use registrar_core::{
    Branch, BranchService, Event, EventService, ServiceError, SqliteBranchRepository,
    SqliteEventRepository, SqliteStudentRepository, Student, StudentPatch, StudentService,
};
use rusqlite::Connection;
use std::collections::BTreeSet;

struct Fixture<'conn> {
    branches: BranchService<SqliteBranchRepository<'conn>>,
    events: EventService<SqliteEventRepository<'conn>>,
    students: StudentService<SqliteStudentRepository<'conn>>,
}

fn fixture(conn: &Connection) -> Fixture<'_> {
    Fixture {
        branches: BranchService::new(SqliteBranchRepository::try_new(conn).unwrap()),
        events: EventService::new(SqliteEventRepository::try_new(conn).unwrap()),
        students: StudentService::new(SqliteStudentRepository::try_new(conn).unwrap()),
    }
}

fn alice() -> Student {
    Student::new(
        "Alice",
        "Doe",
        "9876543210",
        "alice@example.com",
        "1 Main St",
        NaiveDate::from_ymd_opt(2004, 5, 17).unwrap(),
        20,
    )
}

fn with_associations(mut student: Student, branch: &Branch, events: &[&Event]) -> Student {
    student.branch_id = Some(branch.id);
    student.event_ids = events.iter().map(|event| event.id).collect();
    student
}

#[test]
fn register_and_read_back_with_associations() {
    let conn = open_db_in_memory().unwrap();
    let fx = fixture(&conn);
    let cs = fx.branches.add_branch("CS").unwrap();
    let chess = fx.events.add_event("Chess").unwrap();
    let debate = fx.events.add_event("Debate").unwrap();

    let id = fx
        .students
        .register_student(&with_associations(alice(), &cs, &[&chess, &debate]))
        .unwrap();

    let stored = fx.students.get_student_by_id(id).unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.first_name, "Alice");
    assert_eq!(stored.dob, NaiveDate::from_ymd_opt(2004, 5, 17).unwrap());
    assert_eq!(stored.branch_id, Some(cs.id));
    assert_eq!(stored.event_ids, BTreeSet::from([chess.id, debate.id]));

    let record = fx.students.get_student_record(id).unwrap();
    assert_eq!(record.branch, Some(cs));
    assert_eq!(record.events, vec![chess, debate]);
}

#[test]
fn student_without_branch_or_events_is_allowed() {
    let conn = open_db_in_memory().unwrap();
    let fx = fixture(&conn);

    let id = fx.students.register_student(&alice()).unwrap();
    let record = fx.students.get_student_record(id).unwrap();

    assert_eq!(record.branch, None);
    assert!(record.events.is_empty());
    assert!(fx.students.student_exists(id).unwrap());
}

#[test]
fn invalid_fields_are_rejected_before_persistence() {
    let conn = open_db_in_memory().unwrap();
    let fx = fixture(&conn);

    let mut student = alice();
    student.email = "not-an-email".to_string();
    let err = fx.students.register_student(&student).unwrap_err();

    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert!(fx.students.get_all_students().unwrap().is_empty());
}

#[test]
fn dangling_branch_reference_rolls_back_registration() {
    let conn = open_db_in_memory().unwrap();
    let fx = fixture(&conn);

    let mut student = alice();
    student.branch_id = Some(77);
    let err = fx.students.register_student(&student).unwrap_err();

    assert!(matches!(err, ServiceError::Operation { .. }));
    assert!(err.to_string().starts_with("Failed to register student: "));
    assert!(fx.students.get_all_students().unwrap().is_empty());
    assert!(conn.is_autocommit());
}

#[test]
fn dangling_event_reference_rolls_back_the_student_row_too() {
    let conn = open_db_in_memory().unwrap();
    let fx = fixture(&conn);

    let mut student = alice();
    student.event_ids = BTreeSet::from([404]);
    assert!(fx.students.register_student(&student).is_err());
    assert!(fx.students.get_all_students().unwrap().is_empty());
}

#[test]
fn get_missing_student_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let fx = fixture(&conn);

    assert!(!fx.students.student_exists(5).unwrap());
    assert!(matches!(
        fx.students.get_student_by_id(5).unwrap_err(),
        ServiceError::NotFound { id: 5, .. }
    ));
}

#[test]
fn update_replaces_full_record_including_event_set() {
    let conn = open_db_in_memory().unwrap();
    let fx = fixture(&conn);
    let cs = fx.branches.add_branch("CS").unwrap();
    let ee = fx.branches.add_branch("EE").unwrap();
    let chess = fx.events.add_event("Chess").unwrap();
    let debate = fx.events.add_event("Debate").unwrap();
    let id = fx
        .students
        .register_student(&with_associations(alice(), &cs, &[&chess]))
        .unwrap();

    let mut student = fx.students.get_student_by_id(id).unwrap();
    student.last_name = "Smith".to_string();
    student.branch_id = Some(ee.id);
    student.event_ids = BTreeSet::from([debate.id]);
    fx.students.update_student(&student).unwrap();

    let record = fx.students.get_student_record(id).unwrap();
    assert_eq!(record.student.last_name, "Smith");
    assert_eq!(record.branch, Some(ee));
    assert_eq!(record.events, vec![debate]);
}

#[test]
fn empty_patch_is_an_idempotent_update() {
    let conn = open_db_in_memory().unwrap();
    let fx = fixture(&conn);
    let id = fx.students.register_student(&alice()).unwrap();
    let before = fx.students.get_student_by_id(id).unwrap();

    let after = fx
        .students
        .apply_patch(id, &StudentPatch::default())
        .unwrap();

    assert_eq!(after, before);
    assert_eq!(fx.students.get_student_by_id(id).unwrap(), before);
}

#[test]
fn patch_merges_onto_fresh_read() {
    let conn = open_db_in_memory().unwrap();
    let fx = fixture(&conn);
    let id = fx.students.register_student(&alice()).unwrap();

    let patch = StudentPatch {
        address: Some("2 Side St".to_string()),
        age: Some(21),
        ..StudentPatch::default()
    };
    let merged = fx.students.apply_patch(id, &patch).unwrap();

    assert_eq!(merged.address, "2 Side St");
    assert_eq!(merged.age, 21);
    assert_eq!(merged.phone, "9876543210");
    assert_eq!(fx.students.get_student_by_id(id).unwrap(), merged);
}

#[test]
fn delete_student_and_missing_id() {
    let conn = open_db_in_memory().unwrap();
    let fx = fixture(&conn);
    let chess = fx.events.add_event("Chess").unwrap();
    let mut student = alice();
    student.event_ids.insert(chess.id);
    let id = fx.students.register_student(&student).unwrap();

    fx.students.delete_student(id).unwrap();
    assert!(!fx.students.student_exists(id).unwrap());
    assert!(fx.students.students_for_event(chess.id).unwrap().is_empty());

    assert!(matches!(
        fx.students.delete_student(id).unwrap_err(),
        ServiceError::NotFound { .. }
    ));
}

#[test]
fn deleting_branch_unassigns_students_but_keeps_them() {
    let conn = open_db_in_memory().unwrap();
    let fx = fixture(&conn);
    let cs = fx.branches.add_branch("CS").unwrap();
    let chess = fx.events.add_event("Chess").unwrap();
    let id = fx
        .students
        .register_student(&with_associations(alice(), &cs, &[&chess]))
        .unwrap();
    assert_eq!(fx.students.students_in_branch(cs.id).unwrap().len(), 1);

    assert_eq!(fx.branches.delete_branch(cs.id).unwrap(), 1);

    let stored = fx.students.get_student_by_id(id).unwrap();
    assert_eq!(stored.branch_id, None);
    assert_eq!(stored.event_ids, BTreeSet::from([chess.id]));
    assert!(fx.students.students_in_branch(cs.id).unwrap().is_empty());
}

#[test]
fn deleting_event_removes_it_from_student_event_sets() {
    let conn = open_db_in_memory().unwrap();
    let fx = fixture(&conn);
    let cs = fx.branches.add_branch("CS").unwrap();
    let chess = fx.events.add_event("Chess").unwrap();
    let debate = fx.events.add_event("Debate").unwrap();
    let alice_id = fx
        .students
        .register_student(&with_associations(alice(), &cs, &[&chess, &debate]))
        .unwrap();
    let mut bob = alice();
    bob.first_name = "Bob".to_string();
    let bob_id = fx
        .students
        .register_student(&with_associations(bob, &cs, &[&chess]))
        .unwrap();

    let attendees: Vec<i64> = fx
        .students
        .students_for_event(chess.id)
        .unwrap()
        .into_iter()
        .map(|student| student.id)
        .collect();
    assert_eq!(attendees, vec![alice_id, bob_id]);

    assert_eq!(fx.events.delete_event(chess.id).unwrap(), 2);

    assert_eq!(
        fx.students.get_student_record(alice_id).unwrap().events,
        vec![debate]
    );
    assert!(fx.students.get_student_record(bob_id).unwrap().events.is_empty());
}

#[test]
fn list_student_records_in_registration_order() {
    let conn = open_db_in_memory().unwrap();
    let fx = fixture(&conn);
    let first = fx.students.register_student(&alice()).unwrap();
    let mut other = alice();
    other.first_name = "Zed".to_string();
    let second = fx.students.register_student(&other).unwrap();

    let ids: Vec<i64> = fx
        .students
        .get_all_student_records()
        .unwrap()
        .into_iter()
        .map(|record| record.student.id)
        .collect();
    assert_eq!(ids, vec![first, second]);
}
