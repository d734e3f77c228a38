//! Branch repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `branches`.
//! - Apply the delete policy: students of a deleted branch become unassigned.
//!
//! # Invariants
//! - Listing order is `id ASC` (insertion order).
//! - Name lookups ignore case using `name_matches` (Unicode lowercase).

use crate::db::unit_of_work::run_in_transaction;
use crate::model::branch::{Branch, BranchId};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};

const ENTITY: &str = "Branch";

/// Repository interface for branch persistence.
pub trait BranchRepository {
    /// Inserts one branch and returns it with its generated id.
    fn save_branch(&self, name: &str) -> RepoResult<Branch>;
    fn get_branch_by_id(&self, id: BranchId) -> RepoResult<Option<Branch>>;
    /// Case-insensitive exact name lookup; first match in id order.
    fn get_branch_by_name(&self, name: &str) -> RepoResult<Option<Branch>>;
    fn list_branches(&self) -> RepoResult<Vec<Branch>>;
    fn update_branch(&self, branch: &Branch) -> RepoResult<()>;
    /// Deletes one branch and returns how many students lost their branch.
    fn delete_branch(&self, id: BranchId) -> RepoResult<usize>;
}

/// SQLite-backed branch repository.
pub struct SqliteBranchRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBranchRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BranchRepository for SqliteBranchRepository<'_> {
    fn save_branch(&self, name: &str) -> RepoResult<Branch> {
        let branch = run_in_transaction(self.conn, "save_branch", |tx| -> RepoResult<Branch> {
            tx.execute("INSERT INTO branches (name) VALUES (?1);", [name])?;
            Ok(Branch::new(tx.last_insert_rowid(), name))
        })?;
        info!(
            "event=branch_saved module=repo status=ok branch_id={}",
            branch.id
        );
        Ok(branch)
    }

    fn get_branch_by_id(&self, id: BranchId) -> RepoResult<Option<Branch>> {
        self.conn
            .query_row(
                "SELECT id, name FROM branches WHERE id = ?1;",
                [id],
                parse_branch_row,
            )
            .optional()
            .map_err(Into::into)
    }

    fn get_branch_by_name(&self, name: &str) -> RepoResult<Option<Branch>> {
        // SQLite NOCASE folds ASCII only; match with the model's Unicode rule.
        Ok(self
            .list_branches()?
            .into_iter()
            .find(|branch| branch.name_matches(name)))
    }

    fn list_branches(&self) -> RepoResult<Vec<Branch>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM branches ORDER BY id ASC;")?;
        let rows = stmt.query_map([], parse_branch_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn update_branch(&self, branch: &Branch) -> RepoResult<()> {
        run_in_transaction(self.conn, "update_branch", |tx| -> RepoResult<()> {
            let changed = tx.execute(
                "UPDATE branches SET name = ?1 WHERE id = ?2;",
                params![branch.name.as_str(), branch.id],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: ENTITY,
                    id: branch.id,
                });
            }
            Ok(())
        })
    }

    fn delete_branch(&self, id: BranchId) -> RepoResult<usize> {
        let detached = run_in_transaction(self.conn, "delete_branch", |tx| -> RepoResult<usize> {
            let detached: i64 = tx.query_row(
                "SELECT COUNT(*) FROM students WHERE branch_id = ?1;",
                [id],
                |row| row.get(0),
            )?;
            let changed = tx.execute("DELETE FROM branches WHERE id = ?1;", [id])?;
            if changed == 0 {
                return Err(RepoError::NotFound { entity: ENTITY, id });
            }
            usize::try_from(detached)
                .map_err(|_| RepoError::InvalidData(format!("negative student count {detached}")))
        })?;
        info!(
            "event=branch_deleted module=repo status=ok branch_id={} detached_students={}",
            id, detached
        );
        Ok(detached)
    }
}

fn parse_branch_row(row: &Row<'_>) -> rusqlite::Result<Branch> {
    Ok(Branch {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
