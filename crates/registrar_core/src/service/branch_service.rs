//! Branch use-case service.
//!
//! # Responsibility
//! - Provide add/list/lookup/rename/delete entry points for branches.
//! - Enforce case-insensitive name uniqueness before any write.
//!
//! # Invariants
//! - Names are trimmed before persistence and never blank.
//! - Uniqueness is checked here; storage does not enforce it.

use crate::model::branch::{Branch, BranchId};
use crate::repo::branch_repo::BranchRepository;
use crate::service::{normalize_name, ServiceError, ServiceResult};
use log::{info, warn};

const ENTITY: &str = "Branch";

/// Use-case service wrapper for branch operations.
pub struct BranchService<R: BranchRepository> {
    repo: R,
}

impl<R: BranchRepository> BranchService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a new branch and returns it with its generated id.
    ///
    /// # Errors
    /// - `InvalidInput` for blank names.
    /// - `Duplicate` when the name is already taken (case-insensitive).
    pub fn add_branch(&self, name: &str) -> ServiceResult<Branch> {
        let name = normalize_name(ENTITY, name)?;
        if self.branch_exists_by_name(&name)? {
            warn!("event=branch_add module=service status=rejected reason=duplicate");
            return Err(ServiceError::Duplicate { entity: ENTITY, name });
        }

        let branch = self
            .repo
            .save_branch(&name)
            .map_err(|err| ServiceError::from_repo("Error adding branch to database", err))?;
        info!(
            "event=branch_add module=service status=ok branch_id={}",
            branch.id
        );
        Ok(branch)
    }

    /// Returns true when at least one branch is persisted.
    pub fn branch_exists(&self) -> ServiceResult<bool> {
        Ok(!self.get_all_branches()?.is_empty())
    }

    pub fn branch_exists_by_name(&self, name: &str) -> ServiceResult<bool> {
        Ok(self.get_branch_by_name(name)?.is_some())
    }

    /// Lists all branches in insertion order.
    pub fn get_all_branches(&self) -> ServiceResult<Vec<Branch>> {
        self.repo
            .list_branches()
            .map_err(|err| ServiceError::from_repo("No branch records retrieved", err))
    }

    pub fn get_branch_by_id(&self, id: BranchId) -> ServiceResult<Option<Branch>> {
        self.repo.get_branch_by_id(id).map_err(|err| {
            ServiceError::from_repo(format!("Error retrieving branch with ID {id}"), err)
        })
    }

    pub fn get_branch_by_name(&self, name: &str) -> ServiceResult<Option<Branch>> {
        self.repo.get_branch_by_name(name).map_err(|err| {
            ServiceError::from_repo(format!("Error retrieving branch with name {name}"), err)
        })
    }

    /// Persists a renamed branch identified by `branch.id`.
    ///
    /// # Errors
    /// - `InvalidInput` for blank names.
    /// - `Duplicate` when another branch already uses the new name.
    /// - `NotFound` when no branch has this id.
    pub fn update_branch(&self, branch: &Branch) -> ServiceResult<()> {
        let name = normalize_name(ENTITY, &branch.name)?;
        if let Some(existing) = self.get_branch_by_name(&name)? {
            if existing.id != branch.id {
                return Err(ServiceError::Duplicate { entity: ENTITY, name });
            }
        }

        let renamed = Branch::new(branch.id, name);
        self.repo
            .update_branch(&renamed)
            .map_err(|err| ServiceError::from_repo("Error updating branch records", err))?;
        info!(
            "event=branch_update module=service status=ok branch_id={}",
            branch.id
        );
        Ok(())
    }

    /// Deletes a branch; students in it keep existing without a branch.
    ///
    /// Returns the number of students that were unassigned.
    pub fn delete_branch(&self, id: BranchId) -> ServiceResult<usize> {
        self.repo
            .delete_branch(id)
            .map_err(|err| ServiceError::from_repo("Error deleting branch records", err))
    }
}
