// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory category catalog and complaint store.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use plaint_core::types::{STATUS_REGISTERED, Category, Complaint, DuplicateQuery, NewComplaint};
use plaint_core::{CategoryCatalog, ComplaintStore, PlaintError};

/// A scripted failure for the next `create_complaint` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFailure {
    /// Referential constraint violation (category deleted concurrently).
    Constraint,
    /// Connection drop or lock contention.
    Transient,
}

#[derive(Default)]
struct State {
    categories: HashMap<String, Category>,
    complaints: Vec<Complaint>,
    create_failures: VecDeque<StoreFailure>,
    create_calls: usize,
    lookups_fail: bool,
}

/// Records every create and answers duplicate lookups from what it stored.
#[derive(Clone, Default)]
pub struct MockComplaintStore {
    state: Arc<Mutex<State>>,
}

impl MockComplaintStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_category(&self, id: &str, name: &str, department: Option<&str>) {
        self.state.lock().await.categories.insert(
            id.to_string(),
            Category {
                id: id.to_string(),
                name: name.to_string(),
                assigned_department: department.map(str::to_string),
            },
        );
    }

    /// Queue a failure for an upcoming `create_complaint` call.
    pub async fn fail_next_create(&self, failure: StoreFailure) {
        self.state.lock().await.create_failures.push_back(failure);
    }

    /// Make category and duplicate lookups fail with a storage error.
    pub async fn set_lookups_fail(&self, fail: bool) {
        self.state.lock().await.lookups_fail = fail;
    }

    pub async fn complaints(&self) -> Vec<Complaint> {
        self.state.lock().await.complaints.clone()
    }

    /// Calls to `create_complaint`, including failed ones.
    pub async fn create_calls(&self) -> usize {
        self.state.lock().await.create_calls
    }
}

fn lookup_error() -> PlaintError {
    PlaintError::Storage {
        source: "mock store lookup failure".into(),
    }
}

#[async_trait]
impl CategoryCatalog for MockComplaintStore {
    async fn find_category(&self, category_id: &str) -> Result<Option<Category>, PlaintError> {
        let state = self.state.lock().await;
        if state.lookups_fail {
            return Err(lookup_error());
        }
        Ok(state.categories.get(category_id).cloned())
    }
}

#[async_trait]
impl ComplaintStore for MockComplaintStore {
    async fn find_recent_duplicate(
        &self,
        query: &DuplicateQuery,
    ) -> Result<Option<String>, PlaintError> {
        let state = self.state.lock().await;
        if state.lookups_fail {
            return Err(lookup_error());
        }
        Ok(state
            .complaints
            .iter()
            .find(|c| {
                c.complainant_id == query.complainant_id
                    && c.category_id == query.category_id
                    && c.sub_category == query.sub_category
                    && c.description == query.description
                    && c.created_at >= query.since
            })
            .map(|c| c.id.clone()))
    }

    async fn create_complaint(&self, complaint: &NewComplaint) -> Result<Complaint, PlaintError> {
        let mut state = self.state.lock().await;
        state.create_calls += 1;
        match state.create_failures.pop_front() {
            Some(StoreFailure::Constraint) => {
                return Err(PlaintError::ConstraintViolation {
                    message: "FOREIGN KEY constraint failed".into(),
                });
            }
            Some(StoreFailure::Transient) => {
                return Err(PlaintError::Storage {
                    source: "database is locked".into(),
                });
            }
            None => {}
        }

        let stored = Complaint {
            id: uuid::Uuid::new_v4().to_string(),
            seq: state.complaints.len() as i64 + 1,
            complainant_id: complaint.complainant_id.clone(),
            category_id: complaint.category_id.clone(),
            sub_category: complaint.sub_category.clone(),
            standardized_sub_category: complaint.standardized_sub_category.clone(),
            description: complaint.description.clone(),
            urgency: complaint.urgency,
            is_public: complaint.is_public,
            attachment_url: complaint.attachment_url.clone(),
            assigned_department: complaint.assigned_department.clone(),
            location: complaint.location.clone(),
            status: STATUS_REGISTERED.to_string(),
            is_duplicate: complaint.is_duplicate,
            submission_date: complaint.submission_date,
            created_at: Utc::now(),
        };
        state.complaints.push(stored.clone());
        Ok(stored)
    }
}
