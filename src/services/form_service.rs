use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rand::Rng;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::errors::internal::{FormError, InternalError};
use crate::stores::{FormStore, UserStore};
use crate::types::db::{health_form, user};
use crate::types::dto::admin::{DashboardStatistics, MonthlyCount, StatusUpdate};
use crate::types::dto::forms::{FormData, NewFormSubmission, UserStatistics};
use crate::types::internal::{FormFilter, FormStatus};

const RECENT_WINDOW_SECS: i64 = 30 * 24 * 60 * 60;

/// Health assessment form flows, citizen- and admin-side
pub struct FormService {
    form_store: Arc<FormStore>,
    user_store: Arc<UserStore>,
}

impl FormService {
    pub fn new(form_store: Arc<FormStore>, user_store: Arc<UserStore>) -> Self {
        Self {
            form_store,
            user_store,
        }
    }

    /// Store a validated submission under a freshly minted form id.
    pub async fn submit(
        &self,
        user_id: i32,
        submission: NewFormSubmission,
    ) -> Result<health_form::Model, InternalError> {
        let now = Utc::now();
        let form_id = generate_form_id(now);

        let form = self
            .form_store
            .insert(user_id, form_id, &submission, now.timestamp())
            .await?;

        tracing::info!("Health form {} submitted by user {}", form.form_id, user_id);
        Ok(form)
    }

    pub async fn list_for_user(
        &self,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<health_form::Model>, u64), InternalError> {
        self.form_store.list_for_user(user_id, page, per_page).await
    }

    /// Every form one citizen has submitted, newest first (admin user view).
    pub async fn all_for_user(&self, user_id: i32) -> Result<Vec<health_form::Model>, InternalError> {
        self.form_store.all_for_user(user_id).await
    }

    /// Fetch one form by its public id, enforcing ownership.
    pub async fn get_owned(
        &self,
        form_id: &str,
        requester_id: i32,
    ) -> Result<health_form::Model, InternalError> {
        let form = self
            .form_store
            .find_by_form_id(form_id)
            .await?
            .ok_or_else(|| FormError::NotFound(form_id.to_string()))?;

        if form.user_id != requester_id {
            return Err(FormError::NotOwner(form_id.to_string()).into());
        }
        Ok(form)
    }

    /// Per-citizen totals by status plus the five most recent forms.
    pub async fn user_statistics(&self, user_id: i32) -> Result<UserStatistics, InternalError> {
        let statuses = self.form_store.statuses_for_user(user_id).await?;
        let recent = self.form_store.recent_for_user(user_id, 5).await?;

        let count_of = |status: FormStatus| {
            statuses.iter().filter(|s| s.as_str() == status.as_str()).count() as u64
        };

        Ok(UserStatistics {
            total_forms: statuses.len() as u64,
            submitted_forms: count_of(FormStatus::Submitted),
            reviewed_forms: count_of(FormStatus::Reviewed),
            scheduled_forms: count_of(FormStatus::ConsultationScheduled),
            completed_forms: count_of(FormStatus::Completed),
            recent_forms: recent.iter().map(FormData::from).collect(),
        })
    }

    pub async fn admin_list(
        &self,
        filter: &FormFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<(health_form::Model, Option<user::Model>)>, u64), InternalError> {
        self.form_store.admin_list(filter, page, per_page).await
    }

    pub async fn admin_get(
        &self,
        id: i32,
    ) -> Result<(health_form::Model, Option<user::Model>), InternalError> {
        self.form_store
            .find_by_id_with_user(id)
            .await?
            .ok_or_else(|| FormError::NotFound(id.to_string()).into())
    }

    pub async fn update_status(&self, id: i32, update: StatusUpdate) -> Result<(), InternalError> {
        let now = Utc::now().timestamp();
        if !self.form_store.update_status(id, &update, now).await? {
            return Err(FormError::NotFound(id.to_string()).into());
        }
        tracing::info!("Form {} status set to {}", id, update.status);
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<(), InternalError> {
        if !self.form_store.delete(id).await? {
            return Err(FormError::NotFound(id.to_string()).into());
        }
        tracing::info!("Form {} deleted", id);
        Ok(())
    }

    /// Headline numbers for the admin dashboard.
    pub async fn dashboard_statistics(&self) -> Result<DashboardStatistics, InternalError> {
        let since = Utc::now().timestamp() - RECENT_WINDOW_SECS;

        Ok(DashboardStatistics {
            total_users: self.user_store.count().await?,
            total_health_forms: self.form_store.count().await?,
            recent_submissions: self.form_store.count_since(since).await?,
            active_users: self.form_store.active_users_since(since).await?,
        })
    }

    /// Submission and distinct-user counts per month of the given year.
    /// Months without submissions are omitted.
    pub async fn monthly_report(&self, year: i32) -> Result<Vec<MonthlyCount>, InternalError> {
        let from = year_start(year);
        let until = year_start(year + 1);
        let pairs = self.form_store.submissions_in(from, until).await?;

        let mut by_month: BTreeMap<u32, (u64, HashSet<i32>)> = BTreeMap::new();
        for (submitted_at, user_id) in pairs {
            let Some(when) = DateTime::<Utc>::from_timestamp(submitted_at, 0) else {
                continue;
            };
            let entry = by_month.entry(when.month()).or_default();
            entry.0 += 1;
            entry.1.insert(user_id);
        }

        Ok(by_month
            .into_iter()
            .map(|(month, (submissions, users))| MonthlyCount {
                month,
                submissions,
                unique_users: users.len() as u64,
            })
            .collect())
    }
}

/// `F` + yymmddHHMM + 3 random digits, the public form identifier scheme.
fn generate_form_id(now: DateTime<Utc>) -> String {
    let random: u32 = rand::rng().random_range(0..1000);
    format!("F{}{:03}", now.format("%y%m%d%H%M"), random)
}

fn year_start(year: i32) -> i64 {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .expect("january always exists")
        .and_hms_opt(0, 0, 0)
        .expect("midnight always exists")
        .and_utc()
        .timestamp()
}
