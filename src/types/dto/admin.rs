use chrono::{Datelike, NaiveDate, Utc};
use poem_openapi::{payload::Json, ApiResponse, Object};

use crate::types::db::{admin, health_form, user};
use crate::types::dto::common::FieldError;
use crate::types::dto::forms::{FormData, FormsPagination};
use crate::types::internal::{AdminRole, FormFilter, FormStatus, MedicalSystem};
use crate::validation::{rules, Validator};

/// Request model for admin login
#[derive(Object, Debug)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminLogin {
    pub username: String,
    pub password: String,
}

impl AdminLoginRequest {
    pub fn validate(&self) -> Result<AdminLogin, Vec<FieldError>> {
        let username = self.username.trim();

        let mut v = Validator::new();
        v.rule("username", username, rules::not_empty(username, "Username"));
        v.rule_hidden("password", rules::not_empty(&self.password, "Password"));
        v.finish()?;

        Ok(AdminLogin {
            username: username.to_string(),
            password: self.password.clone(),
        })
    }
}

/// Admin account data, never including the password hash
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct AdminData {
    pub admin_id: i32,
    pub username: String,
    #[oai(skip_serializing_if_is_none)]
    pub email: Option<String>,
    pub role: String,
    pub is_active: bool,

    /// Unix timestamp of account creation
    pub created_at: i64,

    /// Unix timestamp of the most recent login
    #[oai(skip_serializing_if_is_none)]
    pub last_login: Option<i64>,
}

impl From<&admin::Model> for AdminData {
    fn from(a: &admin::Model) -> Self {
        Self {
            admin_id: a.id,
            username: a.username.clone(),
            email: a.email.clone(),
            role: a.role.clone(),
            is_active: a.is_active,
            created_at: a.created_at,
            last_login: a.last_login,
        }
    }
}

#[derive(Object, Debug)]
pub struct AdminAuthData {
    pub token: String,
    pub admin: AdminData,
}

#[derive(Object, Debug)]
pub struct AdminLoginResponse {
    pub success: bool,
    pub message: String,
    pub data: AdminAuthData,
}

#[derive(Object, Debug)]
pub struct AdminMeData {
    pub admin: AdminData,
}

#[derive(Object, Debug)]
pub struct AdminMeResponse {
    pub success: bool,
    pub data: AdminMeData,
}

/// Request model for creating an admin (super admin only)
#[derive(Object, Debug)]
pub struct CreateAdminRequest {
    pub username: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAdmin {
    pub username: String,
    pub password: String,
    pub role: AdminRole,
}

impl CreateAdminRequest {
    pub fn validate(&self) -> Result<NewAdmin, Vec<FieldError>> {
        let username = self.username.trim();

        let mut v = Validator::new();
        v.rule("username", username, rules::length_between(username, 3, 50, "Username"));
        v.rule("username", username, rules::username_charset(username));
        v.rule_hidden("password", rules::password_min_length(&self.password));
        v.rule_hidden("password", rules::password_complexity(&self.password));
        v.rule(
            "role",
            &self.role,
            rules::one_of(&self.role, &AdminRole::ALL.map(|r| r.as_str()), "Invalid role specified"),
        );
        v.finish()?;

        Ok(NewAdmin {
            username: username.to_string(),
            password: self.password.clone(),
            role: self.role.parse().unwrap_or(AdminRole::Viewer),
        })
    }
}

#[derive(Object, Debug)]
pub struct CreatedAdminData {
    pub admin: AdminData,
}

#[derive(Object, Debug)]
pub struct CreateAdminResponse {
    pub success: bool,
    pub message: String,
    pub data: CreatedAdminData,
}

/// API response for admin creation (201 on success)
#[derive(ApiResponse)]
pub enum CreateAdminApiResponse {
    /// Admin account created
    #[oai(status = 201)]
    Created(Json<CreateAdminResponse>),
}

/// Pagination metadata for admin listings
#[derive(Object, Debug, PartialEq)]
#[oai(rename_all = "camelCase")]
pub struct AdminsPagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_admins: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Object, Debug)]
pub struct AdminListData {
    pub admins: Vec<AdminData>,
    pub pagination: AdminsPagination,
}

#[derive(Object, Debug)]
pub struct AdminListResponse {
    pub success: bool,
    pub data: AdminListData,
}

/// Request model for changing an admin's role (super admin only)
#[derive(Object, Debug)]
pub struct UpdateRoleRequest {
    pub role: String,
}

impl UpdateRoleRequest {
    pub fn validate(&self) -> Result<AdminRole, Vec<FieldError>> {
        let mut v = Validator::new();
        v.rule(
            "role",
            &self.role,
            rules::one_of(&self.role, &AdminRole::ALL.map(|r| r.as_str()), "Invalid role specified"),
        );
        v.finish()?;
        Ok(self.role.parse().unwrap_or(AdminRole::Viewer))
    }
}

/// Dashboard headline numbers
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct DashboardStatistics {
    pub total_users: u64,
    pub total_health_forms: u64,

    /// Forms submitted in the last 30 days
    pub recent_submissions: u64,

    /// Distinct citizens who submitted in the last 30 days
    pub active_users: u64,
}

#[derive(Object, Debug)]
pub struct DashboardStatisticsResponse {
    pub success: bool,
    pub data: DashboardStatistics,
}

/// Citizen summary row in the admin user list
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct AdminUserData {
    pub id: i32,

    /// Display name ("first last")
    pub username: String,
    pub email: String,
    pub is_active: bool,

    /// Unix timestamp of registration
    pub created_at: i64,
}

impl From<&user::Model> for AdminUserData {
    fn from(u: &user::Model) -> Self {
        Self {
            id: u.id,
            username: u.full_name(),
            email: u.email.clone(),
            is_active: u.is_active,
            created_at: u.registration_time,
        }
    }
}

/// Pagination metadata for user listings
#[derive(Object, Debug, PartialEq)]
#[oai(rename_all = "camelCase")]
pub struct UsersPagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_users: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Object, Debug)]
pub struct UserListData {
    pub users: Vec<AdminUserData>,
    pub pagination: UsersPagination,
}

#[derive(Object, Debug)]
pub struct UserListResponse {
    pub success: bool,
    pub data: UserListData,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct UserDetailData {
    pub user: AdminUserData,
    pub health_forms: Vec<FormData>,
}

#[derive(Object, Debug)]
pub struct UserDetailResponse {
    pub success: bool,
    pub data: UserDetailData,
}

/// A form row in the admin views, joined with its submitter
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct AdminFormData {
    pub id: i32,
    pub form_id: String,
    pub user_id: i32,
    pub full_name: String,
    pub father_mother_name: String,
    pub age: i32,
    pub gender: String,
    pub contact: String,
    pub complete_address: String,
    pub medical_system: String,
    pub primary_issue: String,
    #[oai(skip_serializing_if_is_none)]
    pub symptoms: Option<String>,
    pub status: String,
    #[oai(skip_serializing_if_is_none)]
    pub admin_notes: Option<String>,
    #[oai(skip_serializing_if_is_none)]
    pub assigned_doctor_id: Option<i32>,
    #[oai(skip_serializing_if_is_none)]
    pub consultation_date: Option<i64>,
    pub submitted_at: i64,
    pub updated_at: i64,

    /// Submitter email, absent if the account was removed
    #[oai(skip_serializing_if_is_none)]
    pub email: Option<String>,

    /// Submitter display name
    #[oai(skip_serializing_if_is_none)]
    pub username: Option<String>,
}

impl From<(&health_form::Model, Option<&user::Model>)> for AdminFormData {
    fn from((f, u): (&health_form::Model, Option<&user::Model>)) -> Self {
        Self {
            id: f.id,
            form_id: f.form_id.clone(),
            user_id: f.user_id,
            full_name: f.full_name.clone(),
            father_mother_name: f.father_mother_name.clone(),
            age: f.age,
            gender: f.gender.clone(),
            contact: f.contact.clone(),
            complete_address: f.complete_address.clone(),
            medical_system: f.medical_system.clone(),
            primary_issue: f.primary_issue.clone(),
            symptoms: f.symptoms.clone(),
            status: f.status.clone(),
            admin_notes: f.admin_notes.clone(),
            assigned_doctor_id: f.assigned_doctor_id,
            consultation_date: f.consultation_date,
            submitted_at: f.submitted_at,
            updated_at: f.updated_at,
            email: u.map(|u| u.email.clone()),
            username: u.map(|u| u.full_name()),
        }
    }
}

/// The filters an admin listing actually applied, echoed back
#[derive(Object, Debug, Default, PartialEq)]
#[oai(rename_all = "camelCase")]
pub struct FiltersApplied {
    #[oai(skip_serializing_if_is_none)]
    pub medical_system: Option<String>,
    #[oai(skip_serializing_if_is_none)]
    pub status: Option<String>,
    #[oai(skip_serializing_if_is_none)]
    pub month: Option<String>,
    #[oai(skip_serializing_if_is_none)]
    pub year: Option<String>,
    #[oai(skip_serializing_if_is_none)]
    pub from_date: Option<String>,
    #[oai(skip_serializing_if_is_none)]
    pub to_date: Option<String>,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct AdminFormListData {
    pub forms: Vec<AdminFormData>,
    pub pagination: FormsPagination,
    pub filters_applied: FiltersApplied,
}

#[derive(Object, Debug)]
pub struct AdminFormListResponse {
    pub success: bool,
    pub data: AdminFormListData,
}

#[derive(Object, Debug)]
pub struct AdminFormDetailData {
    pub form: AdminFormData,
}

#[derive(Object, Debug)]
pub struct AdminFormDetailResponse {
    pub success: bool,
    pub data: AdminFormDetailData,
}

/// Raw query parameters of the admin form listing
///
/// `resolve` turns them into SQL-ready bounds: month/year and the explicit
/// date range all tighten the same `submitted_at` window, and `"all"` means
/// the filter is absent (the value the frontend sends for the default option).
#[derive(Debug, Default)]
pub struct AdminFormQuery {
    pub medical_system: Option<String>,
    pub status: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

impl AdminFormQuery {
    pub fn resolve(self) -> Result<(FormFilter, FiltersApplied), Vec<FieldError>> {
        let mut v = Validator::new();
        let mut filter = FormFilter::default();
        let mut applied = FiltersApplied::default();

        if let Some(ms) = present(self.medical_system) {
            match ms.parse::<MedicalSystem>() {
                Ok(parsed) => {
                    filter.medical_system = Some(parsed);
                    applied.medical_system = Some(ms);
                }
                Err(()) => v.fail(
                    "medicalSystem",
                    "Medical system must be ayurvedic, allopathic, homeopathic, naturopathy, or any",
                    Some(ms),
                ),
            }
        }

        if let Some(status) = present(self.status) {
            match status.parse::<FormStatus>() {
                Ok(parsed) => {
                    filter.status = Some(parsed);
                    applied.status = Some(status);
                }
                Err(()) => v.fail("status", "Invalid status", Some(status)),
            }
        }

        let month = match present(self.month) {
            Some(raw) => match raw.parse::<u32>() {
                Ok(m) if (1..=12).contains(&m) => {
                    applied.month = Some(raw);
                    Some(m)
                }
                _ => {
                    v.fail("month", "Month must be between 01 and 12", Some(raw));
                    None
                }
            },
            None => None,
        };

        let year = match present(self.year) {
            Some(raw) => match raw.parse::<i32>() {
                Ok(y) if (1970..=9999).contains(&y) => {
                    applied.year = Some(raw);
                    Some(y)
                }
                _ => {
                    v.fail("year", "Year must be a four-digit year", Some(raw));
                    None
                }
            },
            None => None,
        };

        if month.is_some() || year.is_some() {
            let year = year.unwrap_or_else(|| Utc::now().year());
            let (start, end) = match month {
                Some(month) => month_bounds(year, month),
                None => year_bounds(year),
            };
            tighten(&mut filter, Some(start), Some(end));
        }

        if let Some(raw) = present(self.from_date) {
            match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
                Ok(date) => {
                    tighten(&mut filter, Some(day_start(date)), None);
                    applied.from_date = Some(raw);
                }
                Err(_) => v.fail("fromDate", "Invalid date format, expected YYYY-MM-DD", Some(raw)),
            }
        }

        if let Some(raw) = present(self.to_date) {
            match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
                Ok(date) => {
                    // inclusive end-of-day
                    tighten(&mut filter, None, Some(day_start(date) + 86_400));
                    applied.to_date = Some(raw);
                }
                Err(_) => v.fail("toDate", "Invalid date format, expected YYYY-MM-DD", Some(raw)),
            }
        }

        v.finish()?;
        Ok((filter, applied))
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "all")
}

fn tighten(filter: &mut FormFilter, from: Option<i64>, until: Option<i64>) {
    if let Some(from) = from {
        filter.submitted_from = Some(filter.submitted_from.map_or(from, |cur| cur.max(from)));
    }
    if let Some(until) = until {
        filter.submitted_until = Some(filter.submitted_until.map_or(until, |cur| cur.min(until)));
    }
}

fn day_start(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0).expect("midnight always exists").and_utc().timestamp()
}

fn month_bounds(year: i32, month: u32) -> (i64, i64) {
    let start = NaiveDate::from_ymd_opt(year, month, 1).expect("validated month");
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).expect("january always exists")
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).expect("validated month")
    };
    (day_start(start), day_start(end))
}

fn year_bounds(year: i32) -> (i64, i64) {
    (month_bounds(year, 1).0, month_bounds(year, 12).1)
}

/// Request model for updating a form's status
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: String,
    pub notes: Option<String>,
    pub assigned_doctor_id: Option<i32>,

    /// RFC 3339 timestamp of the scheduled consultation
    pub consultation_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: FormStatus,
    pub admin_notes: Option<String>,
    pub assigned_doctor_id: Option<i32>,
    pub consultation_date: Option<i64>,
}

impl UpdateStatusRequest {
    pub fn validate(&self) -> Result<StatusUpdate, Vec<FieldError>> {
        let notes = self.notes.as_deref().map(str::trim);

        let mut v = Validator::new();
        v.rule(
            "status",
            &self.status,
            rules::one_of(&self.status, &FormStatus::ALL.map(|s| s.as_str()), "Invalid status"),
        );
        if let Some(notes) = notes {
            v.rule("notes", notes, rules::max_length(notes, 1000, "Notes"));
        }
        let consultation_date = match self.consultation_date.as_deref() {
            Some(raw) => match rules::parse_rfc3339(raw) {
                Ok(ts) => Some(ts),
                Err(message) => {
                    v.fail("consultationDate", message, Some(raw.to_string()));
                    None
                }
            },
            None => None,
        };
        v.finish()?;

        Ok(StatusUpdate {
            status: self.status.parse().unwrap_or(FormStatus::Submitted),
            admin_notes: notes.filter(|n| !n.is_empty()).map(str::to_string),
            assigned_doctor_id: self.assigned_doctor_id,
            consultation_date,
        })
    }
}

/// One month's submission counts in the yearly report
#[derive(Object, Debug, PartialEq)]
#[oai(rename_all = "camelCase")]
pub struct MonthlyCount {
    pub month: u32,
    pub submissions: u64,
    pub unique_users: u64,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct MonthlyReportData {
    pub year: i32,
    pub monthly_data: Vec<MonthlyCount>,
}

#[derive(Object, Debug)]
pub struct MonthlyReportResponse {
    pub success: bool,
    pub data: MonthlyReportData,
}
