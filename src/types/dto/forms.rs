use poem_openapi::{payload::Json, ApiResponse, Object};

use crate::types::db::health_form;
use crate::types::dto::common::FieldError;
use crate::types::internal::{Gender, MedicalSystem};
use crate::validation::{rules, Validator};

/// Request model for submitting a health assessment form
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct SubmitFormRequest {
    pub full_name: String,
    pub father_mother_name: String,
    pub age: i32,
    pub gender: String,

    /// 10-digit mobile number, with or without +91
    pub contact: String,
    pub complete_address: String,
    pub medical_system: String,
    pub primary_issue: String,
    pub symptoms: Option<String>,
}

/// Form submission after the full rule list has passed
#[derive(Debug, Clone, PartialEq)]
pub struct NewFormSubmission {
    pub full_name: String,
    pub father_mother_name: String,
    pub age: i32,
    pub gender: Gender,
    pub contact: String,
    pub complete_address: String,
    pub medical_system: MedicalSystem,
    pub primary_issue: String,
    pub symptoms: Option<String>,
}

impl SubmitFormRequest {
    pub fn validate(&self) -> Result<NewFormSubmission, Vec<FieldError>> {
        let full_name = self.full_name.trim();
        let father_mother_name = self.father_mother_name.trim();
        let contact = self.contact.trim();
        let complete_address = self.complete_address.trim();
        let primary_issue = self.primary_issue.trim();
        let symptoms = self.symptoms.as_deref().map(str::trim);

        let mut v = Validator::new();
        v.rule("fullName", full_name, rules::length_between(full_name, 2, 100, "Full name"));
        v.rule(
            "fatherMotherName",
            father_mother_name,
            rules::length_between(father_mother_name, 2, 100, "Father/Mother name"),
        );
        v.rule(
            "age",
            &self.age.to_string(),
            rules::int_between(self.age as i64, 1, 120, "Age"),
        );
        v.rule(
            "gender",
            &self.gender,
            rules::one_of(
                &self.gender,
                &Gender::ALL.map(|g| g.as_str()),
                "Gender must be male, female, other, or prefer-not-to-say",
            ),
        );
        v.rule("contact", contact, rules::indian_mobile(contact));
        v.rule(
            "completeAddress",
            complete_address,
            rules::length_between(complete_address, 10, 500, "Complete address"),
        );
        v.rule(
            "medicalSystem",
            &self.medical_system,
            rules::one_of(
                &self.medical_system,
                &MedicalSystem::ALL.map(|m| m.as_str()),
                "Medical system must be ayurvedic, allopathic, homeopathic, naturopathy, or any",
            ),
        );
        v.rule(
            "primaryIssue",
            primary_issue,
            rules::length_between(primary_issue, 5, 1000, "Primary health concern"),
        );
        if let Some(symptoms) = symptoms {
            v.rule("symptoms", symptoms, rules::max_length(symptoms, 1000, "Symptoms"));
        }
        v.finish()?;

        Ok(NewFormSubmission {
            full_name: full_name.to_string(),
            father_mother_name: father_mother_name.to_string(),
            age: self.age,
            // enum parses cannot fail once one_of passed
            gender: self.gender.parse().unwrap_or(Gender::PreferNotToSay),
            contact: rules::normalize_mobile(contact),
            complete_address: complete_address.to_string(),
            medical_system: self.medical_system.parse().unwrap_or(MedicalSystem::Any),
            primary_issue: primary_issue.to_string(),
            symptoms: symptoms.filter(|s| !s.is_empty()).map(str::to_string),
        })
    }
}

/// A stored health assessment form, as returned to its submitter
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct FormData {
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

    /// Unix timestamp of the scheduled consultation
    #[oai(skip_serializing_if_is_none)]
    pub consultation_date: Option<i64>,

    /// Unix timestamp of submission
    pub submitted_at: i64,
    pub updated_at: i64,
}

impl From<&health_form::Model> for FormData {
    fn from(f: &health_form::Model) -> Self {
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
        }
    }
}

/// Pagination metadata for form listings
#[derive(Object, Debug, PartialEq)]
#[oai(rename_all = "camelCase")]
pub struct FormsPagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_forms: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct SubmitFormData {
    pub form_id: String,

    /// Unix timestamp of submission
    pub submitted_at: i64,
}

#[derive(Object, Debug)]
pub struct SubmitFormResponse {
    pub success: bool,
    pub message: String,
    pub data: SubmitFormData,
}

/// API response for the submit endpoint (201 on success)
#[derive(ApiResponse)]
pub enum SubmitFormApiResponse {
    /// Form stored
    #[oai(status = 201)]
    Created(Json<SubmitFormResponse>),
}

#[derive(Object, Debug)]
pub struct FormListData {
    pub forms: Vec<FormData>,
    pub pagination: FormsPagination,
}

#[derive(Object, Debug)]
pub struct FormListResponse {
    pub success: bool,
    pub data: FormListData,
}

#[derive(Object, Debug)]
pub struct FormDetailData {
    pub form: FormData,
}

#[derive(Object, Debug)]
pub struct FormDetailResponse {
    pub success: bool,
    pub data: FormDetailData,
}

/// Per-citizen submission statistics
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct UserStatistics {
    pub total_forms: u64,
    pub submitted_forms: u64,
    pub reviewed_forms: u64,
    pub scheduled_forms: u64,
    pub completed_forms: u64,

    /// The five most recent submissions
    pub recent_forms: Vec<FormData>,
}

#[derive(Object, Debug)]
pub struct UserStatisticsResponse {
    pub success: bool,
    pub data: UserStatistics,
}
