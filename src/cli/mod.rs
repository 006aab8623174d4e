use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::types::dto::auth::NewRegistration;
use crate::types::dto::forms::NewFormSubmission;
use crate::types::internal::{FormStatus, Gender, MedicalSystem};

#[derive(Parser)]
#[command(
    name = "lifestyle-clinic-backend",
    about = "REST backend for the Lifestyle Clinic citizen health portal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server (the default when no command is given)
    Serve,

    /// Create the schema and the default super admin, then exit
    InitDb,

    /// Insert sample citizens and forms into an empty database
    SeedSamples,
}

const SAMPLE_PASSWORD: &str = "Citizen@123";

struct SampleForm {
    full_name: &'static str,
    parent: &'static str,
    age: i32,
    gender: Gender,
    system: MedicalSystem,
    issue: &'static str,
    symptoms: &'static str,
    status: FormStatus,
    days_ago: i64,
}

const SAMPLE_FORMS: [SampleForm; 3] = [
    SampleForm {
        full_name: "John Doe",
        parent: "Robert Doe",
        age: 30,
        gender: Gender::Male,
        system: MedicalSystem::Allopathic,
        issue: "High blood pressure and stress management",
        symptoms: "Headaches, fatigue, sleep issues",
        status: FormStatus::Submitted,
        days_ago: 5,
    },
    SampleForm {
        full_name: "Jane Smith",
        parent: "Michael Smith",
        age: 28,
        gender: Gender::Female,
        system: MedicalSystem::Ayurvedic,
        issue: "Digestive issues and anxiety",
        symptoms: "Stomach pain, nervousness, irregular appetite",
        status: FormStatus::Reviewed,
        days_ago: 3,
    },
    SampleForm {
        full_name: "Rahul Kumar",
        parent: "Suresh Kumar",
        age: 35,
        gender: Gender::Male,
        system: MedicalSystem::Homeopathic,
        issue: "Joint pain and lifestyle counseling",
        symptoms: "Knee pain, back ache, sedentary lifestyle",
        status: FormStatus::ConsultationScheduled,
        days_ago: 1,
    },
];

/// Populate an empty database with demonstration citizens and forms.
/// Skipped entirely when any citizen already exists.
pub async fn seed_samples(app_data: &AppData) -> Result<(), InternalError> {
    if app_data.user_store.count().await? > 0 {
        tracing::info!("Users already exist, skipping sample data");
        return Ok(());
    }

    let now = Utc::now().timestamp();

    for (index, sample) in SAMPLE_FORMS.iter().enumerate() {
        let (first_name, last_name) = sample.full_name.split_once(' ').unwrap_or((sample.full_name, ""));
        let email = format!(
            "{}.{}@example.com",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        );
        let phone = format!("987654321{}", index);

        let (_, user) = register_sample(app_data, first_name, last_name, &email, &phone).await?;

        let form = app_data
            .form_store
            .insert(
                user.id,
                format!("F2412130010{:02}", index + 1),
                &NewFormSubmission {
                    full_name: sample.full_name.to_string(),
                    father_mother_name: sample.parent.to_string(),
                    age: sample.age,
                    gender: sample.gender,
                    contact: phone,
                    complete_address: format!("{} Main Street, Raipur, Chhattisgarh", 100 + index),
                    medical_system: sample.system,
                    primary_issue: sample.issue.to_string(),
                    symptoms: Some(sample.symptoms.to_string()),
                },
                now - sample.days_ago * 86_400,
            )
            .await?;

        if sample.status != FormStatus::Submitted {
            app_data
                .form_store
                .update_status(
                    form.id,
                    &crate::types::dto::admin::StatusUpdate {
                        status: sample.status,
                        admin_notes: None,
                        assigned_doctor_id: None,
                        consultation_date: None,
                    },
                    now,
                )
                .await?;
        }
    }

    let users = app_data.user_store.count().await?;
    let forms = app_data.form_store.count().await?;
    tracing::info!("Sample data ready: {} users, {} forms", users, forms);
    Ok(())
}

async fn register_sample(
    app_data: &AppData,
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: &str,
) -> Result<(String, crate::types::db::user::Model), InternalError> {
    app_data
        .auth_service
        .register(NewRegistration {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            password: SAMPLE_PASSWORD.to_string(),
            agree_to_terms: true,
            subscribe_newsletter: true,
        })
        .await
}
