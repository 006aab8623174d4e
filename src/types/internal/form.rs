use std::fmt;
use std::str::FromStr;

/// Lifecycle of a submitted health assessment form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Submitted,
    Reviewed,
    ConsultationScheduled,
    Completed,
}

impl FormStatus {
    pub const ALL: [FormStatus; 4] = [
        FormStatus::Submitted,
        FormStatus::Reviewed,
        FormStatus::ConsultationScheduled,
        FormStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::Submitted => "submitted",
            FormStatus::Reviewed => "reviewed",
            FormStatus::ConsultationScheduled => "consultation_scheduled",
            FormStatus::Completed => "completed",
        }
    }
}

impl FromStr for FormStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(FormStatus::Submitted),
            "reviewed" => Ok(FormStatus::Reviewed),
            "consultation_scheduled" => Ok(FormStatus::ConsultationScheduled),
            "completed" => Ok(FormStatus::Completed),
            _ => Err(()),
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl Gender {
    pub const ALL: [Gender; 4] = [Gender::Male, Gender::Female, Gender::Other, Gender::PreferNotToSay];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::PreferNotToSay => "prefer-not-to-say",
        }
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            "prefer-not-to-say" => Ok(Gender::PreferNotToSay),
            _ => Err(()),
        }
    }
}

/// Medical system the citizen prefers for their consultation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedicalSystem {
    Ayurvedic,
    Allopathic,
    Homeopathic,
    Naturopathy,
    Any,
}

impl MedicalSystem {
    pub const ALL: [MedicalSystem; 5] = [
        MedicalSystem::Ayurvedic,
        MedicalSystem::Allopathic,
        MedicalSystem::Homeopathic,
        MedicalSystem::Naturopathy,
        MedicalSystem::Any,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MedicalSystem::Ayurvedic => "ayurvedic",
            MedicalSystem::Allopathic => "allopathic",
            MedicalSystem::Homeopathic => "homeopathic",
            MedicalSystem::Naturopathy => "naturopathy",
            MedicalSystem::Any => "any",
        }
    }
}

impl FromStr for MedicalSystem {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ayurvedic" => Ok(MedicalSystem::Ayurvedic),
            "allopathic" => Ok(MedicalSystem::Allopathic),
            "homeopathic" => Ok(MedicalSystem::Homeopathic),
            "naturopathy" => Ok(MedicalSystem::Naturopathy),
            "any" => Ok(MedicalSystem::Any),
            _ => Err(()),
        }
    }
}

/// Admin listing filters, compiled to SQL predicates by the form store
///
/// `month`/`year` and the explicit date bounds are all expressed as
/// `submitted_at` ranges so filtering happens in the database, not in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFilter {
    pub medical_system: Option<MedicalSystem>,
    pub status: Option<FormStatus>,
    /// Inclusive lower bound on `submitted_at`
    pub submitted_from: Option<i64>,
    /// Exclusive upper bound on `submitted_at`
    pub submitted_until: Option<i64>,
}

impl FormFilter {
    pub fn is_empty(&self) -> bool {
        *self == FormFilter::default()
    }
}
