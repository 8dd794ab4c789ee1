use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    /// Hospital chart number. Unique across patients.
    pub medical_record: String,
    /// Normalized to 11 digits.
    pub cpf: Option<String>,
    pub birth_date: jiff::civil::Date,
    pub sex: Sex,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Sex {
    Female,
    Male,
    Other,
}

/// Client-supplied fields for creating or replacing a patient.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientInput {
    pub name: String,
    pub medical_record: String,
    #[serde(default)]
    pub cpf: Option<String>,
    pub birth_date: jiff::civil::Date,
    pub sex: Sex,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Patient {
    /// Build a new patient from validated input.
    pub fn from_input(input: PatientInput, now: jiff::Timestamp) -> Self {
        let mut patient = Self {
            id: Uuid::new_v4(),
            name: String::new(),
            medical_record: String::new(),
            cpf: None,
            birth_date: input.birth_date,
            sex: input.sex,
            phone: None,
            email: None,
            address: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        patient.replace(input, now);
        patient
    }

    /// Overwrite every client-editable field, keeping id and `created_at`.
    pub fn replace(&mut self, input: PatientInput, now: jiff::Timestamp) {
        self.name = input.name.trim().to_string();
        self.medical_record = input.medical_record.trim().to_string();
        self.cpf = input
            .cpf
            .as_deref()
            .and_then(crate::cpf::normalize);
        self.birth_date = input.birth_date;
        self.sex = input.sex;
        self.phone = non_blank(input.phone);
        self.email = non_blank(input.email);
        self.address = non_blank(input.address);
        self.notes = non_blank(input.notes);
        self.updated_at = now;
    }

    /// Case-insensitive match against name, medical record and CPF.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self.medical_record.to_lowercase().contains(&query)
            || self.cpf.as_deref().is_some_and(|cpf| cpf_matches(cpf, &query))
    }
}

/// A query written like a CPF ("529.982", "247-25") is compared by its
/// digits. Any other query must appear in the stored digits verbatim.
fn cpf_matches(cpf: &str, query: &str) -> bool {
    let cpf_shaped = query.chars().any(|c| c.is_ascii_digit())
        && query
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | ' '));
    if cpf_shaped {
        let digits: String = query.chars().filter(char::is_ascii_digit).collect();
        cpf.contains(&digits)
    } else {
        cpf.contains(query)
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
