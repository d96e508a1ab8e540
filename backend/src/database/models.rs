//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. Note that these may differ from API-specific models;
//! in particular, the password hash never leaves this layer except through
//! the credential-verification path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use std::fmt;
use std::str::FromStr;

/// Workflow status of a student application. Gates certificate generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum StudentStatus {
    Pending,
    Approved,
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentStatus::Pending => write!(f, "pending"),
            StudentStatus::Approved => write!(f, "approved"),
        }
    }
}

impl FromStr for StudentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(StudentStatus::Pending),
            "approved" => Ok(StudentStatus::Approved),
            other => Err(format!("invalid status '{}'", other)),
        }
    }
}

/// Certificate-specific nested record. Authoritative over the top-level
/// student fields at generation time; every key is optional so a patch can
/// address any subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub religion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caste: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother_tongue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institute_last_attended: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_admission: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conduct: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_for_leaving: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_leaving: Option<DateTime<Utc>>,
}

impl PersonalDetails {
    /// Shallow merge: every key present in `patch` overwrites, keys absent
    /// from the patch keep their prior value.
    pub fn merge(&mut self, patch: PersonalDetails) {
        if patch.religion.is_some() {
            self.religion = patch.religion;
        }
        if patch.caste.is_some() {
            self.caste = patch.caste;
        }
        if patch.mother_tongue.is_some() {
            self.mother_tongue = patch.mother_tongue;
        }
        if patch.nationality.is_some() {
            self.nationality = patch.nationality;
        }
        if patch.place_of_birth.is_some() {
            self.place_of_birth = patch.place_of_birth;
        }
        if patch.date_of_birth.is_some() {
            self.date_of_birth = patch.date_of_birth;
        }
        if patch.institute_last_attended.is_some() {
            self.institute_last_attended = patch.institute_last_attended;
        }
        if patch.date_of_admission.is_some() {
            self.date_of_admission = patch.date_of_admission;
        }
        if patch.conduct.is_some() {
            self.conduct = patch.conduct;
        }
        if patch.reason_for_leaving.is_some() {
            self.reason_for_leaving = patch.reason_for_leaving;
        }
        if patch.remarks.is_some() {
            self.remarks = patch.remarks;
        }
        if patch.date_of_leaving.is_some() {
            self.date_of_leaving = patch.date_of_leaving;
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub enrollment_number: String,
    pub password_hash: String,
    pub mother_name: String,
    pub course: String,
    pub mother_tongue: String,
    pub year: String,
    pub religion: String,
    pub caste: String,
    pub nationality: String,
    pub place_of_birth: String,
    pub date_of_birth: DateTime<Utc>,
    pub institute_last_attended: String,
    pub date_of_admission: DateTime<Utc>,
    pub branch: String,
    pub class_and_year: String,
    pub status: StudentStatus,
    pub personal_details: Json<PersonalDetails>,
    pub certificate_generated: bool,
    pub certificate_generated_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public representation of a Student. Excludes the password hash; this is
/// the only shape handlers are allowed to serialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub enrollment_number: String,
    pub mother_name: String,
    pub course: String,
    pub mother_tongue: String,
    pub year: String,
    pub religion: String,
    pub caste: String,
    pub nationality: String,
    pub place_of_birth: String,
    pub date_of_birth: DateTime<Utc>,
    pub institute_last_attended: String,
    pub date_of_admission: DateTime<Utc>,
    pub branch: String,
    pub class_and_year: String,
    pub status: StudentStatus,
    pub personal_details: PersonalDetails,
    pub certificate_generated: bool,
    pub certificate_generated_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Student> for StudentRecord {
    fn from(student: Student) -> Self {
        StudentRecord {
            id: student.id,
            name: student.name,
            email: student.email,
            enrollment_number: student.enrollment_number,
            mother_name: student.mother_name,
            course: student.course,
            mother_tongue: student.mother_tongue,
            year: student.year,
            religion: student.religion,
            caste: student.caste,
            nationality: student.nationality,
            place_of_birth: student.place_of_birth,
            date_of_birth: student.date_of_birth,
            institute_last_attended: student.institute_last_attended,
            date_of_admission: student.date_of_admission,
            branch: student.branch,
            class_and_year: student.class_and_year,
            status: student.status,
            personal_details: student.personal_details.0,
            certificate_generated: student.certificate_generated,
            certificate_generated_date: student.certificate_generated_date,
            created_at: student.created_at,
            updated_at: student.updated_at,
        }
    }
}

/// Short projection used in mutation responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub enrollment_number: String,
    pub status: StudentStatus,
}

impl From<&Student> for StudentSummary {
    fn from(student: &Student) -> Self {
        StudentSummary {
            id: student.id.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
            enrollment_number: student.enrollment_number.clone(),
            status: student.status,
        }
    }
}

/// Public representation of an Admin, password hash excluded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&Admin> for AdminRecord {
    fn from(admin: &Admin) -> Self {
        AdminRecord {
            id: admin.id.clone(),
            name: admin.name.clone(),
            email: admin.email.clone(),
            role: admin.role.clone(),
            last_login: admin.last_login,
        }
    }
}
