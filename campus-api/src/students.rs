//! Student roster, registration and marks

use crate::client::{CampusClient, UploadFile};
use campus_core::{validation_error, CampusResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Roll number; the backend sends it either as a string or as a number
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StudentId(pub String);

impl<'de> Deserialize<'de> for StudentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => StudentId(text),
            Raw::Number(number) => StudentId(number.to_string()),
        })
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StudentId {
    fn from(value: &str) -> Self {
        StudentId(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: StudentId,
    pub name: String,
    #[serde(default)]
    pub semester: Option<u32>,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// `students/all/` answers with either a bare array or `{students: [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StudentList {
    Bare(Vec<Student>),
    Wrapped { students: Vec<Student> },
}

impl From<StudentList> for Vec<Student> {
    fn from(list: StudentList) -> Self {
        match list {
            StudentList::Bare(students) | StudentList::Wrapped { students } => students,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SemesterStudents {
    students: Vec<Student>,
}

/// Student access registration submitted before a quiz attempt
#[derive(Debug, Clone, Default, Serialize)]
pub struct StudentRegistration {
    pub student_id: String,
    pub name: String,
    pub gender: String,
    pub semester: u32,
    pub division: String,
}

impl StudentRegistration {
    /// Every field must be filled in
    pub fn validate(&self) -> CampusResult<()> {
        let missing = [
            ("student_id", self.student_id.trim().is_empty()),
            ("name", self.name.trim().is_empty()),
            ("gender", self.gender.trim().is_empty()),
            ("semester", self.semester == 0),
            ("division", self.division.trim().is_empty()),
        ]
        .into_iter()
        .find(|(_, empty)| *empty);

        match missing {
            Some((field, _)) => Err(validation_error!(
                "Please fill all fields to continue",
                field,
                "students"
            )),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Serialize)]
struct MarksUpdate {
    marks: u32,
}

pub const MAX_MARKS: u32 = 100;

impl CampusClient {
    /// `GET students/all/`
    pub async fn list_all_students(&self) -> CampusResult<Vec<Student>> {
        let list: StudentList = self
            .get_json("students/all/", &[], "list_all_students")
            .await?;
        Ok(list.into())
    }

    /// `GET students/?semester=`
    pub async fn students_by_semester(&self, semester: u32) -> CampusResult<Vec<Student>> {
        let list: SemesterStudents = self
            .get_json(
                "students/",
                &[("semester", semester.to_string())],
                "students_by_semester",
            )
            .await?;
        Ok(list.students)
    }

    /// `POST students/` with the roster spreadsheet under `file`
    pub async fn upload_roster(&self, file: UploadFile) -> CampusResult<serde_json::Value> {
        let form = reqwest::multipart::Form::new().part("file", file.into_part()?);
        self.post_multipart("students/", form, "upload_roster").await
    }

    /// `POST students/register/`
    pub async fn register_student(
        &self,
        registration: &StudentRegistration,
    ) -> CampusResult<serde_json::Value> {
        registration.validate()?;
        self.send_json(
            reqwest::Method::POST,
            "students/register/",
            registration,
            "register_student",
        )
        .await
    }

    /// `PUT students/<id>/update-marks/`; marks outside 0..=100 are rejected locally
    pub async fn update_marks(
        &self,
        student_id: &str,
        marks: u32,
    ) -> CampusResult<serde_json::Value> {
        if marks > MAX_MARKS {
            return Err(validation_error!(
                "Please enter valid marks (0-100)",
                "marks",
                "students"
            ));
        }
        if student_id.trim().is_empty() {
            return Err(validation_error!(
                "Student id is required",
                "student_id",
                "students"
            ));
        }

        self.send_json(
            reqwest::Method::PUT,
            &format!("students/{}/update-marks/", student_id.trim()),
            &MarksUpdate { marks },
            "update_marks",
        )
        .await
    }
}
