//! Muster roll: every enrolled student, grouped for printing

use campus_api::{CampusClient, Student, UploadFile};
use campus_core::{with_cancellation, CampusResult, CancellationToken};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct Muster {
    students: Vec<Student>,
}

impl Muster {
    pub fn new(mut students: Vec<Student>) -> Self {
        students.sort_by(|a, b| a.student_id.cmp(&b.student_id));
        Self { students }
    }

    pub async fn load(client: &CampusClient, token: &CancellationToken) -> CampusResult<Self> {
        let students = with_cancellation(token, "load_muster", client.list_all_students()).await?;
        Ok(Self::new(students))
    }

    /// Upload a roster spreadsheet, then reload; only the reload is cancellable
    pub async fn upload_and_reload(
        client: &CampusClient,
        file: UploadFile,
        token: &CancellationToken,
    ) -> CampusResult<Self> {
        client.upload_roster(file).await?;
        Self::load(client, token).await
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Students keyed by `(semester, division)`; unknown values sort first
    pub fn by_class(&self) -> BTreeMap<(Option<u32>, Option<String>), Vec<&Student>> {
        let mut classes: BTreeMap<_, Vec<&Student>> = BTreeMap::new();
        for student in &self.students {
            classes
                .entry((student.semester, student.division.clone()))
                .or_default()
                .push(student);
        }
        classes
    }
}
