//! Holiday calendar

use crate::client::{CampusClient, UploadFile};
use campus_core::CampusResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl CampusClient {
    /// `GET holidays/`
    pub async fn list_holidays(&self) -> CampusResult<Vec<Holiday>> {
        self.get_json("holidays/", &[], "list_holidays").await
    }

    /// `POST holidays/upload/` with a spreadsheet under `file`
    pub async fn upload_holidays(&self, file: UploadFile) -> CampusResult<serde_json::Value> {
        let form = reqwest::multipart::Form::new().part("file", file.into_part()?);
        self.post_multipart("holidays/upload/", form, "upload_holidays")
            .await
    }
}
