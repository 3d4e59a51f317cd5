//! Request and response bodies for the JSON API.

use serde::{Deserialize, Serialize};

use crate::data::IndexStats;
use crate::matching::ResultRecord;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyzeRequest {
    pub ocr_text: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyzeResponse {
    pub results: Vec<ResultRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub semantic: bool,
    pub index: IndexStats,
}
