use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "apiDocuments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "fileName")]
    pub file_name: String,
    pub title: Option<String>,
    pub version: Option<String>,
    pub format: String,
    #[sea_orm(column_name = "storagePath", unique)]
    pub storage_path: String,
    #[sea_orm(column_name = "uploadedBy")]
    pub uploaded_by: Option<String>,
    /// RFC 3339 text
    #[sea_orm(column_name = "uploadedAt")]
    pub uploaded_at: String,
    #[sea_orm(column_name = "lastModifiedAt")]
    pub last_modified_at: Option<String>,
    #[sea_orm(column_name = "teamId")]
    pub team_id: Option<String>,
    #[sea_orm(column_name = "projectId")]
    pub project_id: Option<String>,
    pub description: Option<String>,
    /// JSON array of strings
    pub tags: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
