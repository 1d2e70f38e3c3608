use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOperationKind {
    List,
    Read,
    Create,
    Update,
    Delete,
    Search,
}

/// A workspace file request issued by the editor integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOperation {
    pub operation: FileOperationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
}

impl FileOperation {
    fn bare(operation: FileOperationKind) -> Self {
        Self {
            operation,
            path: None,
            content: None,
            search_query: None,
        }
    }

    /// List a directory, or the workspace root when `path` is `None`.
    pub fn list(path: Option<String>) -> Self {
        Self {
            path,
            ..Self::bare(FileOperationKind::List)
        }
    }

    pub fn read(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::bare(FileOperationKind::Read)
        }
    }

    pub fn create(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            content: Some(content.into()),
            ..Self::bare(FileOperationKind::Create)
        }
    }

    pub fn update(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            content: Some(content.into()),
            ..Self::bare(FileOperationKind::Update)
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::bare(FileOperationKind::Delete)
        }
    }

    pub fn search(query: impl Into<String>) -> Self {
        Self {
            search_query: Some(query.into()),
            ..Self::bare(FileOperationKind::Search)
        }
    }
}
