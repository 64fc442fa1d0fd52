//! Editor session errors.

use cutframe_common::error::CutframeError;
use cutframe_project_model::edit::EditError;
use cutframe_project_model::store::StoreError;
use cutframe_timeline::scale::TimelineError;

use crate::media::MediaError;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Timeline(#[from] TimelineError),

    #[error("Project not found: {id}")]
    ProjectNotFound { id: String },
}

pub type EditorResult<T> = Result<T, EditorError>;

impl From<EditorError> for CutframeError {
    fn from(err: EditorError) -> Self {
        let message = err.to_string();
        match err {
            EditorError::Media(_) => CutframeError::media(message),
            EditorError::Edit(_) => CutframeError::edit(message),
            EditorError::Store(_) => CutframeError::storage(message),
            EditorError::Timeline(_) => CutframeError::Config { message },
            EditorError::ProjectNotFound { .. } => CutframeError::project(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_keeps_category() {
        let err: CutframeError = EditorError::Edit(EditError::ClipNotFound {
            id: "c1".to_string(),
        })
        .into();
        assert!(matches!(err, CutframeError::Edit { .. }));
        assert!(err.to_string().contains("c1"));

        let err: CutframeError = EditorError::ProjectNotFound {
            id: "p9".to_string(),
        }
        .into();
        assert!(matches!(err, CutframeError::Project { .. }));
    }
}
