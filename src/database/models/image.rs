use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::files;

/// Image metadata record. The bytes live in the blob table under `file_unique`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Image {
    pub id: Uuid,
    pub file_unique: String,
    pub filename: String,
    pub mimetype: String,
    pub project_id: Uuid,
    pub created_by: Uuid,
    pub coords: Value,
    pub created_at: DateTime<Utc>,
}

/// Input for a new upload; `filename` is already sanitized.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mimetype: String,
    pub user_id: Uuid,
    pub project_id: Uuid,
}

/// Fields a client may change on an image. Anything else is rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageUpdate {
    #[serde(default)]
    pub coords: Option<Value>,
}

impl ImageUpdate {
    pub fn is_empty(&self) -> bool {
        self.coords.is_none()
    }

    pub fn apply(&self, image: &mut Image) {
        if let Some(coords) = &self.coords {
            image.coords = coords.clone();
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct StoredBlob {
    pub data: Vec<u8>,
    pub mimetype: String,
}

/// Wire format: `{pid, uid, fnu, url, coords}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageView {
    pub pid: Uuid,
    pub uid: Uuid,
    pub fnu: String,
    pub url: String,
    pub coords: Value,
}

impl From<&Image> for ImageView {
    fn from(image: &Image) -> Self {
        Self {
            pid: image.project_id,
            uid: image.created_by,
            fnu: image.file_unique.clone(),
            url: files::image_url(&image.file_unique),
            coords: image.coords.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_accepts_coords_only() {
        let update: ImageUpdate = serde_json::from_value(json!({ "coords": [[1, 2]] })).unwrap();
        assert_eq!(update.coords, Some(json!([[1, 2]])));

        let empty: ImageUpdate = serde_json::from_value(json!({})).unwrap();
        assert!(empty.is_empty());

        let injected = serde_json::from_value::<ImageUpdate>(json!({ "createdBy": "someone" }));
        assert!(injected.is_err());
    }

    #[test]
    fn view_builds_url_from_unique_name() {
        let image = Image {
            id: Uuid::new_v4(),
            file_unique: "abc.cat.png".into(),
            filename: "cat.png".into(),
            mimetype: "image/png".into(),
            project_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            coords: json!([]),
            created_at: Utc::now(),
        };
        let view = ImageView::from(&image);
        assert_eq!(view.url, "/api/image/abc.cat.png");
        assert_eq!(view.fnu, "abc.cat.png");
        assert_eq!(view.pid, image.project_id);
    }
}
