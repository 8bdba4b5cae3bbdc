use serde::Serialize;

use crate::controller::queries;

#[derive(Serialize, Debug, Clone)]
pub struct TrackType {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub icon_url: String,
    pub icon_filename: String,
    pub is_default: bool,
    pub is_placeholder: bool,
}

impl From<&queries::TrackType> for TrackType {
    fn from(value: &queries::TrackType) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            description: value.description.clone().unwrap_or_default(),
            icon_url: value.icon_url(),
            icon_filename: value.icon_filename.clone(),
            is_default: value.is_default,
            is_placeholder: value.is_placeholder,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct TrackConfigEntry {
    pub track_number: i32,
    pub track_type_id: Option<i32>,
    pub track_type_name: String,
    pub icon_url: String,
}

impl From<&queries::TrackConfigEntry> for TrackConfigEntry {
    fn from(value: &queries::TrackConfigEntry) -> Self {
        Self {
            track_number: value.track_number,
            track_type_id: value.track_type_id,
            track_type_name: value.track_type_name.clone(),
            icon_url: value.icon_url.clone(),
        }
    }
}
