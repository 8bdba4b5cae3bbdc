use serde::Serialize;

use crate::controller::queries;

#[derive(Serialize, Debug, Clone)]
pub struct Place {
    pub id: i32,
    pub name: String,
    pub track_count: i32,
    pub is_default: bool,
    pub has_custom_config: bool,
}

impl From<&queries::Place> for Place {
    fn from(value: &queries::Place) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            track_count: value.track_count,
            is_default: value.is_default,
            has_custom_config: value.has_custom_config(),
        }
    }
}
