use crate::entities::teachers;

/// Teacher account data handed out of the store (without the password hash)
#[derive(Debug, Clone)]
pub struct Teacher {
    pub id: i32,
    pub username: String,
    pub created_at: String,
}

impl From<teachers::Model> for Teacher {
    fn from(model: teachers::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            created_at: model.created_at,
        }
    }
}
