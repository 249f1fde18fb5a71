use serde::{Deserialize, Serialize};

use crate::models::{Item, Teacher};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ItemDto {
    pub id: i32,
    pub description: String,
    pub found_location: String,
    pub collect_location: String,
    pub image_url: Option<String>,
    pub uploaded_at: String,
    pub status: String,
    pub collected_at: Option<String>,
}

impl From<Item> for ItemDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            description: item.description,
            found_location: item.found_location,
            collect_location: item.collect_location,
            image_url: item.image_path.map(|p| format!("/images/{p}")),
            uploaded_at: item.uploaded_at,
            status: item.status.to_string(),
            collected_at: item.collected_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TeacherDto {
    pub id: i32,
    pub username: String,
    pub created_at: String,
}

impl From<Teacher> for TeacherDto {
    fn from(teacher: Teacher) -> Self {
        Self {
            id: teacher.id,
            username: teacher.username,
            created_at: teacher.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub database: bool,
    pub bootstrapped: bool,
    pub teachers: u64,
    pub lost_items: u64,
    pub collected_items: u64,
    pub archived_items: u64,
}

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub ran: bool,
    pub examined: usize,
    pub archived: usize,
    pub skipped_malformed: usize,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub bootstrapped: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateTeacherRequest {
    pub username: String,
    pub password: String,
}
