use serde::{Deserialize, Serialize};

/// One enrolled-identity record as the backend stores it.
///
/// Field names follow the backend's column casing so the handshake payload
/// round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "StudentID")]
    pub student_id: i64,
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    #[serde(rename = "RoleID", default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
    #[serde(rename = "Email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// First message on every opened channel: the roster snapshot and the
/// session date, JSON-encoded as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Handshake {
    pub students: Vec<Student>,
    pub date: String,
}

/// One captured frame, 3 bytes per pixel.
#[derive(Debug, Clone)]
pub struct RgbFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}
