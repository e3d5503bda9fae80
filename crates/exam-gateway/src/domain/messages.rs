//! User-facing response messages.

pub const REGISTERED: &str = "ลงทะเบียนสำเร็จ";
pub const SERVER_ERROR: &str = "เกิดข้อผิดพลาดบนเซิร์ฟเวอร์";

pub const INVALID_VALUE: &str = "Invalid value";
pub const INVALID_IDENTITY_NUMBER: &str = "รหัสประชาชนไม่ถูกต้อง (13 หลัก)";
pub const SUBJECTS_REQUIRED: &str = "กรุณาเลือกรายวิชาอย่างน้อย 1 วิชา";

pub const PHOTO_REQUIRED: &str = "กรุณาอัปโหลดภาพถ่าย";
pub const PHOTO_UNSUPPORTED_TYPE: &str = "รองรับเฉพาะไฟล์รูป .jpg .png .webp";
pub const PHOTO_TOO_LARGE: &str = "File too large";
pub const PHOTO_TOO_MANY: &str = "Too many files";
pub const UNEXPECTED_FIELD: &str = "Unexpected field";
