use chrono::{DateTime, Utc};

use crate::entity::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A toast-style message for the rendering layer.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ClientEvent {
    RecordsUpdated {
        entity: EntityKind,
        total: u64,
        page: u32,
    },
    FormReset {
        entity: EntityKind,
    },
    FormDefaultChanged {
        entity: EntityKind,
        field: &'static str,
        value: String,
    },
    Notice(Notice),
}
