//! The seven-day program: task catalog and per-day input rules.

mod catalog;
mod day_schema;

pub use catalog::{
    task_for, DailyTask, HonestyScript, DAILY_TASKS, MICRO_HONESTY_SCRIPTS,
    WEEKLY_REPORT_COVER_QUOTE,
};
pub use day_schema::{DaySchema, RequiredText, DAY1_TAGS, STORY_MAX_CHARS};
