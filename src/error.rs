use thiserror::Error;

pub type CalendarResult<T> = Result<T, CalendarError>;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("invalid sheet extent: {0}")]
    InvalidSheetExtent(f64),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
