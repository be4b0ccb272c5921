pub mod column;
pub mod config;
pub mod matrix;
pub mod view;

pub use column::{ColumnDayLayout, ColumnItemGeometry, VisibilityTarget};
pub use config::{
    ColumnViewConfig, MatrixViewConfig, ResolvedColumnConfig, ResolvedMatrixConfig,
};
pub use matrix::{
    ExpandAnimation, ExpandSlot, MatrixItemGeometry, MatrixItemKind, MatrixRowLayout,
    RowToggleAction,
};
pub use view::{ViewConfiguration, ViewKind};
