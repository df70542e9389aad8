// UI and formatting module

pub mod dashboard;
pub mod formatters;
pub mod graph;
pub mod layout;
pub mod sections;
pub mod table;
pub mod theme;

// Re-export commonly used items for cleaner imports
pub use dashboard::{Dashboard, MonitorReport, SectionSelection};
pub use formatters::{format_bytes, format_time, strip_ansi};
pub use layout::{render_frame, terminal_width, Row, Sections};
pub use sections::DisplayOptions;
pub use theme::disable_colors;
