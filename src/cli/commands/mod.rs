mod download;
mod history;
mod info;
mod search;

pub use download::{cmd_download, cmd_presets};
pub use history::{
    cmd_history_clear, cmd_history_delete, cmd_history_list, cmd_history_stats, format_age,
};
pub use info::{cmd_formats, cmd_info};
pub use search::cmd_search;
