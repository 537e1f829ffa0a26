pub mod types;
pub mod grouping;
pub mod presets;

pub use types::SearchRecord;
pub use grouping::{group_by_genre, nth_in_display_order, GenreGroup};
pub use presets::{find_category, preset_keyword, PresetCategory, PRESET_CATEGORIES};
