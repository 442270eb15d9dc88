pub mod answer;
pub mod loaders;
pub mod marks;
pub mod settings;
pub mod style;

pub use answer::{GeneratedAnswer, History, HISTORY_CAPACITY};
pub use loaders::{load_json_list, load_settings, save_json_list, save_settings};
pub use marks::MarksWeightage;
pub use settings::Settings;
pub use style::{CustomStyle, DefaultAnswerStyle, DEFAULT_STYLE};
