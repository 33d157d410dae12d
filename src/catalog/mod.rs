pub mod category;

pub use category::{
    MainCategory, ResourceCategory, ResourceSection, group_by_main_category, main_category_of,
    normalize_category,
};
