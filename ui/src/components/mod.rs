pub mod layout;
pub mod list_footer;
pub mod search_box;

pub use list_footer::ListFooter;
pub use search_box::SearchBox;
