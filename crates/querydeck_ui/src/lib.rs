pub mod handlers;
pub mod result_view;
pub mod widgets;

pub use handlers::{
    TableNavigationHandler, handle_connection_form_input,
    handle_query_editor_input, handle_search_filter_input,
};
pub use result_view::{ResultView, SortDirection, SortState};
pub use widgets::*;
