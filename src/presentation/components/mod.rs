mod footer;
mod header;
mod layout;
mod popup;
mod preview;
mod rows;

pub use footer::render_footer;
pub use header::render_header;
pub use popup::render_popup;
pub use preview::render_previews;
pub use rows::render_rows;
