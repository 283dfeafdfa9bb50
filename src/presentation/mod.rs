mod components;
mod view;

pub use view::{LevelPreview, PopupRender, UiContext, draw};
