pub mod bookmarks;
pub mod clipboard;
pub mod details;
pub mod filters;
pub mod notifications;
pub mod table;
