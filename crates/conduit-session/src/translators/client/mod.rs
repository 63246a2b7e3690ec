//! Client → backend translators. A narrower surface than the backend
//! direction: login, chat passthrough, and item use with ID remapping.

pub mod item_use;
pub mod login;
pub mod text;
