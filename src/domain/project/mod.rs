//! Project domain - evaluated projects and their storage

mod entity;
mod repository;

pub use entity::Project;
pub use repository::ProjectRepository;
