//! Services module
//!
//! Business logic services that coordinate between the HTTP layer and
//! the repository.

pub mod folders;
pub mod notes;
pub mod restore;
pub mod sweeper;
pub mod tags;
pub mod trash;

pub use folders::FoldersService;
pub use notes::NotesService;
pub use restore::{RestoreService, RestoredItem};
pub use sweeper::SweeperService;
pub use tags::TagsService;
pub use trash::TrashService;
