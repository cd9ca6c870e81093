pub mod posts;

pub use posts::PostsService;
