mod home;
mod not_found;
mod posts;
mod tasks;

pub use home::HomePage;
pub use not_found::NotFoundPage;
pub use posts::PostsPage;
pub use tasks::TasksPage;
