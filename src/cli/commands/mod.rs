mod list;
mod titles;

pub use list::cmd_list_movies;
pub use titles::cmd_list_titles;
