mod dashboard;
mod lead;
mod project;
mod user;

pub use dashboard::*;
pub use lead::*;
pub use project::*;
pub use user::*;
