//! FOSSology API model types.

mod folder;
mod group;
mod job;
mod license;
mod report;
mod source;
mod summary;
mod token;
mod upload;
mod user;

pub use folder::*;
pub use group::*;
pub use job::*;
pub use license::*;
pub use report::*;
pub use source::*;
pub use summary::*;
pub use token::*;
pub use upload::*;
pub use user::*;
