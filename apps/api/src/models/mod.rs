pub mod page;
pub mod profile;
pub mod resume;
pub mod user;

pub use page::Page;
pub use profile::{Profile, ProfileUpdate};
pub use resume::{Resume, ResumeUpdate};
pub use user::User;

/// Opaque identifier for users, résumés and collection items.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
