mod release_storage;
mod role_storage;

pub use release_storage::{JsonReleaseStorage, ReleaseStorage};
pub use role_storage::{JsonRoleStorage, RoleStorage};
