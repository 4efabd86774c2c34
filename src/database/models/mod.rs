pub mod client;
pub mod project;
pub mod status;
pub mod user;

pub use client::{ClientAddressModel, ClientInformationModel, ClientModel, ClientRecord, ClientUpdate, NewClient};
pub use project::{NewProject, ProjectModel, ProjectRecord, ProjectUpdate};
pub use status::StatusModel;
pub use user::{NewUser, UserAddressModel, UserInformationModel, UserModel, UserRecord, UserUpdate};
