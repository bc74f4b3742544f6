pub mod chat;
pub mod complaint;
pub mod location;
pub mod project;
pub mod requests;
pub mod session;

// Re-export commonly used types
pub use location::{GeoPoint, InspectionPoint};
pub use requests::{
    CheckLocationResponse, CreateVerificationRequest, ErrorResponse, UploadPhotoRequest,
    UploadPhotoResponse, VerificationSnapshot,
};
pub use session::{Role, UserSession};
