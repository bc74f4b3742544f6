pub mod chat;
pub mod geolocation;
pub mod location;
pub mod routing;
pub mod upload;
pub mod verification;
