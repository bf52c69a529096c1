pub mod errors;
pub mod repository;
pub mod store;

pub use errors::ServiceError;
pub use repository::ServiceRequestRepository;
pub use store::ServiceRequestStore;
