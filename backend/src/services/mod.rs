pub mod filter;
pub mod identity;
pub mod listing;
pub mod pg_store;
pub mod store;

pub use filter::{FilterError, ListingFilter, month_window};
pub use identity::{
    AuthenticatedUser, IdentityError, IdentityVerifier, RemoteIdentityVerifier,
    StaticIdentityVerifier,
};
pub use listing::{ListingError, ListingService};
pub use pg_store::PgPetStore;
pub use store::{InMemoryPetStore, PetStore, StoreError};
