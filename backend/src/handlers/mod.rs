pub mod pets;


pub use pets::configure_pet_routes;
