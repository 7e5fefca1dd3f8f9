//! Properties module - listing models, repository traits and the listing service.

mod properties_model;
mod properties_service;
mod properties_traits;

pub use properties_model::*;
pub use properties_service::PropertyService;
pub use properties_traits::{PropertyRepositoryTrait, PropertyServiceTrait};
