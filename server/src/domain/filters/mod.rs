//! Client-side filter selection

pub mod state;

pub use state::{
    Availability, FilterController, FilterState, PriceBound, PriceRange, Validity,
};
