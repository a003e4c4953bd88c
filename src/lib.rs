pub mod compare;
pub mod crosswalk;
pub mod fetch;
pub mod input;
pub mod median;
pub mod normalize;
pub mod output;
pub mod records;
pub mod summary;
