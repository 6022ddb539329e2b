pub mod schema;
pub mod strategy;
pub mod modules;
pub mod normalize;
pub mod upload;
pub mod validation;
pub mod request;
pub mod verdict;
pub mod service;
pub mod report;
