pub mod breast;
pub mod diabetes;
pub mod heart;
pub mod imaging;
pub mod lung;

pub use breast::BreastModule;
pub use diabetes::DiabetesModule;
pub use heart::HeartModule;
pub use lung::LungModule;
