pub mod athlete;
pub mod sample;

pub use athlete::Athlete;
pub use sample::LoadSample;
