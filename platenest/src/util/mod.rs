mod config;

#[doc(inline)]
pub use config::NestConfig;
