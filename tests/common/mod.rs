pub mod app;
pub mod factory;

#[allow(unused_imports)]
pub use app::{FakeBackend, FakeModel, TestApp, TEST_EMAIL, TEST_PASSWORD, TEST_TOKEN};
#[allow(unused_imports)]
pub use factory::Factory;
