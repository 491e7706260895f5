mod prepare_env;
mod stub_gateway;

pub use prepare_env::{prepare_test_env, random_store_path, sample_order};
pub use stub_gateway::{StubGateway, STUB_REDIRECT_URL};
