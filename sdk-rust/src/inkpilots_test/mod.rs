mod articles_api;

pub use articles_api::{MockArticlesApi, MockArticlesResult, TrackedArticlesCall};
