pub mod llm_client;
pub mod reddit_client;
pub mod search_client;

pub use llm_client::LlmClient;
pub use reddit_client::{parse_thread_link, RedditClient, ThreadLocator};
pub use search_client::SearchClient;
