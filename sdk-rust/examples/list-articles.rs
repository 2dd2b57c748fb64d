use dotenvy::dotenv;
use inkpilots_sdk::{ArticleBlock, GetAgentArticlesOptions, InkPilotsClient, InkPilotsError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let agent_id = std::env::args()
        .nth(1)
        .expect("usage: list-articles <agent-id>");

    let client = InkPilotsClient::from_env().expect("INKPILOTS_API_KEY must be set");

    let response = match client
        .get_agent_articles(
            &agent_id,
            GetAgentArticlesOptions {
                limit: Some(10),
                ..Default::default()
            },
        )
        .await
    {
        Ok(response) => response,
        Err(error) if error.is_quota_exceeded() => {
            eprintln!("Quota exceeded, upgrade your InkPilots plan: {error}");
            return;
        }
        Err(InkPilotsError::Api(error)) => {
            eprintln!(
                "API error {} ({}): {} [request id: {}]",
                error.status,
                error.code,
                error.message,
                error.request_id.as_deref().unwrap_or("-")
            );
            return;
        }
        Err(error) => panic!("{error}"),
    };

    for article in &response.articles {
        println!("# {} [{}]", article.title, article.status);
        for block in article.sorted_content() {
            match block {
                ArticleBlock::Header(header) => println!("{}", header.text),
                ArticleBlock::Paragraph(paragraph) => println!("{}", paragraph.text),
                other => match other.block_type() {
                    Some(block_type) => println!("<{block_type}>"),
                    None => println!("<{}>", other.unknown_type().unwrap_or("unknown")),
                },
            }
        }
        println!();
    }

    println!(
        "{} of {} articles (next skip: {:?})",
        response.articles.len(),
        response.pagination.total,
        response.pagination.next_skip()
    );
}
