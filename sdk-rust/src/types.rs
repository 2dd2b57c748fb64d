use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Lifecycle state of an article.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    #[default]
    Published,
    Archived,
}

impl ArticleStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The discriminant of an [`ArticleBlock`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ArticleBlockType {
    Header,
    Paragraph,
    Image,
    Video,
    List,
    Quote,
    Divider,
    Code,
}

impl fmt::Display for ArticleBlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Header => "header",
            Self::Paragraph => "paragraph",
            Self::Image => "image",
            Self::Video => "video",
            Self::List => "list",
            Self::Quote => "quote",
            Self::Divider => "divider",
            Self::Code => "code",
        })
    }
}

/// One content unit of an article. Blocks are displayed by their `order`,
/// which does not have to match their position in [`Article::content`].
///
/// Blocks of a type this version does not know, or known types whose fields
/// do not match their record, are kept as raw JSON in [`Self::Unknown`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArticleBlock {
    Header(HeaderBlock),
    Paragraph(ParagraphBlock),
    Image(ImageBlock),
    Video(VideoBlock),
    List(ListBlock),
    Quote(QuoteBlock),
    Divider(DividerBlock),
    Code(CodeBlock),
    #[serde(untagged)]
    Unknown(Value),
}

impl ArticleBlock {
    /// `None` only for an unknown block without a string `id`.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Header(block) => Some(&block.id),
            Self::Paragraph(block) => Some(&block.id),
            Self::Image(block) => Some(&block.id),
            Self::Video(block) => Some(&block.id),
            Self::List(block) => Some(&block.id),
            Self::Quote(block) => Some(&block.id),
            Self::Divider(block) => Some(&block.id),
            Self::Code(block) => Some(&block.id),
            Self::Unknown(value) => value.get("id").and_then(Value::as_str),
        }
    }

    /// `None` only for an unknown block without an integer `order`.
    #[must_use]
    pub fn order(&self) -> Option<u32> {
        match self {
            Self::Header(block) => Some(block.order),
            Self::Paragraph(block) => Some(block.order),
            Self::Image(block) => Some(block.order),
            Self::Video(block) => Some(block.order),
            Self::List(block) => Some(block.order),
            Self::Quote(block) => Some(block.order),
            Self::Divider(block) => Some(block.order),
            Self::Code(block) => Some(block.order),
            Self::Unknown(value) => value
                .get("order")
                .and_then(Value::as_u64)
                .and_then(|order| u32::try_from(order).ok()),
        }
    }

    #[must_use]
    pub fn block_type(&self) -> Option<ArticleBlockType> {
        match self {
            Self::Header(_) => Some(ArticleBlockType::Header),
            Self::Paragraph(_) => Some(ArticleBlockType::Paragraph),
            Self::Image(_) => Some(ArticleBlockType::Image),
            Self::Video(_) => Some(ArticleBlockType::Video),
            Self::List(_) => Some(ArticleBlockType::List),
            Self::Quote(_) => Some(ArticleBlockType::Quote),
            Self::Divider(_) => Some(ArticleBlockType::Divider),
            Self::Code(_) => Some(ArticleBlockType::Code),
            Self::Unknown(_) => None,
        }
    }

    /// The raw `type` tag of an unknown block.
    #[must_use]
    pub fn unknown_type(&self) -> Option<&str> {
        match self {
            Self::Unknown(value) => value.get("type").and_then(Value::as_str),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct HeaderBlock {
    pub id: String,
    pub order: u32,
    /// Heading level, 1 to 4 for `h1`..`h4`. Not range checked.
    pub level: u8,
    pub text: String,
    /// Fields not modelled by this version, kept for re-serialization.
    #[cfg_attr(feature = "utoipa", schema(ignore))]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ParagraphBlock {
    pub id: String,
    pub order: u32,
    pub text: String,
    /// Fields not modelled by this version, kept for re-serialization.
    #[cfg_attr(feature = "utoipa", schema(ignore))]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ImageBlock {
    pub id: String,
    pub order: u32,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// The width of the image in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// The height of the image in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// The prompt the image was generated from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Fields not modelled by this version, kept for re-serialization.
    #[cfg_attr(feature = "utoipa", schema(ignore))]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Where a video is hosted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum VideoProvider {
    Youtube,
    Vimeo,
    Uploaded,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct VideoBlock {
    pub id: String,
    pub order: u32,
    /// A `YouTube` or Vimeo link, or a file in InkPilots storage.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<VideoProvider>,
    /// Fields not modelled by this version, kept for re-serialization.
    #[cfg_attr(feature = "utoipa", schema(ignore))]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ListBlock {
    pub id: String,
    pub order: u32,
    /// Numbered when `true`, bulleted otherwise.
    pub ordered: bool,
    pub items: Vec<String>,
    /// Fields not modelled by this version, kept for re-serialization.
    #[cfg_attr(feature = "utoipa", schema(ignore))]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct QuoteBlock {
    pub id: String,
    pub order: u32,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Fields not modelled by this version, kept for re-serialization.
    #[cfg_attr(feature = "utoipa", schema(ignore))]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct DividerBlock {
    pub id: String,
    pub order: u32,
    /// Fields not modelled by this version, kept for re-serialization.
    #[cfg_attr(feature = "utoipa", schema(ignore))]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct CodeBlock {
    pub id: String,
    pub order: u32,
    pub text: String,
    /// Fields not modelled by this version, kept for re-serialization.
    #[cfg_attr(feature = "utoipa", schema(ignore))]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// SEO metadata of an article.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ArticleMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Fields not modelled by this version, kept for re-serialization.
    #[cfg_attr(feature = "utoipa", schema(ignore))]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An article written by an agent, as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "_id")]
    pub id: String,
    pub workspace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Language code, e.g. "en", "tr".
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,

    pub content: Vec<ArticleBlock>,

    pub meta: ArticleMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    pub status: ArticleStatus,

    /// The model that generated the article.
    pub model: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,

    pub created_at: String,
    pub updated_at: String,
    /// `None` when the field is absent, `Some(None)` when it is `null`.
    #[cfg_attr(feature = "utoipa", schema(value_type = Option<String>))]
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<Option<String>>,
    /// Fields not modelled by this version, kept for re-serialization.
    #[cfg_attr(feature = "utoipa", schema(ignore))]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Article {
    /// The blocks in display order. Blocks sharing an `order` keep their
    /// relative position; unknown blocks without an `order` come last.
    #[must_use]
    pub fn sorted_content(&self) -> Vec<&ArticleBlock> {
        let mut blocks: Vec<&ArticleBlock> = self.content.iter().collect();
        blocks.sort_by_key(|block| block.order().unwrap_or(u32::MAX));
        blocks
    }

    /// The publication timestamp, if the article has one.
    #[must_use]
    pub fn published_at(&self) -> Option<&str> {
        self.published_at.as_ref().and_then(Option::as_deref)
    }
}

fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub limit: u64,
    pub skip: u64,
    pub has_more: bool,
    /// Fields not modelled by this version, kept for re-serialization.
    #[cfg_attr(feature = "utoipa", schema(ignore))]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Pagination {
    /// The `skip` value of the following page, or `None` on the last page.
    #[must_use]
    pub fn next_skip(&self) -> Option<u64> {
        self.has_more.then(|| self.skip + self.limit)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct AgentArticlesResponse {
    pub articles: Vec<Article>,
    pub pagination: Pagination,
    /// Fields not modelled by this version, kept for re-serialization.
    #[cfg_attr(feature = "utoipa", schema(ignore))]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Query options for [`crate::InkPilotsClient::get_agent_articles`]. Unset
/// fields fall back to `limit = 50`, `skip = 0`, `status = published`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetAgentArticlesOptions {
    pub limit: Option<u32>,
    pub skip: Option<u32>,
    pub status: Option<ArticleStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn article_json() -> serde_json::Value {
        json!({
            "_id": "art_1",
            "workspaceId": "ws_1",
            "agentId": "agent_1",
            "title": "Hello",
            "language": "en",
            "content": [
                { "id": "b2", "type": "paragraph", "order": 2, "text": "Body" },
                { "id": "b1", "type": "header", "order": 1, "level": 2, "text": "Title" },
                { "id": "b3", "type": "divider", "order": 3 }
            ],
            "meta": { "tags": ["rust"] },
            "status": "published",
            "model": "gpt-4o",
            "promptTokens": 10,
            "completionTokens": 20,
            "totalTokens": 30,
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-02T00:00:00.000Z",
            "publishedAt": null
        })
    }

    #[test]
    fn article_round_trips_including_null_published_at() {
        let value = article_json();
        let article: Article = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(article.published_at, Some(None));
        assert_eq!(article.published_at(), None);
        assert_eq!(serde_json::to_value(&article).unwrap(), value);
    }

    #[test]
    fn absent_published_at_stays_absent() {
        let mut value = article_json();
        value.as_object_mut().unwrap().remove("publishedAt");
        let article: Article = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(article.published_at, None);
        assert_eq!(serde_json::to_value(&article).unwrap(), value);
    }

    #[test]
    fn sorted_content_follows_order_field() {
        let article: Article = serde_json::from_value(article_json()).unwrap();
        let ids: Vec<&str> = article
            .sorted_content()
            .iter()
            .filter_map(|b| b.id())
            .collect();
        assert_eq!(ids, ["b1", "b2", "b3"]);
        assert_eq!(
            article.content[1].block_type(),
            Some(ArticleBlockType::Header)
        );
    }

    #[test]
    fn header_level_is_not_range_checked() {
        let block: ArticleBlock = serde_json::from_value(json!({
            "id": "h", "type": "header", "order": 0, "level": 5, "text": "x"
        }))
        .unwrap();
        match block {
            ArticleBlock::Header(header) => assert_eq!(header.level, 5),
            other => panic!("unexpected block: {other:?}"),
        }
    }

    #[test]
    fn unknown_block_type_is_kept_as_json() {
        let value = json!({ "id": "t", "type": "table", "order": 6, "rows": [["a", "b"]] });
        let block: ArticleBlock = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(block, ArticleBlock::Unknown(value.clone()));
        assert_eq!(block.block_type(), None);
        assert_eq!(block.unknown_type(), Some("table"));
        assert_eq!(block.id(), Some("t"));
        assert_eq!(block.order(), Some(6));
        assert_eq!(serde_json::to_value(&block).unwrap(), value);
    }

    #[test]
    fn unknown_blocks_without_order_sort_last() {
        let mut value = article_json();
        value["content"]
            .as_array_mut()
            .unwrap()
            .insert(0, json!({ "type": "poll", "question": "?" }));
        let article: Article = serde_json::from_value(value.clone()).unwrap();

        let last = article.sorted_content()[3];
        assert_eq!(last.unknown_type(), Some("poll"));
        assert_eq!(last.id(), None);
        assert_eq!(serde_json::to_value(&article).unwrap(), value);
    }

    #[test]
    fn unmodelled_fields_are_kept() {
        let mut value = article_json();
        value["readingTime"] = json!(4);
        value["meta"]["canonicalUrl"] = json!("https://example.com/hello");
        value["content"][0]["align"] = json!("center");
        let article: Article = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(article.extra.get("readingTime"), Some(&json!(4)));
        assert!(!article.extra.contains_key("meta"));
        match &article.content[0] {
            ArticleBlock::Paragraph(paragraph) => {
                assert_eq!(paragraph.extra.get("align"), Some(&json!("center")));
                assert!(!paragraph.extra.contains_key("type"));
            }
            other => panic!("unexpected block: {other:?}"),
        }
        assert_eq!(serde_json::to_value(&article).unwrap(), value);
    }

    #[test]
    fn parses_every_block_variant() {
        let blocks: Vec<ArticleBlock> = serde_json::from_value(json!([
            { "id": "1", "type": "image", "order": 1, "url": "https://img", "alt": "a", "width": 640 },
            { "id": "2", "type": "video", "order": 2, "url": "https://yt", "provider": "youtube" },
            { "id": "3", "type": "list", "order": 3, "ordered": true, "items": ["a", "b"] },
            { "id": "4", "type": "quote", "order": 4, "text": "q", "source": "s" },
            { "id": "5", "type": "code", "order": 5, "text": "fn main() {}" }
        ]))
        .unwrap();

        let types: Vec<String> = blocks
            .iter()
            .filter_map(ArticleBlock::block_type)
            .map(|block_type| block_type.to_string())
            .collect();
        assert_eq!(types, ["image", "video", "list", "quote", "code"]);
        match &blocks[1] {
            ArticleBlock::Video(video) => assert_eq!(video.provider, Some(VideoProvider::Youtube)),
            other => panic!("unexpected block: {other:?}"),
        }
    }

    #[test]
    fn next_skip_advances_only_when_more_pages() {
        let page = Pagination {
            total: 120,
            limit: 50,
            skip: 50,
            has_more: true,
            ..Default::default()
        };
        assert_eq!(page.next_skip(), Some(100));
        let last = Pagination { has_more: false, ..page };
        assert_eq!(last.next_skip(), None);
    }
}
