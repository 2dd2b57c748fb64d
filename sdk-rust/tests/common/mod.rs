#![allow(dead_code)]

use inkpilots_sdk::{InkPilotsClient, InkPilotsClientOptions};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const API_KEY: &str = "ink_test_key";

pub fn client_for(server: &MockServer) -> InkPilotsClient {
    client_with_timeout(server, 5_000)
}

pub fn client_with_timeout(server: &MockServer, timeout_ms: u64) -> InkPilotsClient {
    InkPilotsClient::new(InkPilotsClientOptions {
        api_key: Some(API_KEY.to_string()),
        base_url: Some(format!("{}/api/v1/", server.uri())),
        timeout_ms: Some(timeout_ms),
        ..Default::default()
    })
    .expect("client should build")
}

pub fn articles_body() -> Value {
    json!({
        "articles": [
            {
                "_id": "665f1c2e9b1e8a0012a4c001",
                "workspaceId": "ws_42",
                "agentId": "agent_7",
                "author": "Ink Agent",
                "title": "Getting started with Rust",
                "slug": "getting-started-with-rust",
                "language": "en",
                "coverImage": "https://cdn.inkpilots.com/covers/rust.png",
                "content": [
                    { "id": "b1", "type": "header", "order": 0, "level": 1, "text": "Getting started" },
                    { "id": "b2", "type": "paragraph", "order": 1, "text": "Rust is a systems language." },
                    {
                        "id": "b3",
                        "type": "image",
                        "order": 2,
                        "url": "https://cdn.inkpilots.com/img/ferris.png",
                        "caption": "Ferris",
                        "alt": "A crab",
                        "width": 800,
                        "height": 600,
                        "prompt": "a friendly orange crab"
                    },
                    {
                        "id": "b4",
                        "type": "video",
                        "order": 3,
                        "url": "https://vimeo.com/1",
                        "provider": "vimeo"
                    },
                    { "id": "b5", "type": "list", "order": 4, "ordered": false, "items": ["cargo", "rustup"] },
                    { "id": "b6", "type": "quote", "order": 5, "text": "Fearless concurrency", "source": "The Book" },
                    { "id": "b7", "type": "divider", "order": 6 },
                    { "id": "b8", "type": "code", "order": 7, "text": "fn main() {}" }
                ],
                "meta": {
                    "description": "An intro",
                    "keywords": ["rust", "intro"],
                    "tags": ["programming"]
                },
                "tags": ["rust"],
                "status": "published",
                "model": "gpt-4o-mini",
                "promptTokens": 512,
                "completionTokens": 2048,
                "totalTokens": 2560,
                "createdAt": "2024-06-04T10:00:00.000Z",
                "updatedAt": "2024-06-04T11:00:00.000Z",
                "publishedAt": "2024-06-04T11:00:00.000Z"
            },
            {
                "_id": "665f1c2e9b1e8a0012a4c002",
                "workspaceId": "ws_42",
                "title": "Draft notes",
                "language": "tr",
                "content": [],
                "meta": {},
                "status": "draft",
                "model": "gpt-4o-mini",
                "promptTokens": 0,
                "completionTokens": 0,
                "totalTokens": 0,
                "createdAt": "2024-06-05T10:00:00.000Z",
                "updatedAt": "2024-06-05T10:00:00.000Z",
                "publishedAt": null
            }
        ],
        "pagination": { "total": 2, "limit": 50, "skip": 0, "hasMore": false }
    })
}
