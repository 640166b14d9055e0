//! Wire types for the platform's public JSON listings

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Thing {
    pub kind: String,
    pub data: serde_json::Value,
}

/// The replies field of a comment is either a nested listing or an
/// empty string when the comment has no replies.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum Replies {
    Listing(Box<Listing>),
    Empty(String),
}

#[derive(Deserialize, Debug, Clone)]
pub struct ItemData {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub upvote_ratio: f64,
    #[serde(default)]
    pub num_comments: i32,
    pub created_utc: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ReplyData {
    pub id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub parent_id: String,
    pub created_utc: f64,
    pub replies: Option<Replies>,
}
