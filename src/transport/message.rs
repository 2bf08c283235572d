use serde::Deserialize;

/// Body of `POST /{topic}`. Any `published` field sent by the caller is
/// ignored; the broker stamps messages itself.
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    #[serde(rename = "message")]
    pub content: String,
}

impl PublishRequest {
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}
