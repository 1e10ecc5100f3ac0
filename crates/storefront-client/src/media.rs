//! Direct uploads to the third-party media host.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::{Client, Url};
use storefront_core::{AppConfig, ImageInput};

use crate::api::{MediaHost, UploadedMedia};
use crate::client::read_body;
use crate::error::ClientError;

/// Uploads images to `<media_url>/image/upload` and returns the hosted URL.
pub struct MediaClient {
    client: Client,
    upload_url: Url,
    upload_preset: Option<String>,
}

impl MediaClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidBaseUrl`] for a bad media URL.
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_base_url(
            &config.media_url,
            config.media_upload_preset.as_deref(),
            config.request_timeout_secs,
        )
    }

    /// # Errors
    ///
    /// Same as [`MediaClient::new`].
    pub fn with_base_url(
        media_url: &str,
        upload_preset: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        let raw = format!("{}/image/upload", media_url.trim_end_matches('/'));
        let upload_url = Url::parse(&raw).map_err(|e| ClientError::InvalidBaseUrl {
            url: media_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            upload_url,
            upload_preset: upload_preset.map(str::to_owned),
        })
    }
}

/// Renders an image as a `data:` URL, the form the media host accepts.
#[must_use]
pub fn to_data_url(image: &ImageInput) -> String {
    match image {
        ImageInput::DataUrl(url) => url.clone(),
        ImageInput::File {
            content_type,
            bytes,
            ..
        } => format!("data:{content_type};base64,{}", STANDARD.encode(bytes)),
    }
}

impl MediaHost for MediaClient {
    async fn upload(&self, image: &ImageInput) -> Result<UploadedMedia, ClientError> {
        let mut body = serde_json::json!({ "file": to_data_url(image) });
        if let Some(preset) = &self.upload_preset {
            body["upload_preset"] = serde_json::Value::String(preset.clone());
        }
        if let ImageInput::File { file_name, .. } = image {
            body["filename_override"] = serde_json::Value::String(file_name.clone());
        }

        let response = self
            .client
            .post(self.upload_url.clone())
            .json(&body)
            .send()
            .await?;
        let text = read_body(response, &self.upload_url).await?;
        let uploaded: UploadedMedia =
            serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
                context: "media upload response".to_string(),
                source: e,
            })?;
        tracing::debug!(public_id = %uploaded.public_id, "image uploaded");
        Ok(uploaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_passes_through() {
        let image = ImageInput::DataUrl("data:image/png;base64,AAAA".to_string());
        assert_eq!(to_data_url(&image), "data:image/png;base64,AAAA");
    }

    #[test]
    fn file_is_base64_encoded() {
        let image = ImageInput::File {
            file_name: "red.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: b"hi".to_vec(),
        };
        assert_eq!(to_data_url(&image), "data:image/png;base64,aGk=");
    }

    #[test]
    fn upload_url_is_built_from_media_url() {
        let client = MediaClient::with_base_url("https://media.test/v1_1/demo/", None, 5).unwrap();
        assert_eq!(
            client.upload_url.as_str(),
            "https://media.test/v1_1/demo/image/upload"
        );
    }
}
