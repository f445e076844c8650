//! Team logo URL validation.

use std::time::Duration;

use image::ImageFormat;
use log::debug;

const ACCEPTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::Bmp,
    ImageFormat::WebP,
];

/// Fetches a URL and checks that the body starts with a known image signature.
pub struct LogoValidator {
    client: reqwest::Client,
}

impl LogoValidator {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    pub async fn is_valid(&self, url: &str) -> bool {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Logo fetch failed for {}: {}", url, e);
                return false;
            }
        };
        if response.status() != reqwest::StatusCode::OK {
            debug!("Logo fetch for {} returned {}", url, response.status());
            return false;
        }
        match response.bytes().await {
            Ok(body) => is_accepted_image(&body),
            Err(e) => {
                debug!("Failed to read logo body from {}: {}", url, e);
                false
            }
        }
    }
}

pub fn is_accepted_image(bytes: &[u8]) -> bool {
    image::guess_format(bytes)
        .map(|format| ACCEPTED_FORMATS.contains(&format))
        .unwrap_or(false)
}
