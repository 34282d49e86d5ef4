//! Banner image generation, validation, and the local placeholder.
//!
//! The provider call is retried on a short fixed schedule; every returned
//! image must decode, meet minimum dimensions, and show non-trivial pixel
//! variance (flat single-color output is a known provider failure mode).
//! When the schedule is exhausted the caller gets a locally rendered banner
//! instead - the accompanying text goes into the message caption, so the
//! placeholder itself carries no glyphs.

use crate::config::settings::Settings;
use crate::errors::Result;
use crate::r#gen::GenOutcome;
use crate::r#gen::wire::{Content, GenerateRequest, GenerateResponse, GenerationConfig, InlineData, Part};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::time::Duration;
use tracing::{debug, warn};

const GENERATE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Minimum accepted width/height for a provider image.
const MIN_DIMENSION: u32 = 256;
/// Grayscale variance below this reads as a flat image.
const MIN_PIXEL_VARIANCE: f64 = 25.0;
/// Delays slept before each retry; one initial attempt precedes them.
const RETRY_DELAYS: [Duration; 3] = [
    Duration::from_secs(1),
    Duration::from_secs(3),
    Duration::from_secs(7),
];

/// Placeholder banner width.
pub const PLACEHOLDER_WIDTH: u32 = 800;
/// Placeholder banner height.
pub const PLACEHOLDER_HEIGHT: u32 = 400;

/// Requests a banner image, retrying on the fixed schedule, falling back to
/// the local placeholder once the schedule is exhausted.
///
/// `reference_images` are attached as inline data so the model can keep
/// faces recognizable. The only `Err` here is a placeholder encode failure;
/// provider trouble never escapes as an error.
pub async fn generate_banner(
    client: &reqwest::Client,
    settings: &Settings,
    prompt: &str,
    reference_images: &[Vec<u8>],
) -> Result<GenOutcome<Vec<u8>>> {
    for attempt in 0..=RETRY_DELAYS.len() {
        if attempt > 0 {
            tokio::time::sleep(RETRY_DELAYS[attempt - 1]).await;
        }
        if let Some(bytes) = request_image(client, settings, prompt, reference_images).await {
            if image_looks_valid(&bytes) {
                debug!("Provider image accepted on attempt {}", attempt + 1);
                return Ok(GenOutcome::Generated(bytes));
            }
            warn!("Attempt {}: provider image failed validation", attempt + 1);
        }
    }
    warn!("Image generation exhausted retries, using local placeholder");
    Ok(GenOutcome::Fallback(render_placeholder()?))
}

/// One image-model call. `None` covers transport errors, error statuses,
/// unreadable bodies, and responses without inline image data.
async fn request_image(
    client: &reqwest::Client,
    settings: &Settings,
    prompt: &str,
    reference_images: &[Vec<u8>],
) -> Option<Vec<u8>> {
    let url = format!(
        "{GENERATE_URL}/{}:generateContent?key={}",
        settings.image_model, settings.gemini_api_key
    );

    let mut parts = vec![Part {
        text: Some(prompt.to_string()),
        inline_data: None,
    }];
    for bytes in reference_images {
        // skip references whose format we cannot even name
        let Ok(format) = image::guess_format(bytes) else {
            continue;
        };
        parts.push(Part {
            text: None,
            inline_data: Some(InlineData {
                mime_type: format.to_mime_type().to_string(),
                data: BASE64.encode(bytes),
            }),
        });
    }

    let request = GenerateRequest {
        contents: vec![Content { parts }],
        generation_config: Some(GenerationConfig {
            temperature: None,
            top_p: None,
            top_k: None,
            response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
        }),
    };

    let response = client
        .post(&url)
        .json(&request)
        .send()
        .await
        .inspect_err(|e| warn!("Image generation request failed: {e}"))
        .ok()?
        .error_for_status()
        .inspect_err(|e| warn!("Image generation returned error status: {e}"))
        .ok()?;

    let body: GenerateResponse = response
        .json()
        .await
        .inspect_err(|e| warn!("Image generation body was unreadable: {e}"))
        .ok()?;

    body.candidates
        .into_iter()
        .flat_map(|c| c.content.parts)
        .find_map(|part| part.inline_data)
        .and_then(|inline| {
            BASE64
                .decode(inline.data)
                .inspect_err(|e| warn!("Inline image data was not valid base64: {e}"))
                .ok()
        })
}

/// Fetches a stored reference photo. Any failure just means "no reference".
pub async fn fetch_reference_image(client: &reqwest::Client, url: &str) -> Option<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .inspect_err(|e| warn!("Reference photo fetch failed: {e}"))
        .ok()?
        .error_for_status()
        .ok()?;
    let bytes = response.bytes().await.ok()?.to_vec();
    image::load_from_memory(&bytes).is_ok().then_some(bytes)
}

/// Size and pixel-variance heuristics for provider output.
#[must_use]
pub fn image_looks_valid(bytes: &[u8]) -> bool {
    let Ok(img) = image::load_from_memory(bytes) else {
        return false;
    };
    if img.width() < MIN_DIMENSION || img.height() < MIN_DIMENSION {
        return false;
    }
    pixel_variance(&img) >= MIN_PIXEL_VARIANCE
}

/// Grayscale variance over a fixed sampling grid (at most ~64x64 samples).
// Cast safety: step values are in [1, u32::MAX/64], comfortably inside usize.
#[allow(clippy::cast_possible_truncation)]
fn pixel_variance(img: &DynamicImage) -> f64 {
    let gray = img.to_luma8();
    let (width, height) = gray.dimensions();
    let step_x = (width / 64).max(1) as usize;
    let step_y = (height / 64).max(1) as usize;

    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    let mut count = 0.0;
    for y in (0..height).step_by(step_y) {
        for x in (0..width).step_by(step_x) {
            let value = f64::from(gray.get_pixel(x, y).0[0]);
            sum += value;
            sum_sq += value * value;
            count += 1.0;
        }
    }
    if count == 0.0 {
        return 0.0;
    }
    let mean = sum / count;
    (sum_sq / count) - mean * mean
}

/// Renders the local fallback banner: dark background with two light accent
/// bars where the headline and footer would sit.
pub fn render_placeholder() -> Result<Vec<u8>> {
    let mut img = RgbImage::from_pixel(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT, Rgb([20, 20, 20]));
    for x in 40..PLACEHOLDER_WIDTH - 40 {
        for y in 60..72 {
            img.put_pixel(x, y, Rgb([240, 240, 240]));
        }
        for y in PLACEHOLDER_HEIGHT - 72..PLACEHOLDER_HEIGHT - 60 {
            img.put_pixel(x, y, Rgb([200, 200, 200]));
        }
    }

    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rand::Rng;

    fn png_bytes(img: RgbImage) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    fn noise_image(width: u32, height: u32) -> Vec<u8> {
        let mut rng = rand::thread_rng();
        let img = RgbImage::from_fn(width, height, |_, _| {
            Rgb([rng.r#gen::<u8>(), rng.r#gen::<u8>(), rng.r#gen::<u8>()])
        });
        png_bytes(img)
    }

    #[test]
    fn test_validation_rejects_garbage_bytes() {
        assert!(!image_looks_valid(b"definitely not a png"));
        assert!(!image_looks_valid(&[]));
    }

    #[test]
    fn test_validation_rejects_small_images() {
        assert!(!image_looks_valid(&noise_image(64, 64)));
        assert!(!image_looks_valid(&noise_image(512, 100)));
    }

    #[test]
    fn test_validation_rejects_flat_images() {
        let flat = png_bytes(RgbImage::from_pixel(512, 512, Rgb([128, 128, 128])));
        assert!(!image_looks_valid(&flat));
    }

    #[test]
    fn test_validation_accepts_noisy_image() {
        assert!(image_looks_valid(&noise_image(512, 512)));
    }

    #[test]
    fn test_placeholder_decodes_with_documented_dimensions() {
        let bytes = render_placeholder().unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!(img.width(), PLACEHOLDER_WIDTH);
        assert_eq!(img.height(), PLACEHOLDER_HEIGHT);
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_pixel_variance_orders_flat_below_noise() {
        let flat = image::load_from_memory(&png_bytes(RgbImage::from_pixel(
            300,
            300,
            Rgb([50, 50, 50]),
        )))
        .unwrap();
        let noisy = image::load_from_memory(&noise_image(300, 300)).unwrap();
        assert!(pixel_variance(&flat) < pixel_variance(&noisy));
        assert!(pixel_variance(&flat) < MIN_PIXEL_VARIANCE);
    }
}
