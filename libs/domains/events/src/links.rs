//! Public share links and their QR codes

use qrcode::QrCode;
use qrcode::render::svg;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::EventResult;

/// Edge length of rendered QR codes, in pixels
pub const QR_SIZE: u32 = 200;

/// Guest-facing pages of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventLinks {
    pub upload_url: String,
    pub gallery_url: String,
}

/// Which page a QR code points at
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QrTarget {
    /// Shown right after creation
    #[default]
    Upload,
    /// Shown on the events list
    Gallery,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QrQuery {
    #[serde(default)]
    pub target: QrTarget,
}

/// Builds `<base>/events/<id>/{upload,gallery}` links
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base_url: String,
}

impl LinkBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn upload_url(&self, event_id: Uuid) -> String {
        format!("{}/events/{}/upload", self.base_url, event_id)
    }

    pub fn gallery_url(&self, event_id: Uuid) -> String {
        format!("{}/events/{}/gallery", self.base_url, event_id)
    }

    pub fn links(&self, event_id: Uuid) -> EventLinks {
        EventLinks {
            upload_url: self.upload_url(event_id),
            gallery_url: self.gallery_url(event_id),
        }
    }

    pub fn url_for(&self, event_id: Uuid, target: QrTarget) -> String {
        match target {
            QrTarget::Upload => self.upload_url(event_id),
            QrTarget::Gallery => self.gallery_url(event_id),
        }
    }

    pub fn qr_svg(&self, event_id: Uuid, target: QrTarget) -> EventResult<String> {
        render_qr_svg(&self.url_for(event_id, target))
    }
}

/// Renders `content` as a black-on-white SVG QR code
pub fn render_qr_svg(content: &str) -> EventResult<String> {
    let code = QrCode::new(content.as_bytes())?;
    let image = code
        .render::<svg::Color>()
        .min_dimensions(QR_SIZE, QR_SIZE)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();

    Ok(image)
}

/// Suggested file name when the QR code is downloaded
pub fn qr_file_name(event_id: Uuid) -> String {
    format!("event-qr-{}.svg", event_id)
}
