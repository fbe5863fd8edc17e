//! Raster tile download for the map base layer

use std::time::Duration;

use fleet_domain::model::TileId;
use fleet_types::TransportError;
use reqwest::Client;
use tracing::debug;

/// CARTO dark basemap
pub const DEFAULT_TILE_URL: &str = "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png";

pub const DEFAULT_SUBDOMAINS: &str = "abcd";

pub const ATTRIBUTION: &str = "© OpenStreetMap contributors © CARTO";

/// URL template for a slippy-map tile server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSource {
    /// Supports `{s}`, `{z}`, `{x}`, `{y}` and `{r}` placeholders
    pub url_template: String,
    /// One character per subdomain, rotated across tiles
    pub subdomains: String,
}

impl Default for TileSource {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_TILE_URL.to_string(),
            subdomains: DEFAULT_SUBDOMAINS.to_string(),
        }
    }
}

impl TileSource {
    pub fn new(url_template: impl Into<String>, subdomains: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            subdomains: subdomains.into(),
        }
    }

    /// Concrete URL for one tile
    pub fn url_for(&self, tile: TileId) -> String {
        let subdomain = self
            .subdomains
            .chars()
            .nth(((tile.x + tile.y) as usize) % self.subdomains.chars().count().max(1))
            .map(String::from)
            .unwrap_or_default();

        self.url_template
            .replace("{s}", &subdomain)
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
            .replace("{r}", "")
    }
}

/// Downloads encoded tile images
#[derive(Debug, Clone)]
pub struct TileFetcher {
    client: Client,
    source: TileSource,
}

impl TileFetcher {
    pub fn new(source: TileSource) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .user_agent(concat!("fleet-tracker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self { client, source })
    }

    /// Fetch the encoded (PNG/JPEG) bytes of a tile
    pub async fn fetch(&self, tile: TileId) -> Result<Vec<u8>, TransportError> {
        let url = self.source.url_for(tile);
        debug!(url = %url, "fetching tile");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        let url = TileSource::default().url_for(TileId { x: 11, y: 17, z: 5 });
        // (11 + 17) % 4 == 0 -> "a"
        assert_eq!(url, "https://a.basemaps.cartocdn.com/dark_all/5/11/17.png");
    }

    #[test]
    fn test_subdomain_rotation() {
        let source = TileSource::default();
        let b = source.url_for(TileId { x: 1, y: 0, z: 1 });
        let c = source.url_for(TileId { x: 1, y: 1, z: 1 });
        assert!(b.starts_with("https://b."));
        assert!(c.starts_with("https://c."));
    }

    #[test]
    fn test_template_without_subdomains() {
        let source = TileSource::new("https://tile.example.org/{z}/{x}/{y}.png", "");
        assert_eq!(
            source.url_for(TileId { x: 3, y: 4, z: 2 }),
            "https://tile.example.org/2/3/4.png"
        );
    }
}
